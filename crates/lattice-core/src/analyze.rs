//! Entry point: builds scopes (B-D) and runs inference (F-G) over one
//! compilation unit, optionally linked against an externs unit first (spec
//! §5 "Program structure").

use lattice_common::{Diagnostic, LatticeOptions};
use lattice_scope::{create_global_this, ScopeId, ScopeTree, Stmt, TypedScopeCreator};
use lattice_types::TypeRegistry;

/// Everything produced by analyzing a compilation unit.
pub struct AnalysisResult {
    pub registry: TypeRegistry,
    pub tree: ScopeTree,
    pub global_scope: ScopeId,
    pub diagnostics: Vec<Diagnostic>,
}

/// Analyzes `source`, optionally preceded by `externs` linked into the same
/// scope tree and registry (spec §5: "exactly one externs unit plus one
/// source unit"). Externs declarations are marked `is_extern = true`, which
/// governs both silent-vs-diagnosed duplicate handling (spec §9 open
/// question, SPEC_FULL §4.4) and property-ownership merging (spec §4.A).
#[must_use]
pub fn analyze(source: &[Stmt], externs: Option<&[Stmt]>, options: &LatticeOptions) -> AnalysisResult {
    let mut registry = TypeRegistry::with_max_union_size(options.max_union_size);
    let mut tree = ScopeTree::new();

    if let Some(externs) = externs {
        tracing::debug!(stmt_count = externs.len(), "analyze: building externs scope");
        TypedScopeCreator::create_scope(&mut registry, &mut tree, externs, None, None, true);
    }

    tracing::debug!(stmt_count = source.len(), "analyze: building source scope");
    let global_this = create_global_this(&mut registry);
    let global_scope =
        TypedScopeCreator::create_scope(&mut registry, &mut tree, source, None, Some(global_this), false);

    tracing::debug!("analyze: running flow-sensitive inference");
    lattice_infer::infer_function_body(&mut registry, &mut tree, global_scope, Some(global_this), source, options);

    // Collected up front: `tree.function_scopes()` borrows `tree`
    // immutably, but each inference pass below needs it mutably.
    let function_scopes: Vec<_> =
        tree.function_scopes().map(|(scope, info)| (scope, info.body.clone(), info.this_type)).collect();
    for (scope, body, this_type) in function_scopes {
        lattice_infer::infer_function_body(&mut registry, &mut tree, scope, this_type, &body, options);
    }

    let diagnostics = registry.take_diagnostics();
    AnalysisResult { registry, tree, global_scope, diagnostics }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattice_common::Span;
    use lattice_scope::{DocInfo, Expr, FunctionLit, Literal, NominalKind};

    #[test]
    fn analyze_runs_scope_construction_and_inference_together() {
        let stmts = vec![Stmt::VarDecl {
            name: "x".into(),
            init: Some(Expr::Literal(Literal::Number(3.0))),
            doc: DocInfo::empty(),
            span: Span::NONE,
        }];
        let options = LatticeOptions::default();
        let result = analyze(&stmts, None, &options);
        let x = result.tree.lookup(result.global_scope, "x").unwrap();
        assert_eq!(result.registry.render(x.ty), "number");
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn duplicate_program_authored_constructor_emits_a_diagnostic() {
        let make_ctor = |name: &str| FunctionLit {
            name: Some(name.to_string()),
            params: vec![],
            doc: DocInfo { nominal_kind: Some(NominalKind::Constructor), ..DocInfo::empty() },
            body: vec![],
            span: Span::NONE,
        };
        let stmts = vec![Stmt::FunctionDecl(make_ctor("Foo")), Stmt::FunctionDecl(make_ctor("Foo"))];
        let options = LatticeOptions::default();
        let result = analyze(&stmts, None, &options);
        assert!(result
            .diagnostics
            .iter()
            .any(|d| d.code == lattice_common::DiagnosticCode::DuplicateNominalDeclaration));
    }
}
