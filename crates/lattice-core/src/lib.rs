//! Public façade over the type lattice / scope construction core.
//!
//! Wires the type registry (component A), the scope tree and typed scope
//! creator (components B-D), and the flow-sensitive inference engine
//! (components F-G) into a single entry point over a compilation unit's
//! statements. No CLI, no file or network I/O, no parser: callers hand in
//! an already-parsed `Stmt` tree (spec §1).

mod analyze;

pub use analyze::{analyze, AnalysisResult};

pub use lattice_common::{Diagnostic, DiagnosticCategory, DiagnosticCode, DiagnosticSink, LatticeOptions, Span};
pub use lattice_scope::{
    create_global_this, is_aliasable_nominal, is_pure_reference, should_alias, BinOp, DocInfo, Expr, FunctionLit,
    FunctionScopeInfo, Literal, LogicalOp, NominalKind, ObjectProp, PathRoot, Scope, ScopeId, ScopeTree, Stmt,
    TypedScopeCreator, TypeExpr, Var,
};
pub use lattice_types::{NativeKind, TypeId, TypeKind, TypeRegistry};
