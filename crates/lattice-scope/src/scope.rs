//! Lexical scope tree (spec §4.B).

use crate::ast::Stmt;
use indexmap::IndexMap;
use lattice_common::Span;
use lattice_types::{TypeId, TypeRegistry};

/// Handle into a `ScopeTree`'s arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

/// A declared name: its type, whether it was annotated (`declared`) or is
/// still being refined by inference (`inferred`), and the declaration site.
#[derive(Clone, Debug)]
pub struct Var {
    pub name: String,
    pub ty: TypeId,
    pub declared: bool,
    pub decl_span: Span,
}

/// A single lexical region: a named store parameterized by a parent scope.
#[derive(Debug)]
pub struct Scope {
    parent: Option<ScopeId>,
    vars: IndexMap<String, Var>,
}

/// A function scope's own body and `this` binding, recorded by the typed
/// scope creator as it recurses so a later pass (the inference engine) can
/// revisit every function scope without re-deriving AST traversal order.
pub struct FunctionScopeInfo {
    pub body: Vec<Stmt>,
    pub this_type: Option<TypeId>,
}

/// The full tree of scopes for a compilation unit. The global scope is the
/// root and is created once, at `ScopeTree::new`.
pub struct ScopeTree {
    scopes: Vec<Scope>,
    root: ScopeId,
    function_scopes: Vec<(ScopeId, FunctionScopeInfo)>,
}

impl ScopeTree {
    #[must_use]
    pub fn new() -> Self {
        let root_scope = Scope {
            parent: None,
            vars: IndexMap::new(),
        };
        ScopeTree {
            scopes: vec![root_scope],
            root: ScopeId(0),
            function_scopes: Vec::new(),
        }
    }

    #[must_use]
    pub fn root(&self) -> ScopeId {
        self.root
    }

    #[must_use]
    pub fn is_global(&self, scope: ScopeId) -> bool {
        scope == self.root
    }

    pub fn create_child(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(u32::try_from(self.scopes.len()).expect("scope arena overflow"));
        self.scopes.push(Scope {
            parent: Some(parent),
            vars: IndexMap::new(),
        });
        id
    }

    fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0 as usize]
    }

    fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.0 as usize]
    }

    /// Declare `name` in `scope`. A second declaration of the same name in
    /// the same scope does not shadow: its type joins with the existing
    /// var's type, and the var becomes `declared` if either declaration was
    /// annotated (spec §4.B).
    pub fn declare(
        &mut self,
        registry: &mut TypeRegistry,
        scope: ScopeId,
        name: &str,
        ty: TypeId,
        declared: bool,
        decl_span: Span,
    ) {
        let scope_ref = self.scope_mut(scope);
        match scope_ref.vars.get(name) {
            None => {
                scope_ref.vars.insert(
                    name.to_string(),
                    Var {
                        name: name.to_string(),
                        ty,
                        declared,
                        decl_span,
                    },
                );
            }
            Some(existing) => {
                let joined_ty = registry.join(existing.ty, ty);
                let joined_declared = existing.declared || declared;
                let first_span = existing.decl_span;
                self.scope_mut(scope).vars.insert(
                    name.to_string(),
                    Var {
                        name: name.to_string(),
                        ty: joined_ty,
                        declared: joined_declared,
                        decl_span: first_span,
                    },
                );
            }
        }
    }

    /// Walk from `scope` to the root looking for `name`.
    #[must_use]
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<&Var> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = self.scope(id);
            if let Some(var) = s.vars.get(name) {
                return Some(var);
            }
            current = s.parent;
        }
        None
    }

    /// Same as `lookup`, but only within `scope` itself (no parent walk) —
    /// used by the creator to detect same-scope redeclarations.
    #[must_use]
    pub fn lookup_own(&self, scope: ScopeId, name: &str) -> Option<&Var> {
        self.scope(scope).vars.get(name)
    }

    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scope(scope).parent
    }

    /// All vars declared directly in `scope` (not ancestors).
    pub fn own_vars(&self, scope: ScopeId) -> impl Iterator<Item = &Var> {
        self.scope(scope).vars.values()
    }

    /// Overwrite a var's final type in place (used by the inference engine's
    /// "variable type finalization" step, spec §4.G).
    pub fn set_final_type(&mut self, scope: ScopeId, name: &str, ty: TypeId) {
        if let Some(var) = self.scope_mut(scope).vars.get_mut(name) {
            var.ty = ty;
        }
    }

    /// Link `scope` (already created for a function body) to the body and
    /// `this` binding inference should run it with.
    pub fn record_function_scope(&mut self, scope: ScopeId, body: Vec<Stmt>, this_type: Option<TypeId>) {
        self.function_scopes.push((scope, FunctionScopeInfo { body, this_type }));
    }

    /// Every function scope recorded during scope construction, in
    /// declaration order.
    pub fn function_scopes(&self) -> impl Iterator<Item = (ScopeId, &FunctionScopeInfo)> {
        self.function_scopes.iter().map(|(id, info)| (*id, info))
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        ScopeTree::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattice_types::NativeKind;

    #[test]
    fn lookup_walks_to_parent_on_miss() {
        let mut registry = TypeRegistry::new();
        let mut tree = ScopeTree::new();
        let number = registry.get_native(NativeKind::Number);
        tree.declare(&mut registry, tree.root(), "x", number, true, Span::NONE);
        let child = tree.create_child(tree.root());
        assert!(tree.lookup(child, "x").is_some());
        assert!(tree.lookup_own(child, "x").is_none());
    }

    #[test]
    fn redeclaration_joins_type_and_promotes_declared() {
        let mut registry = TypeRegistry::new();
        let mut tree = ScopeTree::new();
        let number = registry.get_native(NativeKind::Number);
        let string = registry.get_native(NativeKind::String);
        let root = tree.root();
        tree.declare(&mut registry, root, "x", number, false, Span::NONE);
        tree.declare(&mut registry, root, "x", string, true, Span::NONE);
        let var = tree.lookup(root, "x").unwrap();
        assert!(var.declared);
        assert_eq!(registry.render(var.ty), "(number|string)");
    }
}
