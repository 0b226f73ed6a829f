//! The per-program-point lattice point: a `Var -> Type` mapping (spec
//! §4.G "The lattice point per program point is a mapping `Var -> Type`").

use lattice_types::{TypeId, TypeRegistry};
use rustc_hash::FxHashMap;

/// A flow-sensitive snapshot of every variable's narrowed type, keyed by
/// name. Scoped to a single function body's dataflow pass; a variable not
/// present here falls back to its declared/scope type (spec §4.G "Name ->
/// lookup in current flow state, falling back to the declared type").
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlowState {
    vars: FxHashMap<String, TypeId>,
}

impl FlowState {
    #[must_use]
    pub fn new() -> Self {
        FlowState::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<TypeId> {
        self.vars.get(name).copied()
    }

    pub fn set(&mut self, name: &str, ty: TypeId) {
        self.vars.insert(name.to_string(), ty);
    }

    /// Fixpoint convergence check: the map holds exactly the same bindings
    /// by `TypeId` identity (join is idempotent once a variable's type has
    /// union-saturated, so this is the correct "stop iterating" test).
    #[must_use]
    pub fn vars_eq(&self, other: &FlowState) -> bool {
        self.vars == other.vars
    }

    /// Merge-point join (spec §4.G "the merge point joins element-wise
    /// using the registry's join operation"). Keys present in only one
    /// side carry over unchanged — they were unaffected by the branch that
    /// didn't mention them.
    #[must_use]
    pub fn join(&self, registry: &mut TypeRegistry, other: &FlowState) -> FlowState {
        let mut out = self.clone();
        for (name, &ty) in &other.vars {
            let merged = match out.vars.get(name) {
                Some(&existing) => registry.join(existing, ty),
                None => ty,
            };
            out.vars.insert(name.clone(), merged);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattice_types::NativeKind;

    #[test]
    fn join_merges_shared_keys_and_keeps_unique_ones() {
        let mut registry = TypeRegistry::new();
        let number = registry.get_native(NativeKind::Number);
        let string = registry.get_native(NativeKind::String);

        let mut a = FlowState::new();
        a.set("x", number);
        a.set("y", number);
        let mut b = FlowState::new();
        b.set("x", string);

        let joined = a.join(&mut registry, &b);
        assert_eq!(registry.render(joined.get("x").unwrap()), "(number|string)");
        assert_eq!(joined.get("y"), Some(number));
    }
}
