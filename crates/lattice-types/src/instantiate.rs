//! `@template` substitution at call sites (SPEC_FULL §4.3), used by the
//! `Call` transfer rule in `lattice-infer`'s inference engine (spec §4.G).

use crate::id::TypeId;
use crate::kind::TypeKind;
use crate::registry::TypeRegistry;
use rustc_hash::FxHashMap;

impl TypeRegistry {
    /// Infer a substitution for `func`'s `@template` parameters from the
    /// types of the arguments actually passed at a call site, then return
    /// `func`'s return type with that substitution applied.
    ///
    /// Only positions where a parameter's declared type is literally a
    /// `Template` placeholder contribute to the substitution map; deeper
    /// structural unification (e.g. `Array.<T>`) is outside this core's
    /// scope (spec §4.G only asks for argument-type substitution).
    pub fn instantiate(&mut self, func: TypeId, arg_types: &[TypeId]) -> TypeId {
        let TypeKind::Function(f) = self.kind(func) else {
            return self.get_native(crate::registry::NativeKind::Unknown);
        };

        let params = f.params.clone();
        let return_type = f.return_type;

        let mut subs: FxHashMap<String, TypeId> = FxHashMap::default();
        for (param_ty, arg_ty) in params.iter().zip(arg_types.iter()) {
            if let TypeKind::Template(tpl) = self.kind(*param_ty) {
                let name = tpl.name.clone();
                match subs.get(&name) {
                    Some(existing) => {
                        let joined = self.join(*existing, *arg_ty);
                        subs.insert(name, joined);
                    }
                    None => {
                        subs.insert(name, *arg_ty);
                    }
                }
            }
        }

        if subs.is_empty() {
            return return_type;
        }
        self.substitute(return_type, &subs)
    }

    fn substitute(&mut self, t: TypeId, subs: &FxHashMap<String, TypeId>) -> TypeId {
        match self.kind(t) {
            TypeKind::Template(tpl) => subs.get(&tpl.name).copied().unwrap_or(t),
            TypeKind::Union(u) => {
                let alts = u.alternates.clone();
                let substituted: Vec<TypeId> =
                    alts.into_iter().map(|alt| self.substitute(alt, subs)).collect();
                self.create_union(substituted)
            }
            TypeKind::Record(r) => {
                let fields = r.fields.clone();
                let substituted: Vec<(String, TypeId)> = fields
                    .into_iter()
                    .map(|(name, ty)| (name, self.substitute(ty, subs)))
                    .collect();
                self.create_record(substituted)
            }
            _ => t,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::NativeKind::{Number, String as Str};

    #[test]
    fn instantiate_substitutes_template_return_type() {
        let mut registry = TypeRegistry::new();
        let number = registry.get_native(Number);
        let string = registry.get_native(Str);
        let template = registry.create_template("T");
        let identity = registry.create_function(
            Some("identity"),
            vec![template],
            vec!["x".into()],
            template,
            None,
            false,
            false,
        );
        let result = registry.instantiate(identity, &[string]);
        assert_eq!(result, string);
        let _ = number;
    }
}
