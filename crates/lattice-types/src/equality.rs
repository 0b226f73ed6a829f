//! Ternary abstract-equality inference (spec §4.A `test_for_equality`).

use crate::id::TypeId;
use crate::kind::{BoxedKind, PrimitiveKind, TypeKind};
use crate::registry::TypeRegistry;

/// Three-valued logic for equality tests. Never reuse `bool` for this —
/// the third state carries real information downstream (spec §9).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trivalent {
    True,
    False,
    Unknown,
}

impl Trivalent {
    #[must_use]
    pub fn fold(values: impl IntoIterator<Item = Trivalent>) -> Trivalent {
        let mut iter = values.into_iter();
        let Some(first) = iter.next() else {
            return Trivalent::Unknown;
        };
        let mut acc = first;
        for v in iter {
            if v != acc {
                return Trivalent::Unknown;
            }
            acc = v;
        }
        acc
    }
}

/// Coarse value domain used only to decide whether two types *could*
/// coerce to a common value domain under loose/abstract equality.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EqualityDomain {
    Nullish,
    Number,
    String,
    Boolean,
    Object,
    Unknown,
}

impl TypeRegistry {
    fn equality_domain(&self, id: TypeId) -> EqualityDomain {
        match self.kind(id) {
            TypeKind::Primitive(PrimitiveKind::Null | PrimitiveKind::Void) => {
                EqualityDomain::Nullish
            }
            TypeKind::Primitive(PrimitiveKind::Number) | TypeKind::Boxed(BoxedKind::NumberObject) => {
                EqualityDomain::Number
            }
            TypeKind::Primitive(PrimitiveKind::String) | TypeKind::Boxed(BoxedKind::StringObject) => {
                EqualityDomain::String
            }
            TypeKind::Primitive(PrimitiveKind::Boolean) | TypeKind::Boxed(BoxedKind::BooleanObject) => {
                EqualityDomain::Boolean
            }
            TypeKind::Object(_)
            | TypeKind::Function(_)
            | TypeKind::Enum(_)
            | TypeKind::EnumElement(_)
            | TypeKind::Record(_) => EqualityDomain::Object,
            TypeKind::Named(n) => match n.resolved.get() {
                Some(resolved) if resolved != id => self.equality_domain(resolved),
                _ => EqualityDomain::Unknown,
            },
            TypeKind::Union(_) | TypeKind::All | TypeKind::No | TypeKind::NoObject
            | TypeKind::Unknown | TypeKind::Template(_) => EqualityDomain::Unknown,
        }
    }

    /// `test_for_equality(a, b)` per spec §4.A.
    #[must_use]
    pub fn test_for_equality(&self, a: TypeId, b: TypeId) -> Trivalent {
        if let TypeKind::Union(u) = self.kind(a) {
            let alts = u.alternates.clone();
            return Trivalent::fold(alts.iter().map(|alt| self.test_for_equality(*alt, b)));
        }
        if let TypeKind::Union(u) = self.kind(b) {
            let alts = u.alternates.clone();
            return Trivalent::fold(alts.iter().map(|alt| self.test_for_equality(a, *alt)));
        }

        let da = self.equality_domain(a);
        let db = self.equality_domain(b);

        if da == EqualityDomain::Unknown || db == EqualityDomain::Unknown {
            return Trivalent::Unknown;
        }
        if da == EqualityDomain::Nullish && db == EqualityDomain::Nullish {
            return Trivalent::True;
        }
        if (da == EqualityDomain::Nullish) != (db == EqualityDomain::Nullish) {
            return Trivalent::False;
        }
        Trivalent::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::NativeKind::{Null, Number, Void};

    #[test]
    fn null_and_void_compare_equal() {
        let registry = TypeRegistry::new();
        let null = registry.get_native(Null);
        let void = registry.get_native(Void);
        assert_eq!(registry.test_for_equality(null, void), Trivalent::True);
        assert_eq!(registry.test_for_equality(null, null), Trivalent::True);
    }

    #[test]
    fn number_and_void_never_compare_equal() {
        let registry = TypeRegistry::new();
        let number = registry.get_native(Number);
        let void = registry.get_native(Void);
        assert_eq!(registry.test_for_equality(number, void), Trivalent::False);
    }

    #[test]
    fn same_primitive_kind_is_unknown() {
        let registry = TypeRegistry::new();
        let number = registry.get_native(Number);
        assert_eq!(registry.test_for_equality(number, number), Trivalent::Unknown);
    }
}
