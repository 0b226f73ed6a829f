//! Type arena handle.

/// Handle into the `TypeRegistry`'s arena. Identity equality on `TypeId`
/// implies semantic equality (spec §3 invariant 1), except for `Named`
/// types, which delegate equality to their resolved referent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(crate) u32);

impl TypeId {
    pub(crate) fn from_index(index: usize) -> Self {
        TypeId(u32::try_from(index).expect("type arena exceeded u32::MAX entries"))
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}
