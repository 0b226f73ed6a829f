//! Type registry and lattice operations (spec §4.A): subtyping, join,
//! meet, ternary equality, narrowing, and textual rendering over an
//! arena-interned set of types.

mod equality;
mod id;
mod instantiate;
mod join_meet;
mod kind;
mod narrowing;
mod registry;
mod render;
mod subtype;

pub use equality::Trivalent;
pub use id::TypeId;
pub use kind::{
    BoxedKind, EnumElementType, EnumType, FunctionType, NamedType, ObjectRole, ObjectType,
    PrimitiveKind, PropertySlot, RecordType, TemplateType, TypeKind, UnionType,
};
pub use narrowing::BoolOutcomes;
pub use registry::{NativeKind, TypeRegistry};
