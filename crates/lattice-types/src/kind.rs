//! Core type variant definitions.
//!
//! Grounded in the teacher's `tsz-checker::types::type_def::Type` enum:
//! large variants are boxed to keep the enum small, each variant carries
//! its own flags-free struct (this lattice is far smaller than a full TS
//! type system, so no bitflag soup is needed — plain enums for closed
//! variant sets, as the teacher does for e.g. `MappedTypeModifier`).

use crate::id::TypeId;
use indexmap::IndexMap;
use smallvec::SmallVec;
use std::cell::Cell;

/// The five primitive value types (spec §3).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrimitiveKind {
    Number,
    String,
    Boolean,
    Null,
    Void,
}

/// The three boxed (auto/unboxable) counterparts of the primitives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoxedKind {
    NumberObject,
    StringObject,
    BooleanObject,
}

impl BoxedKind {
    #[must_use]
    pub const fn unboxed(self) -> PrimitiveKind {
        match self {
            BoxedKind::NumberObject => PrimitiveKind::Number,
            BoxedKind::StringObject => PrimitiveKind::String,
            BoxedKind::BooleanObject => PrimitiveKind::Boolean,
        }
    }
}

/// A declared-vs-inferred property type, with the extern-origin flag
/// preserved across merges (spec §3 invariants 3-4).
#[derive(Clone, Debug)]
pub struct PropertySlot {
    pub ty: TypeId,
    pub declared: bool,
    pub is_extern: bool,
}

/// What role an `Object` type plays in a prototype chain (spec §3).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectRole {
    /// A plain or anonymous object (object literal, namespace object, ...).
    Plain,
    /// The `prototype` property of a `Function` marked constructor/interface.
    /// Its `constructor` field points back at the owning function.
    FunctionPrototype,
    /// An instance of a constructor (`new Foo()`), or a structural
    /// conformance witness of an interface.
    Instance,
}

/// A nominal or anonymous object with a property map and an implicit
/// prototype link.
#[derive(Clone, Debug)]
pub struct ObjectType {
    pub role: ObjectRole,
    /// Qualified name if this object was registered by name (spec §3: every
    /// nominal type has exactly one Instance and one Prototype).
    pub name: Option<String>,
    pub properties: IndexMap<String, PropertySlot>,
    pub implicit_prototype: Option<TypeId>,
    /// Back-reference to the owning `Function`, present for
    /// `FunctionPrototype` and `Instance` roles.
    pub constructor: Option<TypeId>,
}

impl ObjectType {
    #[must_use]
    pub fn new(role: ObjectRole) -> Self {
        ObjectType {
            role,
            name: None,
            properties: IndexMap::new(),
            implicit_prototype: None,
            constructor: None,
        }
    }
}

/// A function type: specialization of `Object` carrying parameter types,
/// a return type, a `this`-type, and (for constructors/interfaces) the
/// paired `Instance`/`Prototype` types.
#[derive(Clone, Debug)]
pub struct FunctionType {
    pub name: Option<String>,
    /// Most declared functions take a handful of parameters; `SmallVec`
    /// avoids a heap allocation for the common case (mirrors the teacher's
    /// `SmallVec` use for similarly small per-declaration collections).
    pub params: SmallVec<[TypeId; 4]>,
    pub param_names: Vec<String>,
    pub return_type: TypeId,
    pub this_type: Option<TypeId>,
    pub is_variadic: bool,
    /// Names of this function's `@template` type parameters, substitutable
    /// at call sites (SPEC_FULL §4.3).
    pub type_parameters: Vec<String>,
    pub is_constructor: bool,
    pub is_interface: bool,
    /// `@implements` list (SPEC_FULL §4.2) — only meaningful when
    /// `is_constructor` is true.
    pub implemented_interfaces: Vec<TypeId>,
    /// Present iff `is_constructor || is_interface` (spec §3 invariant 2).
    pub instance_type: Option<TypeId>,
    pub prototype_type: Option<TypeId>,
}

/// A type whose elements all share a single element type `E`.
#[derive(Clone, Debug)]
pub struct EnumType {
    pub name: String,
    pub element_type: TypeId,
    /// Member name -> its `EnumElement<E>` type.
    pub members: IndexMap<String, TypeId>,
}

/// `EnumElement<E>`: the type of one member of an enum.
#[derive(Clone, Debug)]
pub struct EnumElementType {
    pub enum_type: TypeId,
    pub element_type: TypeId,
    pub member_name: String,
}

/// A structural object with a fixed, ordered property schema.
#[derive(Clone, Debug)]
pub struct RecordType {
    pub fields: Vec<(String, TypeId)>,
}

/// A reference-by-qualified-name to another type, resolved lazily.
///
/// `resolved` is a `Cell` because resolution happens in place, after the
/// `Named` type has already been handed out to callers (spec §4.A:
/// "unresolved names remain `Named` and may resolve later"); the whole
/// core is single-threaded (spec §5), so `Cell` rather than `RwLock` is
/// the idiomatic choice here.
#[derive(Debug)]
pub struct NamedType {
    pub name: String,
    pub resolved: Cell<Option<TypeId>>,
}

impl Clone for NamedType {
    fn clone(&self) -> Self {
        NamedType {
            name: self.name.clone(),
            resolved: Cell::new(self.resolved.get()),
        }
    }
}

/// An unordered set of >= 2 alternates. Canonical: sorted by textual form,
/// flattened, deduplicated; never contains `All` or another `Union`
/// (spec §3 invariant 5). Construction is the registry's job — see
/// `registry::TypeRegistry::create_union`.
#[derive(Clone, Debug)]
pub struct UnionType {
    pub alternates: Vec<TypeId>,
}

/// A placeholder for a `@template` type parameter, substitutable at call
/// sites via `TypeRegistry::instantiate`.
#[derive(Clone, Debug)]
pub struct TemplateType {
    pub name: String,
}

/// All possible type variants (spec §3). Large variants are boxed to keep
/// the enum small, matching the teacher's `Type` enum layout.
#[derive(Clone, Debug)]
pub enum TypeKind {
    /// Top of the lattice: supertype of everything.
    All,
    /// Bottom of the lattice: subtype of everything.
    No,
    /// Bottom restricted to object types (spec §4.A subtyping rule 1).
    NoObject,
    /// Both subtype and supertype of everything.
    Unknown,
    Primitive(PrimitiveKind),
    Boxed(BoxedKind),
    Object(Box<ObjectType>),
    Function(Box<FunctionType>),
    Enum(Box<EnumType>),
    EnumElement(Box<EnumElementType>),
    Record(Box<RecordType>),
    Named(Box<NamedType>),
    Union(Box<UnionType>),
    Template(Box<TemplateType>),
}

impl TypeKind {
    #[must_use]
    pub fn as_object(&self) -> Option<&ObjectType> {
        match self {
            TypeKind::Object(o) => Some(o),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_function(&self) -> Option<&FunctionType> {
        match self {
            TypeKind::Function(f) => Some(f),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_union(&self) -> Option<&UnionType> {
        match self {
            TypeKind::Union(u) => Some(u),
            _ => None,
        }
    }
}
