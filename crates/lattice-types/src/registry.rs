//! The type registry: sole constructor of all types, reverse-index owner,
//! and home of the native singletons (spec §4.A).

use crate::id::TypeId;
use crate::kind::{
    BoxedKind, EnumElementType, EnumType, FunctionType, NamedType, ObjectRole, ObjectType,
    PrimitiveKind, PropertySlot, RecordType, TemplateType, TypeKind, UnionType,
};
use lattice_common::diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, DiagnosticVec};
use lattice_common::limits::{MAX_PROTOTYPE_CHAIN_DEPTH, MAX_UNION_SIZE};
use lattice_common::span::Span;
use rustc_hash::{FxHashMap, FxHashSet};
use std::cell::Cell;

/// Native (built-in) kinds reachable via `TypeRegistry::get_native`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NativeKind {
    Number,
    String,
    Boolean,
    Null,
    Void,
    NumberObject,
    StringObject,
    BooleanObject,
    All,
    No,
    NoObject,
    Unknown,
    /// The generic, propertyless object supertype.
    Object,
    NumberOrObject,
    StringOrObject,
    BooleanOrObject,
}

/// Sole producer of `Type` values and implementer of the lattice
/// operations over them (spec §4.A, invariant 1).
pub struct TypeRegistry {
    arena: Vec<TypeKind>,
    natives: FxHashMap<NativeKind, TypeId>,
    /// Qualified name -> the concrete nominal type registered under it.
    nominal_by_name: FxHashMap<String, TypeId>,
    /// Qualified name -> whether its first (winning) declaration was
    /// extern. Lets a later colliding declaration tell apart "extern
    /// redeclared" (silent, spec §9 open question) from "two
    /// program-authored declarations collide" (SPEC_FULL §4.4).
    nominal_is_extern: FxHashMap<String, bool>,
    /// Qualified name -> the (possibly still-unresolved) `Named` wrapper
    /// handed out for references to that name, interned so repeat
    /// references share identity.
    named_refs: FxHashMap<String, TypeId>,
    /// Reverse index: property name -> every object type that declares it
    /// (spec §4.A `types_with_property`, invariant 7).
    property_index: FxHashMap<String, FxHashSet<TypeId>>,
    /// Canonicalized (sorted, deduped) alternate list -> the union handed
    /// out for it, interned so `create_union` returns the same `TypeId`
    /// for any permutation of the same alternates (spec §8 invariant 5,
    /// §9 "Determinism").
    union_cache: FxHashMap<Vec<TypeId>, TypeId>,
    diagnostics: DiagnosticVec,
    max_union_size: usize,
}

impl TypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        TypeRegistry::with_max_union_size(MAX_UNION_SIZE)
    }

    #[must_use]
    pub fn with_max_union_size(max_union_size: usize) -> Self {
        let mut registry = TypeRegistry {
            arena: Vec::new(),
            natives: FxHashMap::default(),
            nominal_by_name: FxHashMap::default(),
            nominal_is_extern: FxHashMap::default(),
            named_refs: FxHashMap::default(),
            property_index: FxHashMap::default(),
            union_cache: FxHashMap::default(),
            diagnostics: DiagnosticVec::new(),
            max_union_size,
        };
        registry.init_natives();
        registry
    }

    fn alloc(&mut self, kind: TypeKind) -> TypeId {
        let id = TypeId::from_index(self.arena.len());
        self.arena.push(kind);
        id
    }

    fn init_natives(&mut self) {
        use NativeKind::{
            All, Boolean, BooleanObject, BooleanOrObject, No, NoObject, Null, Number,
            NumberObject, NumberOrObject, Object, String as NkString, StringObject,
            StringOrObject, Unknown, Void,
        };

        let all = self.alloc(TypeKind::All);
        let no = self.alloc(TypeKind::No);
        let no_object = self.alloc(TypeKind::NoObject);
        let unknown = self.alloc(TypeKind::Unknown);
        let number = self.alloc(TypeKind::Primitive(PrimitiveKind::Number));
        let string = self.alloc(TypeKind::Primitive(PrimitiveKind::String));
        let boolean = self.alloc(TypeKind::Primitive(PrimitiveKind::Boolean));
        let null = self.alloc(TypeKind::Primitive(PrimitiveKind::Null));
        let void = self.alloc(TypeKind::Primitive(PrimitiveKind::Void));
        let number_object = self.alloc(TypeKind::Boxed(BoxedKind::NumberObject));
        let string_object = self.alloc(TypeKind::Boxed(BoxedKind::StringObject));
        let boolean_object = self.alloc(TypeKind::Boxed(BoxedKind::BooleanObject));
        let object = self.alloc(TypeKind::Object(Box::new(ObjectType::new(ObjectRole::Plain))));

        self.natives.insert(All, all);
        self.natives.insert(No, no);
        self.natives.insert(NoObject, no_object);
        self.natives.insert(Unknown, unknown);
        self.natives.insert(Number, number);
        self.natives.insert(NkString, string);
        self.natives.insert(Boolean, boolean);
        self.natives.insert(Null, null);
        self.natives.insert(Void, void);
        self.natives.insert(NumberObject, number_object);
        self.natives.insert(StringObject, string_object);
        self.natives.insert(BooleanObject, boolean_object);
        self.natives.insert(Object, object);

        let number_or_object = self.create_union(vec![number, number_object]);
        let string_or_object = self.create_union(vec![string, string_object]);
        let boolean_or_object = self.create_union(vec![boolean, boolean_object]);
        self.natives.insert(NumberOrObject, number_or_object);
        self.natives.insert(StringOrObject, string_or_object);
        self.natives.insert(BooleanOrObject, boolean_or_object);
    }

    /// Total lookup for a built-in kind (spec §4.A: "look-ups are total").
    #[must_use]
    pub fn get_native(&self, kind: NativeKind) -> TypeId {
        *self
            .natives
            .get(&kind)
            .expect("native singletons are all created in TypeRegistry::new")
    }

    #[must_use]
    pub fn kind(&self, id: TypeId) -> &TypeKind {
        &self.arena[id.index()]
    }

    /// Follow a `Named` reference to its resolved referent, if any.
    /// Unresolved names return themselves unchanged (spec §4.A: "behave as
    /// `Unknown` for lattice purposes but retain their name for
    /// diagnostics").
    #[must_use]
    pub fn resolve(&self, id: TypeId) -> TypeId {
        let mut current = id;
        let mut guard = 0;
        while let TypeKind::Named(named) = self.kind(current) {
            guard += 1;
            if guard > 256 {
                break;
            }
            match named.resolved.get() {
                Some(next) => current = next,
                None => break,
            }
        }
        current
    }

    /// Resolve a qualified name to its concrete nominal type, if declared.
    #[must_use]
    pub fn resolve_named(&self, qualified_name: &str) -> Option<TypeId> {
        self.nominal_by_name.get(qualified_name).copied()
    }

    /// Get or create a (possibly unresolved) `Named` reference to a
    /// qualified name. If the name is already a concrete nominal type, the
    /// concrete type is returned directly rather than a wrapper.
    pub fn named_reference(&mut self, qualified_name: &str) -> TypeId {
        if let Some(concrete) = self.nominal_by_name.get(qualified_name) {
            return *concrete;
        }
        if let Some(existing) = self.named_refs.get(qualified_name) {
            return *existing;
        }
        let id = self.alloc(TypeKind::Named(Box::new(NamedType {
            name: qualified_name.to_string(),
            resolved: Cell::new(None),
        })));
        self.named_refs.insert(qualified_name.to_string(), id);
        id
    }

    /// Register a freshly created nominal type under a qualified name,
    /// resolving any outstanding `Named` references to it (spec §4.A,
    /// invariant 2: a nominal type is created exactly once per declaration
    /// site, first wins).
    fn register_nominal(&mut self, name: &str, id: TypeId, is_extern: bool) -> bool {
        if self.nominal_by_name.contains_key(name) {
            return false;
        }
        self.nominal_by_name.insert(name.to_string(), id);
        self.nominal_is_extern.insert(name.to_string(), is_extern);
        if let Some(named_ref) = self.named_refs.get(name) {
            if let TypeKind::Named(n) = self.kind(*named_ref) {
                n.resolved.set(Some(id));
            }
        }
        true
    }

    /// A second declaration of `name` collided with the first. Stays silent
    /// when either side is extern (spec §9 open question: duplicate externs
    /// are silently deduped); diagnoses only when both are program-authored
    /// (SPEC_FULL §4.4).
    fn check_duplicate_nominal(&mut self, name: &str, is_extern: bool) {
        let existing_extern = self.nominal_is_extern.get(name).copied().unwrap_or(false);
        if !existing_extern && !is_extern {
            self.diagnostics.push(Diagnostic::new(
                DiagnosticCode::DuplicateNominalDeclaration,
                format!("`{name}` is declared more than once"),
                Span::NONE,
            ));
        }
    }

    #[must_use]
    pub fn create_object(&mut self, name: Option<&str>, implicit_proto: Option<TypeId>) -> TypeId {
        self.create_object_with_extern(name, implicit_proto, false)
    }

    pub fn create_object_with_extern(
        &mut self,
        name: Option<&str>,
        implicit_proto: Option<TypeId>,
        is_extern: bool,
    ) -> TypeId {
        if let Some(name) = name
            && let Some(existing) = self.nominal_by_name.get(name)
        {
            // Unlike `create_function_with_extern`, plain objects are also
            // created through idempotent accessors (`GlobalThis`'s
            // create-or-return), so a second call here isn't necessarily a
            // colliding user declaration; no duplicate diagnostic.
            return *existing;
        }
        let mut object = ObjectType::new(ObjectRole::Plain);
        object.name = name.map(str::to_string);
        object.implicit_prototype = implicit_proto;
        let id = self.alloc(TypeKind::Object(Box::new(object)));
        if let Some(name) = name {
            self.register_nominal(name, id, is_extern);
        }
        id
    }

    /// Create a function type. If `is_ctor || is_iface`, also creates the
    /// paired `Instance` and `Prototype` object types (spec §3 invariant 2,
    /// §4.A `create_function`).
    #[must_use]
    pub fn create_function(
        &mut self,
        name: Option<&str>,
        params: Vec<TypeId>,
        param_names: Vec<String>,
        return_type: TypeId,
        this_type: Option<TypeId>,
        is_ctor: bool,
        is_iface: bool,
    ) -> TypeId {
        self.create_function_with_extern(name, params, param_names, return_type, this_type, is_ctor, is_iface, false)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn create_function_with_extern(
        &mut self,
        name: Option<&str>,
        params: Vec<TypeId>,
        param_names: Vec<String>,
        return_type: TypeId,
        this_type: Option<TypeId>,
        is_ctor: bool,
        is_iface: bool,
        is_extern: bool,
    ) -> TypeId {
        if let Some(name) = name
            && let Some(existing) = self.nominal_by_name.get(name)
        {
            self.check_duplicate_nominal(name, is_extern);
            return *existing;
        }

        let func_id = self.alloc(TypeKind::Function(Box::new(FunctionType {
            name: name.map(str::to_string),
            params: params.into(),
            param_names,
            return_type,
            this_type,
            is_variadic: false,
            type_parameters: Vec::new(),
            is_constructor: is_ctor,
            is_interface: is_iface,
            implemented_interfaces: Vec::new(),
            instance_type: None,
            prototype_type: None,
        })));

        if is_ctor || is_iface {
            let proto_name = name.map(|n| format!("{n}.prototype"));
            let mut prototype = ObjectType::new(ObjectRole::FunctionPrototype);
            prototype.name = proto_name;
            prototype.constructor = Some(func_id);
            let prototype_id = self.alloc(TypeKind::Object(Box::new(prototype)));

            let mut instance = ObjectType::new(ObjectRole::Instance);
            instance.name = name.map(str::to_string);
            instance.implicit_prototype = Some(prototype_id);
            instance.constructor = Some(func_id);
            let instance_id = self.alloc(TypeKind::Object(Box::new(instance)));

            if let TypeKind::Function(f) = &mut self.arena[func_id.index()] {
                f.instance_type = Some(instance_id);
                f.prototype_type = Some(prototype_id);
            }
        }

        if let Some(name) = name {
            self.register_nominal(name, func_id, is_extern);
        }
        func_id
    }

    #[must_use]
    pub fn create_enum(&mut self, name: &str, element_type: TypeId) -> TypeId {
        if let Some(existing) = self.nominal_by_name.get(name) {
            return *existing;
        }
        let id = self.alloc(TypeKind::Enum(Box::new(EnumType {
            name: name.to_string(),
            element_type,
            members: indexmap::IndexMap::new(),
        })));
        self.register_nominal(name, id, false);
        id
    }

    /// Add a member to an enum, creating its `EnumElement<E>` type.
    /// Returns the member's `EnumElement` type id.
    pub fn add_enum_member(&mut self, enum_id: TypeId, member_name: &str) -> TypeId {
        let element_type = match self.kind(enum_id) {
            TypeKind::Enum(e) => e.element_type,
            _ => panic!("add_enum_member called on a non-Enum type"),
        };
        let element_id = self.alloc(TypeKind::EnumElement(Box::new(EnumElementType {
            enum_type: enum_id,
            element_type,
            member_name: member_name.to_string(),
        })));
        if let TypeKind::Enum(e) = &mut self.arena[enum_id.index()] {
            e.members.insert(member_name.to_string(), element_id);
        }
        element_id
    }

    #[must_use]
    pub fn create_record(&mut self, fields: Vec<(String, TypeId)>) -> TypeId {
        self.alloc(TypeKind::Record(Box::new(RecordType { fields })))
    }

    #[must_use]
    pub fn create_template(&mut self, name: &str) -> TypeId {
        self.alloc(TypeKind::Template(Box::new(TemplateType {
            name: name.to_string(),
        })))
    }

    /// Create the canonical union of `alternates` (spec §3 invariant 5,
    /// §4.A `create_union`). May reduce to a single type.
    #[must_use]
    pub fn create_union(&mut self, alternates: Vec<TypeId>) -> TypeId {
        let unknown = self.natives.get(&NativeKind::Unknown).copied();
        let all = self.natives.get(&NativeKind::All).copied();

        // Flatten nested unions and resolve Named indirections for the
        // purposes of the absorption checks below (identity is preserved
        // in the output — we only peek through to check for All/Unknown).
        let mut flat: Vec<TypeId> = Vec::new();
        let mut stack = alternates;
        while let Some(t) = stack.pop() {
            match self.kind(t) {
                TypeKind::Union(u) => stack.extend(u.alternates.iter().copied()),
                _ => flat.push(t),
            }
        }

        if let Some(unknown) = unknown
            && flat.iter().any(|t| *t == unknown || self.resolve(*t) == unknown)
        {
            return unknown;
        }

        // `All` absorbs every other alternate.
        if let Some(all) = all
            && flat.iter().any(|t| *t == all)
        {
            return all;
        }

        flat.sort_by_key(|t| self.render(*t));
        flat.dedup();

        if flat.len() > self.max_union_size {
            return self.get_native(NativeKind::Unknown);
        }

        match flat.len() {
            0 => self.get_native(NativeKind::No),
            1 => flat[0],
            _ => {
                if let Some(&existing) = self.union_cache.get(&flat) {
                    return existing;
                }
                let id = self.alloc(TypeKind::Union(Box::new(UnionType { alternates: flat.clone() })));
                self.union_cache.insert(flat, id);
                id
            }
        }
    }

    /// Declare a property on an object type, honoring declared-shadows-
    /// inferred and the extern duplicate-merge rules (spec §3 invariants
    /// 3-4, §4.D "Property registration").
    pub fn declare_property(
        &mut self,
        owner: TypeId,
        name: &str,
        ty: TypeId,
        declared: bool,
        is_extern: bool,
    ) {
        self.property_index
            .entry(name.to_string())
            .or_default()
            .insert(owner);

        let TypeKind::Object(object) = &mut self.arena[owner.index()] else {
            return;
        };

        match object.properties.get(name) {
            None => {
                object.properties.insert(
                    name.to_string(),
                    PropertySlot {
                        ty,
                        declared,
                        is_extern,
                    },
                );
            }
            Some(existing) => {
                let existing_declared = existing.declared;
                let existing_extern = existing.is_extern;
                let existing_ty = existing.ty;
                if existing_extern && is_extern {
                    // Both extern: silent, first wins (spec §9 open question).
                    return;
                }
                if existing_declared && !declared {
                    // Declared shadows inferred; keep the declared slot but
                    // the extern flag still merges.
                    if is_extern {
                        object.properties.get_mut(name).unwrap().is_extern = true;
                    }
                    return;
                }
                if !existing_declared && declared {
                    object.properties.insert(
                        name.to_string(),
                        PropertySlot {
                            ty,
                            declared: true,
                            is_extern: existing_extern || is_extern,
                        },
                    );
                    return;
                }
                if !existing_extern && !is_extern && existing_declared && declared {
                    // Two non-extern declared properties collide.
                    if existing_ty != ty {
                        self.diagnostics.push(Diagnostic::new(
                            DiagnosticCode::DuplicateNominalDeclaration,
                            format!("property `{name}` redeclared with a different type"),
                            Span::NONE,
                        ));
                    }
                    return;
                }
                // Inferred property re-assigned: caller is responsible for
                // joining with the existing inferred type before calling
                // this again; we just overwrite here since the join has
                // already happened upstream (see `lattice-infer`).
                object.properties.insert(
                    name.to_string(),
                    PropertySlot {
                        ty,
                        declared,
                        is_extern: existing_extern || is_extern,
                    },
                );
            }
        }
    }

    /// Every object type that has ever declared a property named `name`
    /// (spec §4.A `types_with_property`).
    #[must_use]
    pub fn types_with_property(&self, name: &str) -> Vec<TypeId> {
        self.property_index
            .get(name)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Look up the type of property `name` on `owner` only (no prototype
    /// walk); see `lattice_infer` for the full dereference-and-lookup
    /// chain used by the inference engine.
    #[must_use]
    pub fn own_property_type(&self, owner: TypeId, name: &str) -> Option<TypeId> {
        match self.kind(owner) {
            TypeKind::Object(o) => o.properties.get(name).map(|slot| slot.ty),
            _ => None,
        }
    }

    /// Property dereference through the implicit-prototype chain (spec
    /// §4.G "Property access `e.p`"): the first owner in the chain
    /// (starting at `owner` itself) that declares `name`.
    #[must_use]
    pub fn property_type_through_chain(&self, owner: TypeId, name: &str) -> Option<TypeId> {
        let mut current = Some(owner);
        let mut steps = 0;
        while let Some(id) = current {
            if let Some(ty) = self.own_property_type(id, name) {
                return Some(ty);
            }
            steps += 1;
            if steps > MAX_PROTOTYPE_CHAIN_DEPTH {
                return None;
            }
            current = match self.kind(id) {
                TypeKind::Object(o) => o.implicit_prototype,
                _ => None,
            };
        }
        None
    }

    #[must_use]
    pub fn own_property_slot(&self, owner: TypeId, name: &str) -> Option<&PropertySlot> {
        match self.kind(owner) {
            TypeKind::Object(o) => o.properties.get(name),
            _ => None,
        }
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics).into_vec()
    }

    /// Push a diagnostic directly; used by callers outside this crate (e.g.
    /// `lattice-scope`'s special-form handlers) that need to surface
    /// `CONSTRUCTOR_EXPECTED` / `OBJECTLIT_EXPECTED` / `ParseError`.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// The paired `Prototype` object of a constructor/interface `Function`.
    #[must_use]
    pub fn function_prototype(&self, func: TypeId) -> Option<TypeId> {
        match self.kind(func) {
            TypeKind::Function(f) => f.prototype_type,
            _ => None,
        }
    }

    /// The paired `Instance` object of a constructor/interface `Function`.
    #[must_use]
    pub fn function_instance(&self, func: TypeId) -> Option<TypeId> {
        match self.kind(func) {
            TypeKind::Function(f) => f.instance_type,
            _ => None,
        }
    }

    /// The `Function` that owns `obj`, if `obj` is a `Prototype` or
    /// `Instance` object.
    #[must_use]
    pub fn object_constructor(&self, obj: TypeId) -> Option<TypeId> {
        match self.kind(obj) {
            TypeKind::Object(o) => o.constructor,
            _ => None,
        }
    }

    /// Rewire `obj`'s implicit-prototype link. Used when a `FunctionPrototype`
    /// is replaced wholesale by an object literal (spec §4.D, "`F.prototype =
    /// { ... }`"): the literal's own anonymous object becomes the
    /// `FunctionPrototype`'s new implicit prototype, preserving the
    /// constructor-prototype invariant while the literal's keys live on the
    /// anonymous object rather than directly on the `FunctionPrototype`.
    pub fn set_implicit_prototype(&mut self, obj: TypeId, proto: Option<TypeId>) {
        if let TypeKind::Object(o) = &mut self.arena[obj.index()] {
            o.implicit_prototype = proto;
        }
    }

    /// Record `iface` as an interface implemented by constructor `ctor`
    /// (SPEC_FULL §4.2 `@implements`).
    pub fn add_implemented_interface(&mut self, ctor: TypeId, iface: TypeId) {
        if let TypeKind::Function(f) = &mut self.arena[ctor.index()] {
            f.implemented_interfaces.push(iface);
        }
    }

    /// Record `params` as this function's `@template` type parameter names
    /// (SPEC_FULL §4.3).
    pub fn set_type_parameters(&mut self, func: TypeId, params: Vec<String>) {
        if let TypeKind::Function(f) = &mut self.arena[func.index()] {
            f.type_parameters = params;
        }
    }

    /// Whether `id` is an `Object`-kinded type (plain, prototype, or
    /// instance) as opposed to a function/enum/primitive/etc.
    #[must_use]
    pub fn is_object(&self, id: TypeId) -> bool {
        matches!(self.kind(id), TypeKind::Object(_))
    }

    /// Whether `id` is a constructor or interface `Function`.
    #[must_use]
    pub fn is_nominal_function(&self, id: TypeId) -> bool {
        matches!(self.kind(id), TypeKind::Function(f) if f.is_constructor || f.is_interface)
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        TypeRegistry::new()
    }
}
