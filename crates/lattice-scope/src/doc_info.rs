//! Doc-info adapter (spec §4.C).
//!
//! The doc-comment vocabulary itself (`@constructor`, `@enum`, `@type`, ...)
//! is parsed upstream of this core (spec §1, "out of scope"); what this
//! module owns is the structured `DocInfo` shape those annotations land in,
//! and `realize`, the single place that turns a parsed type expression into
//! a registry-backed `TypeId` — isolating doc interpretation the way the
//! design note in spec §9 asks for, rather than threading doc checks through
//! the scope creator's statement handlers.

use lattice_types::TypeId;
use lattice_types::{NativeKind, TypeRegistry};

/// A parsed type expression, as it would appear inside a `@type`/`@param`/
/// `@return`/`@extends` annotation, before being realized into a `TypeId`.
#[derive(Clone, Debug)]
pub enum TypeExpr {
    /// A bare name: a primitive (`number`, `string`, ...), `Object`, or a
    /// nominal reference resolved by qualified name.
    Name(String),
    /// `?T` shorthand for `(T|null)`.
    Nullable(Box<TypeExpr>),
    /// `(T1|T2|...)`.
    Union(Vec<TypeExpr>),
    /// `function(this:T, A, B): R`.
    Function {
        this_type: Option<Box<TypeExpr>>,
        params: Vec<TypeExpr>,
        return_type: Box<TypeExpr>,
    },
    /// `Name.<Elem>` (an enum-element reference) or a generic-looking
    /// annotation; only the enum-element shape is realized meaningfully.
    Generic(String, Vec<TypeExpr>),
    /// `*`.
    All,
    /// `?` on its own (distinct from the `?T` nullable shorthand).
    Unknown,
}

/// Which nominal kind a declaration's doc comment marks it as.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NominalKind {
    Constructor,
    Interface,
    Enum,
}

/// Structured annotations attached to one AST node (spec §4.C).
#[derive(Clone, Debug, Default)]
pub struct DocInfo {
    /// `@type`, or for `@enum {T}`, the element type `T`.
    pub declared_type: Option<TypeExpr>,
    /// `@param name {T}` entries, in declaration order.
    pub params: Vec<(String, TypeExpr)>,
    /// `@return {T}`.
    pub return_type: Option<TypeExpr>,
    pub nominal_kind: Option<NominalKind>,
    /// `@extends {Base}`.
    pub extends: Option<TypeExpr>,
    /// `@implements {Iface}` entries.
    pub implements: Vec<TypeExpr>,
    /// `@template T, U` names.
    pub template_params: Vec<String>,
    /// Whether this declaration site lives in an externs AST (spec §4.D
    /// "In externs, flag the property as extern-originated").
    pub is_extern: bool,
}

impl DocInfo {
    #[must_use]
    pub fn empty() -> Self {
        DocInfo::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declared_type.is_none()
            && self.params.is_empty()
            && self.return_type.is_none()
            && self.nominal_kind.is_none()
            && self.extends.is_none()
            && self.implements.is_empty()
            && self.template_params.is_empty()
    }
}

/// Turns parsed `TypeExpr`s into registry-backed `TypeId`s. Stateless beyond
/// the registry it's handed; kept as a unit struct so call sites read as
/// `DocInfoAdapter.realize(...)` the way the teacher's adapter-style structs
/// read (e.g. `tsz-binder`'s various `*State` adapters).
pub struct DocInfoAdapter;

impl DocInfoAdapter {
    /// Realize a parsed type expression into a `TypeId`, creating `Named`
    /// placeholders for not-yet-declared nominal references (spec §4.C:
    /// "a `Named` placeholder is emitted and recorded for later resolution").
    pub fn realize(&self, registry: &mut TypeRegistry, expr: &TypeExpr) -> TypeId {
        match expr {
            TypeExpr::All => registry.get_native(NativeKind::All),
            TypeExpr::Unknown => registry.get_native(NativeKind::Unknown),
            TypeExpr::Name(name) => self.realize_name(registry, name),
            TypeExpr::Nullable(inner) => {
                let inner_ty = self.realize(registry, inner);
                let null = registry.get_native(NativeKind::Null);
                registry.create_union(vec![inner_ty, null])
            }
            TypeExpr::Union(alts) => {
                let ids: Vec<TypeId> = alts.iter().map(|alt| self.realize(registry, alt)).collect();
                registry.create_union(ids)
            }
            TypeExpr::Function {
                this_type,
                params,
                return_type,
            } => {
                let this_ty = this_type.as_ref().map(|t| self.realize(registry, t));
                let param_ids: Vec<TypeId> =
                    params.iter().map(|p| self.realize(registry, p)).collect();
                let param_names = (0..param_ids.len()).map(|i| format!("p{i}")).collect();
                let ret_ty = self.realize(registry, return_type);
                registry.create_function(None, param_ids, param_names, ret_ty, this_ty, false, false)
            }
            TypeExpr::Generic(base, args) => {
                // The only generic shape this core realizes is an enum
                // element reference, `Name.<Elem>`; other generics resolve
                // to the base name's type (structural generics like
                // `Array.<T>` are outside this core's scope).
                if args.is_empty() {
                    return self.realize_name(registry, base);
                }
                registry
                    .resolve_named(base)
                    .unwrap_or_else(|| self.realize_name(registry, base))
            }
        }
    }

    fn realize_name(&self, registry: &mut TypeRegistry, name: &str) -> TypeId {
        match name {
            "number" => registry.get_native(NativeKind::Number),
            "string" => registry.get_native(NativeKind::String),
            "boolean" => registry.get_native(NativeKind::Boolean),
            "null" => registry.get_native(NativeKind::Null),
            "undefined" | "void" => registry.get_native(NativeKind::Void),
            "Object" => registry.get_native(NativeKind::Object),
            "Number" => registry.get_native(NativeKind::NumberObject),
            "String" => registry.get_native(NativeKind::StringObject),
            "Boolean" => registry.get_native(NativeKind::BooleanObject),
            _ => registry.named_reference(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nullable_shorthand_realizes_to_nullable_union() {
        let mut registry = TypeRegistry::new();
        let adapter = DocInfoAdapter;
        let expr = TypeExpr::Nullable(Box::new(TypeExpr::Name("number".into())));
        let ty = adapter.realize(&mut registry, &expr);
        assert_eq!(registry.render(ty), "(null|number)");
    }

    #[test]
    fn unresolved_name_becomes_named_placeholder() {
        let mut registry = TypeRegistry::new();
        let adapter = DocInfoAdapter;
        let ty = adapter.realize(&mut registry, &TypeExpr::Name("NotYetDeclared".into()));
        assert_eq!(registry.render(ty), "NotYetDeclared");
    }
}
