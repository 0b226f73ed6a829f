//! Textual type rendering (spec §6). Used both for diagnostics and as the
//! canonical sort key for union alternates (spec §3 invariant 5).

use crate::id::TypeId;
use crate::kind::{BoxedKind, FunctionType, PrimitiveKind, TypeKind};
use crate::registry::TypeRegistry;

impl TypeRegistry {
    /// Render `id` in the spec §6 textual form.
    #[must_use]
    pub fn render(&self, id: TypeId) -> String {
        match self.kind(id) {
            TypeKind::All => "*".to_string(),
            TypeKind::No => "None".to_string(),
            TypeKind::NoObject => "NoObject".to_string(),
            TypeKind::Unknown => "?".to_string(),
            TypeKind::Primitive(PrimitiveKind::Number) => "number".to_string(),
            TypeKind::Primitive(PrimitiveKind::String) => "string".to_string(),
            TypeKind::Primitive(PrimitiveKind::Boolean) => "boolean".to_string(),
            TypeKind::Primitive(PrimitiveKind::Null) => "null".to_string(),
            TypeKind::Primitive(PrimitiveKind::Void) => "undefined".to_string(),
            TypeKind::Boxed(BoxedKind::NumberObject) => "Number".to_string(),
            TypeKind::Boxed(BoxedKind::StringObject) => "String".to_string(),
            TypeKind::Boxed(BoxedKind::BooleanObject) => "Boolean".to_string(),
            TypeKind::Object(o) => o.name.clone().unwrap_or_else(|| self.render_anonymous_object(o)),
            TypeKind::Function(f) => self.render_function(f),
            TypeKind::Enum(e) => format!("enum{{{}}}", e.name),
            TypeKind::EnumElement(e) => {
                let enum_name = match self.kind(e.enum_type) {
                    TypeKind::Enum(en) => en.name.clone(),
                    _ => "?".to_string(),
                };
                format!("{enum_name}.<{}>", self.render(e.element_type))
            }
            TypeKind::Record(r) => {
                let fields: Vec<String> = r
                    .fields
                    .iter()
                    .map(|(name, ty)| format!("{name}: {}", self.render(*ty)))
                    .collect();
                format!("{{ {} }}", fields.join(", "))
            }
            TypeKind::Named(n) => match n.resolved.get() {
                Some(resolved) if resolved != id => self.render(resolved),
                _ => n.name.clone(),
            },
            TypeKind::Union(u) => self.render_union(&u.alternates),
            TypeKind::Template(t) => t.name.clone(),
        }
    }

    fn render_anonymous_object(&self, o: &crate::kind::ObjectType) -> String {
        if o.properties.is_empty() {
            return "Object".to_string();
        }
        let fields: Vec<String> = o
            .properties
            .iter()
            .map(|(name, slot)| format!("{name}: {}", self.render(slot.ty)))
            .collect();
        format!("{{{}}}", fields.join(", "))
    }

    fn render_function(&self, f: &FunctionType) -> String {
        let mut params: Vec<String> = Vec::with_capacity(f.params.len() + 1);
        if let Some(this_type) = f.this_type {
            // Default (global) `this` is omitted from the rendered form.
            let is_default = matches!(self.kind(this_type), TypeKind::All | TypeKind::Unknown);
            if !is_default {
                params.push(format!("this:{}", self.render(this_type)));
            }
        }
        for p in &f.params {
            params.push(self.render(*p));
        }
        if f.is_variadic
            && let Some(last) = params.pop()
        {
            params.push(format!("...{last}"));
        }
        format!("function ({}): {}", params.join(", "), self.render(f.return_type))
    }

    fn render_union(&self, alternates: &[TypeId]) -> String {
        // Nullable shorthand: `(T|null)` stays as-is per spec §6 (no special
        // collapse beyond the general union form), so this is just the
        // generic alternation, rendered in the registry's canonical order.
        let rendered: Vec<String> = alternates.iter().map(|t| self.render(*t)).collect();
        format!("({})", rendered.join("|"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::NativeKind::{Boolean, Null, Number, String as Str};

    #[test]
    fn primitives_render_lowercase() {
        let registry = TypeRegistry::new();
        assert_eq!(registry.render(registry.get_native(Number)), "number");
        assert_eq!(registry.render(registry.get_native(Str)), "string");
        assert_eq!(registry.render(registry.get_native(Boolean)), "boolean");
        assert_eq!(registry.render(registry.get_native(Null)), "null");
    }

    #[test]
    fn unions_render_sorted_and_parenthesized() {
        let mut registry = TypeRegistry::new();
        let number = registry.get_native(Number);
        let string = registry.get_native(Str);
        // string < number alphabetically wins the sort-key comparison, but
        // construction order shouldn't matter — both orderings canonicalize
        // to the same rendered form.
        let a = registry.create_union(vec![number, string]);
        let b = registry.create_union(vec![string, number]);
        assert_eq!(registry.render(a), registry.render(b));
        assert_eq!(registry.render(a), "(number|string)");
    }

    #[test]
    fn function_with_default_this_omits_this_clause() {
        let mut registry = TypeRegistry::new();
        let number = registry.get_native(Number);
        let func = registry.create_function(None, vec![number], vec!["x".into()], number, None, false, false);
        assert_eq!(registry.render(func), "function (number): number");
    }
}
