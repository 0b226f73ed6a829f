//! Global `this` (spec §4.D "Global `this`").

use lattice_types::{TypeId, TypeRegistry};

const GLOBAL_THIS_NAME: &str = "GlobalThis";
const WINDOW_CTOR_NAME: &str = "Window";

/// Creates (or returns the already-created) synthetic `GlobalThis` object
/// type and, if a `Window` constructor has been declared, wires
/// `GlobalThis`'s implicit prototype to `Window`'s instance type so that
/// `GlobalThis <: Window` holds without the two ever being equal (spec
/// §4.D: "`GlobalThis` is not equal to the window instance even when a
/// subtype relation holds").
pub fn create_or_link(registry: &mut TypeRegistry) -> TypeId {
    let global_this = registry.create_object(Some(GLOBAL_THIS_NAME), None);
    if let Some(window_ctor) = registry.resolve_named(WINDOW_CTOR_NAME)
        && let Some(window_instance) = registry.function_instance(window_ctor)
    {
        registry.set_implicit_prototype(global_this, Some(window_instance));
    }
    global_this
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_this_is_subtype_of_window_instance_but_not_equal() {
        let mut registry = TypeRegistry::new();
        let number = registry.get_native(lattice_types::NativeKind::Number);
        let window_ctor = registry.create_function(
            Some(WINDOW_CTOR_NAME),
            vec![],
            vec![],
            number,
            None,
            true,
            false,
        );
        let window_instance = registry.function_instance(window_ctor).unwrap();

        let global_this = create_or_link(&mut registry);
        assert!(registry.is_subtype(global_this, window_instance));
        assert_ne!(global_this, window_instance);
    }

    #[test]
    fn global_this_without_window_is_still_created() {
        let mut registry = TypeRegistry::new();
        let global_this = create_or_link(&mut registry);
        assert_eq!(registry.render(global_this), "GlobalThis");
    }
}
