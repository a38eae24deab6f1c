//! Route context injection.

use std::sync::Arc;

use crate::component::{ComponentDefinition, ComponentRef, ResolveComponent, RouteInfo, SetupContext};
use crate::error::RouterResult;
use crate::lifecycle::Navigator;

/// Produce a copy of `component` whose setup hook sees `route` and `navigator`.
///
/// The original setup hook, if any, runs afterwards against the same context
/// and its bindings are returned unchanged. Every declared child is wrapped
/// the same way with the same route, so nested components observe the
/// route of their outermost routed ancestor. The source definitions are never
/// modified.
pub fn wrap_component<R>(
    component: &ComponentRef,
    route: &Arc<RouteInfo>,
    navigator: &Navigator,
    registry: &R,
) -> RouterResult<ComponentDefinition>
where
    R: ResolveComponent + ?Sized,
{
    let definition = registry.resolve(component)?;

    let children = definition
        .children
        .iter()
        .map(|(key, child)| {
            let wrapped = wrap_component(child, route, navigator, registry)?;
            Ok((key.clone(), ComponentRef::from(wrapped)))
        })
        .collect::<RouterResult<_>>()?;

    let original = definition.setup.clone();
    let route = route.clone();
    let navigator = navigator.clone();

    Ok(ComponentDefinition {
        name: definition.name.clone(),
        template: definition.template.clone(),
        setup: Some(Arc::new(move |ctx: &mut SetupContext| {
            ctx.route = Some(route.clone());
            ctx.navigate = Some(navigator.clone());
            original.as_ref().map(|setup| setup(ctx)).unwrap_or_default()
        })),
        children,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Bindings, ComponentRegistry, Props};
    use crate::error::RouterError;
    use crate::routing::Params;
    use serde_json::json;

    fn route_info() -> Arc<RouteInfo> {
        let mut params = Params::new();
        params.insert("id".into(), "42".into());
        Arc::new(RouteInfo {
            path: "/users/42".into(),
            query: Params::new(),
            full_url: "http://app.test/#/users/42".into(),
            params,
            matched_route: "/users/:id".into(),
        })
    }

    #[test]
    fn test_injects_route_and_keeps_bindings() {
        let registry = ComponentRegistry::new();
        let definition = ComponentDefinition::new("User").with_setup(|ctx| {
            let mut bindings = Bindings::new();
            let id = ctx.route.as_ref().map(|r| r.params["id"].clone());
            bindings.insert("id".into(), json!(id));
            bindings
        });
        let wrapped = wrap_component(
            &ComponentRef::from(definition),
            &route_info(),
            &Navigator::detached(),
            &registry,
        )
        .unwrap();

        let mut ctx = SetupContext::with_props(Props::new());
        let bindings = wrapped.run_setup(&mut ctx);
        assert_eq!(bindings["id"], json!("42"));
        assert_eq!(ctx.route.unwrap().matched_route, "/users/:id");
        assert!(ctx.navigate.is_some());
    }

    #[test]
    fn test_without_original_setup() {
        let registry = ComponentRegistry::new();
        registry.register("Plain", ComponentDefinition::new("Plain"));
        let wrapped =
            wrap_component(&"Plain".into(), &route_info(), &Navigator::detached(), &registry).unwrap();

        let mut ctx = SetupContext::default();
        assert!(wrapped.run_setup(&mut ctx).is_empty());
        assert!(ctx.route.is_some());
    }

    #[test]
    fn test_children_wrapped_recursively() {
        let registry = ComponentRegistry::new();
        registry.register("Leaf", ComponentDefinition::new("Leaf"));
        let middle = ComponentDefinition::new("Middle").with_child("leaf", "Leaf");
        let root = ComponentDefinition::new("Root").with_child("middle", middle);

        let wrapped =
            wrap_component(&root.clone().into(), &route_info(), &Navigator::detached(), &registry)
                .unwrap();

        let ComponentRef::Inline(middle) = &wrapped.children["middle"] else {
            panic!("child should be inlined");
        };
        let ComponentRef::Inline(leaf) = &middle.children["leaf"] else {
            panic!("grandchild should be inlined");
        };
        let mut ctx = SetupContext::default();
        leaf.run_setup(&mut ctx);
        assert_eq!(ctx.route.unwrap().path, "/users/42");

        // the source graph is untouched
        assert!(matches!(root.children["middle"], ComponentRef::Inline(ref d) if d.setup.is_none()));
    }

    #[test]
    fn test_unregistered_component() {
        let registry = ComponentRegistry::new();
        let result = wrap_component(&"Ghost".into(), &route_info(), &Navigator::detached(), &registry);
        assert!(matches!(result, Err(RouterError::UnregisteredComponent(_))));
    }
}
