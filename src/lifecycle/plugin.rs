//! Installation entry point.

use std::sync::Arc;

use crate::component::ComponentRef;
use crate::error::RouterResult;
use crate::host::Host;
use crate::lifecycle::{Router, RouterOptions};
use crate::location::LocationPort;
use crate::routing::RouteDefinition;

/// Register inline route components with `host`, build the router and,
/// unless `auto_start` is off, start it on the current tokio runtime.
///
/// Outside a runtime the auto-start is skipped and logged; the returned
/// router stays uninitialized until [`Router::start`] is awaited.
pub fn install(
    host: Arc<dyn Host>,
    location: Arc<dyn LocationPort>,
    mut options: RouterOptions,
) -> RouterResult<Router> {
    let mut generated = 0;
    for route in options.routes.iter_mut().chain(options.default_route.as_mut()) {
        register_inline(host.as_ref(), route, &mut generated);
    }

    let auto_start = options.auto_start;
    let router = Router::new(host, location, options)?;

    if auto_start {
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let handle = router.clone();
                runtime.spawn(async move { handle.start().await });
            }
            Err(e) => {
                tracing::error!(error = %e, "No async runtime available, router not auto-started");
            }
        }
    }

    tracing::info!(auto_start, "Router installed");
    Ok(router)
}

/// Register an inline component and point the route at it by name.
/// Unnamed definitions are named `AutoRegComponent_{n}`.
fn register_inline(host: &dyn Host, route: &mut RouteDefinition, generated: &mut usize) {
    let Some(ComponentRef::Inline(definition)) = route.component.as_ref() else {
        return;
    };

    let name = match definition.name.as_deref() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => {
            let name = format!("AutoRegComponent_{}", generated);
            *generated += 1;
            name
        }
    };

    host.register_component(&name, (**definition).clone());
    tracing::debug!(path = %route.path, component = %name, "Registered route component");
    route.component = Some(ComponentRef::ByName(name));
}
