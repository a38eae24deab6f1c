//! The lifecycle controller.
//!
//! # States
//! ```text
//! Uninitialized --start--> Started --destroy--> Stopped --start--> Started
//! ```
//! A repeated `start` while started is a logged no-op; `destroy` while not
//! started does nothing.

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Instant;

use arc_swap::ArcSwap;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::component::{wrap_component, RouteInfo};
use crate::error::{RouterError, RouterResult};
use crate::host::{Host, Instance, ViewHandle};
use crate::lifecycle::Shutdown;
use crate::location::{LocationPort, ModeAdapter, NavigationEvent, Resolution, RouteMode};
use crate::observability::metrics;
use crate::routing::{
    match_route, parse_query, substitute_params, MatchResult, Params, RouteDefinition, RoutePattern,
};

const DEFAULT_MODE: &str = "hash";
const DEFAULT_QUERY_PARAM: &str = "page";
const DEFAULT_VIEW_SELECTOR: &str = "view";

/// Construction options.
#[derive(Debug, Clone)]
pub struct RouterOptions {
    /// Layout element; the view target is looked up inside it.
    pub layout: Option<ViewHandle>,
    /// `hash`, `query` or `history`.
    pub mode: String,
    pub routes: Vec<RouteDefinition>,
    /// Mounted when no route matches.
    pub default_route: Option<RouteDefinition>,
    /// Query key carrying the path in query mode.
    pub query_param: String,
    /// Name used to locate the view element inside the layout.
    pub view_selector: String,
    /// Start automatically on install.
    pub auto_start: bool,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            layout: None,
            mode: DEFAULT_MODE.to_string(),
            routes: Vec::new(),
            default_route: None,
            query_param: DEFAULT_QUERY_PARAM.to_string(),
            view_selector: DEFAULT_VIEW_SELECTOR.to_string(),
            auto_start: true,
        }
    }
}

impl RouterOptions {
    pub fn new(layout: ViewHandle) -> Self {
        Self {
            layout: Some(layout),
            ..Default::default()
        }
    }

    pub fn mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = mode.into();
        self
    }

    pub fn route(mut self, route: RouteDefinition) -> Self {
        self.routes.push(route);
        self
    }

    pub fn default_route(mut self, route: RouteDefinition) -> Self {
        self.default_route = Some(route);
        self
    }

    pub fn query_param(mut self, key: impl Into<String>) -> Self {
        self.query_param = key.into();
        self
    }

    pub fn view_selector(mut self, selector: impl Into<String>) -> Self {
        self.view_selector = selector.into();
        self
    }

    pub fn auto_start(mut self, auto_start: bool) -> Self {
        self.auto_start = auto_start;
        self
    }
}

/// Lifecycle state of a router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterState {
    Uninitialized,
    Started,
    Stopped,
}

/// What one route resolution did.
#[derive(Debug)]
pub enum RouteOutcome {
    /// A view was mounted with this route context.
    Mounted(Arc<RouteInfo>),
    /// No route and no default route; the target is left empty.
    Unresolved(String),
    /// A route was found but its view could not be mounted.
    Failed(RouterError),
}

impl RouteOutcome {
    fn label(&self) -> &'static str {
        match self {
            RouteOutcome::Mounted(_) => "mounted",
            RouteOutcome::Unresolved(_) => "unresolved",
            RouteOutcome::Failed(_) => "failed",
        }
    }
}

struct Listener {
    shutdown: Shutdown,
    task: JoinHandle<()>,
}

struct Lifecycle {
    state: RouterState,
    listener: Option<Listener>,
}

struct RouterInner {
    host: Arc<dyn Host>,
    location: Arc<dyn LocationPort>,
    adapter: ModeAdapter,
    view: ViewHandle,
    routes: ArcSwap<Vec<Arc<RoutePattern>>>,
    default_route: Option<Arc<RoutePattern>>,
    lifecycle: Mutex<Lifecycle>,
    /// Held for the duration of a transition.
    active: Mutex<Option<Box<dyn Instance>>>,
}

/// Client-side route dispatcher.
///
/// Cloning yields another handle to the same router.
#[derive(Clone)]
pub struct Router {
    inner: Arc<RouterInner>,
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("mode", &self.inner.adapter.mode())
            .field("view", &self.inner.view)
            .field("routes_count", &self.inner.routes.load().len())
            .finish()
    }
}

impl Router {
    /// Build a router. Fails on a missing layout, an unknown mode or an
    /// invalid route; nothing is subscribed until [`Router::start`].
    pub fn new(
        host: Arc<dyn Host>,
        location: Arc<dyn LocationPort>,
        options: RouterOptions,
    ) -> RouterResult<Self> {
        let layout = options.layout.ok_or(RouterError::MissingLayout)?;
        let mode: RouteMode = options.mode.parse()?;

        let query_param = non_empty_or(options.query_param, DEFAULT_QUERY_PARAM);
        let view_selector = non_empty_or(options.view_selector, DEFAULT_VIEW_SELECTOR);
        let view = resolve_view(host.as_ref(), &layout, &view_selector);

        let routes = options
            .routes
            .into_iter()
            .map(|route| RoutePattern::from_definition(route).map(Arc::new))
            .collect::<RouterResult<Vec<_>>>()?;
        let default_route = options
            .default_route
            .map(|route| RoutePattern::from_definition(route).map(Arc::new))
            .transpose()?;

        tracing::info!(
            mode = %mode,
            view = %view,
            routes = routes.len(),
            has_default = default_route.is_some(),
            "Router created"
        );

        Ok(Self {
            inner: Arc::new(RouterInner {
                host,
                location,
                adapter: ModeAdapter::new(mode, query_param),
                view,
                routes: ArcSwap::from_pointee(routes),
                default_route,
                lifecycle: Mutex::new(Lifecycle {
                    state: RouterState::Uninitialized,
                    listener: None,
                }),
                active: Mutex::new(None),
            }),
        })
    }

    /// Subscribe to navigation events and resolve the current route.
    pub async fn start(&self) {
        {
            let mut lifecycle = self.inner.lifecycle.lock().await;
            if lifecycle.state == RouterState::Started {
                tracing::warn!("Router is already started");
                return;
            }

            let shutdown = Shutdown::new();
            let task = spawn_listener(
                Arc::downgrade(&self.inner),
                self.inner.location.subscribe(),
                shutdown.subscribe(),
                self.inner.adapter.mode().listens_to(),
            );
            lifecycle.listener = Some(Listener { shutdown, task });
            lifecycle.state = RouterState::Started;
            tracing::info!(mode = %self.inner.adapter.mode(), "Router started");
        }

        self.inner.route_changed().await;
    }

    /// Stop listening and unmount the active view.
    pub async fn destroy(&self) {
        let mut lifecycle = self.inner.lifecycle.lock().await;
        if lifecycle.state != RouterState::Started {
            return;
        }

        if let Some(listener) = lifecycle.listener.take() {
            listener.shutdown.trigger();
            if let Err(e) = listener.task.await {
                tracing::error!(error = %e, "Navigation listener terminated abnormally");
            }
        }

        let previous = self.inner.active.lock().await.take();
        if let Some(instance) = previous {
            if let Err(e) = instance.unmount().await {
                tracing::error!(error = %RouterError::Unmount(e), "Error destroying router");
                metrics::record_unmount_failure();
            }
        }

        lifecycle.state = RouterState::Stopped;
        tracing::info!("Router stopped");
    }

    /// Resolve the current address and swap the mounted view.
    pub async fn route_changed(&self) -> RouteOutcome {
        self.inner.route_changed().await
    }

    /// Navigate to `path`.
    pub async fn navigate(&self, path: &str) {
        self.inner.navigate(path, &Params::new()).await
    }

    /// Navigate to `path` after substituting `:name` placeholders from `params`.
    pub async fn navigate_with(&self, path: &str, params: &Params) {
        self.inner.navigate(path, params).await
    }

    /// Register another route; it takes part in the next resolution.
    pub fn add_route(&self, route: RouteDefinition) -> RouterResult<()> {
        let route = Arc::new(RoutePattern::from_definition(route)?);
        tracing::debug!(path = %route.raw_path(), "Route added");
        self.inner.routes.rcu(|routes| {
            let mut next = Vec::clone(routes);
            next.push(route.clone());
            next
        });
        Ok(())
    }

    /// A navigation handle that does not keep the router alive.
    pub fn navigator(&self) -> Navigator {
        Navigator {
            router: Arc::downgrade(&self.inner),
        }
    }

    pub async fn state(&self) -> RouterState {
        self.inner.lifecycle.lock().await.state
    }

    pub fn mode(&self) -> RouteMode {
        self.inner.adapter.mode()
    }

    /// The element views are mounted into.
    pub fn view(&self) -> &ViewHandle {
        &self.inner.view
    }

    /// Current route table in registration order.
    pub fn routes(&self) -> Arc<Vec<Arc<RoutePattern>>> {
        self.inner.routes.load_full()
    }
}

impl RouterInner {
    async fn route_changed(self: &Arc<Self>) -> RouteOutcome {
        let mut active = self.active.lock().await;
        let started = Instant::now();

        let location = self.adapter.read(&self.location.snapshot());
        let query = parse_query(location.query_string.as_str());
        let routes = self.routes.load_full();
        let resolved = match match_route(&routes, &location.path) {
            Some(MatchResult { route, params }) => Some((route, params)),
            None => self.default_route.clone().map(|route| (route, Params::new())),
        };

        if let Some(previous) = active.take() {
            if let Err(e) = previous.unmount().await {
                tracing::warn!(error = %RouterError::Unmount(e), "Continuing after failed unmount");
                metrics::record_unmount_failure();
            }
        }

        let outcome = match resolved {
            None => {
                tracing::warn!(error = %RouterError::NoRoute(location.path.clone()), "Navigation left unresolved");
                RouteOutcome::Unresolved(location.path)
            }
            Some((route, params)) => {
                let info = Arc::new(RouteInfo {
                    path: location.path,
                    query,
                    full_url: location.full_url,
                    params,
                    matched_route: route.raw_path().to_string(),
                });
                match self.mount(&route, &info).await {
                    Ok(instance) => {
                        *active = Some(instance);
                        tracing::debug!(
                            path = %info.path,
                            route = %info.matched_route,
                            component = %route.component().display_name(),
                            "Route mounted"
                        );
                        RouteOutcome::Mounted(info)
                    }
                    Err(e) => {
                        tracing::error!(error = %e, route = %info.matched_route, "Failed to mount route");
                        RouteOutcome::Failed(e)
                    }
                }
            }
        };

        metrics::record_navigation(self.adapter.mode().as_str(), outcome.label(), started.elapsed());
        outcome
    }

    async fn mount(self: &Arc<Self>, route: &RoutePattern, info: &Arc<RouteInfo>) -> RouterResult<Box<dyn Instance>> {
        let navigator = Navigator {
            router: Arc::downgrade(self),
        };
        let definition = wrap_component(route.component(), info, &navigator, self.host.as_ref())?;
        self.host
            .mount(&self.view, definition, route.props().clone())
            .await
            .map_err(RouterError::Mount)
    }

    async fn navigate(self: &Arc<Self>, path: &str, params: &Params) {
        if path.is_empty() {
            tracing::error!("Invalid path provided to navigate");
            return;
        }

        let target = substitute_params(path, params);
        match self.adapter.write(self.location.as_ref(), &target) {
            Ok(Resolution::Manual) => {
                self.route_changed().await;
            }
            Ok(Resolution::Automatic) => {}
            Err(e) => {
                tracing::error!(error = %RouterError::from(e), path = %target, "Error navigating to path");
            }
        }
    }
}

fn non_empty_or(value: String, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}

/// Locate the mount target: `#sel`, `.sel`, `sel`, `[data-sel]`, else the layout.
fn resolve_view(host: &dyn Host, layout: &ViewHandle, selector: &str) -> ViewHandle {
    let candidates = [
        format!("#{}", selector),
        format!(".{}", selector),
        selector.to_string(),
        format!("[data-{}]", selector),
    ];
    candidates
        .iter()
        .find_map(|candidate| host.query_selector(layout, candidate))
        .unwrap_or_else(|| layout.clone())
}

fn spawn_listener(
    router: Weak<RouterInner>,
    mut events: broadcast::Receiver<NavigationEvent>,
    mut shutdown: broadcast::Receiver<()>,
    listens_to: NavigationEvent,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                _ = shutdown.recv() => break,
                event = events.recv() => match event {
                    Ok(event) if event == listens_to => {}
                    Ok(_) => continue,
                    Err(RecvError::Lagged(skipped)) => {
                        // The address is the source of truth; one resolution covers them all.
                        tracing::warn!(skipped, "Navigation listener lagged");
                    }
                    Err(RecvError::Closed) => break,
                },
            }

            let Some(router) = router.upgrade() else {
                break;
            };
            router.route_changed().await;
        }
        tracing::debug!("Navigation listener stopped");
    })
}

/// Navigation handle injected into mounted components.
///
/// Holds the router weakly so mounted views never keep it alive.
#[derive(Clone)]
pub struct Navigator {
    router: Weak<RouterInner>,
}

impl Navigator {
    /// A navigator bound to no router; every call is logged and ignored.
    pub fn detached() -> Self {
        Self { router: Weak::new() }
    }

    pub async fn navigate(&self, path: &str) {
        self.navigate_with(path, &Params::new()).await
    }

    pub async fn navigate_with(&self, path: &str, params: &Params) {
        match self.router.upgrade() {
            Some(router) => router.navigate(path, params).await,
            None => tracing::warn!(path, "Navigation requested after router was dropped"),
        }
    }
}

impl fmt::Debug for Navigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("attached", &(self.router.strong_count() > 0))
            .finish()
    }
}
