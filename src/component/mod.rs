//! Component model shared with the host framework.
//!
//! # Data Flow
//! ```text
//! RoutePattern.component (ComponentRef)
//!     → registry.rs (resolve by name when symbolic)
//!     → wrap.rs (copy definition, inject RouteInfo + Navigator, recurse into children)
//!     → Host::mount(view, wrapped definition, props)
//! ```
//!
//! # Design Decisions
//! - Definitions are immutable once shared (`Arc`); wrapping always produces
//!   a new definition, so repeated navigations see the same originals
//! - Setup hooks are plain closures; the host decides when to run them

pub mod registry;
pub mod wrap;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::lifecycle::Navigator;
use crate::routing::Params;

pub use registry::{ComponentRegistry, ResolveComponent};
pub use wrap::wrap_component;

/// Static props handed to the mount call.
pub type Props = serde_json::Map<String, Value>;

/// Bindings returned from a setup hook.
pub type Bindings = serde_json::Map<String, Value>;

/// A component's setup hook.
pub type SetupFn = Arc<dyn Fn(&mut SetupContext) -> Bindings + Send + Sync>;

/// Route data injected into a mounted component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteInfo {
    /// Logical path that was resolved.
    pub path: String,
    /// Decoded query pairs.
    pub query: Params,
    /// The complete address at resolution time.
    pub full_url: String,
    /// Parameter bindings from the matched pattern.
    pub params: Params,
    /// Raw pattern of the matched (or default) route.
    pub matched_route: String,
}

/// Execution context passed to a setup hook.
#[derive(Debug, Clone, Default)]
pub struct SetupContext {
    pub props: Props,
    pub route: Option<Arc<RouteInfo>>,
    pub navigate: Option<Navigator>,
}

impl SetupContext {
    /// Context carrying only props, as a host creates it before setup.
    pub fn with_props(props: Props) -> Self {
        Self {
            props,
            ..Default::default()
        }
    }
}

/// A component definition as understood by the host framework.
#[derive(Clone, Default)]
pub struct ComponentDefinition {
    /// Registration name, if any.
    pub name: Option<String>,
    /// Opaque template source for the host renderer.
    pub template: String,
    /// Setup hook run before the first render.
    pub setup: Option<SetupFn>,
    /// Nested components, keyed as the template refers to them.
    pub children: BTreeMap<String, ComponentRef>,
}

impl ComponentDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// An unnamed definition.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    pub fn with_setup<F>(mut self, setup: F) -> Self
    where
        F: Fn(&mut SetupContext) -> Bindings + Send + Sync + 'static,
    {
        self.setup = Some(Arc::new(setup));
        self
    }

    pub fn with_child(mut self, key: impl Into<String>, child: impl Into<ComponentRef>) -> Self {
        self.children.insert(key.into(), child.into());
        self
    }

    /// Run the setup hook, if any, against `ctx`.
    pub fn run_setup(&self, ctx: &mut SetupContext) -> Bindings {
        self.setup.as_ref().map(|setup| setup(ctx)).unwrap_or_default()
    }
}

impl fmt::Debug for ComponentDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDefinition")
            .field("name", &self.name)
            .field("template", &self.template)
            .field("has_setup", &self.setup.is_some())
            .field("children", &self.children)
            .finish()
    }
}

/// Reference to a component, by registered name or inline.
#[derive(Debug, Clone)]
pub enum ComponentRef {
    ByName(String),
    Inline(Arc<ComponentDefinition>),
}

impl ComponentRef {
    /// True for a symbolic reference with an empty name.
    pub fn is_empty(&self) -> bool {
        matches!(self, ComponentRef::ByName(name) if name.is_empty())
    }

    /// Name used in logs: the symbolic name or the inline definition's name.
    pub fn display_name(&self) -> &str {
        match self {
            ComponentRef::ByName(name) => name,
            ComponentRef::Inline(definition) => definition.name.as_deref().unwrap_or("<inline>"),
        }
    }
}

impl From<&str> for ComponentRef {
    fn from(name: &str) -> Self {
        ComponentRef::ByName(name.to_string())
    }
}

impl From<String> for ComponentRef {
    fn from(name: String) -> Self {
        ComponentRef::ByName(name)
    }
}

impl From<ComponentDefinition> for ComponentRef {
    fn from(definition: ComponentDefinition) -> Self {
        ComponentRef::Inline(Arc::new(definition))
    }
}
