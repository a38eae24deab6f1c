//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::component::{ComponentDefinition, ComponentRef, Props};
use crate::host::ViewHandle;
use crate::lifecycle::RouterOptions;
use crate::routing::RouteDefinition;

/// Root configuration for a router.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Layout element the view target is looked up in.
    pub layout: Option<String>,

    /// Addressing mode: `hash`, `query` or `history`.
    pub mode: String,

    /// Route definitions, matched in order.
    pub routes: Vec<RouteConfig>,

    /// Route mounted when nothing matches.
    pub default_route: Option<RouteConfig>,

    /// Query key carrying the path in query mode.
    pub query_param: String,

    /// Name used to locate the view element inside the layout.
    pub view_selector: String,

    /// Start the router as soon as it is installed.
    pub auto_start: bool,

    /// Address the command-line tool starts from.
    pub initial_url: String,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            layout: None,
            mode: "hash".to_string(),
            routes: Vec::new(),
            default_route: None,
            query_param: "page".to_string(),
            view_selector: "view".to_string(),
            auto_start: true,
            initial_url: "http://localhost/".to_string(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl RouterConfig {
    /// Convert into runtime router options.
    pub fn into_options(self) -> RouterOptions {
        RouterOptions {
            layout: self.layout.map(ViewHandle::new),
            mode: self.mode,
            routes: self.routes.into_iter().map(RouteConfig::into_definition).collect(),
            default_route: self.default_route.map(RouteConfig::into_definition),
            query_param: self.query_param,
            view_selector: self.view_selector,
            auto_start: self.auto_start,
        }
    }
}

/// A single route.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct RouteConfig {
    /// Path pattern (e.g., "/users/:id").
    #[serde(default)]
    pub path: String,

    /// Component to mount.
    pub component: Option<ComponentConfig>,

    /// Static props passed on mount.
    #[serde(default)]
    pub props: Props,
}

impl RouteConfig {
    pub fn into_definition(self) -> RouteDefinition {
        RouteDefinition {
            path: self.path,
            component: self.component.map(ComponentConfig::into_ref),
            props: self.props,
        }
    }
}

/// A component given by registered name or inline.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ComponentConfig {
    Name(String),
    Inline(InlineComponentConfig),
}

impl ComponentConfig {
    pub fn into_ref(self) -> ComponentRef {
        match self {
            ComponentConfig::Name(name) => ComponentRef::ByName(name),
            ComponentConfig::Inline(inline) => {
                let mut definition = match inline.name {
                    Some(name) => ComponentDefinition::new(name),
                    None => ComponentDefinition::anonymous(),
                };
                definition.template = inline.template;
                for (key, child) in inline.children {
                    definition = definition.with_child(key, child);
                }
                ComponentRef::from(definition)
            }
        }
    }
}

/// Inline component table.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct InlineComponentConfig {
    pub name: Option<String>,
    pub template: String,
    /// Child key → registered component name.
    pub children: BTreeMap<String, String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
