//! Name-based component lookup.

use std::sync::Arc;

use dashmap::DashMap;

use crate::component::{ComponentDefinition, ComponentRef};
use crate::error::{RouterError, RouterResult};

/// Anything that can look up a registered component by name.
pub trait ResolveComponent {
    fn lookup(&self, name: &str) -> Option<Arc<ComponentDefinition>>;

    /// Resolve a reference to a concrete definition.
    fn resolve(&self, component: &ComponentRef) -> RouterResult<Arc<ComponentDefinition>> {
        match component {
            ComponentRef::Inline(definition) => Ok(definition.clone()),
            ComponentRef::ByName(name) => self
                .lookup(name)
                .ok_or_else(|| RouterError::UnregisteredComponent(name.clone())),
        }
    }
}

/// Global component registry keyed by name.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    components: DashMap<String, Arc<ComponentDefinition>>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a component under `name`.
    pub fn register(&self, name: impl Into<String>, definition: ComponentDefinition) {
        let name = name.into();
        tracing::debug!(component = %name, "Component registered");
        self.components.insert(name, Arc::new(definition));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl ResolveComponent for ComponentRegistry {
    fn lookup(&self, name: &str) -> Option<Arc<ComponentDefinition>> {
        self.components.get(name).map(|r| r.value().clone())
    }
}
