//! Host framework boundary.
//!
//! # Responsibilities
//! - Define what the router consumes from the rendering framework:
//!   component registration and lookup, view target lookup, mount, unmount
//! - Provide a recording host for tests and the command-line tool
//!
//! # Design Decisions
//! - Mount and unmount are asynchronous and may suspend
//! - An instance is consumed by `unmount`; it cannot be unmounted twice

pub mod recording;

use std::fmt;

use futures_util::future::BoxFuture;
use thiserror::Error;

use crate::component::{ComponentDefinition, Props, ResolveComponent};

pub use recording::{HostEvent, RecordingHost};

/// Error reported by the host framework.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct HostError(String);

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Opaque handle to an element owned by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ViewHandle(String);

impl ViewHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ViewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A mounted component instance.
pub trait Instance: Send + Sync {
    /// Detach the instance from its target.
    fn unmount(self: Box<Self>) -> BoxFuture<'static, Result<(), HostError>>;
}

/// The rendering framework the router drives.
pub trait Host: ResolveComponent + Send + Sync {
    /// Register a component under `name` in the global registry.
    fn register_component(&self, name: &str, definition: ComponentDefinition);

    /// Find the first element inside `layout` matching a CSS `selector`.
    fn query_selector(&self, layout: &ViewHandle, selector: &str) -> Option<ViewHandle>;

    /// Mount `definition` into `target` with `props`.
    fn mount(
        &self,
        target: &ViewHandle,
        definition: ComponentDefinition,
        props: Props,
    ) -> BoxFuture<'_, Result<Box<dyn Instance>, HostError>>;
}
