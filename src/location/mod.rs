//! Location subsystem: the boundary between the router and address state.
//!
//! # Data Flow
//! ```text
//! Read:
//!     LocationPort::snapshot() → LocationSnapshot { href, pathname, search, hash }
//!     → adapter.rs (mode-specific extraction, path normalisation)
//!     → Location { path, query_string, full_url }
//!
//! Write:
//!     logical path
//!     → adapter.rs (mode-specific encoding)
//!     → LocationPort::write(target, Assign | Push | Replace)
//!     → port raises HashChange for fragment assignments, nothing otherwise
//! ```
//!
//! # Design Decisions
//! - Address state is an injected capability, never ambient
//! - Mode is chosen at construction and never changes
//! - Ports deliver navigation events through a broadcast channel; the
//!   router filters by the event kind its mode listens to

pub mod adapter;
pub mod memory;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tokio::sync::broadcast;

use crate::error::RouterError;

pub use adapter::{Location, ModeAdapter, Resolution};
pub use memory::MemoryLocation;

/// URL encoding convention used to carry the logical path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMode {
    /// `/#/users/42?tab=posts`
    Hash,
    /// `/?page=/users/42&tab=posts`
    Query,
    /// `/users/42?tab=posts`
    History,
}

impl RouteMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteMode::Hash => "hash",
            RouteMode::Query => "query",
            RouteMode::History => "history",
        }
    }

    /// The navigation event a router in this mode listens to.
    pub fn listens_to(&self) -> NavigationEvent {
        match self {
            RouteMode::Hash => NavigationEvent::HashChange,
            RouteMode::Query | RouteMode::History => NavigationEvent::PopState,
        }
    }
}

impl FromStr for RouteMode {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hash" => Ok(RouteMode::Hash),
            "query" => Ok(RouteMode::Query),
            "history" => Ok(RouteMode::History),
            other => Err(RouterError::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for RouteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Browser-visible address state at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocationSnapshot {
    /// The complete URL.
    pub href: String,
    /// Path component, always starting with `/` for hierarchical URLs.
    pub pathname: String,
    /// Query component without the leading `?`.
    pub search: String,
    /// Fragment without the leading `#`.
    pub hash: String,
}

/// How a write affects the history stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Location assignment. A fragment-only change adds an entry and raises
    /// [`NavigationEvent::HashChange`].
    Assign,
    /// History push; raises no event.
    Push,
    /// History replace; raises no event.
    Replace,
}

/// Events delivered by a location port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationEvent {
    HashChange,
    PopState,
}

/// Errors raised by a location port.
#[derive(Debug, Clone, Error)]
pub enum LocationError {
    #[error("invalid location target {target:?}: {source}")]
    InvalidTarget {
        target: String,
        #[source]
        source: url::ParseError,
    },
}

/// Capability over the host's address and history state.
pub trait LocationPort: Send + Sync {
    /// Read the current address.
    fn snapshot(&self) -> LocationSnapshot;

    /// Navigate to `target`, a URL reference resolved against the current address.
    fn write(&self, target: &str, mode: WriteMode) -> Result<(), LocationError>;

    /// Subscribe to navigation events.
    fn subscribe(&self) -> broadcast::Receiver<NavigationEvent>;
}
