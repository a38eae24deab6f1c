//! Router error taxonomy.
//!
//! # Design Decisions
//! - Configuration errors are the only ones returned to callers of
//!   construction and registration APIs
//! - Resolution and transient errors are produced inside a navigation and
//!   end up in the log, never in the listener loop

use thiserror::Error;

use crate::host::HostError;
use crate::location::LocationError;

/// Coarse classification used to decide whether an error may propagate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Fatal setup problem; aborts construction or registration.
    Configuration,
    /// Navigation could not be resolved to a view; logged.
    Resolution,
    /// Local failure; logged and the surrounding operation continues.
    Transient,
}

/// Errors raised by the router and its collaborators.
#[derive(Debug, Error)]
pub enum RouterError {
    /// No layout element was supplied.
    #[error("Router requires a layout element in options")]
    MissingLayout,

    /// Routing mode is not one of `hash`, `query`, `history`.
    #[error("Invalid routing mode: {0}. Must be \"hash\", \"query\", or \"history\"")]
    InvalidMode(String),

    /// Path pattern cannot be compiled.
    #[error("Invalid route pattern: {0:?}")]
    InvalidPattern(String),

    /// Route definition lacks a required field.
    #[error("Route must have both 'path' and 'component' properties (missing {missing})")]
    InvalidRoute { missing: &'static str },

    /// A route references a component name that is not registered.
    #[error("Component \"{0}\" not registered")]
    UnregisteredComponent(String),

    /// Neither a matching route nor a default route exists.
    #[error("No route found for path: {0}")]
    NoRoute(String),

    /// A single query pair could not be decoded.
    #[error("Malformed query pair: {0:?}")]
    MalformedQueryPair(String),

    /// A single candidate route failed while being matched.
    #[error("Error matching route {pattern}: {reason}")]
    Match { pattern: String, reason: String },

    /// The previous view failed to unmount.
    #[error("Error unmounting previous component: {0}")]
    Unmount(#[source] HostError),

    /// The host refused to mount the resolved view.
    #[error("Error mounting route component: {0}")]
    Mount(#[source] HostError),

    /// Address state could not be written.
    #[error("Location error: {0}")]
    Location(#[from] LocationError),
}

impl RouterError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RouterError::MissingLayout
            | RouterError::InvalidMode(_)
            | RouterError::InvalidPattern(_)
            | RouterError::InvalidRoute { .. } => ErrorKind::Configuration,
            RouterError::UnregisteredComponent(_) | RouterError::NoRoute(_) => {
                ErrorKind::Resolution
            }
            RouterError::MalformedQueryPair(_)
            | RouterError::Match { .. }
            | RouterError::Unmount(_)
            | RouterError::Mount(_)
            | RouterError::Location(_) => ErrorKind::Transient,
        }
    }
}

/// Result alias used across the crate.
pub type RouterResult<T> = Result<T, RouterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(RouterError::MissingLayout.kind(), ErrorKind::Configuration);
        assert_eq!(
            RouterError::InvalidRoute { missing: "path" }.kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            RouterError::UnregisteredComponent("Home".into()).kind(),
            ErrorKind::Resolution
        );
        assert_eq!(
            RouterError::Unmount(HostError::new("boom")).kind(),
            ErrorKind::Transient
        );
    }

    #[test]
    fn test_error_messages() {
        let err = RouterError::InvalidMode("hashbang".into());
        assert_eq!(
            err.to_string(),
            "Invalid routing mode: hashbang. Must be \"hash\", \"query\", or \"history\""
        );
        let err = RouterError::UnregisteredComponent("Users".into());
        assert_eq!(err.to_string(), "Component \"Users\" not registered");
    }
}
