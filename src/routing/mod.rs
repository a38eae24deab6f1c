//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route registration (construction or add_route):
//!     RouteDefinition { path, component, props }
//!     → pattern.rs (validate, compile path into segments)
//!     → RoutePattern appended to the route table
//!
//! Navigation:
//!     (path, query_string) from the location adapter
//!     → query.rs (decode query string)
//!     → matcher.rs (first matching pattern in registration order)
//!     → MatchResult { route, params } or NoMatch
//! ```
//!
//! # Design Decisions
//! - Patterns are compiled once, at registration
//! - Root is matched by exact string only, never segment-wise
//! - First match wins; registration order is the only tie-break
//! - Parameter values are bound verbatim (no decoding, no coercion)

pub mod matcher;
pub mod pattern;
pub mod query;

use std::collections::HashMap;

/// Parameter bindings and decoded query pairs.
pub type Params = HashMap<String, String>;

pub use matcher::{match_route, substitute_params, MatchResult};
pub use pattern::{compile, RouteDefinition, RoutePattern, Segment};
pub use query::parse_query;
