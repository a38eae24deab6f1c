//! Client-side page router.
//!
//! Maps the address (hash fragment, a query parameter or the path) to a
//! registered component and mounts it into a view target owned by a host
//! rendering framework, swapping views as the address changes.

pub mod component;
pub mod config;
pub mod error;
pub mod host;
pub mod lifecycle;
pub mod location;
pub mod observability;
pub mod routing;

pub use component::{ComponentDefinition, ComponentRef, RouteInfo, SetupContext};
pub use config::RouterConfig;
pub use error::{ErrorKind, RouterError, RouterResult};
pub use host::{Host, Instance, ViewHandle};
pub use lifecycle::{install, Navigator, RouteOutcome, Router, RouterOptions, RouterState};
pub use location::{LocationPort, MemoryLocation, RouteMode};
pub use routing::{Params, RouteDefinition};
