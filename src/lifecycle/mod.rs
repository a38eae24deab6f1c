//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! install (plugin.rs):
//!     register inline route components → Router::new → optional auto-start
//!
//! start (router.rs):
//!     subscribe to the mode's navigation event → spawn listener → route_changed
//!
//! route_changed:
//!     read location → parse query → match (or default route)
//!     → unmount previous view → wrap component → mount
//!
//! destroy:
//!     stop listener (shutdown.rs) → unmount active view → Stopped
//! ```
//!
//! # Design Decisions
//! - Transitions are serialized: one async mutex owns the active view for the
//!   whole unmount → mount sequence, and waiters are served in arrival order
//! - Nothing that happens inside a navigation propagates to the listener loop
//! - The route table is append-only and swapped atomically, so a resolution
//!   in progress keeps the table it started with

pub mod plugin;
pub mod router;
pub mod shutdown;

pub use plugin::install;
pub use router::{Navigator, RouteOutcome, Router, RouterOptions, RouterState};
pub use shutdown::Shutdown;
