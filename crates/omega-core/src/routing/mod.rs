//! # Omega Core Routing
//!
//! The router the kernel builds for every dispatch cycle.
//!
//! - **[`router`]**: [`Router`], route registration and request matching.
//!   Patterns are literal segments plus `{name}` parameters.
//! - **[`reply`]**: [`Reply`], the "response or raw value" a handler returns.
//! - **[`definitions`]**: the [`RouteDefinitions`] seam through which routes
//!   are registered, and [`RouteFile`], which reads static routes from
//!   `routes/web.*`.
//! - **[`error`]**: [`RoutingError`].
pub mod definitions;
pub mod error;
pub mod reply;
pub mod router;

pub use definitions::{RouteDefinitions, RouteFile, ROUTE_FILE_NAME};
pub use error::RoutingError;
pub use reply::Reply;
pub use router::{Handler, RequestContext, RouteParams, Router};
