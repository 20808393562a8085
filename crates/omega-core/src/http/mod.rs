//! # Omega Core HTTP Values
//!
//! Plain request/response value types exchanged between the host, the
//! router and route handlers. Wire parsing and serialization belong to the
//! HTTP server hosting the kernel; these types only carry already-parsed data.
//!
//! - **[`request`]**: [`Method`] and [`Request`].
//! - **[`response`]**: [`Response`] and the container-bound [`ResponseBuilder`]
//!   used to turn raw handler results into responses.
//! - **[`session`]**: the per-kernel [`Session`] started during bootstrap.
pub mod request;
pub mod response;
pub mod session;

pub use request::{Method, Request};
pub use response::{Response, ResponseBuilder};
pub use session::Session;

#[cfg(test)]
mod tests;
