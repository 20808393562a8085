//! # Omega Core Dependency Container
//!
//! A type-keyed service container. Providers register services into it while
//! the kernel binds them, and route handlers resolve them during dispatch.
//!
//! - **[`registry`]**: the [`Container`] itself: instances, transient and
//!   shared factories, and string aliases.
//! - **[`error`]**: [`ContainerError`] for lookup failures.
//!
//! Resolution is explicit: every service is registered under the concrete
//! type it is resolved by. There is no reflection-driven auto-wiring.
pub mod error;
pub mod registry;

pub use error::ContainerError;
pub use registry::Container;
