//! # Omega Core Kernel
//!
//! The `kernel` module is the heart of `omega-core`. It owns the application
//! context and drives the request lifecycle.
//!
//! ## Key Responsibilities & Components:
//!
//! - **Application Kernel**: [`Application`](bootstrap::Application) holds the
//!   path configuration, service container and provider list, and runs the
//!   bootstrap phases (configure, bind providers, dispatch).
//! - **Singleton Registry**: [`SingletonRegistry`](singleton::SingletonRegistry)
//!   and the [`Singleton`](singleton::Singleton) trait give types a single,
//!   lazily constructed instance.
//! - **Environment Detection**: [`EnvironmentDetector`](environment::EnvironmentDetector)
//!   resolves the environment name and matches it against glob patterns.
//! - **Core Constants**: directory names and environment variables, in `constants`.
//! - **Error Handling**: [`Error`](error::Error), [`BootstrapPhase`](error::BootstrapPhase)
//!   and the `Result` alias in `error`.
pub mod bootstrap;
pub mod constants;
pub mod environment;
pub mod error;
pub mod singleton;

pub use bootstrap::Application;
pub use environment::EnvironmentDetector;
pub use error::{BootstrapPhase, Error, Result};
pub use singleton::{ConstructToken, Instance, Singleton, SingletonRegistry, SingletonViolation};

#[cfg(test)]
mod tests;
