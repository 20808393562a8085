pub mod config;
pub mod container;
pub mod http;
pub mod kernel;
pub mod provider_system;
pub mod routing;
pub mod utils;

// Re-export key public types/traits for the binary and providers
pub use container::Container;
pub use http::{Method, Request, Response, ResponseBuilder, Session};
pub use kernel::error::Error as KernelError;
pub use kernel::{Application, BootstrapPhase, Singleton, SingletonRegistry, SingletonViolation};
pub use provider_system::{ProviderRegistry, ServiceProvider};
pub use routing::{Reply, RouteDefinitions, RouteFile, Router};

#[cfg(test)]
mod tests;
