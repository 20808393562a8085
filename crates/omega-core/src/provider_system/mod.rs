//! # Omega Core Provider System
//!
//! Service providers are the extension point of the kernel: each one is
//! constructed once per bootstrap and given the [`Application`] so it can
//! register services into the container.
//!
//! ## Key Submodules and Responsibilities:
//!
//! - **[`traits`]**: the [`ServiceProvider`] trait with its optional `bind`
//!   and `boot` hooks.
//! - **[`registry`]**: the [`ProviderRegistry`], holding the explicit ordered
//!   provider list and the name catalog used by the provider list file.
//! - **[`list`]**: reading provider names from `config/providers.*`.
//! - **[`error`]**: [`ProviderError`] for construction, bind and lookup failures.
//!
//! Providers run strictly in declaration order. The first failure stops the
//! sequence; providers that already ran are not rolled back.
//!
//! [`Application`]: crate::kernel::Application
pub mod error;
pub mod list;
pub mod registry;
pub mod traits;

pub use error::ProviderError;
pub use list::{load_provider_names, PROVIDER_LIST_NAME};
pub use registry::{ProviderEntry, ProviderFactory, ProviderRegistry};
pub use traits::ServiceProvider;
