//! # Omega Core Provider System Errors
//!
//! Defines [`ProviderError`]. Construction and bind failures wrap the
//! provider's own error so the full cause chain reaches the caller.
use std::path::PathBuf;

use crate::kernel::error::Error;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Failed to construct provider '{provider}': {source}")]
    Construction {
        provider: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Provider '{provider}' failed to bind: {source}")]
    Bind {
        provider: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Provider '{provider}' failed to boot: {source}")]
    Boot {
        provider: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Provider '{name}' listed in '{path}' is not in the provider catalog")]
    UnknownProvider { name: String, path: PathBuf },

    #[error("Provider '{0}' is already in the provider catalog")]
    DuplicateCatalogEntry(String),
}

impl ProviderError {
    /// Name of the provider the error is about.
    pub fn provider(&self) -> &str {
        match self {
            ProviderError::Construction { provider, .. }
            | ProviderError::Bind { provider, .. }
            | ProviderError::Boot { provider, .. } => provider,
            ProviderError::UnknownProvider { name, .. } => name,
            ProviderError::DuplicateCatalogEntry(name) => name,
        }
    }
}
