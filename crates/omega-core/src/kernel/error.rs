//! # Omega Core Kernel Errors
//!
//! Defines error types specific to the Omega kernel.
//!
//! This module includes [`Error`], the primary enum aggregating the typed
//! errors of every subsystem (container, providers, routing, configuration,
//! singleton registry) together with [`Error::BootstrapFailure`], which tags a
//! failure with the lifecycle phase it happened in.
use std::error::Error as StdError;
use std::path::PathBuf;
use std::result::Result as StdResult;

use thiserror::Error as ThisError;

use crate::config::error::ConfigError;
use crate::container::error::ContainerError;
use crate::kernel::singleton::SingletonViolation;
use crate::provider_system::error::ProviderError;
use crate::routing::error::RoutingError;

/// Custom error type for the Omega kernel
#[derive(Debug, ThisError)]
pub enum Error {
    /// Typed dependency container error
    #[error("Container error: {0}")]
    Container(#[from] ContainerError),

    /// Typed service provider error
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Typed routing error
    #[error("Routing error: {0}")]
    Routing(#[from] RoutingError),

    /// Typed configuration file error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A singleton-pattern instance was serialized or deserialized.
    #[error("Singleton violation: {0}")]
    SingletonViolation(#[from] SingletonViolation),

    /// The `.env` file could not be loaded.
    #[error("Failed to load environment file '{path}': {source}")]
    Environment {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    /// Error occurring during a specific bootstrap phase.
    #[error("Bootstrap failure during {phase}: {message}")]
    BootstrapFailure {
        phase: BootstrapPhase,
        message: String,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    /// Generic error with message
    #[error("Error: {0}")]
    Other(String),
}

/// Represents a specific phase of the kernel's bootstrap sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum BootstrapPhase {
    #[error("PreCheck")]
    PreCheck,
    #[error("Configure")]
    Configure,
    #[error("BindProviders")]
    BindProviders,
    #[error("Dispatch")]
    Dispatch,
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl Error {
    /// Tag this error with the bootstrap phase it surfaced in.
    ///
    /// Errors that already carry a phase are returned unchanged. The wrapped
    /// error is only reachable through `source`.
    pub fn in_phase(self, phase: BootstrapPhase) -> Self {
        match self {
            already @ Error::BootstrapFailure { .. } => already,
            other => Error::BootstrapFailure {
                phase,
                message: "phase aborted".to_string(),
                source: Some(Box::new(other)),
            },
        }
    }

    /// The bootstrap phase, if this error has been tagged with one.
    pub fn phase(&self) -> Option<BootstrapPhase> {
        match self {
            Error::BootstrapFailure { phase, .. } => Some(*phase),
            _ => None,
        }
    }

    /// Walk the `source` chain for a typed cause of type `E`.
    pub fn find_cause<E: StdError + 'static>(&self) -> Option<&E> {
        let mut current: Option<&(dyn StdError + 'static)> = Some(self);
        while let Some(err) = current {
            if let Some(found) = err.downcast_ref::<E>() {
                return Some(found);
            }
            current = err.source();
        }
        None
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}
