//! # Omega Core Container Errors
//!
//! Defines [`ContainerError`], returned when a service cannot be resolved
//! from the [`Container`](crate::container::Container).
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("No binding registered for type '{type_name}'")]
    NotBound { type_name: &'static str },

    #[error("No binding registered under alias '{0}'")]
    AliasNotFound(String),

    #[error("Binding for '{expected}' produced a value of another type")]
    TypeMismatch { expected: &'static str },
}
