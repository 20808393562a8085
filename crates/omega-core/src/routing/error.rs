//! # Omega Core Routing Errors
use std::path::PathBuf;

use crate::http::Method;

#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    #[error("No route matches {method} {path}")]
    NotFound { method: Method, path: String },

    #[error("Method {method} is not allowed for {path}; allowed: {}", allowed.iter().map(|m| m.as_str()).collect::<Vec<_>>().join(", "))]
    MethodNotAllowed {
        method: Method,
        path: String,
        allowed: Vec<Method>,
    },

    #[error("Invalid route pattern '{pattern}': {reason}")]
    InvalidRoute { pattern: String, reason: String },

    #[error("No route file named '{name}' found in {dir}")]
    RouteFileMissing { dir: PathBuf, name: String },
}

impl RoutingError {
    /// The HTTP status a host would usually render for this error.
    pub fn status(&self) -> u16 {
        match self {
            RoutingError::NotFound { .. } => 404,
            RoutingError::MethodNotAllowed { .. } => 405,
            RoutingError::InvalidRoute { .. } | RoutingError::RouteFileMissing { .. } => 500,
        }
    }
}
