//! # Omega Core Utilities
//!
//! Small, dependency-free helpers shared across the kernel. Currently this is
//! the path resolver used by every path accessor on
//! [`Application`](crate::kernel::Application).
pub mod path;

pub use path::{is_separator, join_paths, trim_trailing_separators};
