//! # Omega Core Configuration Files
//!
//! Loading of the structured files the kernel reads during bootstrap: the
//! provider list (`config/providers.*`) and the route file (`routes/web.*`).
//!
//! - **[`format`]**: [`ConfigFormat`] detection by extension and the
//!   in-memory [`ConfigData`] representation.
//! - **[`error`]**: [`ConfigError`] for I/O and parse failures.
//!
//! JSON is always available; YAML and TOML are enabled through the
//! `yaml-config` and `toml-config` features.
pub mod error;
pub mod format;

pub use error::ConfigError;
pub use format::{find_config_file, load_config_file, ConfigData, ConfigFormat};
