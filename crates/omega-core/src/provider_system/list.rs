use std::path::Path;

use crate::config::{find_config_file, load_config_file, ConfigError};
use crate::kernel::error::Result;

/// File stem of the provider list inside the config directory.
pub const PROVIDER_LIST_NAME: &str = "providers";

/// Key holding the ordered provider names.
const PROVIDERS_KEY: &str = "providers";

/// Read the ordered provider names from `<config_dir>/providers.<ext>`.
///
/// A missing file yields an empty list. A file that exists but cannot be
/// parsed, or whose `providers` key is not a list of strings, is an error.
pub fn load_provider_names(config_dir: &Path) -> Result<Vec<String>> {
    let Some(path) = find_config_file(config_dir, PROVIDER_LIST_NAME) else {
        log::debug!("No provider list found in {}", config_dir.display());
        return Ok(Vec::new());
    };

    let data = load_config_file(&path)?;
    let names = data
        .try_get::<Vec<String>>(PROVIDERS_KEY)
        .map_err(|e| ConfigError::InvalidValue {
            path: path.clone(),
            key: PROVIDERS_KEY.to_string(),
            message: e.to_string(),
        })?
        .unwrap_or_default();

    log::debug!("Provider list {} names {:?}", path.display(), names);
    Ok(names)
}
