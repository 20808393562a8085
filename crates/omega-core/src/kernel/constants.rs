/// Application name
pub const APP_NAME: &str = "Omega";

/// Framework version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default environment file, relative to the environment path
pub const DEFAULT_ENVIRONMENT_FILE: &str = ".env";

/// Environment name used until one is detected
pub const DEFAULT_ENVIRONMENT: &str = "production";

/// Environment variable naming the active environment
pub const APP_ENV_VAR: &str = "APP_ENV";

/// Environment variable overriding the storage path
pub const STORAGE_PATH_ENV_VAR: &str = "OMEGA_STORAGE_PATH";

/// Application code directory
pub const APP_DIR: &str = "app";

/// Bootstrap cache directory
pub const BOOTSTRAP_DIR: &str = "bootstrap";

/// Configuration directory
pub const CONFIG_DIR: &str = "config";

/// Database directory
pub const DATABASE_DIR: &str = "database";

/// Language files directory
pub const LANG_DIR: &str = "lang";

/// Public web root
pub const PUBLIC_DIR: &str = "public";

/// Resources (views, assets) directory
pub const RESOURCES_DIR: &str = "resources";

/// Route definition directory
pub const ROUTES_DIR: &str = "routes";

/// Storage directory
pub const STORAGE_DIR: &str = "storage";
