use std::env;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use omega_core::kernel::bootstrap::Application;
use omega_core::kernel::error::{Error as KernelError, Result as KernelResult};
use omega_core::provider_system::ServiceProvider;
use tracing_log::LogTracer;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives.
pub const LOG_FILTER_ENV_VAR: &str = "OMEGA_LOG";

/// Filter used when neither an explicit filter nor `OMEGA_LOG` is set.
pub const DEFAULT_FILTER: &str = "info";

/// The filter directives that won the first successful install.
static INSTALLED: Mutex<Option<String>> = Mutex::new(None);

/// Installs the process-wide log subscriber.
///
/// Output goes to stderr through a `tracing-subscriber` fmt layer; `log`
/// records from the kernel are forwarded by `tracing-log`. The subscriber
/// is global, so only the first kernel to bind this provider installs it.
#[derive(Debug, Default, Clone)]
pub struct LoggingProvider {
    filter: Option<String>,
}

impl LoggingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `directives` instead of `OMEGA_LOG`.
    pub fn with_filter(directives: impl Into<String>) -> Self {
        Self {
            filter: Some(directives.into()),
        }
    }

    /// The directives this provider would install right now.
    pub fn filter_directives(&self) -> String {
        resolve_directives(self.filter.as_deref(), env::var(LOG_FILTER_ENV_VAR).ok())
    }

    /// The directives of the installed subscriber, if one was installed here.
    pub fn installed_filter() -> Option<String> {
        INSTALLED
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns `false` when a subscriber was already installed.
    fn install(&self) -> KernelResult<bool> {
        let directives = self.filter_directives();
        let filter = EnvFilter::try_new(&directives).map_err(|e| {
            KernelError::Other(format!("Invalid log filter '{}': {}", directives, e))
        })?;

        install_once(&INSTALLED, directives, || {
            let subscriber = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)
                .map_err(|e| format!("Failed to set global subscriber: {}", e))?;
            LogTracer::init().map_err(|e| format!("Failed to bridge log records: {}", e))
        })
        .map_err(KernelError::Other)
    }
}

/// Runs `attempt` unless `slot` is filled; `slot` only records `directives`
/// once `attempt` succeeds.
fn install_once<F>(
    slot: &Mutex<Option<String>>,
    directives: String,
    attempt: F,
) -> Result<bool, String>
where
    F: FnOnce() -> Result<(), String>,
{
    let mut installed = slot.lock().unwrap_or_else(PoisonError::into_inner);
    if installed.is_some() {
        return Ok(false);
    }
    attempt()?;
    *installed = Some(directives);
    Ok(true)
}

/// An explicit filter wins over the environment value; blank values are ignored.
fn resolve_directives(explicit: Option<&str>, from_env: Option<String>) -> String {
    explicit
        .map(str::to_string)
        .or(from_env)
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

#[async_trait]
impl ServiceProvider for LoggingProvider {
    fn name(&self) -> &str {
        "core-logging"
    }

    fn bind(&self, _app: &mut Application) -> KernelResult<()> {
        if self.install()? {
            log::info!("Core logging installed with filter '{}'", self.filter_directives());
        } else if let Some(existing) = Self::installed_filter() {
            log::debug!("Log subscriber already installed with filter '{}'", existing);
        }
        Ok(())
    }

    async fn boot(&self, app: &Application) -> KernelResult<()> {
        tracing::info!(
            environment = app.environment(),
            version = app.version(),
            "Logging ready"
        );
        Ok(())
    }
}
