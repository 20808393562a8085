#![cfg(test)]

use std::env;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::kernel::bootstrap::Application;
use crate::kernel::constants::{APP_ENV_VAR, STORAGE_PATH_ENV_VAR};
use crate::kernel::error::{Error, Result as KernelResult};
use crate::provider_system::ServiceProvider;

// ===== PROCESS ENVIRONMENT =====

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Serializes tests that read or write the process environment.
///
/// The listed variables (plus `APP_ENV` and `OMEGA_STORAGE_PATH`) are
/// removed on acquire and again on drop.
pub struct EnvGuard {
    keys: Vec<&'static str>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvGuard {
    pub fn acquire(extra: &[&'static str]) -> Self {
        let lock = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let mut keys = vec![APP_ENV_VAR, STORAGE_PATH_ENV_VAR];
        keys.extend_from_slice(extra);
        let guard = EnvGuard { keys, _lock: lock };
        guard.clear();
        guard
    }

    pub fn set(&self, key: &str, value: &str) {
        // SAFETY: every test touching the environment holds ENV_LOCK.
        unsafe { env::set_var(key, value) };
    }

    fn clear(&self) {
        for key in &self.keys {
            // SAFETY: every test touching the environment holds ENV_LOCK.
            unsafe { env::remove_var(key) };
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        self.clear();
    }
}

// ===== FILES =====

/// Write `contents` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    fs::write(&path, contents).expect("Failed to write test file");
}

// ===== MOCK PROVIDERS =====

/// Shared record of provider hook calls, in call order.
pub type EventLog = Arc<Mutex<Vec<String>>>;

pub fn new_event_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn events(log: &EventLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Provider that records `bind:<name>` and `boot:<name>`, and can be told
/// to fail its bind.
pub struct RecordingProvider {
    name: String,
    log: EventLog,
    fail_bind: bool,
}

impl RecordingProvider {
    pub fn new(name: &str, log: EventLog) -> Self {
        Self {
            name: name.to_string(),
            log,
            fail_bind: false,
        }
    }

    pub fn failing(name: &str, log: EventLog) -> Self {
        Self {
            fail_bind: true,
            ..Self::new(name, log)
        }
    }
}

#[async_trait]
impl ServiceProvider for RecordingProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn bind(&self, app: &mut Application) -> KernelResult<()> {
        self.log.lock().unwrap().push(format!("bind:{}", self.name));
        if self.fail_bind {
            return Err(Error::Other(format!("{} refused to bind", self.name)));
        }
        app.container()
            .instance(Arc::new(BoundMarker(self.name.clone())));
        Ok(())
    }

    async fn boot(&self, _app: &Application) -> KernelResult<()> {
        self.log.lock().unwrap().push(format!("boot:{}", self.name));
        Ok(())
    }
}

/// Registered by [`RecordingProvider`]; holds the name of the last provider
/// that bound.
#[derive(Debug)]
pub struct BoundMarker(pub String);

/// A service handlers can resolve.
#[derive(Debug)]
pub struct Greeter {
    pub greeting: String,
}

/// Binds a [`Greeter`] into the container.
pub struct GreeterProvider;

#[async_trait]
impl ServiceProvider for GreeterProvider {
    fn name(&self) -> &str {
        "greeter"
    }

    fn bind(&self, app: &mut Application) -> KernelResult<()> {
        app.container().singleton::<Greeter, _>(|_| {
            Ok(Greeter {
                greeting: "Hello".to_string(),
            })
        });
        Ok(())
    }
}
