use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::container::Container;
use crate::http::{Request, Response, ResponseBuilder, Session};
use crate::kernel::constants;
use crate::kernel::environment::EnvironmentDetector;
use crate::kernel::error::{BootstrapPhase, Error, Result};
use crate::provider_system::{ProviderError, ProviderRegistry, ServiceProvider};
use crate::routing::{Reply, RouteDefinitions, RouteFile, Router};
use crate::utils::join_paths;

/// The application kernel.
///
/// One `Application` is created by the host at process start and handed by
/// reference to everything that needs it. It owns the path configuration,
/// the service container, the provider list and the route definitions, and
/// drives the three bootstrap phases: configure, bind providers, dispatch.
///
/// Mutation goes through `&mut self`, so two bootstrap sequences cannot run
/// against one kernel at the same time without the host adding its own
/// synchronization around it.
///
/// The kernel cannot be duplicated:
///
/// ```compile_fail
/// use omega_core::Application;
///
/// let app = Application::new("/srv/app");
/// let copy = app.clone();
/// ```
pub struct Application {
    base_path: PathBuf,
    app_path: Option<PathBuf>,
    bootstrap_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    database_path: Option<PathBuf>,
    environment_path: Option<PathBuf>,
    lang_path: Option<PathBuf>,
    public_path: Option<PathBuf>,
    storage_path: Option<PathBuf>,
    environment_file: String,
    environment: String,
    container: Container,
    providers: ProviderRegistry,
    routes: Option<Arc<dyn RouteDefinitions>>,
    session: Option<Session>,
    bootstrapped: bool,
}

impl Application {
    /// Creates a new application rooted at `base_path`.
    ///
    /// The path is not checked; a missing directory only surfaces once a
    /// file below it is loaded.
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        log::info!("Initializing {} v{}", constants::APP_NAME, constants::VERSION);

        let container = Container::new();
        container.singleton::<ResponseBuilder, _>(|_| Ok(ResponseBuilder::new()));

        let mut app = Application {
            base_path: PathBuf::new(),
            app_path: None,
            bootstrap_path: None,
            config_path: None,
            database_path: None,
            environment_path: None,
            lang_path: None,
            public_path: None,
            storage_path: None,
            environment_file: constants::DEFAULT_ENVIRONMENT_FILE.to_string(),
            environment: constants::DEFAULT_ENVIRONMENT.to_string(),
            container,
            providers: ProviderRegistry::new(),
            routes: None,
            session: None,
            bootstrapped: false,
        };
        app.set_base_path(base_path);
        log::info!("Using base path: {}", app.base_path.display());
        app
    }

    /// The framework version.
    pub fn version(&self) -> &'static str {
        constants::VERSION
    }

    // --- Paths ---

    /// Set the base path. Trailing separators are removed.
    pub fn set_base_path(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.base_path = join_paths(path, "");
        self
    }

    fn resolve_dir(&self, configured: Option<&Path>, dir: &str, path: &str) -> PathBuf {
        match configured {
            Some(configured) => join_paths(configured, path),
            None => join_paths(join_paths(&self.base_path, dir), path),
        }
    }

    /// The base path, optionally joined with `path`.
    pub fn base_path(&self, path: &str) -> PathBuf {
        join_paths(&self.base_path, path)
    }

    pub fn app_path(&self, path: &str) -> PathBuf {
        self.resolve_dir(self.app_path.as_deref(), constants::APP_DIR, path)
    }

    pub fn bootstrap_path(&self, path: &str) -> PathBuf {
        self.resolve_dir(self.bootstrap_path.as_deref(), constants::BOOTSTRAP_DIR, path)
    }

    pub fn config_path(&self, path: &str) -> PathBuf {
        self.resolve_dir(self.config_path.as_deref(), constants::CONFIG_DIR, path)
    }

    pub fn database_path(&self, path: &str) -> PathBuf {
        self.resolve_dir(self.database_path.as_deref(), constants::DATABASE_DIR, path)
    }

    pub fn lang_path(&self, path: &str) -> PathBuf {
        self.resolve_dir(self.lang_path.as_deref(), constants::LANG_DIR, path)
    }

    pub fn public_path(&self, path: &str) -> PathBuf {
        self.resolve_dir(self.public_path.as_deref(), constants::PUBLIC_DIR, path)
    }

    pub fn resource_path(&self, path: &str) -> PathBuf {
        self.resolve_dir(None, constants::RESOURCES_DIR, path)
    }

    /// Directory holding the route file.
    pub fn routes_path(&self, path: &str) -> PathBuf {
        self.resolve_dir(None, constants::ROUTES_DIR, path)
    }

    /// The storage path, optionally joined with `path`.
    ///
    /// An explicit [`use_storage_path`](Self::use_storage_path) wins over the
    /// `OMEGA_STORAGE_PATH` environment variable, which wins over
    /// `<base>/storage`.
    pub fn storage_path(&self, path: &str) -> PathBuf {
        if let Some(configured) = &self.storage_path {
            return join_paths(configured, path);
        }
        match env::var(constants::STORAGE_PATH_ENV_VAR) {
            Ok(from_env) if !from_env.is_empty() => join_paths(from_env, path),
            _ => self.resolve_dir(None, constants::STORAGE_DIR, path),
        }
    }

    /// Directory the environment file is read from; the base path unless overridden.
    pub fn environment_path(&self) -> PathBuf {
        match &self.environment_path {
            Some(configured) => configured.clone(),
            None => self.base_path.clone(),
        }
    }

    pub fn environment_file(&self) -> &str {
        &self.environment_file
    }

    pub fn environment_file_path(&self) -> PathBuf {
        join_paths(self.environment_path(), &self.environment_file)
    }

    pub fn use_app_path(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.app_path = Some(join_paths(path, ""));
        self
    }

    pub fn use_bootstrap_path(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.bootstrap_path = Some(join_paths(path, ""));
        self
    }

    pub fn use_config_path(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.config_path = Some(join_paths(path, ""));
        self
    }

    pub fn use_database_path(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.database_path = Some(join_paths(path, ""));
        self
    }

    pub fn use_environment_path(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.environment_path = Some(join_paths(path, ""));
        self
    }

    pub fn use_lang_path(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.lang_path = Some(join_paths(path, ""));
        self
    }

    pub fn use_public_path(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.public_path = Some(join_paths(path, ""));
        self
    }

    pub fn use_storage_path(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.storage_path = Some(join_paths(path, ""));
        self
    }

    /// Read the environment from `file` (relative to the environment path)
    /// instead of `.env`.
    pub fn load_environment_from(&mut self, file: impl Into<String>) -> &mut Self {
        self.environment_file = file.into();
        self
    }

    // --- Environment ---

    /// The active environment name.
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Whether the active environment matches any of the glob `patterns`.
    pub fn environment_is<I, S>(&self, patterns: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        EnvironmentDetector::matches_any(&self.environment, patterns)
    }

    pub fn is_local(&self) -> bool {
        self.environment == "local"
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn running_unit_tests(&self) -> bool {
        self.environment == "testing"
    }

    /// Detect and store the environment using the process arguments and `callback`.
    pub fn detect_environment<F>(&mut self, callback: F) -> &str
    where
        F: FnOnce() -> String,
    {
        let args: Vec<String> = env::args().collect();
        self.detect_environment_from(callback, &args)
    }

    /// Detect and store the environment using explicit console arguments.
    pub fn detect_environment_from<F>(&mut self, callback: F, console_args: &[String]) -> &str
    where
        F: FnOnce() -> String,
    {
        self.environment = EnvironmentDetector::new().detect(callback, Some(console_args));
        &self.environment
    }

    // --- Services ---

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn providers(&self) -> &ProviderRegistry {
        &self.providers
    }

    pub fn providers_mut(&mut self) -> &mut ProviderRegistry {
        &mut self.providers
    }

    /// Append a provider to the explicit provider list.
    pub fn register_provider<P, F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        P: ServiceProvider + 'static,
        F: Fn() -> Result<P> + Send + Sync + 'static,
    {
        self.providers.register(name, factory);
        self
    }

    /// Use `routes` instead of the route file.
    pub fn with_routes<R>(&mut self, routes: R) -> &mut Self
    where
        R: RouteDefinitions + 'static,
    {
        self.routes = Some(Arc::new(routes));
        self
    }

    fn route_definitions(&self) -> Arc<dyn RouteDefinitions> {
        match &self.routes {
            Some(routes) => Arc::clone(routes),
            None => Arc::new(RouteFile::in_dir(self.routes_path(""))),
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    /// The active session, started if there is none.
    pub fn ensure_session(&mut self) -> &mut Session {
        self.session.get_or_insert_with(|| {
            let session = Session::start();
            log::debug!("Started session {}", session.id());
            session
        })
    }

    /// Returns whether `bootstrap` has completed.
    pub fn is_bootstrapped(&self) -> bool {
        self.bootstrapped
    }

    // --- Lifecycle ---

    /// Load the environment file into the process environment and detect
    /// the active environment from `APP_ENV`.
    ///
    /// Variables already present in the process environment are kept.
    pub fn configure(&mut self) -> Result<()> {
        let path = self.environment_file_path();
        log::info!("Loading environment from {}", path.display());
        dotenvy::from_path(&path).map_err(|source| Error::Environment {
            path: path.clone(),
            source,
        })?;

        self.detect_environment(|| {
            env::var(constants::APP_ENV_VAR)
                .unwrap_or_else(|_| constants::DEFAULT_ENVIRONMENT.to_string())
        });
        log::info!("Application environment: {}", self.environment);
        Ok(())
    }

    /// Construct and bind every provider in order, then boot them.
    ///
    /// The first failure is returned immediately: later providers are never
    /// constructed, and providers that already bound are left as they are.
    pub async fn bind_providers(&mut self) -> Result<()> {
        let entries = self.providers.resolve_entries(&self.config_path(""))?;
        log::info!("Binding {} service providers...", entries.len());

        let mut bound: Vec<(&str, Box<dyn ServiceProvider>)> = Vec::with_capacity(entries.len());
        for entry in &entries {
            let provider = entry.construct().map_err(|e| ProviderError::Construction {
                provider: entry.name().to_string(),
                source: Box::new(e),
            })?;
            log::info!("Binding provider: {}", entry.name());
            provider.bind(self).map_err(|e| {
                log::error!("Provider {} failed to bind: {}", entry.name(), e);
                ProviderError::Bind {
                    provider: entry.name().to_string(),
                    source: Box::new(e),
                }
            })?;
            bound.push((entry.name(), provider));
        }

        for (name, provider) in &bound {
            log::debug!("Booting provider: {}", name);
            provider.boot(self).await.map_err(|e| ProviderError::Boot {
                provider: name.to_string(),
                source: Box::new(e),
            })?;
        }
        log::info!("Service provider binding complete.");
        Ok(())
    }

    /// Build a router, load the routes into it and dispatch `request`.
    ///
    /// The router is registered in the container before routes load, so
    /// handlers resolving `Router` get this cycle's instance. A handler
    /// result that is not already a response goes through the container's
    /// [`ResponseBuilder`].
    pub fn dispatch(&self, request: &Request) -> Result<Response> {
        let router = Arc::new(Router::new());
        self.container.instance(Arc::clone(&router));

        self.route_definitions().define(&router)?;
        log::info!(
            "Dispatching {} {} against {} routes",
            request.method(),
            request.path(),
            router.route_count()
        );

        let response = match router.dispatch(request, &self.container)? {
            Reply::Response(response) => response,
            raw => self.container.resolve::<ResponseBuilder>()?.set_content(raw),
        };
        log::info!("{} {} -> {}", request.method(), request.path(), response.status());
        Ok(response)
    }

    /// Start the session, configure, then bind providers.
    pub async fn bootstrap(&mut self) -> Result<()> {
        if self.bootstrapped {
            return Err(Error::BootstrapFailure {
                phase: BootstrapPhase::PreCheck,
                message: "Application already bootstrapped".to_string(),
                source: None,
            });
        }

        self.ensure_session();
        self.configure()
            .map_err(|e| e.in_phase(BootstrapPhase::Configure))?;
        self.bind_providers()
            .await
            .map_err(|e| e.in_phase(BootstrapPhase::BindProviders))?;

        self.bootstrapped = true;
        log::info!("Application bootstrapped successfully.");
        Ok(())
    }

    /// Bootstrap the application and dispatch `request`.
    pub async fn run(&mut self, request: &Request) -> Result<Response> {
        self.bootstrap().await?;
        self.dispatch(request)
            .map_err(|e| e.in_phase(BootstrapPhase::Dispatch))
    }
}

impl fmt::Debug for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Application")
            .field("base_path", &self.base_path)
            .field("environment", &self.environment)
            .field("environment_file", &self.environment_file)
            .field("providers", &self.providers)
            .field("container", &self.container)
            .field("bootstrapped", &self.bootstrapped)
            .finish_non_exhaustive()
    }
}
