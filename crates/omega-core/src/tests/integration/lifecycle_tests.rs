#![cfg(test)]

use std::env;

use tempfile::tempdir;

use crate::http::{Method, Request, ResponseBuilder};
use crate::kernel::bootstrap::Application;
use crate::kernel::error::BootstrapPhase;
use crate::kernel::singleton::{ConstructToken, Singleton};
use crate::provider_system::ProviderError;
use crate::routing::{Router, RoutingError};
use crate::tests::integration::common::{
    events, new_event_log, write_file, EnvGuard, Greeter, GreeterProvider, RecordingProvider,
};

/// Process-wide request counter, shared by every kernel.
struct RequestCounter {
    label: String,
    served: std::sync::atomic::AtomicUsize,
}

impl Singleton for RequestCounter {
    type Args = String;

    fn construct(label: String, _token: ConstructToken) -> Self {
        RequestCounter {
            label,
            served: std::sync::atomic::AtomicUsize::new(0),
        }
    }
}

#[tokio::test]
async fn test_full_application_lifecycle() {
    let _env = EnvGuard::acquire(&["OMEGA_TEST_LIFECYCLE_NAME"]);
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    write_file(root, ".env", "APP_ENV=staging\nOMEGA_TEST_LIFECYCLE_NAME=Omega\n");
    write_file(root, "config/providers.json", r#"{"providers": ["greeter", "recorder"]}"#);
    let log = new_event_log();

    let mut app = Application::new(root);
    let recorder = log.clone();
    app.providers_mut()
        .catalog("greeter", || Ok(GreeterProvider))
        .unwrap();
    app.providers_mut()
        .catalog("recorder", move || Ok(RecordingProvider::new("recorder", recorder.clone())))
        .unwrap();
    app.with_routes(|router: &Router| {
        router.get("/", |ctx| {
            let greeter = ctx.resolve::<Greeter>()?;
            let name = env::var("OMEGA_TEST_LIFECYCLE_NAME").unwrap_or_default();
            Ok(format!("{} from {}", greeter.greeting, name).into())
        })?;
        router.get("/count", |_| {
            let counter = RequestCounter::instance("ignored".to_string());
            let served = counter.served.fetch_add(1, std::sync::atomic::Ordering::SeqCst) + 1;
            Ok(serde_json::json!({ "label": counter.label, "served": served }).into())
        })
    });

    // The first caller fixes the singleton's construction arguments.
    let counter = RequestCounter::instance("lifecycle".to_string());

    let response = app.run(&Request::new(Method::Get, "/")).await.unwrap();
    assert_eq!(response.content(), "Hello from Omega");
    assert_eq!(app.environment(), "staging");
    assert!(app.environment_is(["stag*"]));
    assert_eq!(events(&log), vec!["bind:recorder", "boot:recorder"]);

    let before = counter.served.load(std::sync::atomic::Ordering::SeqCst);
    let response = app.dispatch(&Request::new(Method::Get, "/count")).unwrap();
    assert_eq!(response.header("content-type"), Some(ResponseBuilder::JSON_CONTENT_TYPE));
    let body: serde_json::Value = serde_json::from_str(response.content()).unwrap();
    assert_eq!(body["label"], "lifecycle");
    assert_eq!(body["served"], before + 1);
}

#[tokio::test]
async fn test_failure_in_listed_provider_surfaces_phase_and_cause() {
    let _env = EnvGuard::acquire(&[]);
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    write_file(root, ".env", "");
    write_file(root, "config/providers.json", r#"{"providers": ["ok", "broken", "never"]}"#);
    let log = new_event_log();

    let mut app = Application::new(root);
    let (ok, broken, never) = (log.clone(), log.clone(), log.clone());
    let catalog = app.providers_mut();
    catalog.catalog("ok", move || Ok(RecordingProvider::new("ok", ok.clone()))).unwrap();
    catalog
        .catalog("broken", move || Ok(RecordingProvider::failing("broken", broken.clone())))
        .unwrap();
    catalog
        .catalog("never", move || Ok(RecordingProvider::new("never", never.clone())))
        .unwrap();

    let err = app.run(&Request::new(Method::Get, "/")).await.unwrap_err();
    assert_eq!(err.phase(), Some(BootstrapPhase::BindProviders));
    assert!(matches!(
        err.find_cause::<ProviderError>(),
        Some(ProviderError::Bind { provider, .. }) if provider == "broken"
    ));
    assert_eq!(events(&log), vec!["bind:ok", "bind:broken"]);
}

#[tokio::test]
async fn test_routing_failure_reports_status() {
    let _env = EnvGuard::acquire(&[]);
    let temp_dir = tempdir().unwrap();
    write_file(temp_dir.path(), ".env", "");
    write_file(
        temp_dir.path(),
        "routes/web.json",
        r#"{"routes": [{"method": "GET", "path": "/"}]}"#,
    );

    let mut app = Application::new(temp_dir.path());
    let err = app.run(&Request::new(Method::Post, "/")).await.unwrap_err();
    let routing = err.find_cause::<RoutingError>().expect("routing error in chain");
    assert_eq!(routing.status(), 405);
}
