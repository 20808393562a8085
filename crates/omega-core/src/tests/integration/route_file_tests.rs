#![cfg(test)]

use tempfile::tempdir;

use crate::http::{Method, Request, ResponseBuilder};
use crate::kernel::bootstrap::Application;
use crate::tests::integration::common::{write_file, EnvGuard};

#[tokio::test]
async fn test_run_serves_routes_from_route_file() {
    let _env = EnvGuard::acquire(&[]);
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    write_file(root, ".env", "APP_ENV=local\n");
    write_file(
        root,
        "routes/web.json",
        r#"{
            "routes": [
                { "method": "GET", "path": "/", "content": "<h1>Welcome</h1>" },
                { "method": "GET", "path": "/users/{id}", "json": { "found": true } },
                { "method": "GET", "path": "/old", "status": 301,
                  "headers": { "Location": "/new" } }
            ]
        }"#,
    );

    let mut app = Application::new(root);
    let home = app
        .run(&Request::from_target(Method::Get, "/?utm=mail"))
        .await
        .unwrap();
    assert_eq!(home.status(), 200);
    assert_eq!(home.content(), "<h1>Welcome</h1>");
    assert_eq!(home.header("content-type"), Some(ResponseBuilder::DEFAULT_CONTENT_TYPE));

    let user = app.dispatch(&Request::new(Method::Get, "/users/12")).unwrap();
    assert_eq!(user.content(), r#"{"found":true}"#);

    let head = app.dispatch(&Request::new(Method::Head, "/users/12")).unwrap();
    assert!(head.is_success());

    let moved = app.dispatch(&Request::new(Method::Get, "/old")).unwrap();
    assert_eq!(moved.status(), 301);
    assert_eq!(moved.header("location"), Some("/new"));
}

#[tokio::test]
async fn test_route_file_is_reloaded_each_dispatch() {
    let _env = EnvGuard::acquire(&[]);
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    write_file(root, ".env", "");
    write_file(root, "routes/web.json", r#"{"routes": [{"path": "/", "content": "v1"}]}"#);

    let mut app = Application::new(root);
    let first = app.run(&Request::new(Method::Get, "/")).await.unwrap();
    assert_eq!(first.content(), "v1");

    write_file(root, "routes/web.json", r#"{"routes": [{"path": "/", "content": "v2"}]}"#);
    let second = app.dispatch(&Request::new(Method::Get, "/")).unwrap();
    assert_eq!(second.content(), "v2");
}
