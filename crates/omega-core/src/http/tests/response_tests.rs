use serde_json::json;

use crate::http::{Response, ResponseBuilder};
use crate::routing::Reply;

#[test]
fn test_response_accessors() {
    let response = Response::ok("hello").with_header("X-Trace", "abc");
    assert_eq!(response.status(), 200);
    assert!(response.is_success());
    assert_eq!(response.reason_phrase(), "OK");
    assert_eq!(response.content(), "hello");
    assert_eq!(response.header("x-trace"), Some("abc"));

    let missing = response.with_status(404);
    assert!(!missing.is_success());
    assert_eq!(missing.reason_phrase(), "Not Found");
    assert_eq!(Response::new(299).reason_phrase(), "");
}

#[test]
fn test_builder_wraps_text() {
    let response = ResponseBuilder::new().set_content(Reply::Text("page".into()));
    assert_eq!(response.status(), 200);
    assert_eq!(response.content(), "page");
    assert_eq!(response.header("content-type"), Some(ResponseBuilder::DEFAULT_CONTENT_TYPE));
}

#[test]
fn test_builder_wraps_json() {
    let response = ResponseBuilder::new().set_content(Reply::Json(json!({"id": 7})));
    assert_eq!(response.content(), r#"{"id":7}"#);
    assert_eq!(response.header("content-type"), Some(ResponseBuilder::JSON_CONTENT_TYPE));
}

#[test]
fn test_builder_empty_reply_uses_defaults() {
    let builder = ResponseBuilder::new().with_status(204).with_header("Cache-Control", "no-store");
    let response = builder.set_content(Reply::Empty);
    assert_eq!(response.status(), 204);
    assert!(response.content().is_empty());
    assert_eq!(response.header("cache-control"), Some("no-store"));
}

#[test]
fn test_builder_passes_responses_through() {
    let original = Response::new(302).with_header("location", "/login");
    let response = ResponseBuilder::new()
        .with_header("x-extra", "1")
        .set_content(Reply::Response(original.clone()));
    assert_eq!(response, original);
}
