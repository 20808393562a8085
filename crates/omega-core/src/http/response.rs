use std::collections::BTreeMap;

use crate::routing::Reply;

/// An outbound response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: u16,
    headers: BTreeMap<String, String>,
    content: String,
}

impl Response {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            content: String::new(),
        }
    }

    /// `200 OK` with the given body.
    pub fn ok(content: impl Into<String>) -> Self {
        Self::new(200).with_content(content)
    }

    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Header lookup, case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Reason phrase for the common status codes.
    pub fn reason_phrase(&self) -> &'static str {
        match self.status {
            200 => "OK",
            201 => "Created",
            204 => "No Content",
            301 => "Moved Permanently",
            302 => "Found",
            304 => "Not Modified",
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            422 => "Unprocessable Content",
            500 => "Internal Server Error",
            503 => "Service Unavailable",
            _ => "",
        }
    }
}

/// Turns raw handler results into [`Response`]s.
///
/// The kernel binds a default builder into the container; providers may
/// replace it to change the default status or headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseBuilder {
    status: u16,
    headers: BTreeMap<String, String>,
}

impl Default for ResponseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseBuilder {
    pub const DEFAULT_CONTENT_TYPE: &'static str = "text/html; charset=UTF-8";
    pub const JSON_CONTENT_TYPE: &'static str = "application/json";

    pub fn new() -> Self {
        let mut headers = BTreeMap::new();
        headers.insert(
            "content-type".to_string(),
            Self::DEFAULT_CONTENT_TYPE.to_string(),
        );
        Self {
            status: 200,
            headers,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Header added to every response this builder produces.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    fn base(&self) -> Response {
        let mut response = Response::new(self.status);
        response.headers = self.headers.clone();
        response
    }

    /// Build a response whose content is `reply`.
    ///
    /// A reply that already is a response is returned unchanged.
    pub fn set_content(&self, reply: Reply) -> Response {
        match reply {
            Reply::Response(response) => response,
            Reply::Text(text) => self.base().with_content(text),
            Reply::Json(value) => self
                .base()
                .with_header("content-type", Self::JSON_CONTENT_TYPE)
                .with_content(value.to_string()),
            Reply::Empty => self.base(),
        }
    }
}
