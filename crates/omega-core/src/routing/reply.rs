use crate::http::Response;

/// What a route handler returns: either a finished response or a raw value
/// that the kernel normalizes through the container's
/// [`ResponseBuilder`](crate::http::ResponseBuilder).
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Response(Response),
    Text(String),
    Json(serde_json::Value),
    Empty,
}

impl Reply {
    pub fn is_response(&self) -> bool {
        matches!(self, Reply::Response(_))
    }
}

impl From<Response> for Reply {
    fn from(response: Response) -> Self {
        Reply::Response(response)
    }
}

impl From<String> for Reply {
    fn from(text: String) -> Self {
        Reply::Text(text)
    }
}

impl From<&str> for Reply {
    fn from(text: &str) -> Self {
        Reply::Text(text.to_string())
    }
}

impl From<serde_json::Value> for Reply {
    fn from(value: serde_json::Value) -> Self {
        Reply::Json(value)
    }
}

impl From<()> for Reply {
    fn from(_: ()) -> Self {
        Reply::Empty
    }
}
