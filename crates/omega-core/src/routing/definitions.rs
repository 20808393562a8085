use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::config::{find_config_file, load_config_file, ConfigError};
use crate::http::{Method, Response, ResponseBuilder};
use crate::kernel::error::Result;
use crate::routing::error::RoutingError;
use crate::routing::reply::Reply;
use crate::routing::router::{RequestContext, RouteParams, Router};

/// File stem of the route file inside the routes directory.
pub const ROUTE_FILE_NAME: &str = "web";

/// Registers routes into a freshly built router.
pub trait RouteDefinitions: Send + Sync {
    fn define(&self, router: &Router) -> Result<()>;
}

impl<F> RouteDefinitions for F
where
    F: Fn(&Router) -> Result<()> + Send + Sync,
{
    fn define(&self, router: &Router) -> Result<()> {
        self(router)
    }
}

/// One entry of the `routes` list in a route file.
#[derive(Debug, Clone, Deserialize)]
struct StaticRoute {
    /// Missing or `"ANY"` registers the route for every method.
    #[serde(default)]
    method: Option<String>,
    path: String,
    #[serde(default)]
    status: Option<u16>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    json: Option<serde_json::Value>,
    #[serde(default)]
    headers: BTreeMap<String, String>,
}

impl StaticRoute {
    /// `{name}` placeholders in `content` are replaced with route parameters.
    fn render(&self, ctx: &RequestContext<'_>) -> Reply {
        let text = self
            .content
            .as_deref()
            .map(|content| substitute_params(content, ctx.params()));

        if self.status.is_none() && self.headers.is_empty() {
            return match (&self.json, text) {
                (Some(json), _) => Reply::Json(json.clone()),
                (None, Some(text)) => Reply::Text(text),
                (None, None) => Reply::Empty,
            };
        }

        let mut response = Response::new(self.status.unwrap_or(200));
        if let Some(json) = &self.json {
            response = response
                .with_header("content-type", ResponseBuilder::JSON_CONTENT_TYPE)
                .with_content(json.to_string());
        } else if let Some(text) = text {
            response = response
                .with_header("content-type", ResponseBuilder::DEFAULT_CONTENT_TYPE)
                .with_content(text);
        }
        for (name, value) in &self.headers {
            response = response.with_header(name, value.clone());
        }
        Reply::Response(response)
    }
}

/// Single left-to-right pass; substituted values are never re-scanned and
/// unknown `{name}` tokens are kept verbatim.
fn substitute_params(content: &str, params: &RouteParams) -> String {
    let mut out = String::with_capacity(content.len());
    let mut rest = content;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => match params.get(&after[..close]) {
                Some(value) => {
                    out.push_str(value);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            },
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Static routes read from `<routes_dir>/web.<ext>`.
///
/// ```json
/// { "routes": [ { "method": "GET", "path": "/hello/{name}", "content": "Hello {name}" } ] }
/// ```
#[derive(Debug, Clone)]
pub struct RouteFile {
    dir: PathBuf,
}

impl RouteFile {
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the route file, if one exists.
    pub fn locate(&self) -> Result<PathBuf> {
        find_config_file(&self.dir, ROUTE_FILE_NAME).ok_or_else(|| {
            RoutingError::RouteFileMissing {
                dir: self.dir.clone(),
                name: ROUTE_FILE_NAME.to_string(),
            }
            .into()
        })
    }
}

impl RouteDefinitions for RouteFile {
    fn define(&self, router: &Router) -> Result<()> {
        let path = self.locate()?;
        let data = load_config_file(&path)?;
        let routes = data
            .try_get::<Vec<StaticRoute>>("routes")
            .map_err(|e| ConfigError::InvalidValue {
                path: path.clone(),
                key: "routes".to_string(),
                message: e.to_string(),
            })?
            .unwrap_or_default();

        log::info!("Loading {} routes from {}", routes.len(), path.display());
        for route in routes {
            let method = match route.method.as_deref() {
                None => None,
                Some(m) if m.eq_ignore_ascii_case("any") => None,
                Some(m) => Some(m.parse::<Method>().map_err(|reason| {
                    RoutingError::InvalidRoute {
                        pattern: route.path.clone(),
                        reason,
                    }
                })?),
            };
            let pattern = route.path.clone();
            match method {
                Some(method) => router.route(method, &pattern, move |ctx| Ok(route.render(ctx)))?,
                None => router.any(&pattern, move |ctx| Ok(route.render(ctx)))?,
            }
        }
        Ok(())
    }
}
