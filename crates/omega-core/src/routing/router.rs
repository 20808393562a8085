use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::container::Container;
use crate::http::{Method, Request};
use crate::kernel::error::Result;
use crate::routing::error::RoutingError;
use crate::routing::reply::Reply;

/// Parameters captured from `{name}` segments.
pub type RouteParams = HashMap<String, String>;

/// A route handler.
pub type Handler = Arc<dyn Fn(&RequestContext<'_>) -> Result<Reply> + Send + Sync>;

/// Everything a handler can see while serving one request.
pub struct RequestContext<'a> {
    request: &'a Request,
    params: &'a RouteParams,
    container: &'a Container,
}

impl<'a> RequestContext<'a> {
    pub fn request(&self) -> &'a Request {
        self.request
    }

    pub fn param(&self, name: &str) -> Option<&'a str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn params(&self) -> &'a RouteParams {
        self.params
    }

    pub fn container(&self) -> &'a Container {
        self.container
    }

    /// Shorthand for resolving a service from the container.
    pub fn resolve<T: Any + Send + Sync>(&self) -> Result<Arc<T>> {
        self.container.resolve::<T>()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

struct Route {
    /// `None` matches any method.
    method: Option<Method>,
    pattern: String,
    segments: Vec<Segment>,
    handler: Handler,
}

impl Route {
    fn accepts(&self, method: Method) -> bool {
        match self.method {
            None => true,
            Some(m) if m == method => true,
            // HEAD is served by GET routes.
            Some(Method::Get) => method == Method::Head,
            Some(_) => false,
        }
    }

    fn capture(&self, parts: &[&str]) -> Option<RouteParams> {
        if parts.len() != self.segments.len() {
            return None;
        }
        let mut params = RouteParams::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(lit) if lit == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), (*part).to_string());
                }
            }
        }
        Some(params)
    }
}

fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn parse_pattern(pattern: &str) -> std::result::Result<Vec<Segment>, RoutingError> {
    let invalid = |reason: &str| RoutingError::InvalidRoute {
        pattern: pattern.to_string(),
        reason: reason.to_string(),
    };

    let mut seen = Vec::new();
    let mut segments = Vec::new();
    for part in split_path(pattern) {
        if let Some(inner) = part.strip_prefix('{') {
            let name = inner
                .strip_suffix('}')
                .ok_or_else(|| invalid("unterminated parameter"))?;
            if name.is_empty() || name.contains(['{', '}']) {
                return Err(invalid("parameter names must be non-empty identifiers"));
            }
            if seen.contains(&name) {
                return Err(invalid("duplicate parameter name"));
            }
            seen.push(name);
            segments.push(Segment::Param(name.to_string()));
        } else if part.contains(['{', '}']) {
            return Err(invalid("braces are only allowed around a whole segment"));
        } else {
            segments.push(Segment::Literal(part.to_string()));
        }
    }
    Ok(segments)
}

/// Route table for one dispatch cycle.
///
/// Registration takes `&self` so the router can be shared through the
/// container before routes are loaded into it.
#[derive(Default)]
pub struct Router {
    routes: RwLock<Vec<Route>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    fn add<F>(&self, method: Option<Method>, pattern: &str, handler: F) -> Result<()>
    where
        F: Fn(&RequestContext<'_>) -> Result<Reply> + Send + Sync + 'static,
    {
        let segments = parse_pattern(pattern)?;
        log::debug!(
            "Registering route {} {}",
            method.map(|m| m.as_str()).unwrap_or("ANY"),
            pattern
        );
        self.routes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Route {
                method,
                pattern: pattern.to_string(),
                segments,
                handler: Arc::new(handler),
            });
        Ok(())
    }

    /// Register a handler for `method` requests matching `pattern`.
    pub fn route<F>(&self, method: Method, pattern: &str, handler: F) -> Result<()>
    where
        F: Fn(&RequestContext<'_>) -> Result<Reply> + Send + Sync + 'static,
    {
        self.add(Some(method), pattern, handler)
    }

    pub fn get<F>(&self, pattern: &str, handler: F) -> Result<()>
    where
        F: Fn(&RequestContext<'_>) -> Result<Reply> + Send + Sync + 'static,
    {
        self.route(Method::Get, pattern, handler)
    }

    pub fn post<F>(&self, pattern: &str, handler: F) -> Result<()>
    where
        F: Fn(&RequestContext<'_>) -> Result<Reply> + Send + Sync + 'static,
    {
        self.route(Method::Post, pattern, handler)
    }

    pub fn put<F>(&self, pattern: &str, handler: F) -> Result<()>
    where
        F: Fn(&RequestContext<'_>) -> Result<Reply> + Send + Sync + 'static,
    {
        self.route(Method::Put, pattern, handler)
    }

    pub fn patch<F>(&self, pattern: &str, handler: F) -> Result<()>
    where
        F: Fn(&RequestContext<'_>) -> Result<Reply> + Send + Sync + 'static,
    {
        self.route(Method::Patch, pattern, handler)
    }

    pub fn delete<F>(&self, pattern: &str, handler: F) -> Result<()>
    where
        F: Fn(&RequestContext<'_>) -> Result<Reply> + Send + Sync + 'static,
    {
        self.route(Method::Delete, pattern, handler)
    }

    /// Register a handler for every method.
    pub fn any<F>(&self, pattern: &str, handler: F) -> Result<()>
    where
        F: Fn(&RequestContext<'_>) -> Result<Reply> + Send + Sync + 'static,
    {
        self.add(None, pattern, handler)
    }

    pub fn route_count(&self) -> usize {
        self.routes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Match `request` against the table and run the first matching handler.
    ///
    /// Routes are tried in registration order. A path that matches only under
    /// other methods is reported as [`RoutingError::MethodNotAllowed`].
    pub fn dispatch(&self, request: &Request, container: &Container) -> Result<Reply> {
        let parts = split_path(request.path());
        let mut allowed = Vec::new();

        let matched = {
            let routes = self.routes.read().unwrap_or_else(PoisonError::into_inner);
            let mut matched = None;
            for route in routes.iter() {
                let Some(params) = route.capture(&parts) else {
                    continue;
                };
                if route.accepts(request.method()) {
                    matched = Some((route.handler.clone(), params, route.pattern.clone()));
                    break;
                }
                if let Some(m) = route.method {
                    if !allowed.contains(&m) {
                        allowed.push(m);
                    }
                }
            }
            matched
        };

        match matched {
            Some((handler, params, pattern)) => {
                log::debug!("{} {} matched route {}", request.method(), request.path(), pattern);
                let ctx = RequestContext {
                    request,
                    params: &params,
                    container,
                };
                handler(&ctx)
            }
            None if !allowed.is_empty() => Err(RoutingError::MethodNotAllowed {
                method: request.method(),
                path: request.path().to_string(),
                allowed,
            }
            .into()),
            None => Err(RoutingError::NotFound {
                method: request.method(),
                path: request.path().to_string(),
            }
            .into()),
        }
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let routes = self.routes.read().unwrap_or_else(PoisonError::into_inner);
        let patterns: Vec<String> = routes
            .iter()
            .map(|r| {
                format!(
                    "{} {}",
                    r.method.map(|m| m.as_str()).unwrap_or("ANY"),
                    r.pattern
                )
            })
            .collect();
        f.debug_struct("Router").field("routes", &patterns).finish()
    }
}
