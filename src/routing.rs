//! Route definitions and the route registry

use crate::config::RequestConfig;
use crate::error::Result;
use crate::response::Response;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// HTTP request methods supported by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// Returns the method as a string slice.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    pub(crate) fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Boxed future returned by route handlers.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<()>> + Send>>;

/// A response handler: called with the final [`Response`] once the request
/// (and the middleware after-stage) has completed.
///
/// Handlers are reference-counted so the registry can hand the original
/// callable back to the caller unchanged.
pub type Handler = Arc<dyn Fn(Response) -> HandlerFuture + Send + Sync>;

/// Wrap an async closure into a [`Handler`].
pub fn into_handler<F, Fut>(f: F) -> Handler
where
    F: Fn(Response) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    Arc::new(move |response| Box::pin(f(response)))
}

/// Static request description supplied at registration time: target URL plus
/// optional query parameters, JSON body, form body, and a per-call
/// [`RequestConfig`] override.
#[derive(Debug, Clone, Default)]
pub struct RouteSpec {
    pub url: String,
    pub params: Option<HashMap<String, String>>,
    pub json: Option<Value>,
    pub form: Option<HashMap<String, String>>,
    pub config: RequestConfig,
}

impl RouteSpec {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Add a single query parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Set the full query parameter map.
    pub fn params(mut self, params: HashMap<String, String>) -> Self {
        self.params = Some(params);
        self
    }

    /// Set a JSON body, sent with `Content-Type: application/json`.
    pub fn json(mut self, body: Value) -> Self {
        self.json = Some(body);
        self
    }

    /// Set a form-encoded body.
    pub fn form(mut self, form: HashMap<String, String>) -> Self {
        self.form = Some(form);
        self
    }

    /// Set the per-call config override (most specific merge layer).
    pub fn config(mut self, config: RequestConfig) -> Self {
        self.config = config;
        self
    }
}

/// A registered unit of work: method, static request description, and the
/// handler invoked with the response. Immutable once registered.
pub struct Route {
    pub method: Method,
    pub url: String,
    pub params: Option<HashMap<String, String>>,
    pub json: Option<Value>,
    pub form: Option<HashMap<String, String>>,
    pub config: RequestConfig,
    handler: Handler,
}

impl Route {
    pub fn new(method: Method, spec: RouteSpec, handler: Handler) -> Self {
        Self {
            method,
            url: spec.url,
            params: spec.params,
            json: spec.json,
            form: spec.form,
            config: spec.config,
            handler,
        }
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("params", &self.params)
            .field("json", &self.json)
            .field("form", &self.form)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Accumulating route registry.
///
/// Duplicate URL+method registrations are kept as distinct routes, not
/// overwritten: each registration is an independent unit of work.
#[derive(Debug, Default)]
pub struct RouteRegistry {
    routes: Vec<Arc<Route>>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a route and return its handler unchanged, so it stays callable
    /// outside the registry.
    pub fn add(&mut self, method: Method, spec: RouteSpec, handler: Handler) -> Handler {
        let route = Route::new(method, spec, handler.clone());
        tracing::debug!(method = %route.method, url = %route.url, "registered route");
        self.routes.push(Arc::new(route));
        handler
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn routes(&self) -> &[Arc<Route>] {
        &self.routes
    }
}
