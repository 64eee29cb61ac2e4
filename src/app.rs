//! Application entry point: registration and the concurrent dispatcher

use crate::client::HttpClient;
use crate::config::AppConfig;
use crate::error::Error;
use crate::logging;
use crate::middleware::{Middleware, MiddlewareChain};
use crate::response::Response;
use crate::routing::{into_handler, Handler, Method, Route, RouteRegistry, RouteSpec};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

/// Outgoing-request application.
///
/// Register routes with the method-specific registration calls, then let
/// [`FastHttp::run`] dispatch them all concurrently over one shared
/// connection pool:
///
/// ```ignore
/// use fasthttp::{FastHttp, RouteSpec};
///
/// #[tokio::main]
/// async fn main() {
///     let mut app = FastHttp::new();
///
///     app.get(RouteSpec::new("https://httpbin.org/get"), |resp| async move {
///         println!("{}", resp.json()?);
///         Ok(())
///     });
///
///     app.run().await;
/// }
/// ```
pub struct FastHttp {
    config: AppConfig,
    registry: RouteRegistry,
    middleware: MiddlewareChain,
}

impl FastHttp {
    /// Create an application with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create an application from an [`AppConfig`].
    pub fn with_config(config: AppConfig) -> Self {
        logging::init(config.debug);
        Self {
            config,
            registry: RouteRegistry::new(),
            middleware: MiddlewareChain::default(),
        }
    }

    /// Append a middleware. Hooks run in the order middleware were added.
    pub fn middleware(&mut self, middleware: impl Middleware + 'static) -> &mut Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Register a GET route.
    pub fn get<F, Fut>(&mut self, spec: RouteSpec, handler: F) -> Handler
    where
        F: Fn(Response) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = crate::error::Result<()>> + Send + 'static,
    {
        self.add(Method::Get, spec, into_handler(handler))
    }

    /// Register a POST route.
    pub fn post<F, Fut>(&mut self, spec: RouteSpec, handler: F) -> Handler
    where
        F: Fn(Response) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = crate::error::Result<()>> + Send + 'static,
    {
        self.add(Method::Post, spec, into_handler(handler))
    }

    /// Register a PUT route.
    pub fn put<F, Fut>(&mut self, spec: RouteSpec, handler: F) -> Handler
    where
        F: Fn(Response) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = crate::error::Result<()>> + Send + 'static,
    {
        self.add(Method::Put, spec, into_handler(handler))
    }

    /// Register a PATCH route.
    pub fn patch<F, Fut>(&mut self, spec: RouteSpec, handler: F) -> Handler
    where
        F: Fn(Response) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = crate::error::Result<()>> + Send + 'static,
    {
        self.add(Method::Patch, spec, into_handler(handler))
    }

    /// Register a DELETE route.
    pub fn delete<F, Fut>(&mut self, spec: RouteSpec, handler: F) -> Handler
    where
        F: Fn(Response) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = crate::error::Result<()>> + Send + 'static,
    {
        self.add(Method::Delete, spec, into_handler(handler))
    }

    /// Register a route for any method. Returns the handler unchanged so it
    /// stays callable outside the registry.
    pub fn add(&mut self, method: Method, spec: RouteSpec, handler: Handler) -> Handler {
        self.registry.add(method, spec, handler)
    }

    /// Number of registered routes.
    pub fn route_count(&self) -> usize {
        self.registry.len()
    }

    /// Dispatch every registered route concurrently and await completion.
    ///
    /// Each route runs as its own task: config merge, before-hooks, request,
    /// after-hooks, then the handler. Failures are isolated per route and
    /// never propagate to the caller; outcomes are observed through logging
    /// and handler side effects.
    pub async fn run(&self) {
        let total = self.registry.len();
        tracing::info!(total, "dispatching requests");
        let start = Instant::now();

        let client = match HttpClient::new(&self.config, self.middleware.clone()) {
            Ok(client) => client,
            Err(e) => {
                tracing::error!(error = %e.sanitized_message(), "failed to build HTTP client");
                return;
            }
        };

        let mut handles = Vec::with_capacity(total);
        for route in self.registry.routes() {
            let client = client.clone();
            let route = route.clone();
            handles.push(tokio::spawn(dispatch_one(client, route)));

            // Cooperative pacing between launches; tasks already launched
            // keep running.
            if !self.config.launch_delay.is_zero() {
                tokio::time::sleep(self.config.launch_delay).await;
            }
        }

        let mut succeeded = 0usize;
        let mut failed = 0usize;
        for outcome in futures::future::join_all(handles).await {
            match outcome {
                Ok(true) => succeeded += 1,
                Ok(false) => failed += 1,
                Err(e) => {
                    failed += 1;
                    tracing::error!(error = %e, "route task panicked");
                }
            }
        }

        tracing::info!(
            succeeded,
            failed,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "run complete"
        );
    }
}

impl Default for FastHttp {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the full pipeline for one route. Returns whether it succeeded; all
/// failure detail has already been logged and sent to `on_error` hooks where
/// applicable.
async fn dispatch_one(client: HttpClient, route: Arc<Route>) -> bool {
    match client.send(&route).await {
        Ok(response) => {
            let status = response.status;
            let latency_ms = response.latency_ms();
            tracing::info!(
                method = %route.method,
                url = %route.url,
                status,
                latency_ms,
                "request completed"
            );
            tracing::debug!(body = %response.text, "response body");

            match (route.handler())(response).await {
                Ok(()) => true,
                Err(e) => {
                    let e = match e {
                        e @ Error::Handler(_) => e,
                        other => Error::handler(other.to_string()),
                    };
                    tracing::error!(
                        method = %route.method,
                        url = %route.url,
                        error = %e.sanitized_message(),
                        "handler failed"
                    );
                    false
                }
            }
        }
        Err(_) => false,
    }
}
