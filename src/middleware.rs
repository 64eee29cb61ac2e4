//! Middleware hooks around each dispatched request
//!
//! Middleware lets callers hook into the request lifecycle for concerns like
//! auth headers, request logging, or response transformation:
//!
//! ```ignore
//! use fasthttp::{Middleware, RequestConfig, Response, Route};
//!
//! struct AuthMiddleware {
//!     token: String,
//! }
//!
//! #[async_trait::async_trait]
//! impl Middleware for AuthMiddleware {
//!     async fn before_request(
//!         &self,
//!         _route: &Route,
//!         config: RequestConfig,
//!     ) -> fasthttp::Result<RequestConfig> {
//!         Ok(config.header("Authorization", format!("Bearer {}", self.token)))
//!     }
//! }
//! ```

use crate::config::RequestConfig;
use crate::error::{Error, Result};
use crate::response::Response;
use crate::routing::Route;
use async_trait::async_trait;
use std::sync::Arc;

/// Hooks invoked around every dispatched route. All three have no-op
/// defaults; implement only what you need.
///
/// Instances are shared across concurrent route tasks and must not assume
/// exclusive access.
#[async_trait]
pub trait Middleware: Send + Sync {
    /// Called before the request is sent. May replace the config; an error
    /// aborts the request and is routed to `on_error`.
    async fn before_request(&self, _route: &Route, config: RequestConfig) -> Result<RequestConfig> {
        Ok(config)
    }

    /// Called on every received response, whatever the status code. May
    /// replace the response before the handler sees it.
    async fn after_response(
        &self,
        response: Response,
        _route: &Route,
        _config: &RequestConfig,
    ) -> Result<Response> {
        Ok(response)
    }

    /// Called when request construction, transport, or a prior middleware
    /// fails. Observation only: the error still propagates afterwards.
    async fn on_error(&self, _error: &Error, _route: &Route, _config: &RequestConfig) {}
}

/// Ordered middleware chain. Every stage runs hooks in registration order;
/// there is no reverse unwind for the after-stage.
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareChain {
    pub fn new(middlewares: Vec<Arc<dyn Middleware>>) -> Self {
        Self { middlewares }
    }

    pub fn push(&mut self, middleware: Arc<dyn Middleware>) {
        self.middlewares.push(middleware);
    }

    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    /// Thread the config through every `before_request` hook in order.
    pub async fn before_request(
        &self,
        route: &Route,
        mut config: RequestConfig,
    ) -> Result<RequestConfig> {
        for middleware in &self.middlewares {
            config = middleware.before_request(route, config).await?;
        }
        Ok(config)
    }

    /// Thread the response through every `after_response` hook in order.
    pub async fn after_response(
        &self,
        route: &Route,
        mut response: Response,
        config: &RequestConfig,
    ) -> Result<Response> {
        for middleware in &self.middlewares {
            response = middleware.after_response(response, route, config).await?;
        }
        Ok(response)
    }

    /// Let every `on_error` hook observe the failure, in order.
    pub async fn on_error(&self, error: &Error, route: &Route, config: &RequestConfig) {
        for middleware in &self.middlewares {
            middleware.on_error(error, route, config).await;
        }
    }
}

impl std::fmt::Debug for MiddlewareChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiddlewareChain")
            .field("len", &self.middlewares.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{into_handler, Method, RouteSpec};
    use std::collections::HashMap;
    use std::sync::Mutex;

    fn test_route() -> Route {
        Route::new(
            Method::Get,
            RouteSpec::new("https://x.test/a"),
            into_handler(|_response| async { Ok(()) }),
        )
    }

    /// Records every hook invocation under a shared label.
    struct Recording {
        label: &'static str,
        calls: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Middleware for Recording {
        async fn before_request(
            &self,
            _route: &Route,
            config: RequestConfig,
        ) -> Result<RequestConfig> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("{}.before", self.label));
            Ok(config)
        }

        async fn after_response(
            &self,
            response: Response,
            _route: &Route,
            _config: &RequestConfig,
        ) -> Result<Response> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("{}.after", self.label));
            Ok(response)
        }

        async fn on_error(&self, _error: &Error, _route: &Route, _config: &RequestConfig) {
            self.calls
                .lock()
                .unwrap()
                .push(format!("{}.error", self.label));
        }
    }

    fn recording_chain() -> (MiddlewareChain, Arc<Mutex<Vec<String>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let chain = MiddlewareChain::new(vec![
            Arc::new(Recording {
                label: "m1",
                calls: calls.clone(),
            }),
            Arc::new(Recording {
                label: "m2",
                calls: calls.clone(),
            }),
        ]);
        (chain, calls)
    }

    #[tokio::test]
    async fn test_hooks_fire_in_registration_order() {
        let (chain, calls) = recording_chain();
        let route = test_route();
        let config = RequestConfig::new();

        let config = chain.before_request(&route, config).await.unwrap();
        let response = Response::new(200, String::new(), HashMap::new());
        chain.after_response(&route, response, &config).await.unwrap();

        assert_eq!(
            *calls.lock().unwrap(),
            vec!["m1.before", "m2.before", "m1.after", "m2.after"]
        );
    }

    #[tokio::test]
    async fn test_on_error_fires_in_order() {
        let (chain, calls) = recording_chain();
        let route = test_route();
        let error = Error::Connection("refused".into());

        chain.on_error(&error, &route, &RequestConfig::new()).await;

        assert_eq!(*calls.lock().unwrap(), vec!["m1.error", "m2.error"]);
    }

    #[tokio::test]
    async fn test_before_hook_threads_config() {
        struct AddHeader(&'static str, &'static str);

        #[async_trait]
        impl Middleware for AddHeader {
            async fn before_request(
                &self,
                _route: &Route,
                config: RequestConfig,
            ) -> Result<RequestConfig> {
                Ok(config.header(self.0, self.1))
            }
        }

        let chain = MiddlewareChain::new(vec![
            Arc::new(AddHeader("X-One", "1")),
            Arc::new(AddHeader("X-Two", "2")),
        ]);

        let config = chain
            .before_request(&test_route(), RequestConfig::new())
            .await
            .unwrap();

        assert_eq!(config.headers.get("X-One").unwrap(), "1");
        assert_eq!(config.headers.get("X-Two").unwrap(), "2");
    }

    #[tokio::test]
    async fn test_failing_before_hook_short_circuits() {
        struct Failing;

        #[async_trait]
        impl Middleware for Failing {
            async fn before_request(
                &self,
                _route: &Route,
                _config: RequestConfig,
            ) -> Result<RequestConfig> {
                Err(Error::middleware("rejected"))
            }
        }

        let calls = Arc::new(Mutex::new(Vec::new()));
        let chain = MiddlewareChain::new(vec![
            Arc::new(Failing),
            Arc::new(Recording {
                label: "m2",
                calls: calls.clone(),
            }),
        ]);

        let result = chain
            .before_request(&test_route(), RequestConfig::new())
            .await;

        assert!(result.is_err());
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_default_hooks_are_noops() {
        struct Plain;
        impl Middleware for Plain {}

        let chain = MiddlewareChain::new(vec![Arc::new(Plain)]);
        let route = test_route();

        let config = chain
            .before_request(&route, RequestConfig::new().header("A", "1"))
            .await
            .unwrap();
        assert_eq!(config.headers.get("A").unwrap(), "1");

        let response = Response::new(418, "teapot".to_string(), HashMap::new());
        let response = chain.after_response(&route, response, &config).await.unwrap();
        assert_eq!(response.status, 418);
        assert_eq!(response.text, "teapot");
    }
}
