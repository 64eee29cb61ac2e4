//! HTTP client: one shared connection pool per dispatch run

use crate::config::{AppConfig, RequestConfig};
use crate::error::{Error, Result};
use crate::middleware::MiddlewareChain;
use crate::response::{self, Response};
use crate::routing::Route;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Client-level default when no merge layer sets a timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Redirect hop limit when redirects are followed.
const MAX_REDIRECTS: usize = 10;

/// Async HTTP client shared by all route tasks of one dispatch run.
///
/// Wraps two reqwest clients over one logical pool: reqwest fixes the
/// redirect policy per client, so redirect-following and non-following
/// requests are served by separate clients chosen from the merged config.
#[derive(Clone)]
pub struct HttpClient {
    inner: Arc<HttpClientInner>,
}

struct HttpClientInner {
    client: reqwest::Client,
    no_redirect_client: reqwest::Client,
    defaults: RequestConfig,
    method_defaults: crate::config::MethodDefaults,
    middleware: MiddlewareChain,
}

impl HttpClient {
    /// Build a client from the application config and middleware chain.
    pub fn new(config: &AppConfig, middleware: MiddlewareChain) -> Result<Self> {
        let builder = || {
            reqwest::Client::builder()
                .timeout(DEFAULT_TIMEOUT)
                .user_agent(&config.user_agent)
                .gzip(true)
                .brotli(true)
        };

        let client = builder()
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;
        let no_redirect_client = builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            inner: Arc::new(HttpClientInner {
                client,
                no_redirect_client,
                defaults: config.default_request.clone(),
                method_defaults: config.method_defaults.clone(),
                middleware,
            }),
        })
    }

    /// Effective config for a route: global defaults, per-method defaults,
    /// then the route's own override.
    pub fn effective_config(&self, route: &Route) -> RequestConfig {
        RequestConfig::merged(
            &self.inner.defaults,
            self.inner.method_defaults.for_method(route.method),
            &route.config,
        )
    }

    /// Send a single request for a route.
    ///
    /// Runs the config merge and the middleware before-hooks, issues the
    /// request, and runs the after-hooks on any received response (any
    /// status code). Errors are logged with route context and routed through
    /// the `on_error` hooks before being returned.
    pub async fn send(&self, route: &Route) -> Result<Response> {
        let merged = self.effective_config(route);

        let config = match self
            .inner
            .middleware
            .before_request(route, merged.clone())
            .await
        {
            Ok(config) => config,
            Err(e) => return Err(self.fail(e, route, &merged).await),
        };

        tracing::debug!(
            method = %route.method,
            url = %route.url,
            headers = ?config.headers,
            "sending request"
        );

        let start = Instant::now();
        let response = match self.issue(route, &config).await {
            Ok(response) => response,
            Err(e) => return Err(self.fail(e, route, &config).await),
        };
        let latency_ms = start.elapsed().as_millis() as u64;

        let response = match response::from_reqwest(response, route, latency_ms).await {
            Ok(response) => response,
            Err(e) => return Err(self.fail(e, route, &config).await),
        };

        match self
            .inner
            .middleware
            .after_response(route, response, &config)
            .await
        {
            Ok(response) => Ok(response),
            Err(e) => Err(self.fail(e, route, &config).await),
        }
    }

    async fn issue(&self, route: &Route, config: &RequestConfig) -> Result<reqwest::Response> {
        let url = Url::parse(&route.url).map_err(|source| Error::InvalidUrl {
            url: route.url.clone(),
            source,
        })?;

        let client = if config.allow_redirects == Some(false) {
            &self.inner.no_redirect_client
        } else {
            &self.inner.client
        };

        let mut request = client.request(route.method.to_reqwest(), url);
        if let Some(params) = &route.params {
            request = request.query(params);
        }
        if let Some(json) = &route.json {
            request = request.json(json);
        }
        if let Some(form) = &route.form {
            request = request.form(form);
        }
        for (name, value) in &config.headers {
            request = request.header(name, value);
        }
        if let Some(timeout) = config.timeout {
            request = request.timeout(timeout);
        }

        Ok(request.send().await?)
    }

    /// Log a failure with route context and let `on_error` hooks observe it.
    async fn fail(&self, error: Error, route: &Route, config: &RequestConfig) -> Error {
        tracing::error!(
            method = %route.method,
            url = %route.url,
            category = error.category().as_str(),
            error = %error.sanitized_message(),
            "request failed"
        );
        self.inner.middleware.on_error(&error, route, config).await;
        error
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("defaults", &self.inner.defaults)
            .field("middleware", &self.inner.middleware)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{into_handler, Method, RouteSpec};

    fn route(method: Method, spec: RouteSpec) -> Route {
        Route::new(method, spec, into_handler(|_response| async { Ok(()) }))
    }

    #[test]
    fn test_client_creation() {
        let client = HttpClient::new(&AppConfig::default(), MiddlewareChain::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_effective_config_layers() {
        let config = AppConfig::new()
            .default_request(RequestConfig::new().header("A", "1").header("B", "2"))
            .get_request(RequestConfig::new().header("B", "3"));
        let client = HttpClient::new(&config, MiddlewareChain::default()).unwrap();

        let r = route(
            Method::Get,
            RouteSpec::new("https://x.test/a")
                .config(RequestConfig::new().header("C", "4")),
        );
        let effective = client.effective_config(&r);

        assert_eq!(effective.headers.get("A").unwrap(), "1");
        assert_eq!(effective.headers.get("B").unwrap(), "3");
        assert_eq!(effective.headers.get("C").unwrap(), "4");
    }

    #[tokio::test]
    async fn test_invalid_url_rejected() {
        let client = HttpClient::new(&AppConfig::default(), MiddlewareChain::default()).unwrap();
        let r = route(Method::Get, RouteSpec::new("not a url"));

        let err = client.send(&r).await.unwrap_err();
        assert!(matches!(err, Error::InvalidUrl { .. }));
    }
}
