//! Request configuration and the three-layer merge

use crate::routing::Method;
use std::collections::HashMap;
use std::time::Duration;

/// Per-request options: headers, total timeout, redirect behavior.
///
/// A config participates in a three-layer merge (global default, per-method
/// default, per-call override); unset fields defer to less specific layers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestConfig {
    /// Headers to send with the request.
    pub headers: HashMap<String, String>,

    /// Total request timeout. `None` defers to the client default.
    pub timeout: Option<Duration>,

    /// Whether to follow redirects. `None` defers to the client default
    /// (follow).
    pub allow_redirects: Option<bool>,
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set the full header map.
    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    /// Set the total timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the total timeout from seconds.
    pub fn timeout_secs(mut self, secs: f64) -> Self {
        self.timeout = Some(Duration::from_secs_f64(secs));
        self
    }

    /// Set whether to follow redirects.
    pub fn allow_redirects(mut self, allow: bool) -> Self {
        self.allow_redirects = Some(allow);
        self
    }

    /// Apply `over` on top of `self`: headers merge key-by-key with `over`
    /// winning on conflicts, scalar options are replaced wholesale when the
    /// override sets them.
    pub fn layer(mut self, over: &RequestConfig) -> Self {
        for (name, value) in &over.headers {
            self.headers.insert(name.clone(), value.clone());
        }
        if over.timeout.is_some() {
            self.timeout = over.timeout;
        }
        if over.allow_redirects.is_some() {
            self.allow_redirects = over.allow_redirects;
        }
        self
    }

    /// Three-layer merge: global default, then per-method default, then the
    /// per-call override, most specific layer winning.
    pub fn merged(
        global: &RequestConfig,
        per_method: Option<&RequestConfig>,
        per_call: &RequestConfig,
    ) -> Self {
        let mut config = Self::new().layer(global);
        if let Some(method_config) = per_method {
            config = config.layer(method_config);
        }
        config.layer(per_call)
    }
}

/// One optional default [`RequestConfig`] per HTTP method.
#[derive(Debug, Clone, Default)]
pub struct MethodDefaults {
    pub get: Option<RequestConfig>,
    pub post: Option<RequestConfig>,
    pub put: Option<RequestConfig>,
    pub patch: Option<RequestConfig>,
    pub delete: Option<RequestConfig>,
}

impl MethodDefaults {
    pub fn for_method(&self, method: Method) -> Option<&RequestConfig> {
        match method {
            Method::Get => self.get.as_ref(),
            Method::Post => self.post.as_ref(),
            Method::Put => self.put.as_ref(),
            Method::Patch => self.patch.as_ref(),
            Method::Delete => self.delete.as_ref(),
        }
    }
}

/// Application-level configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Verbose logging: lowers the default log filter to `debug`.
    pub debug: bool,

    /// Fixed delay between successive task launches. Paces launches only;
    /// launched tasks run concurrently.
    pub launch_delay: Duration,

    /// User-Agent header value.
    pub user_agent: String,

    /// Global default request config (least specific merge layer).
    pub default_request: RequestConfig,

    /// Per-method default request configs (middle merge layer).
    pub method_defaults: MethodDefaults,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            debug: false,
            launch_delay: Duration::ZERO,
            user_agent: format!("fasthttp/{}", env!("CARGO_PKG_VERSION")),
            default_request: RequestConfig::default(),
            method_defaults: MethodDefaults::default(),
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable debug logging.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set the inter-launch pacing delay.
    pub fn launch_delay(mut self, delay: Duration) -> Self {
        self.launch_delay = delay;
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the global default request config.
    pub fn default_request(mut self, config: RequestConfig) -> Self {
        self.default_request = config;
        self
    }

    /// Set the default config for GET requests.
    pub fn get_request(mut self, config: RequestConfig) -> Self {
        self.method_defaults.get = Some(config);
        self
    }

    /// Set the default config for POST requests.
    pub fn post_request(mut self, config: RequestConfig) -> Self {
        self.method_defaults.post = Some(config);
        self
    }

    /// Set the default config for PUT requests.
    pub fn put_request(mut self, config: RequestConfig) -> Self {
        self.method_defaults.put = Some(config);
        self
    }

    /// Set the default config for PATCH requests.
    pub fn patch_request(mut self, config: RequestConfig) -> Self {
        self.method_defaults.patch = Some(config);
        self
    }

    /// Set the default config for DELETE requests.
    pub fn delete_request(mut self, config: RequestConfig) -> Self {
        self.method_defaults.delete = Some(config);
        self
    }
}
