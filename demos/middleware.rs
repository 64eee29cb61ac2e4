//! Middleware hooks: request logging and header injection.
//!
//! Run with: `cargo run --example middleware`

use async_trait::async_trait;
use fasthttp::{FastHttp, Middleware, RequestConfig, Response, Result, Route, RouteSpec};

struct LoggingMiddleware;

#[async_trait]
impl Middleware for LoggingMiddleware {
    async fn before_request(&self, route: &Route, config: RequestConfig) -> Result<RequestConfig> {
        println!("sending {} {}", route.method, route.url);
        Ok(config)
    }

    async fn after_response(
        &self,
        response: Response,
        _route: &Route,
        _config: &RequestConfig,
    ) -> Result<Response> {
        println!("received status {}", response.status);
        Ok(response)
    }
}

struct HeaderMiddleware;

#[async_trait]
impl Middleware for HeaderMiddleware {
    async fn before_request(&self, _route: &Route, config: RequestConfig) -> Result<RequestConfig> {
        Ok(config
            .header("X-Custom-Header", "MyCustomValue")
            .header("X-Request-ID", "12345"))
    }
}

#[tokio::main]
async fn main() {
    let mut app = FastHttp::new();
    app.middleware(LoggingMiddleware);
    app.middleware(HeaderMiddleware);

    app.get(RouteSpec::new("https://httpbin.org/get"), |resp| async move {
        println!("echoed headers: {}", resp.json()?["headers"]);
        Ok(())
    });

    app.run().await;
}
