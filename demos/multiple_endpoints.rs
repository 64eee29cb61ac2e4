//! Register a handful of routes against httpbin and dispatch them all.
//!
//! Run with: `cargo run --example multiple_endpoints`

use fasthttp::{AppConfig, FastHttp, RouteSpec};
use serde_json::json;

#[tokio::main]
async fn main() {
    let mut app = FastHttp::with_config(AppConfig::new().debug(true));

    app.get(RouteSpec::new("https://httpbin.org/get"), |resp| async move {
        println!("GET -> {}", resp.json()?["url"]);
        Ok(())
    });

    app.post(
        RouteSpec::new("https://httpbin.org/post").json(json!({"name": "widget"})),
        |resp| async move {
            println!("POST -> {}", resp.json()?["json"]);
            Ok(())
        },
    );

    app.put(
        RouteSpec::new("https://httpbin.org/put").json(json!({"name": "gadget"})),
        |resp| async move {
            println!("PUT -> {}", resp.status);
            Ok(())
        },
    );

    app.run().await;
}
