//! fasthttp: register outgoing HTTP requests, then fire them all at once
//!
//! A thin registration-and-dispatch layer over [`reqwest`]. Routes are
//! registered on a [`FastHttp`] application as (method, URL, static payload,
//! handler) units; [`FastHttp::run`] dispatches all of them concurrently over
//! one shared connection pool, logging timing and outcomes.
//!
//! # Architecture
//!
//! - `FastHttp`: registration surface and concurrent dispatcher
//! - `RouteRegistry` / `Route`: accumulating registry of request descriptors
//! - `RequestConfig`: three-layer config merge (global, per-method, per-call)
//! - `Middleware`: before/after/error hooks run in registration order
//! - `HttpClient`: reqwest-backed transport shared by all route tasks
//! - `Response`: status, body text, headers, lazy JSON accessors

pub mod app;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod response;
pub mod routing;

pub use app::FastHttp;
pub use client::HttpClient;
pub use config::{AppConfig, MethodDefaults, RequestConfig};
pub use error::{Error, ErrorCategory, Result};
pub use middleware::{Middleware, MiddlewareChain};
pub use response::Response;
pub use routing::{into_handler, Handler, Method, Route, RouteRegistry, RouteSpec};
