//! HTTP response surface exposed to handlers and middleware

use crate::error::{Error, Result};
use crate::routing::{Method, Route};
use std::collections::HashMap;
use std::time::Duration;

/// HTTP response handed to after-hooks and route handlers.
///
/// Carries the status, raw body text, response headers, and the context of
/// the originating request. Middleware may replace the body or headers
/// before the handler sees them.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,

    /// Raw response body.
    pub text: String,

    /// Response headers.
    pub headers: HashMap<String, String>,

    method: Option<Method>,
    url: Option<String>,
    latency_ms: u64,
}

impl Response {
    /// Create a response without request context (useful for tests and for
    /// exercising handlers standalone).
    pub fn new(status: u16, text: String, headers: HashMap<String, String>) -> Self {
        Self {
            status,
            text,
            headers,
            method: None,
            url: None,
            latency_ms: 0,
        }
    }

    /// Method of the originating request, when known.
    pub fn method(&self) -> Option<Method> {
        self.method
    }

    /// URL of the originating request, when known.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Request latency.
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    pub fn latency_ms(&self) -> u64 {
        self.latency_ms
    }

    /// Check if status is success (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check if status is redirect (3xx)
    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status)
    }

    /// Check if status is client error (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Check if status is server error (5xx)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    /// Parse the body as JSON. Fails with a decode error on invalid JSON.
    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.text)?)
    }

    /// Parse the body as JSON and deserialize into `T`.
    pub fn json_as<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.text)?)
    }

    /// Get a header value (case-insensitive lookup).
    pub fn header(&self, name: &str) -> Option<&str> {
        let name_lower = name.to_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| k.to_lowercase() == name_lower)
            .map(|(_, v)| v.as_str())
    }

    /// Get content type
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Check if content type is JSON
    pub fn is_json(&self) -> bool {
        self.content_type()
            .map(|ct| ct.contains("application/json"))
            .unwrap_or(false)
    }

    /// Turn a non-2xx response into [`Error::BadStatus`], for handlers that
    /// want strict status checking.
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::BadStatus {
                status: self.status,
                url: self.url.unwrap_or_default(),
                body: self.text,
            })
        }
    }
}

/// Convert a reqwest response into a [`Response`], reading the full body.
pub(crate) async fn from_reqwest(
    response: reqwest::Response,
    route: &Route,
    latency_ms: u64,
) -> Result<Response> {
    let status = response.status().as_u16();
    let url = response.url().to_string();

    let mut headers = HashMap::new();
    for (name, value) in response.headers().iter() {
        if let Ok(v) = value.to_str() {
            headers.insert(name.to_string(), v.to_string());
        }
    }

    let text = response.text().await?;

    Ok(Response {
        status,
        text,
        headers,
        method: Some(route.method),
        url: Some(url),
        latency_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_with_body(body: &str) -> Response {
        Response::new(200, body.to_string(), HashMap::new())
    }

    #[test]
    fn test_status_checks() {
        assert!(Response::new(200, String::new(), HashMap::new()).is_success());
        assert!(Response::new(301, String::new(), HashMap::new()).is_redirect());
        assert!(Response::new(404, String::new(), HashMap::new()).is_client_error());
        assert!(Response::new(500, String::new(), HashMap::new()).is_server_error());
        assert!(!Response::new(404, String::new(), HashMap::new()).is_success());
    }

    #[test]
    fn test_json_valid() {
        let json = response_with_body(r#"{"a":1}"#).json().unwrap();
        assert_eq!(json["a"], 1);
    }

    #[test]
    fn test_json_invalid() {
        let err = response_with_body("not json").json().unwrap_err();
        assert_eq!(err.category(), crate::error::ErrorCategory::Decode);
    }

    #[test]
    fn test_json_as_typed() {
        #[derive(serde::Deserialize)]
        struct Item {
            name: String,
            count: u32,
        }

        let item: Item = response_with_body(r#"{"name":"widget","count":3}"#)
            .json_as()
            .unwrap();
        assert_eq!(item.name, "widget");
        assert_eq!(item.count, 3);
    }

    #[test]
    fn test_header_case_insensitive() {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        let response = Response::new(200, String::new(), headers);

        assert_eq!(response.header("content-type"), Some("application/json"));
        assert_eq!(response.header("CONTENT-TYPE"), Some("application/json"));
        assert!(response.is_json());
    }

    #[test]
    fn test_error_for_status() {
        let ok = Response::new(204, String::new(), HashMap::new());
        assert!(ok.error_for_status().is_ok());

        let err = Response::new(503, "unavailable".to_string(), HashMap::new())
            .error_for_status()
            .unwrap_err();
        match err {
            Error::BadStatus { status, body, .. } => {
                assert_eq!(status, 503);
                assert_eq!(body, "unavailable");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
