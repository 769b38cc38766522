//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! The core builds `HttpRequest` values and consumes `HttpResponse` values
//! but never opens a socket. The mobile host owns the network stack, executes
//! each request, and reports back either a response or a `TransportError`.
//!
//! All fields use owned types (`String`, `Vec`) so values can cross the FFI
//! boundary without lifetime concerns.

use std::fmt;

use crate::error::ApiError;

/// HTTP method for a request. The listings API is read-only from the feed's
/// point of view, so only `GET` is ever produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => f.write_str("GET"),
        }
    }
}

/// An HTTP request described as plain data.
///
/// `url` is absolute and already carries the encoded query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    /// Look up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data, constructed by the host.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Failure reported by the host when no HTTP response was obtained at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// DNS failure, refused connection, no connectivity.
    Unreachable(String),
    Timeout,
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Unreachable(reason) => ApiError::NetworkUnreachable(reason),
            TransportError::Timeout => ApiError::Timeout,
        }
    }
}

/// What the host hands back for a ticket: a response or a transport failure.
pub type FetchOutcome = Result<HttpResponse, TransportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let req = HttpRequest {
            method: HttpMethod::Get,
            url: "http://localhost/api/properties".to_string(),
            headers: vec![("Authorization".to_string(), "Bearer t".to_string())],
        };
        assert_eq!(req.header("authorization"), Some("Bearer t"));
        assert_eq!(req.header("accept"), None);
    }

    #[test]
    fn transport_errors_map_to_api_errors() {
        let err: ApiError = TransportError::Timeout.into();
        assert!(matches!(err, ApiError::Timeout));
        let err: ApiError = TransportError::Unreachable("offline".into()).into();
        assert!(matches!(err, ApiError::NetworkUnreachable(ref r) if r == "offline"));
    }
}
