//! Storefront API transport.
//!
//! # Endpoints
//!
//! | Method | Path | Auth |
//! |---|---|---|
//! | POST | `/auth/register` | - |
//! | POST | `/auth/login` | - |
//! | GET | `/products` | - |
//! | POST | `/orders` | raw token |
//! | GET | `/orders` | raw token |
//!
//! The [`Transport`] trait is the seam between the session/view logic and the
//! network. [`HttpTransport`] implements it with `reqwest`; tests script it.
//! A transport only moves bytes: it reports the status and raw body and never
//! interprets either.

mod http;

pub use http::HttpTransport;

use std::future::Future;

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use shopfront_core::SessionToken;

/// Endpoint paths, relative to the configured base URL.
pub mod paths {
    pub const REGISTER: &str = "/auth/register";
    pub const LOGIN: &str = "/auth/login";
    pub const PRODUCTS: &str = "/products";
    pub const ORDERS: &str = "/orders";
}

/// Errors raised before a response status is available.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Connection-level failure reported by a non-`reqwest` transport.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The endpoint path could not be joined onto the base URL.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The request body could not be serialized.
    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A single request to the storefront API.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: &'static str,
    /// Sent verbatim as the `Authorization` header.
    pub token: Option<SessionToken>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    #[must_use]
    pub fn get(path: &'static str) -> Self {
        Self {
            method: Method::GET,
            path,
            token: None,
            body: None,
        }
    }

    /// A `POST` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Encode` if `body` cannot be serialized.
    pub fn post_json<B: Serialize + ?Sized>(
        path: &'static str,
        body: &B,
    ) -> Result<Self, TransportError> {
        Ok(Self {
            method: Method::POST,
            path,
            token: None,
            body: Some(serde_json::to_value(body)?),
        })
    }

    /// Attach the session token.
    #[must_use]
    pub fn with_token(mut self, token: &SessionToken) -> Self {
        self.token = Some(token.clone());
        self
    }
}

/// Status and raw body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Parse the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Performs storefront API requests.
pub trait Transport: Send + Sync {
    /// Send `request` and return whatever status and body came back.
    ///
    /// Non-2xx statuses are `Ok`; only failures to complete the exchange are
    /// errors.
    fn send(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, TransportError>> + Send;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopfront_core::{Credentials, NewOrderItem, ProductId};

    use super::*;

    #[test]
    fn test_post_json_encodes_body() {
        let request = ApiRequest::post_json(paths::LOGIN, &Credentials::new("alice", "pw")).unwrap();
        assert_eq!(request.method, Method::POST);
        assert_eq!(
            request.body,
            Some(serde_json::json!({"username": "alice", "password": "pw"}))
        );
        assert!(request.token.is_none());
    }

    #[test]
    fn test_with_token_attaches_raw_token() {
        let token = SessionToken::new("t1");
        let items = [NewOrderItem::single(ProductId::new("p1"))];
        let request = ApiRequest::post_json(paths::ORDERS, &items[..])
            .unwrap()
            .with_token(&token);
        assert_eq!(request.token.as_ref().map(SessionToken::expose), Some("t1"));
        assert_eq!(
            request.body,
            Some(serde_json::json!([{"productId": "p1", "quantity": 1}]))
        );
    }

    #[test]
    fn test_response_json() {
        let response = ApiResponse::new(StatusCode::OK, "[]");
        assert!(response.is_success());
        let parsed: Vec<serde_json::Value> = response.json().unwrap();
        assert!(parsed.is_empty());

        let failed = ApiResponse::new(StatusCode::UNAUTHORIZED, "Invalid credentials\n");
        assert!(!failed.is_success());
        assert!(failed.json::<serde_json::Value>().is_err());
    }

    #[test]
    fn test_transport_error_display() {
        let err = TransportError::Connection("connection refused".to_string());
        assert_eq!(err.to_string(), "connection failed: connection refused");
    }
}
