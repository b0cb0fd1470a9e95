//! Test doubles for the transport, store and renderer seams.
//!
//! Compiled for this crate's tests and, with the `testing` feature, for
//! downstream test crates.

use std::collections::HashMap;
use std::io;
use std::sync::{Mutex, PoisonError};

use reqwest::{Method, StatusCode};

use shopfront_core::{Order, Product, Session};

use crate::api::{ApiRequest, ApiResponse, Transport, TransportError};
use crate::store::{SessionStore, StoreError};
use crate::view::{Placeholder, Region, Renderer};

/// Scripted reply for one endpoint.
#[derive(Debug, Clone)]
pub enum StubReply {
    /// Answer with this status and body.
    Respond(StatusCode, String),
    /// Fail the exchange with a connection error.
    Fail(String),
}

/// A request as seen by [`StubTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: &'static str,
    pub token: Option<String>,
    pub body: Option<serde_json::Value>,
}

/// Transport answering from a fixed table and recording every call.
///
/// Unrouted requests get `404 page not found`.
#[derive(Debug, Default)]
pub struct StubTransport {
    routes: Mutex<HashMap<(Method, &'static str), StubReply>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl StubTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Route `method path` to `status` with `body`.
    #[must_use]
    pub fn respond(
        self,
        method: Method,
        path: &'static str,
        status: u16,
        body: impl Into<String>,
    ) -> Self {
        self.set_reply(method, path, status, body);
        self
    }

    /// Route `method path` to a connection failure.
    #[must_use]
    pub fn fail(self, method: Method, path: &'static str, message: impl Into<String>) -> Self {
        self.set(method, path, StubReply::Fail(message.into()));
        self
    }

    /// Replace the reply for `method path` on a transport already in use.
    ///
    /// # Panics
    ///
    /// Panics if `status` is not a valid HTTP status code.
    pub fn set_reply(&self, method: Method, path: &'static str, status: u16, body: impl Into<String>) {
        #[allow(clippy::expect_used)]
        let status = StatusCode::from_u16(status).expect("valid status code");
        self.set(method, path, StubReply::Respond(status, body.into()));
    }

    fn set(&self, method: Method, path: &'static str, reply: StubReply) {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((method, path), reply);
    }

    /// Every request sent so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// `(method, path)` of every request sent so far.
    #[must_use]
    pub fn call_log(&self) -> Vec<(Method, &'static str)> {
        self.calls()
            .into_iter()
            .map(|call| (call.method, call.path))
            .collect()
    }

    /// Forget recorded calls, keeping the routes.
    pub fn reset_calls(&self) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Transport for StubTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedCall {
                method: request.method.clone(),
                path: request.path,
                token: request.token.as_ref().map(|t| t.expose().to_owned()),
                body: request.body.clone(),
            });

        let reply = self
            .routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(request.method, request.path))
            .cloned();

        match reply {
            Some(StubReply::Respond(status, body)) => Ok(ApiResponse::new(status, body)),
            Some(StubReply::Fail(message)) => Err(TransportError::Connection(message)),
            None => Ok(ApiResponse::new(StatusCode::NOT_FOUND, "404 page not found\n")),
        }
    }
}

/// Store that loads a fixed session and refuses every write.
#[derive(Debug, Default)]
pub struct FailingSessionStore {
    session: Session,
}

impl FailingSessionStore {
    /// A store whose `load` returns `session`.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

impl SessionStore for FailingSessionStore {
    fn load(&self) -> Session {
        self.session.clone()
    }

    fn save(&mut self, _session: &Session) -> Result<(), StoreError> {
        Err(io::Error::other("disk full").into())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        Err(io::Error::other("read-only").into())
    }
}

/// Everything a [`RecordingRenderer`] was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEvent {
    ShowAuth,
    ShowDashboard(String),
    AuthMessage(String),
    Notice(String),
    Placeholder(Region, Placeholder),
    Products(Vec<Product>),
    Orders(Vec<Order>),
}

/// Renderer that records calls instead of drawing.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub events: Vec<RenderEvent>,
}

impl RecordingRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain and return the recorded events.
    pub fn take(&mut self) -> Vec<RenderEvent> {
        std::mem::take(&mut self.events)
    }

    /// Notices (alerts) shown so far.
    #[must_use]
    pub fn notices(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                RenderEvent::Notice(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    /// The last placeholder drawn in `region`, if any.
    #[must_use]
    pub fn last_placeholder(&self, region: Region) -> Option<Placeholder> {
        self.events.iter().rev().find_map(|event| match event {
            RenderEvent::Placeholder(r, placeholder) if *r == region => Some(*placeholder),
            _ => None,
        })
    }
}

impl Renderer for RecordingRenderer {
    fn show_auth(&mut self) {
        self.events.push(RenderEvent::ShowAuth);
    }

    fn show_dashboard(&mut self, display_name: &str) {
        self.events
            .push(RenderEvent::ShowDashboard(display_name.to_owned()));
    }

    fn auth_message(&mut self, message: &str) {
        self.events.push(RenderEvent::AuthMessage(message.to_owned()));
    }

    fn notify(&mut self, message: &str) {
        self.events.push(RenderEvent::Notice(message.to_owned()));
    }

    fn placeholder(&mut self, region: Region, placeholder: Placeholder) {
        self.events.push(RenderEvent::Placeholder(region, placeholder));
    }

    fn render_products(&mut self, products: &[Product]) {
        self.events.push(RenderEvent::Products(products.to_vec()));
    }

    fn render_orders(&mut self, orders: &[Order]) {
        self.events.push(RenderEvent::Orders(orders.to_vec()));
    }
}
