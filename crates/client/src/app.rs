//! The storefront application.
//!
//! [`Storefront`] ties the session controller, the view synchronizer and a
//! renderer together. Every public method is one user command: it issues its
//! request(s), updates the renderer, and returns an outcome value. No command
//! failure is fatal; the app stays usable afterwards.

use tracing::{debug, info, instrument, warn};

use shopfront_core::{Credentials, NewOrderItem, Order, Product, ProductId, Session};

use crate::api::{ApiRequest, ApiResponse, Transport, paths};
use crate::error::{ClientError, Result};
use crate::session::{AuthOutcome, SessionController};
use crate::store::{SessionStore, StoreError};
use crate::view::{Load, Placeholder, Region, Renderer, ViewState};

/// Result of a `place_order` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderOutcome {
    /// The order was accepted; both lists were reloaded.
    Placed,
    /// No session; nothing was sent.
    LoginRequired,
    /// The service refused the order. Carries the raw response body.
    Rejected(String),
    /// The exchange did not complete.
    Error(String),
}

impl OrderOutcome {
    /// Notice shown to the user.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Placed => "Order placed!".to_string(),
            Self::LoginRequired => "Please login first".to_string(),
            Self::Rejected(body) => format!("Failed to order: {body}"),
            Self::Error(detail) => format!("Error: {detail}"),
        }
    }
}

/// Storefront client application.
pub struct Storefront<T, S, R> {
    controller: SessionController<T, S>,
    renderer: R,
}

impl<T: Transport, S: SessionStore, R: Renderer> Storefront<T, S, R> {
    /// Create the app with the session restored from `store`.
    ///
    /// Call [`Storefront::start`] to draw the initial view.
    #[must_use]
    pub fn new(transport: T, store: S, renderer: R) -> Self {
        Self {
            controller: SessionController::new(transport, store),
            renderer,
        }
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        self.controller.session()
    }

    #[must_use]
    pub const fn controller(&self) -> &SessionController<T, S> {
        &self.controller
    }

    #[must_use]
    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    pub const fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Draw the initial view for the restored session.
    pub async fn start(&mut self) -> ViewState {
        self.sync_view().await
    }

    /// Re-derive the view from the session and run its loads.
    pub async fn sync_view(&mut self) -> ViewState {
        let view = ViewState::derive(self.controller.session());
        debug!(?view, "Synchronizing view");
        view.apply(&mut self.renderer);

        for load in view.loads() {
            // Failures are already drawn as placeholders
            match load {
                Load::Products => {
                    self.load_products().await.ok();
                }
                Load::Orders => {
                    self.load_orders().await.ok();
                }
            }
        }

        view
    }

    /// Create an account. Does not log in.
    pub async fn register(&mut self, credentials: &Credentials) -> AuthOutcome {
        let outcome = self.controller.register(credentials).await;
        if let Some(message) = outcome.message() {
            self.renderer.auth_message(&message);
        }
        outcome
    }

    /// Log in and, on success, switch to the dashboard.
    pub async fn login(&mut self, credentials: &Credentials) -> AuthOutcome {
        let outcome = self.controller.login(credentials).await;
        match outcome.message() {
            None => {
                self.sync_view().await;
            }
            Some(message) => self.renderer.auth_message(&message),
        }
        outcome
    }

    /// Log out and switch back to the auth view.
    ///
    /// The view is re-derived even if clearing the store fails.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the persisted session could not be removed.
    pub async fn logout(&mut self) -> std::result::Result<(), StoreError> {
        let result = self.controller.logout();
        if let Err(e) = &result {
            warn!(error = %e, "Failed to clear stored session");
        }
        self.sync_view().await;
        result
    }

    /// Fetch and draw the product list.
    ///
    /// # Errors
    ///
    /// Returns the failure after drawing the error placeholder.
    #[instrument(skip(self))]
    pub async fn load_products(&mut self) -> Result<Vec<Product>> {
        self.renderer
            .placeholder(Region::Products, Placeholder::Loading);

        match self.fetch_products().await {
            Ok(products) => {
                debug!(count = products.len(), "Products loaded");
                self.renderer.render_products(&products);
                Ok(products)
            }
            Err(e) => {
                warn!(error = %e, "Failed to load products");
                self.renderer
                    .placeholder(Region::Products, Placeholder::Error);
                Err(e)
            }
        }
    }

    /// Fetch and draw the current user's orders.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotLoggedIn` without sending anything when there
    /// is no session; otherwise returns the failure after drawing the error
    /// placeholder.
    #[instrument(skip(self))]
    pub async fn load_orders(&mut self) -> Result<Vec<Order>> {
        self.renderer.placeholder(Region::Orders, Placeholder::Loading);

        match self.fetch_orders().await {
            Ok(orders) if orders.is_empty() => {
                debug!("No orders");
                self.renderer
                    .placeholder(Region::Orders, Placeholder::NoOrders);
                Ok(orders)
            }
            Ok(orders) => {
                debug!(count = orders.len(), "Orders loaded");
                self.renderer.render_orders(&orders);
                Ok(orders)
            }
            Err(e) => {
                warn!(error = %e, "Failed to load orders");
                self.renderer.placeholder(Region::Orders, Placeholder::Error);
                Err(e)
            }
        }
    }

    /// Order one unit of `product_id`.
    ///
    /// On success the order list and then the product list are reloaded once
    /// each, since stock has changed.
    #[instrument(skip(self, product_id), fields(product_id = %product_id))]
    pub async fn place_order(&mut self, product_id: &ProductId) -> OrderOutcome {
        let outcome = self.submit_order(product_id).await;
        self.renderer.notify(&outcome.message());

        if outcome == OrderOutcome::Placed {
            info!("Order placed");
            // Failures are already drawn as placeholders
            self.load_orders().await.ok();
            self.load_products().await.ok();
        }

        outcome
    }

    async fn submit_order(&self, product_id: &ProductId) -> OrderOutcome {
        let Some(token) = self.controller.session().token() else {
            debug!("Order attempted without a session");
            return OrderOutcome::LoginRequired;
        };

        let items = [NewOrderItem::single(product_id.clone())];
        let request = match ApiRequest::post_json(paths::ORDERS, &items) {
            Ok(request) => request.with_token(token),
            Err(e) => return OrderOutcome::Error(e.to_string()),
        };

        match self.controller.transport().send(request).await {
            Ok(response) if response.is_success() => OrderOutcome::Placed,
            Ok(response) => {
                warn!(status = %response.status, "Order rejected");
                OrderOutcome::Rejected(response.body)
            }
            Err(e) => {
                warn!(error = %e, "Order request failed");
                OrderOutcome::Error(e.to_string())
            }
        }
    }

    async fn fetch_products(&self) -> Result<Vec<Product>> {
        let request = ApiRequest::get(paths::PRODUCTS);
        let response = self.controller.transport().send(request).await?;
        Ok(require_success(response)?.json()?)
    }

    async fn fetch_orders(&self) -> Result<Vec<Order>> {
        let token = self
            .controller
            .session()
            .token()
            .ok_or(ClientError::NotLoggedIn)?;

        let request = ApiRequest::get(paths::ORDERS).with_token(token);
        let response = self.controller.transport().send(request).await?;

        // `null` is treated as an empty list
        let orders: Option<Vec<Order>> = require_success(response)?.json()?;
        Ok(orders.unwrap_or_default())
    }
}

fn require_success(response: ApiResponse) -> Result<ApiResponse> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(ClientError::Status {
            status: response.status,
            body: response.body,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use reqwest::Method;
    use shopfront_core::{SessionToken, UserProfile};

    use super::*;
    use crate::store::MemorySessionStore;
    use crate::testing::{FailingSessionStore, RecordingRenderer, RenderEvent, StubTransport};

    const PRODUCTS: &str = r#"[
        {"id": "p1", "name": "Pineapple", "description": "Sweet", "price": 3.5, "stock": 10},
        {"id": "p2", "name": "Mango", "description": "Ripe", "price": 2, "stock": 0}
    ]"#;

    const ORDERS: &str = r#"[
        {"id": "order-1", "userId": "user-1", "status": "Confirmed",
         "items": [{"productId": "p1", "quantity": 1}],
         "createdAt": "2026-01-15T10:30:00Z"}
    ]"#;

    const LOGIN_OK: &str = r#"{"token":"t1","user":{"id":"user-1","username":"user1"}}"#;

    type TestApp = Storefront<StubTransport, MemorySessionStore, RecordingRenderer>;

    fn anonymous_app(transport: StubTransport) -> TestApp {
        Storefront::new(transport, MemorySessionStore::new(), RecordingRenderer::new())
    }

    fn logged_in_app(transport: StubTransport) -> TestApp {
        let session = Session::authenticated(SessionToken::new("t1"), UserProfile::new("user1"));
        let store = MemorySessionStore::with_session(&session).unwrap();
        Storefront::new(transport, store, RecordingRenderer::new())
    }

    fn catalogue() -> StubTransport {
        StubTransport::new()
            .respond(Method::GET, paths::PRODUCTS, 200, PRODUCTS)
            .respond(Method::GET, paths::ORDERS, 200, ORDERS)
    }

    #[tokio::test]
    async fn test_start_anonymous_shows_auth_and_sends_nothing() {
        let mut app = anonymous_app(catalogue());

        let view = app.start().await;

        assert_eq!(view, ViewState::SignedOut);
        assert_eq!(app.renderer().events, vec![RenderEvent::ShowAuth]);
        assert!(app.controller().transport().calls().is_empty());
    }

    #[tokio::test]
    async fn test_start_restored_session_loads_both_lists() {
        let mut app = logged_in_app(catalogue());

        app.start().await;

        assert_eq!(
            app.controller().transport().call_log(),
            vec![(Method::GET, paths::PRODUCTS), (Method::GET, paths::ORDERS)]
        );
        let events = &app.renderer().events;
        assert_eq!(events[0], RenderEvent::ShowDashboard("user1".to_string()));
        assert!(matches!(&events[2], RenderEvent::Products(p) if p.len() == 2));
        assert!(matches!(&events[4], RenderEvent::Orders(o) if o.len() == 1));
    }

    #[tokio::test]
    async fn test_login_switches_to_dashboard_and_loads() {
        let transport = catalogue().respond(Method::POST, paths::LOGIN, 200, LOGIN_OK);
        let mut app = anonymous_app(transport);
        app.start().await;

        let outcome = app.login(&Credentials::new("user1", "pass1")).await;

        assert_eq!(outcome, AuthOutcome::LoggedIn);
        assert_eq!(app.session().token().map(SessionToken::expose), Some("t1"));
        assert_eq!(
            app.controller().transport().call_log(),
            vec![
                (Method::POST, paths::LOGIN),
                (Method::GET, paths::PRODUCTS),
                (Method::GET, paths::ORDERS),
            ]
        );
        assert!(
            app.renderer()
                .events
                .contains(&RenderEvent::ShowDashboard("user1".to_string()))
        );

        // Orders are fetched with the raw token, no scheme prefix
        let orders_call = &app.controller().transport().calls()[2];
        assert_eq!(orders_call.token.as_deref(), Some("t1"));
    }

    #[tokio::test]
    async fn test_login_failure_shows_message_and_stays_signed_out() {
        let transport = catalogue().respond(Method::POST, paths::LOGIN, 401, "Invalid credentials\n");
        let mut app = anonymous_app(transport);

        let outcome = app.login(&Credentials::new("user1", "wrong")).await;

        assert_eq!(outcome, AuthOutcome::LoginFailed);
        assert_eq!(
            app.renderer().events,
            vec![RenderEvent::AuthMessage("Login failed.".to_string())]
        );
        assert!(!app.session().is_authenticated());
        assert!(app.controller().store().is_empty());
    }

    #[tokio::test]
    async fn test_register_reports_without_logging_in() {
        let transport = StubTransport::new().respond(Method::POST, paths::REGISTER, 201, "{}");
        let mut app = anonymous_app(transport);

        app.register(&Credentials::new("user1", "pass1")).await;

        assert_eq!(
            app.renderer().events,
            vec![RenderEvent::AuthMessage("Registered! Please login.".to_string())]
        );
        assert!(!app.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_returns_to_auth_view() {
        let mut app = logged_in_app(catalogue());
        app.start().await;
        app.renderer_mut().take();

        app.logout().await.unwrap();
        app.logout().await.unwrap();

        assert!(!app.session().is_authenticated());
        assert!(app.controller().store().is_empty());
        assert_eq!(
            app.renderer().events,
            vec![RenderEvent::ShowAuth, RenderEvent::ShowAuth]
        );
    }

    #[tokio::test]
    async fn test_logout_shows_auth_even_when_store_cannot_be_cleared() {
        let session = Session::authenticated(SessionToken::new("t1"), UserProfile::new("user1"));
        let store = FailingSessionStore::new(session);
        let mut app = Storefront::new(catalogue(), store, RecordingRenderer::new());

        let result = app.logout().await;

        assert!(matches!(result, Err(StoreError::Io(_))));
        assert!(!app.session().is_authenticated());
        assert_eq!(app.renderer().events, vec![RenderEvent::ShowAuth]);
        assert!(app.controller().transport().calls().is_empty());
    }

    #[tokio::test]
    async fn test_login_stays_on_auth_view_when_session_cannot_be_saved() {
        let transport = catalogue().respond(Method::POST, paths::LOGIN, 200, LOGIN_OK);
        let store = FailingSessionStore::new(Session::anonymous());
        let mut app = Storefront::new(transport, store, RecordingRenderer::new());

        let outcome = app.login(&Credentials::new("user1", "pass1")).await;

        assert!(matches!(outcome, AuthOutcome::Error(_)));
        assert!(!app.session().is_authenticated());
        assert_eq!(
            app.renderer().events,
            vec![RenderEvent::AuthMessage(
                "Error: session storage I/O error: disk full".to_string()
            )]
        );
        assert_eq!(
            app.controller().transport().call_log(),
            vec![(Method::POST, paths::LOGIN)]
        );
    }

    #[tokio::test]
    async fn test_load_orders_empty_shows_no_orders_placeholder() {
        let transport = StubTransport::new().respond(Method::GET, paths::ORDERS, 200, "[]");
        let mut app = logged_in_app(transport);

        let orders = app.load_orders().await.unwrap();

        assert!(orders.is_empty());
        assert_eq!(
            app.renderer().last_placeholder(Region::Orders),
            Some(Placeholder::NoOrders)
        );
        assert!(
            !app.renderer()
                .events
                .iter()
                .any(|e| matches!(e, RenderEvent::Orders(_)))
        );
    }

    #[tokio::test]
    async fn test_load_orders_null_shows_no_orders_placeholder() {
        let transport = StubTransport::new().respond(Method::GET, paths::ORDERS, 200, "null");
        let mut app = logged_in_app(transport);

        app.load_orders().await.unwrap();

        assert_eq!(
            app.renderer().last_placeholder(Region::Orders),
            Some(Placeholder::NoOrders)
        );
    }

    #[tokio::test]
    async fn test_load_orders_failure_shows_error_placeholder() {
        let transport = StubTransport::new().respond(Method::GET, paths::ORDERS, 401, "Unauthorized\n");
        let mut app = logged_in_app(transport);

        let result = app.load_orders().await;

        assert!(matches!(result, Err(ClientError::Status { .. })));
        assert_eq!(
            app.renderer().events,
            vec![
                RenderEvent::Placeholder(Region::Orders, Placeholder::Loading),
                RenderEvent::Placeholder(Region::Orders, Placeholder::Error),
            ]
        );
    }

    #[tokio::test]
    async fn test_load_orders_without_session_sends_nothing() {
        let mut app = anonymous_app(catalogue());

        let result = app.load_orders().await;

        assert!(matches!(result, Err(ClientError::NotLoggedIn)));
        assert!(app.controller().transport().calls().is_empty());
        assert_eq!(
            app.renderer().last_placeholder(Region::Orders),
            Some(Placeholder::Error)
        );
    }

    #[tokio::test]
    async fn test_load_products_is_unauthenticated() {
        let mut app = logged_in_app(catalogue());

        let products = app.load_products().await.unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(products[1].stock, 0);
        assert!(app.controller().transport().calls()[0].token.is_none());
    }

    #[tokio::test]
    async fn test_load_products_transport_failure_replaces_list() {
        let transport = StubTransport::new().fail(Method::GET, paths::PRODUCTS, "connection reset");
        let mut app = anonymous_app(transport);

        let result = app.load_products().await;

        assert!(matches!(result, Err(ClientError::Transport(_))));
        assert_eq!(
            app.renderer().last_placeholder(Region::Products),
            Some(Placeholder::Error)
        );
    }

    #[tokio::test]
    async fn test_load_products_malformed_body_is_error() {
        let transport = StubTransport::new().respond(Method::GET, paths::PRODUCTS, 200, "{}");
        let mut app = anonymous_app(transport);

        let result = app.load_products().await;

        assert!(matches!(result, Err(ClientError::Decode(_))));
        assert_eq!(
            app.renderer().last_placeholder(Region::Products),
            Some(Placeholder::Error)
        );
    }

    #[tokio::test]
    async fn test_place_order_anonymous_prompts_login_without_request() {
        let mut app = anonymous_app(catalogue());

        let outcome = app.place_order(&ProductId::new("p1")).await;

        assert_eq!(outcome, OrderOutcome::LoginRequired);
        assert!(app.controller().transport().calls().is_empty());
        assert_eq!(app.renderer().notices(), vec!["Please login first"]);
    }

    #[tokio::test]
    async fn test_place_order_success_reloads_orders_then_products_once() {
        let transport = catalogue().respond(Method::POST, paths::ORDERS, 201, "{}");
        let mut app = logged_in_app(transport);

        let outcome = app.place_order(&ProductId::new("p1")).await;

        assert_eq!(outcome, OrderOutcome::Placed);
        assert_eq!(
            app.controller().transport().call_log(),
            vec![
                (Method::POST, paths::ORDERS),
                (Method::GET, paths::ORDERS),
                (Method::GET, paths::PRODUCTS),
            ]
        );

        let order_call = &app.controller().transport().calls()[0];
        assert_eq!(order_call.token.as_deref(), Some("t1"));
        assert_eq!(
            order_call.body,
            Some(serde_json::json!([{"productId": "p1", "quantity": 1}]))
        );
        assert_eq!(app.renderer().notices(), vec!["Order placed!"]);
    }

    #[tokio::test]
    async fn test_place_order_rejected_surfaces_raw_body() {
        let transport = catalogue().respond(
            Method::POST,
            paths::ORDERS,
            409,
            "Failed to process item p2: inventory check failed with status: 409\n",
        );
        let mut app = logged_in_app(transport);

        let outcome = app.place_order(&ProductId::new("p2")).await;

        assert!(matches!(outcome, OrderOutcome::Rejected(_)));
        assert_eq!(
            app.renderer().notices(),
            vec!["Failed to order: Failed to process item p2: inventory check failed with status: 409\n"]
        );
        // No reloads after a failed order
        assert_eq!(app.controller().transport().calls().len(), 1);
    }

    #[tokio::test]
    async fn test_place_order_transport_error() {
        let transport = StubTransport::new().fail(Method::POST, paths::ORDERS, "timed out");
        let mut app = logged_in_app(transport);

        let outcome = app.place_order(&ProductId::new("p1")).await;

        assert_eq!(outcome.message(), "Error: connection failed: timed out");
        assert!(app.session().is_authenticated());
    }
}
