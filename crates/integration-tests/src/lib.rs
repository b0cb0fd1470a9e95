//! Integration test support for Shopfront.
//!
//! [`FakeGateway`] is an in-process stand-in for the API gateway and the
//! auth, product and order services behind it. It binds an ephemeral port
//! on localhost, so tests run without any external service.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```
//!
//! # Behaviour
//!
//! - `POST /auth/register` - 201, or 409 `Username already exists`
//! - `POST /auth/login` - `{token, user}`, or 401 `Invalid credentials`
//! - `GET /products` - the catalogue, seeded with two products
//! - `GET /orders`, `POST /orders` - require the raw token in
//!   `Authorization`; 401 `Missing Authorization header` without it
//! - `POST /orders` - 400 `Cart is empty`, or 409 when stock runs out
//!
//! Error bodies are plain text ending in a newline.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use shopfront_client::ApiConfig;
use shopfront_core::{Order, OrderId, OrderItem, Price, Product, ProductId, UserId};

#[derive(Debug, Clone)]
struct Account {
    id: UserId,
    password: String,
}

#[derive(Debug, Default)]
struct GatewayState {
    accounts: HashMap<String, Account>,
    /// Issued token -> username.
    tokens: HashMap<String, String>,
    products: Vec<Product>,
    orders: Vec<Order>,
    next_id: u64,
}

impl GatewayState {
    fn seeded() -> Self {
        Self {
            products: vec![
                seed_product("1", "Laptop", "High performance laptop", 1200, 10),
                seed_product("2", "Phone", "Smartphone with good camera", 800, 20),
            ],
            ..Self::default()
        }
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn user_for(&self, headers: &HeaderMap) -> Result<UserId, Response> {
        let Some(token) = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
        else {
            return Err(plain(StatusCode::UNAUTHORIZED, "Missing Authorization header"));
        };

        self.tokens
            .get(token)
            .and_then(|username| self.accounts.get(username))
            .map(|account| account.id.clone())
            .ok_or_else(|| plain(StatusCode::UNAUTHORIZED, "Unauthorized"))
    }
}

fn seed_product(id: &str, name: &str, description: &str, price: i64, stock: i64) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        price: Price::new(Decimal::from(price)),
        description: description.to_string(),
        stock,
    }
}

type SharedState = Arc<Mutex<GatewayState>>;

fn lock(state: &SharedState) -> MutexGuard<'_, GatewayState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Error body the way the services write it: the message plus a newline.
fn plain(status: StatusCode, message: impl AsRef<str>) -> Response {
    (status, format!("{}\n", message.as_ref())).into_response()
}

#[derive(Debug, Deserialize)]
struct CredentialsBody {
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderItemBody {
    product_id: ProductId,
    quantity: i64,
}

async fn register(State(state): State<SharedState>, Json(body): Json<CredentialsBody>) -> Response {
    let mut state = lock(&state);
    if state.accounts.contains_key(&body.username) {
        return plain(StatusCode::CONFLICT, "Username already exists");
    }

    let id = UserId::new(state.next_id("user"));
    state.accounts.insert(
        body.username.clone(),
        Account {
            id: id.clone(),
            password: body.password,
        },
    );

    (
        StatusCode::CREATED,
        Json(json!({ "id": id, "username": body.username })),
    )
        .into_response()
}

async fn login(State(state): State<SharedState>, Json(body): Json<CredentialsBody>) -> Response {
    let mut state = lock(&state);
    let account = match state.accounts.get(&body.username) {
        Some(account) if account.password == body.password => account.clone(),
        _ => return plain(StatusCode::UNAUTHORIZED, "Invalid credentials"),
    };

    let token = state.next_id("token");
    state.tokens.insert(token.clone(), body.username.clone());

    // The auth service echoes the whole user record back
    Json(json!({
        "token": token,
        "user": {
            "id": account.id,
            "username": body.username,
            "password": account.password,
        },
    }))
    .into_response()
}

async fn list_products(State(state): State<SharedState>) -> Response {
    Json(lock(&state).products.clone()).into_response()
}

async fn list_orders(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let state = lock(&state);
    let user_id = match state.user_for(&headers) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };

    let orders: Vec<&Order> = state
        .orders
        .iter()
        .filter(|order| order.user_id.as_ref() == Some(&user_id))
        .collect();
    Json(orders).into_response()
}

async fn create_order(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(items): Json<Vec<OrderItemBody>>,
) -> Response {
    let mut state = lock(&state);
    let user_id = match state.user_for(&headers) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };

    if items.is_empty() {
        return plain(StatusCode::BAD_REQUEST, "Cart is empty");
    }

    // Items are reserved one by one; earlier reservations stand if a later one fails
    let mut placed = Vec::with_capacity(items.len());
    for item in items {
        let Some(product) = state.products.iter_mut().find(|p| p.id == item.product_id) else {
            return plain(
                StatusCode::CONFLICT,
                format!("Failed to process item {}: Product not found", item.product_id),
            );
        };
        if item.quantity <= 0 || product.stock < item.quantity {
            return plain(
                StatusCode::CONFLICT,
                format!("Failed to process item {}: Insufficient stock", item.product_id),
            );
        }
        product.stock -= item.quantity;
        placed.push(OrderItem {
            product_id: item.product_id,
            quantity: u32::try_from(item.quantity).unwrap_or(u32::MAX),
        });
    }

    let order = Order {
        id: OrderId::new(state.next_id("order")),
        user_id: Some(user_id),
        status: "Confirmed".to_string(),
        items: placed,
        created_at: Utc::now(),
    };
    state.orders.push(order.clone());

    (StatusCode::CREATED, Json(order)).into_response()
}

/// In-process API gateway for end-to-end tests.
///
/// The server task is aborted when the gateway is dropped.
pub struct FakeGateway {
    addr: SocketAddr,
    state: SharedState,
    server: JoinHandle<()>,
}

impl FakeGateway {
    /// Start a gateway on an ephemeral localhost port.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    #[allow(clippy::expect_used)]
    pub async fn start() -> Self {
        let state: SharedState = Arc::new(Mutex::new(GatewayState::seeded()));

        let app = Router::new()
            .route("/auth/register", post(register))
            .route("/auth/login", post(login))
            .route("/products", get(list_products))
            .route("/orders", get(list_orders).post(create_order))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake gateway");
        let addr = listener.local_addr().expect("fake gateway address");

        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            state,
            server,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Client configuration pointing at this gateway.
    ///
    /// # Panics
    ///
    /// Never in practice; the base URL is always a valid http URL.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::new(&self.base_url()).expect("valid gateway URL")
    }

    /// Current stock of `product_id`.
    #[must_use]
    pub fn stock(&self, product_id: &str) -> Option<i64> {
        lock(&self.state)
            .products
            .iter()
            .find(|p| p.id.as_str() == product_id)
            .map(|p| p.stock)
    }

    /// Overwrite the stock of `product_id`.
    pub fn set_stock(&self, product_id: &str, stock: i64) {
        if let Some(product) = lock(&self.state)
            .products
            .iter_mut()
            .find(|p| p.id.as_str() == product_id)
        {
            product.stock = stock;
        }
    }

    /// Number of orders placed across all users.
    #[must_use]
    pub fn order_count(&self) -> usize {
        lock(&self.state).orders.len()
    }
}

impl Drop for FakeGateway {
    fn drop(&mut self) {
        self.server.abort();
    }
}
