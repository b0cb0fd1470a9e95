//! Shopfront Client - session and view synchronization for the storefront API.
//!
//! # Architecture
//!
//! - [`store`] - durable mirror of the session (token + user profile)
//! - [`session`] - the session controller: register, login, logout
//! - [`view`] - maps the session to visible regions and dependent loads
//! - [`app`] - wires the above to a [`view::Renderer`] and hosts the
//!   product/order operations
//! - [`api`] - the [`api::Transport`] seam and its `reqwest` implementation
//!
//! Rendering and HTTP are capabilities passed in by the caller, so the same
//! logic drives the terminal front end and the tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use shopfront_client::{ClientConfig, HttpTransport, FileSessionStore, Storefront};
//!
//! let config = ClientConfig::from_env()?;
//! let transport = HttpTransport::new(&config.api)?;
//! let store = FileSessionStore::new(&config.session_file);
//! let mut app = Storefront::new(transport, store, renderer);
//!
//! app.start().await;
//! app.place_order(&"prod-1".into()).await;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod session;
pub mod store;
pub mod view;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use api::{ApiRequest, ApiResponse, HttpTransport, Transport, TransportError};
pub use app::{OrderOutcome, Storefront};
pub use config::{ApiConfig, ClientConfig, ConfigError};
pub use error::{ClientError, Result};
pub use session::{AuthOutcome, SessionController};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore, StoreError};
pub use view::{Load, Placeholder, Region, Renderer, ViewState};
