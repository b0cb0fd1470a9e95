//! Core types for Shopfront.
//!
//! This module provides type-safe wrappers for the storefront API's domain
//! concepts.

pub mod id;
pub mod order;
pub mod price;
pub mod product;
pub mod session;
pub mod user;

pub use id::*;
pub use order::{NewOrderItem, Order, OrderItem};
pub use price::Price;
pub use product::Product;
pub use session::{Session, SessionToken};
pub use user::{AuthResponse, Credentials, UserProfile};
