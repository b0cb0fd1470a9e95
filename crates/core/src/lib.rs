//! Shopfront Core - Shared types library.
//!
//! This crate provides the domain types used across the Shopfront components:
//! - `client` - Session controller, view synchronizer and HTTP transport
//! - `cli` - Terminal front end for the storefront API
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no file access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, products, orders, users and sessions

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
