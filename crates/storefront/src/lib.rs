//! FreshMarket storefront library.
//!
//! The JSON API for the FreshMarket organic grocery store, exposed as a
//! library so the CLI and the integration tests can reuse its storage layer.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
