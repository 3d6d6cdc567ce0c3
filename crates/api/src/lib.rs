//! HTTP server for the critiq review service.
//!
//! The binary in `main.rs` only loads configuration and serves
//! [`app::build_app`]; everything else lives here so integration tests
//! drive the same router.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;
