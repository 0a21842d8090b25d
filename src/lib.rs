//! Backend-for-frontend of the Cetus HR dashboard.
//!
//! Owns the browser session (bearer token + user attributes), resolves the
//! role from the token claims and hands the browser view models that already
//! carry navigation and per-row action visibility. Every data call is proxied
//! to the HR REST API with the session's bearer token.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
