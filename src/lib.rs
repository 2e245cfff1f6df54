//! Gatehouse - session gate and authentication layer
//!
//! Wires a lazily connected database, an auth service that degrades to a
//! no-op without one, a cookie-presence route gate and a per-page layout
//! guard into an axum application.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod context;
pub mod database;
pub mod error;
pub mod gate;
pub mod ui;

pub use config::Config;
pub use context::AppContext;
pub use error::Error;
