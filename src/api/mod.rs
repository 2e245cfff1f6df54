//! HTTP API server

pub mod cookies;
pub mod routes;
pub mod server;

pub use server::*;
