//! # Guestbook Gateway
//! HTTP surface: list read/append, store info, and environment dump.

pub mod error;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{AppState, build_router, start};
