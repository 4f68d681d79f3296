//! UI layer: the axum server, WebSocket event dispatch and HTTP endpoints.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::{Server, ServerError, StaticAssets};
