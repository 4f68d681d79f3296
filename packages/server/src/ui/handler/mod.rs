//! Request handlers.

pub mod http;
pub mod websocket;

pub use http::{debug_game_state, get_game, health_check};
pub use websocket::websocket_handler;
