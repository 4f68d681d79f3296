//! Coin Dash game server library.
//!
//! This library provides the authoritative server for a multiplayer
//! coin-collection game: players join over WebSocket, move around, race to
//! claim a single collectible and the first to reach the win threshold ends
//! the round.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
