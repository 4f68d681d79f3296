//! Utilities shared by the Coin Dash binaries: logging setup and time handling.

pub mod logger;
pub mod time;
