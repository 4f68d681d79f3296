//! Time-related utilities with clock abstraction for testability.

use chrono::{DateTime, TimeZone, Utc};

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get current Unix timestamp (milliseconds)
    fn now_millis(&self) -> i64;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        get_timestamp()
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: i64,
}

impl FixedClock {
    /// Create a new fixed clock with the given timestamp
    pub fn new(fixed_time_millis: i64) -> Self {
        Self {
            fixed_time: fixed_time_millis,
        }
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.fixed_time
    }
}

/// Get current Unix timestamp (milliseconds)
pub fn get_timestamp() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert Unix timestamp (milliseconds) to RFC 3339 format in UTC.
///
/// Out-of-range timestamps fall back to the Unix epoch.
pub fn timestamp_to_rfc3339(timestamp_millis: i64) -> String {
    let dt: DateTime<Utc> = Utc
        .timestamp_millis_opt(timestamp_millis)
        .single()
        .unwrap_or_default();
    dt.to_rfc3339()
}
