//! Value objects of the game domain.

use std::fmt;

use super::error::ValueObjectError;

/// Server-assigned identity of a connection and of the player it controls.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::PlayerIdEmpty);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for PlayerId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of one collectible generation. Compared for equality only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollectibleId(u64);

impl CollectibleId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CollectibleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// World coordinates. Unbounded: the server never clamps submitted positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

impl Position {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Score(u32);

impl Score {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn zero() -> Self {
        Self(0)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    /// Add the value of a claimed collectible.
    pub fn award(self, value: CollectibleValue) -> Self {
        Self(self.0.saturating_add(value.value()))
    }
}

/// Points awarded for one collectible. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollectibleValue(u32);

impl CollectibleValue {
    pub fn new(value: u32) -> Result<Self, ValueObjectError> {
        if value == 0 {
            return Err(ValueObjectError::NonPositiveCollectibleValue);
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl Default for CollectibleValue {
    fn default() -> Self {
        Self(1)
    }
}

/// Unix timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
