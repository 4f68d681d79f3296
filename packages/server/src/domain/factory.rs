//! Factories for server-generated identifiers.

use uuid::Uuid;

use super::{error::ValueObjectError, value_object::PlayerId};

/// Generates connection identities. Clients never choose their own id.
pub struct PlayerIdFactory;

impl PlayerIdFactory {
    /// Generate a new random `PlayerId` (UUID v4, simple format).
    pub fn generate() -> Result<PlayerId, ValueObjectError> {
        PlayerId::new(Uuid::new_v4().simple().to_string())
    }
}
