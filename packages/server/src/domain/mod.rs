//! Domain layer: the authoritative game model.
//!
//! - `value_object`: identifiers, positions, scores
//! - `entity`: players and the collectible
//! - `game`: the `Game` aggregate (session registry + game state coordinator)
//! - `policy`: pluggable move merging and spawn positions
//! - `event`: events pushed to connected clients
//! - `repository` / `message_pusher`: ports implemented by the infrastructure layer

pub mod entity;
pub mod error;
pub mod event;
pub mod factory;
pub mod game;
pub mod message_pusher;
pub mod policy;
pub mod repository;
pub mod value_object;

pub use entity::{Collectible, Player};
pub use error::{MessagePushError, ValueObjectError};
pub use event::GameEvent;
pub use factory::PlayerIdFactory;
pub use game::{
    ClaimOutcome, CollectibleClaim, Game, GameSettings, PlayerInit, Registration, RoundStatus,
    WorldSnapshot,
};
pub use message_pusher::{MessagePusher, PusherChannel};
#[cfg(test)]
pub use message_pusher::MockMessagePusher;
#[cfg(any(test, feature = "test-support"))]
pub use policy::FixedPositionSource;
pub use policy::{
    MovePolicy, PlayerDelta, PositionSource, RandomPositionSource, SpawnArea, TrustedMovePolicy,
};
pub use repository::GameRepository;
pub use value_object::{CollectibleId, CollectibleValue, PlayerId, Position, Score, Timestamp};
