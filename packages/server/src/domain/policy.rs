//! Pluggable policies used by the `Game` aggregate.
//!
//! `MovePolicy` is the single place where client-submitted player state is
//! merged into the authoritative record, and `PositionSource` decides where
//! new players and collectibles appear.

#[cfg(any(test, feature = "test-support"))]
use std::sync::Mutex;

use rand::Rng;

use super::{
    entity::Player,
    error::ValueObjectError,
    value_object::{Position, Score},
};

/// Client-proposed changes to a player. Absent fields keep their stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlayerDelta {
    pub x: Option<i64>,
    pub y: Option<i64>,
    pub score: Option<u32>,
}

/// Merges a proposed delta over the stored player record.
///
/// Implementations must return a player carrying `current.id`.
pub trait MovePolicy: Send + Sync {
    fn apply(&self, current: &Player, delta: &PlayerDelta) -> Player;
}

/// Accepts position and score exactly as the client submitted them.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrustedMovePolicy;

impl MovePolicy for TrustedMovePolicy {
    fn apply(&self, current: &Player, delta: &PlayerDelta) -> Player {
        Player {
            id: current.id.clone(),
            position: Position::new(
                delta.x.unwrap_or(current.position.x),
                delta.y.unwrap_or(current.position.y),
            ),
            score: delta.score.map(Score::new).unwrap_or(current.score),
        }
    }
}

/// Rectangle `[min_x, min_x + width) x [min_y, min_y + height)` used for spawning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnArea {
    min_x: i64,
    min_y: i64,
    width: u32,
    height: u32,
}

impl SpawnArea {
    pub fn new(min_x: i64, min_y: i64, width: u32, height: u32) -> Result<Self, ValueObjectError> {
        if width == 0 || height == 0 {
            return Err(ValueObjectError::EmptySpawnArea);
        }
        Ok(Self {
            min_x,
            min_y,
            width,
            height,
        })
    }

    pub fn min_x(&self) -> i64 {
        self.min_x
    }

    pub fn min_y(&self) -> i64 {
        self.min_y
    }

    pub fn max_x(&self) -> i64 {
        self.min_x + i64::from(self.width)
    }

    pub fn max_y(&self) -> i64 {
        self.min_y + i64::from(self.height)
    }

    pub fn contains(&self, position: Position) -> bool {
        (self.min_x..self.max_x()).contains(&position.x)
            && (self.min_y..self.max_y()).contains(&position.y)
    }
}

impl Default for SpawnArea {
    /// The 500x300 play field inset by 50 on each axis.
    fn default() -> Self {
        Self {
            min_x: 50,
            min_y: 50,
            width: 500,
            height: 300,
        }
    }
}

/// Source of spawn positions for players and collectibles.
pub trait PositionSource: Send + Sync {
    fn next_position(&self, area: &SpawnArea) -> Position;
}

/// Uniformly random positions inside the spawn area.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPositionSource;

impl PositionSource for RandomPositionSource {
    fn next_position(&self, area: &SpawnArea) -> Position {
        let mut rng = rand::thread_rng();
        Position::new(
            rng.gen_range(area.min_x()..area.max_x()),
            rng.gen_range(area.min_y()..area.max_y()),
        )
    }
}

/// Deterministic positions for tests.
///
/// Hands out the queued positions in order, then repeats the last one.
/// Available to other crates with the `test-support` feature.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug)]
pub struct FixedPositionSource {
    queue: Mutex<Vec<Position>>,
    last: Mutex<Position>,
}

#[cfg(any(test, feature = "test-support"))]
impl FixedPositionSource {
    pub fn new(position: Position) -> Self {
        Self::sequence(vec![position])
    }

    pub fn sequence(mut positions: Vec<Position>) -> Self {
        positions.reverse();
        let last = positions.first().copied().unwrap_or_default();
        Self {
            queue: Mutex::new(positions),
            last: Mutex::new(last),
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
impl PositionSource for FixedPositionSource {
    fn next_position(&self, _area: &SpawnArea) -> Position {
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        let mut queue = self.queue.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(next) = queue.pop() {
            *last = next;
        }
        *last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::PlayerId;

    fn alice() -> Player {
        Player::new(
            PlayerId::new("alice".to_string()).unwrap(),
            Position::new(100, 100),
            Score::new(3),
        )
    }

    #[test]
    fn test_trusted_policy_accepts_submitted_fields() {
        // テスト項目: TrustedMovePolicy は送信された座標とスコアをそのまま受け入れる
        // given (前提条件):
        let current = alice();
        let delta = PlayerDelta {
            x: Some(-5000),
            y: Some(99999),
            score: Some(7),
        };

        // when (操作):
        let merged = TrustedMovePolicy.apply(&current, &delta);

        // then (期待する結果): 境界チェックは行わない
        assert_eq!(merged.position, Position::new(-5000, 99999));
        assert_eq!(merged.score, Score::new(7));
        assert_eq!(merged.id, current.id);
    }

    #[test]
    fn test_trusted_policy_keeps_absent_fields() {
        // テスト項目: 送信されなかったフィールドは既存の値が維持される
        // given (前提条件):
        let current = alice();
        let delta = PlayerDelta {
            x: Some(110),
            ..PlayerDelta::default()
        };

        // when (操作):
        let merged = TrustedMovePolicy.apply(&current, &delta);

        // then (期待する結果):
        assert_eq!(merged.position, Position::new(110, 100));
        assert_eq!(merged.score, Score::new(3));
    }

    #[test]
    fn test_spawn_area_rejects_empty_rectangle() {
        // テスト項目: 幅または高さが 0 の SpawnArea は作成できない
        // when (操作):
        let no_width = SpawnArea::new(0, 0, 0, 10);
        let no_height = SpawnArea::new(0, 0, 10, 0);

        // then (期待する結果):
        assert_eq!(no_width, Err(ValueObjectError::EmptySpawnArea));
        assert_eq!(no_height, Err(ValueObjectError::EmptySpawnArea));
    }

    #[test]
    fn test_default_spawn_area_bounds() {
        // テスト項目: デフォルトの SpawnArea は x: 50..550, y: 50..350
        // given (前提条件):
        let area = SpawnArea::default();

        // then (期待する結果):
        assert!(area.contains(Position::new(50, 50)));
        assert!(area.contains(Position::new(549, 349)));
        assert!(!area.contains(Position::new(550, 100)));
        assert!(!area.contains(Position::new(100, 49)));
    }

    #[test]
    fn test_random_position_source_stays_in_area() {
        // テスト項目: RandomPositionSource の座標は常に SpawnArea 内に収まる
        // given (前提条件):
        let area = SpawnArea::new(-10, 20, 5, 3).unwrap();

        // when (操作) / then (期待する結果):
        for _ in 0..500 {
            let position = RandomPositionSource.next_position(&area);
            assert!(area.contains(position), "{position:?} outside {area:?}");
        }
    }

    #[test]
    fn test_fixed_position_source_replays_sequence_then_repeats_last() {
        // テスト項目: FixedPositionSource はキュー順に返し、その後は最後の値を返し続ける
        // given (前提条件):
        let source =
            FixedPositionSource::sequence(vec![Position::new(1, 1), Position::new(2, 2)]);
        let area = SpawnArea::default();

        // when (操作):
        let positions: Vec<_> = (0..4).map(|_| source.next_position(&area)).collect();

        // then (期待する結果):
        assert_eq!(
            positions,
            vec![
                Position::new(1, 1),
                Position::new(2, 2),
                Position::new(2, 2),
                Position::new(2, 2)
            ]
        );
    }
}
