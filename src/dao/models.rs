use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

/// Completed-game record persisted by the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameResultEntity {
    /// Primary key of the result, assigned on save.
    pub id: Uuid,
    /// Grid tag the game was played on (e.g. `"3x2"`).
    pub difficulty: String,
    /// Completed two-card resolutions.
    pub moves: u32,
    /// Wall time between the first flip and the final match, in seconds.
    pub time_taken_seconds: u32,
    /// Groups found; equals the grid's group count for a finished game.
    pub matches_made: u32,
    /// Completion timestamp, assigned on save.
    pub completed_at: SystemTime,
}

/// Completed-game payload before the store assigns id and timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewGameResultEntity {
    /// Grid tag the game was played on.
    pub difficulty: String,
    /// Completed two-card resolutions.
    pub moves: u32,
    /// Wall time between the first flip and the final match, in seconds.
    pub time_taken_seconds: u32,
    /// Groups found.
    pub matches_made: u32,
}
