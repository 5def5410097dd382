/// In-memory result store backend.
pub mod memory;
/// Database model definitions.
pub mod models;
/// Storage abstraction layer.
pub mod storage;

use futures::future::BoxFuture;

use crate::dao::models::{GameResultEntity, NewGameResultEntity};
use crate::dao::storage::StorageResult;

/// Abstraction over the persistence layer for game-completion results.
pub trait ResultStore: Send + Sync {
    /// Persist a completed game, assigning its id and completion timestamp.
    fn save_result(
        &self,
        result: NewGameResultEntity,
    ) -> BoxFuture<'static, StorageResult<GameResultEntity>>;
    /// Best results, optionally filtered by difficulty, sorted ascending by
    /// moves then by time and truncated to `limit`.
    fn top_results(
        &self,
        difficulty: Option<String>,
        limit: usize,
    ) -> BoxFuture<'static, StorageResult<Vec<GameResultEntity>>>;
    /// Probe the backend.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}
