//! Process-local result store keeping records in a concurrent map.

use std::{sync::Arc, time::SystemTime};

use dashmap::DashMap;
use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::{
    ResultStore,
    models::{GameResultEntity, NewGameResultEntity},
    storage::StorageResult,
};

/// In-memory [`ResultStore`] backend.
///
/// Records live for the lifetime of the process; the map is shared so cloned
/// handles and spawned futures all observe the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryResultStore {
    results: Arc<DashMap<Uuid, GameResultEntity>>,
}

impl MemoryResultStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResultStore for MemoryResultStore {
    fn save_result(
        &self,
        result: NewGameResultEntity,
    ) -> BoxFuture<'static, StorageResult<GameResultEntity>> {
        let results = Arc::clone(&self.results);
        Box::pin(async move {
            let entity = GameResultEntity {
                id: Uuid::new_v4(),
                difficulty: result.difficulty,
                moves: result.moves,
                time_taken_seconds: result.time_taken_seconds,
                matches_made: result.matches_made,
                completed_at: SystemTime::now(),
            };
            results.insert(entity.id, entity.clone());
            Ok(entity)
        })
    }

    fn top_results(
        &self,
        difficulty: Option<String>,
        limit: usize,
    ) -> BoxFuture<'static, StorageResult<Vec<GameResultEntity>>> {
        let results = Arc::clone(&self.results);
        Box::pin(async move {
            let mut records: Vec<GameResultEntity> = results
                .iter()
                .map(|entry| entry.value().clone())
                .filter(|record| {
                    difficulty
                        .as_deref()
                        .is_none_or(|wanted| record.difficulty == wanted)
                })
                .collect();

            records.sort_by_key(|record| (record.moves, record.time_taken_seconds));
            records.truncate(limit);

            Ok(records)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}
