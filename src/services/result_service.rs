use tracing::info;
use validator::Validate;

use crate::{
    dao::models::NewGameResultEntity,
    dto::result::{GameResultSummary, SubmitResultRequest},
    error::ServiceError,
    state::SharedState,
};

/// Records returned by the leaderboard when no limit is given.
const DEFAULT_HIGH_SCORES_LIMIT: usize = 10;

/// Validate and persist a completed game, returning the stored record.
pub async fn submit_result(
    state: &SharedState,
    request: SubmitResultRequest,
) -> Result<GameResultSummary, ServiceError> {
    request.validate()?;

    let store = state.require_result_store().await?;
    let entity = store.save_result(NewGameResultEntity::from(request)).await?;

    info!(
        id = %entity.id,
        difficulty = %entity.difficulty,
        moves = entity.moves,
        time_taken_seconds = entity.time_taken_seconds,
        "game result saved"
    );

    Ok(entity.into())
}

/// Best results, optionally restricted to one difficulty.
pub async fn high_scores(
    state: &SharedState,
    difficulty: Option<String>,
    limit: Option<usize>,
) -> Result<Vec<GameResultSummary>, ServiceError> {
    let store = state.require_result_store().await?;

    let limit = limit.unwrap_or(DEFAULT_HIGH_SCORES_LIMIT);
    let records = store.top_results(difficulty, limit).await?;

    Ok(records.into_iter().map(Into::into).collect())
}
