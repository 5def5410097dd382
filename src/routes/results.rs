use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};

use crate::{
    dto::result::{GameResultSummary, HighScoresQuery, SubmitResultRequest},
    error::AppError,
    services::result_service,
    state::SharedState,
};

/// Routes handling game-result persistence and the leaderboard.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/game-results", post(submit_game_result))
        .route("/api/high-scores", get(high_scores))
}

/// Persist a completed game and return the stored record.
#[utoipa::path(
    post,
    path = "/api/game-results",
    tag = "results",
    request_body = SubmitResultRequest,
    responses(
        (status = 201, description = "Game result saved", body = GameResultSummary),
        (status = 400, description = "Invalid game result data"),
        (status = 503, description = "Storage unavailable")
    )
)]
pub async fn submit_game_result(
    State(state): State<SharedState>,
    Json(payload): Json<SubmitResultRequest>,
) -> Result<(StatusCode, Json<GameResultSummary>), AppError> {
    let summary = result_service::submit_result(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(summary)))
}

/// List the best results, sorted ascending by moves then by time.
#[utoipa::path(
    get,
    path = "/api/high-scores",
    tag = "results",
    params(HighScoresQuery),
    responses(
        (status = 200, description = "Leaderboard records", body = [GameResultSummary]),
        (status = 503, description = "Storage unavailable")
    )
)]
pub async fn high_scores(
    State(state): State<SharedState>,
    Query(query): Query<HighScoresQuery>,
) -> Result<Json<Vec<GameResultSummary>>, AppError> {
    let records = result_service::high_scores(&state, query.difficulty, query.limit).await?;
    Ok(Json(records))
}
