use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Ember Match Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::results::submit_game_result,
        crate::routes::results::high_scores,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::result::SubmitResultRequest,
            crate::dto::result::GameResultSummary,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "results", description = "Game-completion results and the leaderboard"),
    )
)]
pub struct ApiDoc;
