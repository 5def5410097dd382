/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Game-result submission and leaderboard queries.
pub mod result_service;
/// Async driver scheduling reveal delays over the match session.
pub mod session_service;
