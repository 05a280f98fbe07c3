/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Leaderboard reads and appends.
pub mod leaderboard_service;
/// Random question batches.
pub mod question_service;
