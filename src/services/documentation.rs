use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the quiz API.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::questions::list_questions,
        crate::routes::leaderboard::list_leaderboard,
        crate::routes::leaderboard::add_score,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::health::HealthStatus,
            crate::dto::question::QuestionDto,
            crate::dto::leaderboard::LeaderboardRowDto,
            crate::dto::leaderboard::CreateLeaderboardEntryRequest,
            crate::dto::leaderboard::CreateLeaderboardEntryResponse,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "questions", description = "Random question batches"),
        (name = "leaderboard", description = "Best teams and score submission"),
    )
)]
pub struct ApiDoc;
