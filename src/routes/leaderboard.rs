use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::get,
};
use tracing::error;
use validator::Validate;

use crate::{
    dto::leaderboard::{
        CreateLeaderboardEntryRequest, CreateLeaderboardEntryResponse, LeaderboardRowDto,
    },
    error::AppError,
    services::leaderboard_service,
    state::SharedState,
};

const FETCH_FAILED: &str = "Error fetching leaderboard";
const ADD_FAILED: &str = "Error adding score to leaderboard";

/// Routes reading and appending leaderboard entries.
pub fn router() -> Router<SharedState> {
    Router::new().route("/api/leaderboard", get(list_leaderboard).post(add_score))
}

/// Best entries by descending score.
#[utoipa::path(
    get,
    path = "/api/leaderboard",
    tag = "leaderboard",
    responses(
        (status = 200, description = "Up to ten entries, best first", body = [LeaderboardRowDto]),
        (status = 500, description = "Store unavailable", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_leaderboard(
    State(state): State<SharedState>,
) -> Result<Json<Vec<LeaderboardRowDto>>, AppError> {
    let rows = leaderboard_service::top_entries(&state)
        .await
        .map_err(|err| {
            error!(error = ?err, "error fetching leaderboard");
            AppError::from_service(err, FETCH_FAILED)
        })?;
    Ok(Json(rows))
}

/// Record a finished match.
#[utoipa::path(
    post,
    path = "/api/leaderboard",
    tag = "leaderboard",
    request_body = CreateLeaderboardEntryRequest,
    responses(
        (status = 200, description = "Entry stored", body = CreateLeaderboardEntryResponse),
        (status = 400, description = "Missing team name or members", body = crate::error::ErrorResponse),
        (status = 500, description = "Store unavailable", body = crate::error::ErrorResponse)
    )
)]
pub async fn add_score(
    State(state): State<SharedState>,
    payload: Result<Json<CreateLeaderboardEntryRequest>, JsonRejection>,
) -> Result<Json<CreateLeaderboardEntryResponse>, AppError> {
    let Json(payload) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    payload.validate()?;

    let team = payload.team_name.clone();
    let created = leaderboard_service::add_entry(&state, payload)
        .await
        .map_err(|err| {
            error!(error = ?err, %team, "error adding score to leaderboard");
            AppError::from_service(err, ADD_FAILED)
        })?;
    Ok(Json(created))
}
