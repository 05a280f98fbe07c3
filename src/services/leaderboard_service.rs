use tracing::info;

use crate::{
    dao::models::NewLeaderboardEntity,
    dto::leaderboard::{
        CreateLeaderboardEntryRequest, CreateLeaderboardEntryResponse, LeaderboardRowDto,
        encode_member_names,
    },
    error::ServiceError,
    state::SharedState,
};

const SCORE_ADDED: &str = "Score added successfully";

/// Best rows first, at most the configured limit.
pub async fn top_entries(state: &SharedState) -> Result<Vec<LeaderboardRowDto>, ServiceError> {
    let store = state.require_quiz_store().await?;
    let rows = store
        .top_leaderboard(state.config().leaderboard_limit)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Store a finished match. Member names are kept as JSON text.
pub async fn add_entry(
    state: &SharedState,
    request: CreateLeaderboardEntryRequest,
) -> Result<CreateLeaderboardEntryResponse, ServiceError> {
    let CreateLeaderboardEntryRequest {
        team_name,
        member_names,
        score,
    } = request;

    let member_names = encode_member_names(&member_names)
        .map_err(|err| ServiceError::InvalidInput(format!("invalid member names: {err}")))?;

    let store = state.require_quiz_store().await?;
    let id = store
        .append_leaderboard(NewLeaderboardEntity {
            team_name: team_name.clone(),
            member_names,
            score,
        })
        .await?;
    info!(id, team = %team_name, score, "leaderboard entry added");

    Ok(CreateLeaderboardEntryResponse {
        message: SCORE_ADDED.into(),
        id,
    })
}
