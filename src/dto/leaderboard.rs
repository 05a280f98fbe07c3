//! Leaderboard payloads and the text encoding of member lists.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{dao::models::LeaderboardEntity, dto::format_system_time};

/// Leaderboard row as served by `GET /api/leaderboard`.
///
/// `member_names` keeps the stored JSON text untouched; use [`decode_member_names`]
/// to get the list back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LeaderboardRowDto {
    /// Row identifier.
    pub id: i32,
    /// Name the team played under.
    pub team_name: String,
    /// JSON-encoded array of member names, e.g. `["Ada","Grace"]`.
    pub member_names: String,
    /// Final score of the team.
    pub score: i32,
    /// RFC 3339 creation timestamp assigned by the store.
    pub created_at: String,
}

impl From<LeaderboardEntity> for LeaderboardRowDto {
    fn from(value: LeaderboardEntity) -> Self {
        Self {
            id: value.id,
            team_name: value.team_name,
            member_names: value.member_names,
            score: value.score,
            created_at: format_system_time(value.created_at),
        }
    }
}

/// Body of `POST /api/leaderboard`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateLeaderboardEntryRequest {
    /// Name the team played under; must not be empty.
    #[validate(length(min = 1, message = "team_name must not be empty"))]
    pub team_name: String,
    /// Roster of the team; at least one member.
    #[validate(length(min = 1, message = "member_names must list at least one member"))]
    pub member_names: Vec<String>,
    /// Final score of the team.
    pub score: i32,
}

/// Acknowledgement returned once an entry is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreateLeaderboardEntryResponse {
    /// Human-readable confirmation.
    pub message: String,
    /// Identifier assigned to the new row.
    pub id: i32,
}

/// Encode a member list into the text stored in the `member_names` column.
pub fn encode_member_names(members: &[String]) -> Result<String, serde_json::Error> {
    serde_json::to_string(members)
}

/// Decode the text stored in the `member_names` column.
pub fn decode_member_names(encoded: &str) -> Result<Vec<String>, serde_json::Error> {
    serde_json::from_str(encoded)
}
