//! Read-only projection of the leaderboard for presentation.

use thiserror::Error;

use crate::dto::leaderboard::{LeaderboardRowDto, decode_member_names};

/// Number of rows a leaderboard view keeps.
pub const LEADERBOARD_VIEW_LIMIT: usize = 10;

/// A leaderboard row whose member list has been decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    /// Row identifier assigned by the store.
    pub id: i32,
    /// Name the team played under.
    pub team_name: String,
    /// Decoded member names, in roster order.
    pub members: Vec<String>,
    /// Points the team finished with.
    pub score: i32,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

/// A row whose `member_names` text is not a JSON array of strings.
#[derive(Debug, Error)]
#[error("leaderboard row {id} (`{team_name}`) has malformed member names")]
pub struct LeaderboardDecodeError {
    /// Identifier of the undecodable row.
    pub id: i32,
    /// Team name of the undecodable row.
    pub team_name: String,
    /// Score of the undecodable row, kept so the view can still rank it.
    pub score: i32,
    /// Why the member list could not be parsed.
    #[source]
    pub source: serde_json::Error,
}

impl TryFrom<LeaderboardRowDto> for LeaderboardEntry {
    type Error = LeaderboardDecodeError;

    fn try_from(row: LeaderboardRowDto) -> Result<Self, Self::Error> {
        match decode_member_names(&row.member_names) {
            Ok(members) => Ok(Self {
                id: row.id,
                team_name: row.team_name,
                members,
                score: row.score,
                created_at: row.created_at,
            }),
            Err(source) => Err(LeaderboardDecodeError {
                id: row.id,
                team_name: row.team_name,
                score: row.score,
                source,
            }),
        }
    }
}

/// Top rows by descending score. Rows that fail to decode stay in place as errors.
#[derive(Debug, Default)]
pub struct LeaderboardView {
    rows: Vec<Result<LeaderboardEntry, LeaderboardDecodeError>>,
}

impl LeaderboardView {
    /// Rank `rows` by score (stable for equal scores) and decode the first ten.
    pub fn from_rows(mut rows: Vec<LeaderboardRowDto>) -> Self {
        rows.sort_by(|left, right| right.score.cmp(&left.score));
        rows.truncate(LEADERBOARD_VIEW_LIMIT);
        Self {
            rows: rows.into_iter().map(LeaderboardEntry::try_from).collect(),
        }
    }

    /// Ranked rows, best first.
    pub fn rows(&self) -> &[Result<LeaderboardEntry, LeaderboardDecodeError>] {
        &self.rows
    }

    /// Whether there is no row to show.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
