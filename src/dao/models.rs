use std::time::SystemTime;

/// Question record as kept by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionEntity {
    /// Primary key.
    pub id: i32,
    /// Prompt text.
    pub prompt: String,
    /// The four answer options, in display order.
    pub options: [String; 4],
    /// 1-based index of the correct option.
    pub correct_option: i32,
}

/// Persisted leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntity {
    /// Auto-increment primary key.
    pub id: i32,
    /// Winning team's name.
    pub team_name: String,
    /// Member names as stored: a JSON-encoded array of strings.
    pub member_names: String,
    /// Final score.
    pub score: i32,
    /// Timestamp assigned by the store on insert.
    pub created_at: SystemTime,
}

/// Leaderboard row about to be appended; the store assigns id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLeaderboardEntity {
    /// Winning team's name.
    pub team_name: String,
    /// JSON-encoded member names.
    pub member_names: String,
    /// Final score.
    pub score: i32,
}
