use super::team::TeamId;

/// Pick the winning team from the final scores.
///
/// Team 2 only wins with a strictly greater score: a tie goes to team 1.
pub fn winner(team1_score: u32, team2_score: u32) -> TeamId {
    if team1_score < team2_score {
        TeamId::Team2
    } else {
        TeamId::Team1
    }
}

/// Qualitative feedback shown next to a team's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackTier {
    /// Every question of the batch was answered correctly.
    Maximal,
    /// At least half of the batch was answered correctly.
    Majority,
    /// Less than half.
    Minimal,
}

impl FeedbackTier {
    /// Classify `score` out of `total` questions.
    pub fn for_score(score: u32, total: usize) -> Self {
        if total == 0 {
            return FeedbackTier::Minimal;
        }

        let score = u64::from(score);
        let total = total as u64;
        if score == total {
            FeedbackTier::Maximal
        } else if score * 2 >= total {
            FeedbackTier::Majority
        } else {
            FeedbackTier::Minimal
        }
    }

    /// Emoji rendered for this tier.
    pub fn emoji(self) -> &'static str {
        match self {
            FeedbackTier::Maximal => "🎉",
            FeedbackTier::Majority => "😊",
            FeedbackTier::Minimal => "😢",
        }
    }
}
