//! HTTP client for the quiz API, consumed by the match driver and the CLI.

mod api;
mod error;
pub mod leaderboard;

use futures::future::BoxFuture;

use crate::{
    dto::leaderboard::{CreateLeaderboardEntryRequest, LeaderboardRowDto},
    engine::Question,
};

pub use self::api::ApiClient;
pub use self::error::{ClientError, ClientResult};
pub use self::leaderboard::{LeaderboardDecodeError, LeaderboardEntry, LeaderboardView};

/// Remote side of a match: where questions come from and where results go.
pub trait QuizBackend: Send + Sync {
    /// Fetch a batch of questions in the order the backend returned them.
    fn fetch_questions(&self) -> BoxFuture<'static, ClientResult<Vec<Question>>>;
    /// Fetch the top leaderboard rows, member names still encoded.
    fn fetch_leaderboard(&self) -> BoxFuture<'static, ClientResult<Vec<LeaderboardRowDto>>>;
    /// Append an entry and return its identifier.
    fn submit_result(
        &self,
        entry: CreateLeaderboardEntryRequest,
    ) -> BoxFuture<'static, ClientResult<i32>>;
}
