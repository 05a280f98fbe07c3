pub mod sql;

use futures::future::BoxFuture;

use crate::dao::models::{LeaderboardEntity, NewLeaderboardEntity, QuestionEntity};
use crate::dao::storage::StorageResult;

/// Abstraction over the question source and the leaderboard store.
pub trait QuizStore: Send + Sync {
    /// Up to `limit` questions in random order.
    fn random_questions(&self, limit: u64)
    -> BoxFuture<'static, StorageResult<Vec<QuestionEntity>>>;
    /// Up to `limit` leaderboard rows, highest score first.
    fn top_leaderboard(&self, limit: u64)
    -> BoxFuture<'static, StorageResult<Vec<LeaderboardEntity>>>;
    /// Append a row and return its identifier.
    fn append_leaderboard(
        &self,
        entry: NewLeaderboardEntity,
    ) -> BoxFuture<'static, StorageResult<i32>>;
    /// Cheap round trip proving the backend still answers.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}
