//! Error types shared by the SQL storage implementation.

use sea_orm::DbErr;
use thiserror::Error;

/// Convenient result alias returning [`SqlDaoError`] failures.
pub type SqlResult<T> = Result<T, SqlDaoError>;

/// Failures that can occur while talking to the database.
#[derive(Debug, Error)]
pub enum SqlDaoError {
    /// Connection parameters do not form a usable URL.
    #[error("invalid database configuration: {reason}")]
    InvalidConfig {
        /// What was wrong with the parameters.
        reason: String,
    },
    /// Opening the connection pool failed.
    #[error("failed to connect to the database")]
    Connect {
        /// Error reported by sea-orm.
        #[source]
        source: DbErr,
    },
    /// Creating a missing table failed.
    #[error("failed to create table `{table}`")]
    EnsureTable {
        /// Name of the table being created.
        table: &'static str,
        /// Error reported by sea-orm.
        #[source]
        source: DbErr,
    },
    /// Sampling questions failed.
    #[error("failed to fetch questions")]
    FetchQuestions {
        /// Error reported by sea-orm.
        #[source]
        source: DbErr,
    },
    /// Reading the leaderboard failed.
    #[error("failed to fetch leaderboard")]
    FetchLeaderboard {
        /// Error reported by sea-orm.
        #[source]
        source: DbErr,
    },
    /// Inserting a leaderboard row failed.
    #[error("failed to append leaderboard entry for team `{team_name}`")]
    AppendLeaderboard {
        /// Team whose entry was rejected.
        team_name: String,
        /// Error reported by sea-orm.
        #[source]
        source: DbErr,
    },
    /// The health ping failed.
    #[error("database ping failed")]
    HealthPing {
        /// Error reported by sea-orm.
        #[source]
        source: DbErr,
    },
}
