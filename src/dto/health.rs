use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Overall service status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// The question/leaderboard store answers.
    Ok,
    /// No store is installed or it stopped answering; data endpoints fail.
    Degraded,
}

/// Payload of `GET /healthcheck`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Whether the store answers.
    pub status: HealthStatus,
}

impl HealthResponse {
    /// Store reachable.
    pub fn ok() -> Self {
        Self {
            status: HealthStatus::Ok,
        }
    }

    /// Store missing or unreachable.
    pub fn degraded() -> Self {
        Self {
            status: HealthStatus::Degraded,
        }
    }
}
