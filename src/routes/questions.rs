use axum::{Json, Router, extract::State, routing::get};
use tracing::error;

use crate::{
    dto::question::QuestionDto, error::AppError, services::question_service,
    state::SharedState,
};

const FETCH_FAILED: &str = "Error fetching questions";

/// Routes serving question batches.
pub fn router() -> Router<SharedState> {
    Router::new().route("/api/questions", get(list_questions))
}

/// Sample a batch of questions in random order.
#[utoipa::path(
    get,
    path = "/api/questions",
    tag = "questions",
    responses(
        (status = 200, description = "Up to ten questions, randomly ordered", body = [QuestionDto]),
        (status = 500, description = "Store unavailable", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_questions(
    State(state): State<SharedState>,
) -> Result<Json<Vec<QuestionDto>>, AppError> {
    let questions = question_service::random_questions(&state)
        .await
        .map_err(|err| {
            error!(error = ?err, "error fetching questions");
            AppError::from_service(err, FETCH_FAILED)
        })?;
    Ok(Json(questions))
}
