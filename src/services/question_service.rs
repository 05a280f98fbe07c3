use crate::{dto::question::QuestionDto, error::ServiceError, state::SharedState};

/// Sample a batch of questions in random order, at most the configured batch size.
pub async fn random_questions(state: &SharedState) -> Result<Vec<QuestionDto>, ServiceError> {
    let store = state.require_quiz_store().await?;
    let questions = store
        .random_questions(state.config().question_batch_size)
        .await?;
    Ok(questions.into_iter().map(Into::into).collect())
}
