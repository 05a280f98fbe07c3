use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dao::models::QuestionEntity;

/// Question as served by `GET /api/questions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct QuestionDto {
    /// Question identifier.
    pub id: i32,
    /// Prompt text.
    pub question: String,
    /// Answer option 1.
    pub option1: String,
    /// Answer option 2.
    pub option2: String,
    /// Answer option 3.
    pub option3: String,
    /// Answer option 4.
    pub option4: String,
    /// 1-based index of the correct option.
    pub correct_answer: i32,
}

impl From<QuestionEntity> for QuestionDto {
    fn from(value: QuestionEntity) -> Self {
        let [option1, option2, option3, option4] = value.options;
        Self {
            id: value.id,
            question: value.prompt,
            option1,
            option2,
            option3,
            option4,
            correct_answer: value.correct_option,
        }
    }
}
