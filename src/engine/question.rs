use crate::dto::question::QuestionDto;

/// Number of answer options every question carries.
pub const OPTION_COUNT: u8 = 4;

/// Immutable question as played during a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// Identifier assigned by the question store.
    pub id: i32,
    /// Prompt read aloud by the asking team.
    pub prompt: String,
    /// Answer options, shown in order as options 1 to 4.
    pub options: [String; 4],
    /// 1-based index of the correct option.
    pub correct_option: i32,
}

impl Question {
    /// Whether `option` (1-based) is the correct answer.
    pub fn is_correct(&self, option: u8) -> bool {
        i32::from(option) == self.correct_option
    }
}

impl From<QuestionDto> for Question {
    fn from(value: QuestionDto) -> Self {
        Self {
            id: value.id,
            prompt: value.question,
            options: [value.option1, value.option2, value.option3, value.option4],
            correct_option: value.correct_answer,
        }
    }
}
