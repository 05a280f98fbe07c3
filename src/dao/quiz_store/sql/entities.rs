//! sea-orm entities mapping the `questions` and `leaderboard` tables.

/// Externally seeded `questions` table.
pub mod question {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "questions")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        #[sea_orm(column_type = "Text")]
        pub question: String,
        pub option1: String,
        pub option2: String,
        pub option3: String,
        pub option4: String,
        pub correct_answer: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Append-only `leaderboard` table, created on startup when missing.
pub mod leaderboard {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "leaderboard")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub team_name: String,
        #[sea_orm(column_type = "Text")]
        pub member_names: String,
        pub score: i32,
        pub created_at: TimeDateTime,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

use std::time::SystemTime;

use crate::dao::models::{LeaderboardEntity, QuestionEntity};

impl From<question::Model> for QuestionEntity {
    fn from(value: question::Model) -> Self {
        Self {
            id: value.id,
            prompt: value.question,
            options: [value.option1, value.option2, value.option3, value.option4],
            correct_option: value.correct_answer,
        }
    }
}

impl From<leaderboard::Model> for LeaderboardEntity {
    fn from(value: leaderboard::Model) -> Self {
        Self {
            id: value.id,
            team_name: value.team_name,
            member_names: value.member_names,
            score: value.score,
            created_at: SystemTime::from(value.created_at.assume_utc()),
        }
    }
}
