use std::collections::BTreeMap;

use crate::convert::{FromDbModel, FromModel, IntoModel, TryFromDbModel};
use crate::error::ConvertError;
use lingo_entity::quiz as db_quiz;
use lingo_model::performance::QuizSummary;
use lingo_model::quiz::{AnsweredQuestion, QuizType, TopicTally};

impl FromDbModel<db_quiz::QuizType> for QuizType {
    fn from_db_model(model: db_quiz::QuizType) -> Self {
        match model {
            db_quiz::QuizType::Static => Self::Static,
            db_quiz::QuizType::Adaptive => Self::Adaptive,
        }
    }
}

impl FromModel<QuizType> for db_quiz::QuizType {
    fn from_model(model: QuizType) -> Self {
        match model {
            QuizType::Static => Self::Static,
            QuizType::Adaptive => Self::Adaptive,
        }
    }
}

/// The answered questions stored in the quiz's json column.
pub fn questions_of(model: &db_quiz::Model) -> Result<Vec<AnsweredQuestion>, ConvertError> {
    Ok(serde_json::from_value(model.questions.clone())?)
}

/// The per-topic tallies stored in the quiz's json column.
pub fn topic_performance_of(model: &db_quiz::Model) -> Result<BTreeMap<String, TopicTally>, ConvertError> {
    Ok(serde_json::from_value(model.topic_performance.clone())?)
}

impl TryFromDbModel<(u32, db_quiz::Model)> for QuizSummary {
    type Error = ConvertError;

    fn try_from_db_model((quiz_number, model): (u32, db_quiz::Model)) -> Result<Self, Self::Error> {
        Ok(Self {
            quiz_number,
            score: model.score,
            topic: model.topic,
            difficulty: model.difficulty.into_model(),
            timestamp: model.created_at,
        })
    }
}
