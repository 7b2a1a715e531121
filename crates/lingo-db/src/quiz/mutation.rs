use chrono::Utc;
use lingo_entity::quiz::{ActiveModel as QuizActiveModel, Model as Quiz, QuizType};
use lingo_entity::user::{ActiveModel as UserActiveModel, EnglishLevel};
use sea_orm::ActiveValue::{Set, Unchanged};
use sea_orm::prelude::*;
use sea_orm::{ActiveModelTrait, ConnectionTrait, TransactionTrait};
use uuid::Uuid;

use crate::util::FlattenTransactionResultExt;

/// Quiz record fields as recomputed by the progression engine.
#[derive(Debug, Clone)]
pub struct NewQuiz {
    pub user_id: Uuid,
    pub quiz_type: QuizType,
    pub topic: String,
    pub difficulty: EnglishLevel,
    pub score: i32,
    pub questions: Json,
    pub topic_performance: Json,
}

/// User fields that must land together with the quiz insert.
#[derive(Debug, Clone)]
pub struct UserStatsUpdate {
    pub english_level: EnglishLevel,
    pub total_quizzes: i32,
    pub average_score: f64,
    pub progress: Json,
    pub has_completed_first_quiz: bool,
    pub quizzes_since_level_change: i32,
}

pub struct Mutation;

impl Mutation {
    /// Applies a quiz submission atomically: the quiz row and the user's
    /// aggregate fields are written in one transaction, or not at all.
    pub async fn record_result<C: ConnectionTrait + TransactionTrait>(
        conn: &C,
        quiz: NewQuiz,
        stats: UserStatsUpdate,
    ) -> Result<Quiz, DbErr> {
        conn.transaction(|txn| {
            Box::pin(async move {
                let quiz_model = QuizActiveModel {
                    id: Set(Uuid::new_v4()),
                    user_id: Set(quiz.user_id),
                    quiz_type: Set(quiz.quiz_type),
                    topic: Set(quiz.topic),
                    difficulty: Set(quiz.difficulty),
                    score: Set(quiz.score),
                    questions: Set(quiz.questions),
                    topic_performance: Set(quiz.topic_performance),
                    created_at: Set(Utc::now().naive_utc()),
                }
                .insert(txn)
                .await?;

                UserActiveModel {
                    id: Unchanged(quiz.user_id),
                    english_level: Set(stats.english_level),
                    total_quizzes: Set(stats.total_quizzes),
                    average_score: Set(stats.average_score),
                    progress: Set(stats.progress),
                    has_completed_first_quiz: Set(stats.has_completed_first_quiz),
                    quizzes_since_level_change: Set(stats.quizzes_since_level_change),
                    ..Default::default()
                }
                .update(txn)
                .await?;

                Ok::<_, DbErr>(quiz_model)
            })
        })
        .await
        .flatten_res()
    }
}
