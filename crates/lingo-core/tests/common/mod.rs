use lingo_entity::user::{ActiveModel as UserActiveModel, EnglishLevel, Model as UserModel};
use lingo_model::quiz::{AnsweredQuestion, QuizData, QuizSubmission};
use sea_orm::ActiveValue::{Set, Unchanged};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, DbConn};

pub async fn connect() -> DbConn {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    lingo_db::migration::setup_schema(&db).await.unwrap();
    db
}

pub async fn create_user(db: &DatabaseConnection, username: &str) -> UserModel {
    lingo_db::user::Mutation::create_user(db, username, "hash", "salt")
        .await
        .unwrap()
}

#[allow(dead_code)]
pub async fn set_level(db: &DatabaseConnection, user: &UserModel, level: EnglishLevel) {
    UserActiveModel {
        id: Unchanged(user.id),
        english_level: Set(level),
        ..Default::default()
    }
    .update(db)
    .await
    .unwrap();
}

/// A submission with `correct` right answers out of `total` questions, all
/// tagged with `topic`.
#[allow(dead_code)]
pub fn submission(topic: &str, correct: usize, total: usize) -> QuizSubmission {
    let questions = (0..total)
        .map(|i| AnsweredQuestion {
            question: format!("{topic} question {i}"),
            options: vec!["right".into(), "wrong".into(), "worse".into(), "worst".into()],
            correct_answer: "right".to_owned(),
            user_answer: if i < correct { "right" } else { "wrong" }.to_owned(),
            is_correct: false,
            explanation: String::new(),
            topic: topic.to_owned(),
            passage: None,
        })
        .collect();
    QuizSubmission {
        quiz_data: QuizData { questions },
        score: None,
        topic: topic.to_owned(),
        difficulty: None,
        quiz_type: None,
    }
}
