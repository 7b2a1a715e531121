mod common;

use crate::common::setup_schema;
use crate::common::user::create_test_user;
use lingo_db::quiz::{Mutation, NewQuiz, Query, UserStatsUpdate};
use lingo_entity::quiz::QuizType;
use lingo_entity::user::EnglishLevel;
use sea_orm::Database;
use serde_json::json;
use test_log::test;
use uuid::Uuid;

fn sample_quiz(user_id: Uuid, score: i32) -> NewQuiz {
    NewQuiz {
        user_id,
        quiz_type: QuizType::Adaptive,
        topic: "Grammar".to_owned(),
        difficulty: EnglishLevel::Beginner,
        score,
        questions: json!([{
            "question": "Pick the correct article",
            "options": ["a", "an", "the", "none"],
            "correct_answer": "an",
            "user_answer": "an",
            "is_correct": true,
            "explanation": "",
            "topic": "Grammar"
        }]),
        topic_performance: json!({"Grammar": {"correct": 1, "total": 1}}),
    }
}

fn stats_after(total: i32, average: f64) -> UserStatsUpdate {
    UserStatsUpdate {
        english_level: EnglishLevel::Beginner,
        total_quizzes: total,
        average_score: average,
        progress: json!({"Grammar": 100.0}),
        has_completed_first_quiz: true,
        quizzes_since_level_change: total,
    }
}

#[test(tokio::test)]
async fn test_record_result_writes_quiz_and_user_together() {
    let db = &Database::connect("sqlite::memory:").await.unwrap();
    setup_schema(db).await.unwrap();

    let user = create_test_user(db).await;
    let quiz = Mutation::record_result(db, sample_quiz(user.id, 100), stats_after(1, 100.0))
        .await
        .unwrap();

    assert_eq!(quiz.user_id, user.id);
    assert_eq!(quiz.score, 100);

    let user = lingo_db::user::Query::find_by_id(db, user.id).await.unwrap().unwrap();
    assert_eq!(user.total_quizzes, 1);
    assert_eq!(user.average_score, 100.0);
    assert!(user.has_completed_first_quiz);
}

#[test(tokio::test)]
async fn test_record_result_rolls_back_for_unknown_user() {
    let db = &Database::connect("sqlite::memory:").await.unwrap();
    setup_schema(db).await.unwrap();

    let ghost = Uuid::new_v4();
    let result = Mutation::record_result(db, sample_quiz(ghost, 50), stats_after(1, 50.0)).await;
    assert!(result.is_err());

    // The quiz insert must not survive the failed user update.
    assert!(Query::find_chronological(db, ghost).await.unwrap().is_empty());
}

#[test(tokio::test)]
async fn test_chronological_and_recent_ordering() {
    let db = &Database::connect("sqlite::memory:").await.unwrap();
    setup_schema(db).await.unwrap();

    let user = create_test_user(db).await;
    for (i, score) in [60, 70, 80].into_iter().enumerate() {
        Mutation::record_result(db, sample_quiz(user.id, score), stats_after(i as i32 + 1, 0.0))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let chronological = Query::find_chronological(db, user.id).await.unwrap();
    assert_eq!(
        vec![60, 70, 80],
        chronological.iter().map(|q| q.score).collect::<Vec<_>>()
    );

    let recent = Query::find_recent(db, user.id, 2).await.unwrap();
    assert_eq!(vec![80, 70], recent.iter().map(|q| q.score).collect::<Vec<_>>());
}

#[test(tokio::test)]
async fn test_submitting_same_payload_twice_creates_two_records() {
    let db = &Database::connect("sqlite::memory:").await.unwrap();
    setup_schema(db).await.unwrap();

    let user = create_test_user(db).await;
    Mutation::record_result(db, sample_quiz(user.id, 75), stats_after(1, 75.0))
        .await
        .unwrap();
    Mutation::record_result(db, sample_quiz(user.id, 75), stats_after(2, 75.0))
        .await
        .unwrap();

    assert_eq!(2, Query::find_chronological(db, user.id).await.unwrap().len());
    let user = lingo_db::user::Query::find_by_id(db, user.id).await.unwrap().unwrap();
    assert_eq!(2, user.total_quizzes);
}
