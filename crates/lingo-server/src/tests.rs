use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use lingo_core::auth::{AuthConfig, SecurityConfig};
use lingo_core::llm_config::LlmConfig;
use lingo_core::progression::LevelPolicy;
use sea_orm::Database;
use serde_json::{Value, json};
use std::time::Duration;
use test_log::test;
use tower::ServiceExt;
use url::Url;

use crate::app::{AppConfig, create_app};

/// App wired to an in-memory store and an unreachable model endpoint, so
/// every generation exercises the fallback path quickly.
async fn test_app() -> Router {
    let pool = Database::connect("sqlite::memory:").await.unwrap();
    lingo_db::migration::setup_schema(&pool).await.unwrap();

    let llm_config = LlmConfig::new(
        Url::parse("http://127.0.0.1:9/v1").unwrap(),
        "test-model".to_owned(),
        Duration::from_secs(1),
        0.0,
        64,
    );
    let app_config = AppConfig::new(
        llm_config,
        AuthConfig {
            security: SecurityConfig::new("test-secret"),
            session_ttl_days: 7,
        },
        LevelPolicy {
            up_threshold: 75.0,
            down_threshold: 50.0,
            min_quizzes: 3,
        },
        4,
    );
    create_app(app_config, Vec::new(), pool).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn request(method: &str, path: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = body.map_or_else(Body::empty, |b| Body::from(b.to_string()));
    builder.body(body).unwrap()
}

async fn signup(app: &Router, username: &str) -> String {
    let (status, body) = send(
        app,
        request(
            "POST",
            "/api/auth/signup",
            None,
            Some(json!({"username": username, "password": "abcd1234"})),
        ),
    )
    .await;
    assert_eq!(StatusCode::OK, status);
    assert_eq!(true, body["success"]);
    body["data"]["session_token"].as_str().unwrap().to_owned()
}

fn answered_question(correct: bool) -> Value {
    json!({
        "question": "Pick the correct article",
        "options": ["a", "an", "the", "none"],
        "correct_answer": "an",
        "user_answer": if correct { "an" } else { "the" },
        "topic": "Grammar"
    })
}

#[test(tokio::test)]
async fn test_signup_validate_and_signin() {
    let app = test_app().await;
    let token = signup(&app, "test_435").await;

    let (status, body) = send(&app, request("GET", "/api/auth/validate", Some(&token), None)).await;
    assert_eq!(StatusCode::OK, status);
    assert_eq!("test_435", body["data"]["username"]);
    assert_eq!("beginner", body["data"]["english_level"]);
    assert_eq!(false, body["data"]["has_completed_first_quiz"]);

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/auth/signin",
            None,
            Some(json!({"username": "test_435", "password": "abcd1234"})),
        ),
    )
    .await;
    assert_eq!(StatusCode::OK, status);
    assert!(body["data"]["session_token"].as_str().is_some());

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/auth/signin",
            None,
            Some(json!({"username": "test_435", "password": "wrong000"})),
        ),
    )
    .await;
    assert_eq!(StatusCode::UNAUTHORIZED, status);
    assert_eq!(false, body["success"]);
    assert_eq!("unauthenticated", body["error"]["kind"]);
}

#[test(tokio::test)]
async fn test_signup_rejects_bad_input_and_duplicates() {
    let app = test_app().await;

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/auth/signup",
            None,
            Some(json!({"username": "x", "password": "abcd1234"})),
        ),
    )
    .await;
    assert_eq!(StatusCode::BAD_REQUEST, status);

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/auth/signup",
            None,
            Some(json!({"username": "valid_name", "password": "lettersonly"})),
        ),
    )
    .await;
    assert_eq!(StatusCode::BAD_REQUEST, status);

    signup(&app, "taken_name").await;
    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/auth/signup",
            None,
            Some(json!({"username": "taken_name", "password": "abcd1234"})),
        ),
    )
    .await;
    assert_eq!(StatusCode::CONFLICT, status);
    assert_eq!("conflict", body["error"]["kind"]);
}

#[test(tokio::test)]
async fn test_protected_routes_require_a_token() {
    let app = test_app().await;

    for path in ["/api/auth/validate", "/api/user-performance/", "/api/quiz-topics/"] {
        let (status, body) = send(&app, request("GET", path, None, None)).await;
        assert_eq!(StatusCode::UNAUTHORIZED, status, "path {path}");
        assert_eq!(false, body["success"]);
    }
}

#[test(tokio::test)]
async fn test_logout_invalidates_the_session() {
    let app = test_app().await;
    let token = signup(&app, "leaver").await;

    let (status, _) = send(&app, request("POST", "/api/auth/logout", Some(&token), None)).await;
    assert_eq!(StatusCode::OK, status);

    let (status, _) = send(&app, request("GET", "/api/auth/validate", Some(&token), None)).await;
    assert_eq!(StatusCode::UNAUTHORIZED, status);
}

#[test(tokio::test)]
async fn test_generate_quiz_falls_back_when_model_is_down() {
    let app = test_app().await;
    let token = signup(&app, "quiz_taker").await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/generate-adaptive-quiz/",
            Some(&token),
            Some(json!({"topic": "Grammar", "num_questions": 4})),
        ),
    )
    .await;
    assert_eq!(StatusCode::OK, status);
    assert_eq!(true, body["data"]["fallback"]);
    assert_eq!("beginner", body["data"]["generated_for_level"]);

    let questions = body["data"]["questions"].as_array().unwrap();
    assert_eq!(4, questions.len());
    for question in questions {
        assert_eq!(4, question["options"].as_array().unwrap().len());
        assert_eq!("beginner", question["difficulty"]);
        assert!(question.get("passage").is_none());
    }
}

#[test(tokio::test)]
async fn test_reading_fallback_shares_one_passage() {
    let app = test_app().await;
    let token = signup(&app, "reader").await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/generate-adaptive-quiz/",
            Some(&token),
            Some(json!({"topic": "Reading", "num_questions": 4})),
        ),
    )
    .await;
    assert_eq!(StatusCode::OK, status);

    let questions = body["data"]["questions"].as_array().unwrap();
    assert_eq!(4, questions.len());
    let passage = questions[0]["passage"].as_str().unwrap();
    assert!(passage.len() > 50);
    for question in questions {
        assert_eq!(passage, question["passage"].as_str().unwrap());
    }

    // Even when the request exceeds one passage set, the quiz never mixes
    // passages; it is capped at the set size instead.
    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/generate-adaptive-quiz/",
            Some(&token),
            Some(json!({"topic": "Reading", "num_questions": 10})),
        ),
    )
    .await;
    assert_eq!(StatusCode::OK, status);
    let questions = body["data"]["questions"].as_array().unwrap();
    assert!(!questions.is_empty());
    let passage = questions[0]["passage"].as_str().unwrap();
    for question in questions {
        assert_eq!(passage, question["passage"].as_str().unwrap());
    }
}

#[test(tokio::test)]
async fn test_generate_rejects_out_of_range_count() {
    let app = test_app().await;
    let token = signup(&app, "greedy").await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/generate-adaptive-quiz/",
            Some(&token),
            Some(json!({"topic": "Grammar", "num_questions": 11})),
        ),
    )
    .await;
    assert_eq!(StatusCode::BAD_REQUEST, status);
    assert_eq!("invalid_input", body["error"]["kind"]);
}

#[test(tokio::test)]
async fn test_evaluate_quiz_and_performance_consistency() {
    let app = test_app().await;
    let token = signup(&app, "learner").await;

    let questions = vec![
        answered_question(true),
        answered_question(true),
        answered_question(true),
        answered_question(false),
    ];
    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/evaluate-quiz/",
            Some(&token),
            Some(json!({"quiz_data": {"questions": questions}, "score": 75, "topic": "Grammar"})),
        ),
    )
    .await;
    assert_eq!(StatusCode::OK, status);
    assert_eq!(75, body["data"]["score"]);
    assert_eq!(1, body["data"]["total_quizzes"]);
    assert_eq!(75.0, body["data"]["average_score"]);
    assert_eq!(true, body["data"]["has_completed_first_quiz"]);
    assert_eq!(false, body["data"]["level_changed"]);

    let (_, performance) = send(&app, request("GET", "/api/user-performance/", Some(&token), None)).await;
    let (_, profile) = send(&app, request("GET", "/api/auth/profile", Some(&token), None)).await;
    assert_eq!(
        performance["data"]["total_quizzes"],
        profile["data"]["total_quizzes"]
    );
    assert_eq!(
        performance["data"]["average_score"],
        profile["data"]["average_score"]
    );
    assert_eq!(75.0, performance["data"]["average_score"]);

    let (_, validate) = send(&app, request("GET", "/api/auth/validate", Some(&token), None)).await;
    assert_eq!(true, validate["data"]["has_completed_first_quiz"]);
}

#[test(tokio::test)]
async fn test_evaluate_rejects_malformed_quiz() {
    let app = test_app().await;
    let token = signup(&app, "sloppy").await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/evaluate-quiz/",
            Some(&token),
            Some(json!({"quiz_data": {"questions": []}, "score": 0, "topic": "Grammar"})),
        ),
    )
    .await;
    assert_eq!(StatusCode::BAD_REQUEST, status);
    assert_eq!("invalid_input", body["error"]["kind"]);
}

#[test(tokio::test)]
async fn test_quiz_topics_catalog() {
    let app = test_app().await;
    let token = signup(&app, "curious").await;

    let (status, body) = send(&app, request("GET", "/api/quiz-topics/", Some(&token), None)).await;
    assert_eq!(StatusCode::OK, status);
    let topics = body["data"]["topics"].as_array().unwrap();
    assert_eq!(6, topics.len());
    assert!(topics.iter().any(|t| t["name"] == "Mixed"));
}

#[test(tokio::test)]
async fn test_change_password_revokes_old_sessions() {
    let app = test_app().await;
    let token = signup(&app, "rotator").await;

    let (status, body) = send(
        &app,
        request(
            "PUT",
            "/api/auth/profile/password",
            Some(&token),
            Some(json!({"current_password": "abcd1234", "new_password": "efgh5678"})),
        ),
    )
    .await;
    assert_eq!(StatusCode::OK, status);
    let fresh_token = body["data"]["session_token"].as_str().unwrap().to_owned();

    // The old session is gone, the fresh one works.
    let (status, _) = send(&app, request("GET", "/api/auth/validate", Some(&token), None)).await;
    assert_eq!(StatusCode::UNAUTHORIZED, status);
    let (status, _) = send(&app, request("GET", "/api/auth/validate", Some(&fresh_token), None)).await;
    assert_eq!(StatusCode::OK, status);
}

#[test(tokio::test)]
async fn test_delete_account_cascades() {
    let app = test_app().await;
    let token = signup(&app, "departing").await;

    let (status, _) = send(
        &app,
        request(
            "DELETE",
            "/api/auth/profile",
            Some(&token),
            Some(json!({"password": "abcd1234"})),
        ),
    )
    .await;
    assert_eq!(StatusCode::OK, status);

    let (status, _) = send(&app, request("GET", "/api/auth/validate", Some(&token), None)).await;
    assert_eq!(StatusCode::UNAUTHORIZED, status);

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/auth/signin",
            None,
            Some(json!({"username": "departing", "password": "abcd1234"})),
        ),
    )
    .await;
    assert_eq!(StatusCode::UNAUTHORIZED, status);
}

#[test(tokio::test)]
async fn test_health_check_reports_unreachable_model() {
    let app = test_app().await;

    let (status, body) = send(&app, request("GET", "/api/health-check/", None, None)).await;
    assert_eq!(StatusCode::SERVICE_UNAVAILABLE, status);
    assert_eq!("unhealthy", body["data"]["status"]);
}

#[test(tokio::test)]
async fn test_model_info_serves_configured_catalogue() {
    let app = test_app().await;
    let token = signup(&app, "operator").await;

    let (status, body) = send(&app, request("GET", "/api/model-info/", Some(&token), None)).await;
    assert_eq!(StatusCode::OK, status);
    assert_eq!("test-model", body["data"]["current_model"]);
    assert_eq!(1, body["data"]["timeout"]);
}
