use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use lingo_core::locks::UserLocks;
use lingo_core::progression::submit_quiz;
use lingo_core::quiz::generate_quiz;
use lingo_model::envelope::ApiResponse;
use lingo_model::quiz::{AdaptiveQuizRequest, Evaluation, GeneratedQuiz, QuizSubmission};
use lingo_model::topic::TopicCatalog;
use sea_orm::DatabaseConnection;

use crate::app::AppConfig;
use crate::routes::error::QuizRouteError;
use crate::user::ExtractPrincipal;

pub(crate) fn create_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/quiz-topics/", get(quiz_topics))
        .route("/generate-adaptive-quiz/", post(generate_adaptive_quiz))
        .route("/evaluate-quiz/", post(evaluate_quiz))
        .with_state(())
}

#[utoipa::path(
    get,
    path = "/api/quiz-topics/",
    responses(
        (status = OK, body = ApiResponse<TopicCatalog>, description = "Available topics with subtopics and levels"),
    ),
    tag = "quiz",
    security(("token" = []))
)]
async fn quiz_topics(ExtractPrincipal(_principal): ExtractPrincipal) -> Json<ApiResponse<TopicCatalog>> {
    Json(ApiResponse::ok(TopicCatalog::all()))
}

#[utoipa::path(
    post,
    path = "/api/generate-adaptive-quiz/",
    request_body = AdaptiveQuizRequest,
    responses(
        (status = OK, body = ApiResponse<GeneratedQuiz>, description = "Personalized quiz; drawn from the static bank when the model path fails"),
        (status = BAD_REQUEST, description = "Question count out of range"),
    ),
    tag = "quiz",
    security(("token" = []))
)]
async fn generate_adaptive_quiz(
    ExtractPrincipal(principal): ExtractPrincipal,
    Extension(conn): Extension<DatabaseConnection>,
    Extension(app_config): Extension<AppConfig>,
    Json(payload): Json<AdaptiveQuizRequest>,
) -> Result<Json<ApiResponse<GeneratedQuiz>>, QuizRouteError> {
    let num_questions = payload.num_questions.unwrap_or_else(|| app_config.default_quiz_questions());
    let quiz = generate_quiz(
        &conn,
        app_config.llm_config(),
        principal.user_id,
        payload.topic,
        num_questions,
    )
    .await?;
    Ok(Json(ApiResponse::ok(quiz)))
}

#[utoipa::path(
    post,
    path = "/api/evaluate-quiz/",
    request_body = QuizSubmission,
    responses(
        (status = OK, body = ApiResponse<Evaluation>, description = "Quiz recorded; score, averages and level transition evaluated"),
        (status = BAD_REQUEST, description = "Invalid quiz structure"),
    ),
    tag = "quiz",
    security(("token" = []))
)]
async fn evaluate_quiz(
    ExtractPrincipal(principal): ExtractPrincipal,
    Extension(conn): Extension<DatabaseConnection>,
    Extension(app_config): Extension<AppConfig>,
    Extension(locks): Extension<UserLocks>,
    Json(payload): Json<QuizSubmission>,
) -> Result<Json<ApiResponse<Evaluation>>, QuizRouteError> {
    let evaluation = submit_quiz(&conn, &locks, app_config.policy(), principal.user_id, payload).await?;
    Ok(Json(ApiResponse::ok(evaluation)))
}
