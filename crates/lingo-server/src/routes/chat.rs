use axum::routing::post;
use axum::{Extension, Json, Router};
use lingo_core::chat;
use lingo_model::chat::{AskAnswer, AskQuestionRequest, ChatReply, ChatRequest, TeacherChatRequest};
use lingo_model::envelope::ApiResponse;
use sea_orm::DatabaseConnection;

use crate::app::AppConfig;
use crate::routes::error::ChatRouteError;
use crate::user::ExtractPrincipal;

pub(crate) fn create_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/chat/", post(chat_handler))
        .route("/teacher-chat/", post(teacher_chat))
        .route("/ask-question/", post(ask_question))
        .with_state(())
}

#[utoipa::path(
    post,
    path = "/api/chat/",
    request_body = ChatRequest,
    responses(
        (status = OK, body = ApiResponse<ChatReply>, description = "Tutor reply; an apology string when the model is unreachable"),
    ),
    tag = "chat",
    security(("token" = []))
)]
async fn chat_handler(
    ExtractPrincipal(_principal): ExtractPrincipal,
    Extension(app_config): Extension<AppConfig>,
    Json(payload): Json<ChatRequest>,
) -> Json<ApiResponse<ChatReply>> {
    let reply = chat::chat(app_config.llm_config(), &payload.conversation).await;
    Json(ApiResponse::ok(reply))
}

#[utoipa::path(
    post,
    path = "/api/teacher-chat/",
    request_body = TeacherChatRequest,
    responses(
        (status = OK, body = ApiResponse<ChatReply>, description = "Teacher-mode reply tuned to level and focus"),
    ),
    tag = "chat",
    security(("token" = []))
)]
async fn teacher_chat(
    ExtractPrincipal(_principal): ExtractPrincipal,
    Extension(app_config): Extension<AppConfig>,
    Json(payload): Json<TeacherChatRequest>,
) -> Json<ApiResponse<ChatReply>> {
    let reply = chat::teacher_chat(
        app_config.llm_config(),
        &payload.message,
        payload.user_level,
        payload.focus.as_deref(),
    )
    .await;
    Json(ApiResponse::ok(reply))
}

#[utoipa::path(
    post,
    path = "/api/ask-question/",
    request_body = AskQuestionRequest,
    responses(
        (status = OK, body = ApiResponse<AskAnswer>, description = "Answer grounded in the provided context; the exchange is appended to the Q&A history"),
    ),
    tag = "chat",
    security(("token" = []))
)]
async fn ask_question(
    ExtractPrincipal(principal): ExtractPrincipal,
    Extension(conn): Extension<DatabaseConnection>,
    Extension(app_config): Extension<AppConfig>,
    Json(payload): Json<AskQuestionRequest>,
) -> Result<Json<ApiResponse<AskAnswer>>, ChatRouteError> {
    let answer = chat::ask_question(
        &conn,
        app_config.llm_config(),
        principal.user_id,
        &payload.question,
        &payload.context,
    )
    .await?;
    Ok(Json(ApiResponse::ok(answer)))
}
