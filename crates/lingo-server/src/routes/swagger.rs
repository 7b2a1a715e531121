use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use super::{auth, chat, performance, quiz, status};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "token",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some("Session token from signup or signin"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::signup,
        auth::signin,
        auth::logout,
        auth::validate,
        auth::profile,
        auth::update_username,
        auth::change_password,
        auth::delete_account,
        quiz::quiz_topics,
        quiz::generate_adaptive_quiz,
        quiz::evaluate_quiz,
        performance::user_profile,
        performance::user_performance,
        performance::user_performance_detailed,
        chat::chat_handler,
        chat::teacher_chat,
        chat::ask_question,
        status::health_check,
        status::model_info,
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Account and session management"),
        (name = "quiz", description = "Adaptive quiz generation and evaluation"),
        (name = "performance", description = "Progress analytics"),
        (name = "chat", description = "Tutor conversation"),
        (name = "util", description = "Operational endpoints"),
    )
)]
struct ApiDoc;

pub(crate) fn create_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(())
}
