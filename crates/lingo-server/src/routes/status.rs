use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use http::StatusCode;
use lingo_core::{openai, status};
use lingo_model::envelope::ApiResponse;
use lingo_model::status::{Health, ModelInfo};
use sea_orm::DatabaseConnection;
use tracing::instrument;

use crate::app::AppConfig;
use crate::user::ExtractPrincipal;

pub(crate) fn create_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/health-check/", get(health_check))
        .route("/model-info/", get(model_info))
        .with_state(())
}

#[utoipa::path(
    get,
    path = "/api/health-check/",
    responses(
        (status = OK, body = ApiResponse<Health>, description = "Store and model reachable"),
        (status = SERVICE_UNAVAILABLE, body = ApiResponse<Health>, description = "A dependency is down"),
    ),
    tag = "util"
)]
#[instrument(skip_all)]
async fn health_check(
    Extension(conn): Extension<DatabaseConnection>,
    Extension(app_config): Extension<AppConfig>,
) -> Response {
    let health = status::health(&conn, app_config.llm_config()).await;
    let status_code = if health.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status_code, Json(ApiResponse::ok(health))).into_response()
}

#[utoipa::path(
    get,
    path = "/api/model-info/",
    responses(
        (status = OK, body = ApiResponse<ModelInfo>, description = "Current model configuration and available models"),
    ),
    tag = "util",
    security(("token" = []))
)]
#[instrument(skip_all)]
async fn model_info(
    ExtractPrincipal(_principal): ExtractPrincipal,
    Extension(app_config): Extension<AppConfig>,
) -> Json<ApiResponse<ModelInfo>> {
    let llm_config = app_config.llm_config();
    // Prefer the endpoint's own catalogue, fall back to the configured one.
    let live_models = match openai::list_models(llm_config).await {
        Ok(models) if !models.is_empty() => Some(models),
        Ok(_) => None,
        Err(error) => {
            tracing::debug!(error = &error as &dyn std::error::Error, "model listing unavailable");
            None
        }
    };
    Json(ApiResponse::ok(llm_config.model_info(live_models)))
}
