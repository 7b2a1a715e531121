use axum::extract::Path;
use axum::routing::get;
use axum::{Extension, Json, Router};
use lingo_core::analytics;
use lingo_model::envelope::ApiResponse;
use lingo_model::performance::{DetailedPerformance, Performance};
use lingo_model::user::User;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::routes::error::PerformanceRouteError;
use crate::user::ExtractPrincipal;

pub(crate) fn create_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/user-profile/{user_id}", get(user_profile))
        .route("/user-performance/", get(user_performance))
        .route("/user-performance-detailed/", get(user_performance_detailed))
        .with_state(())
}

#[utoipa::path(
    get,
    path = "/api/user-profile/{user_id}",
    responses(
        (status = OK, body = ApiResponse<User>, description = "Profile projection"),
        (status = NOT_FOUND, description = "Unknown user"),
    ),
    tag = "performance",
    security(("token" = []))
)]
async fn user_profile(
    ExtractPrincipal(_principal): ExtractPrincipal,
    Extension(conn): Extension<DatabaseConnection>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<User>>, PerformanceRouteError> {
    let user = analytics::profile(&conn, user_id).await?;
    Ok(Json(ApiResponse::ok(user)))
}

#[utoipa::path(
    get,
    path = "/api/user-performance/",
    responses(
        (status = OK, body = ApiResponse<Performance>, description = "Metrics recomputed from quiz records"),
    ),
    tag = "performance",
    security(("token" = []))
)]
async fn user_performance(
    ExtractPrincipal(principal): ExtractPrincipal,
    Extension(conn): Extension<DatabaseConnection>,
) -> Result<Json<ApiResponse<Performance>>, PerformanceRouteError> {
    let performance = analytics::performance(&conn, principal.user_id).await?;
    Ok(Json(ApiResponse::ok(performance)))
}

#[utoipa::path(
    get,
    path = "/api/user-performance-detailed/",
    responses(
        (status = OK, body = ApiResponse<DetailedPerformance>, description = "Per-topic breakdown, level counts and quiz history"),
    ),
    tag = "performance",
    security(("token" = []))
)]
async fn user_performance_detailed(
    ExtractPrincipal(principal): ExtractPrincipal,
    Extension(conn): Extension<DatabaseConnection>,
) -> Result<Json<ApiResponse<DetailedPerformance>>, PerformanceRouteError> {
    let detailed = analytics::performance_detailed(&conn, principal.user_id).await?;
    Ok(Json(ApiResponse::ok(detailed)))
}
