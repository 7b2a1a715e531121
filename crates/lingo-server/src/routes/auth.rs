use axum::routing::{get, post, put};
use axum::{Extension, Json, Router};
use lingo_core::auth;
use lingo_core::locks::UserLocks;
use lingo_model::auth::{
    AuthData, ChangePasswordRequest, DeleteAccountRequest, PasswordChangeData, SignInRequest, SignUpRequest,
    UpdateUsernameRequest,
};
use lingo_model::envelope::ApiResponse;
use lingo_model::user::{Principal, User};
use lingo_model_tools::convert::IntoModel;
use sea_orm::DatabaseConnection;

use crate::app::AppConfig;
use crate::routes::error::AuthRouteError;
use crate::user::{ExtractPrincipal, ExtractToken};

pub(crate) fn create_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
        .route("/logout", post(logout))
        .route("/validate", get(validate))
        .nest(
            "/profile",
            Router::new()
                .route("/", get(profile).delete(delete_account))
                .route("/username", put(update_username))
                .route("/password", put(change_password)),
        )
        .with_state(())
}

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignUpRequest,
    responses(
        (status = OK, body = ApiResponse<AuthData>, description = "Account created, session issued"),
        (status = BAD_REQUEST, description = "Invalid username or weak password"),
        (status = CONFLICT, description = "Username already exists"),
    ),
    tag = "auth"
)]
async fn signup(
    Extension(conn): Extension<DatabaseConnection>,
    Extension(app_config): Extension<AppConfig>,
    Json(payload): Json<SignUpRequest>,
) -> Result<Json<ApiResponse<AuthData>>, AuthRouteError> {
    let (user, session) = auth::register(&conn, app_config.auth(), &payload.username, &payload.password).await?;
    Ok(Json(ApiResponse::ok(AuthData {
        user_id: user.id,
        session_token: session.token,
        username: user.username,
        english_level: user.english_level.into_model(),
    })))
}

#[utoipa::path(
    post,
    path = "/api/auth/signin",
    request_body = SignInRequest,
    responses(
        (status = OK, body = ApiResponse<AuthData>, description = "Signed in, session issued"),
        (status = UNAUTHORIZED, description = "Invalid credentials"),
    ),
    tag = "auth"
)]
async fn signin(
    Extension(conn): Extension<DatabaseConnection>,
    Extension(app_config): Extension<AppConfig>,
    Json(payload): Json<SignInRequest>,
) -> Result<Json<ApiResponse<AuthData>>, AuthRouteError> {
    let (user, session) = auth::sign_in(&conn, app_config.auth(), &payload.username, &payload.password).await?;
    Ok(Json(ApiResponse::ok(AuthData {
        user_id: user.id,
        session_token: session.token,
        username: user.username,
        english_level: user.english_level.into_model(),
    })))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = OK, description = "Session revoked (idempotent)"),
        (status = UNAUTHORIZED, description = "Not authenticated"),
    ),
    tag = "auth",
    security(("token" = []))
)]
async fn logout(
    ExtractToken(token): ExtractToken,
    Extension(conn): Extension<DatabaseConnection>,
) -> Result<Json<ApiResponse<()>>, AuthRouteError> {
    auth::sign_out(&conn, &token).await?;
    Ok(Json(ApiResponse::success()))
}

#[utoipa::path(
    get,
    path = "/api/auth/validate",
    responses(
        (status = OK, body = ApiResponse<Principal>, description = "Session is valid"),
        (status = UNAUTHORIZED, description = "Invalid or expired session"),
    ),
    tag = "auth",
    security(("token" = []))
)]
async fn validate(ExtractPrincipal(principal): ExtractPrincipal) -> Json<ApiResponse<Principal>> {
    Json(ApiResponse::ok(principal))
}

#[utoipa::path(
    get,
    path = "/api/auth/profile",
    responses(
        (status = OK, body = ApiResponse<User>, description = "Profile projection of the signed-in user"),
    ),
    tag = "auth",
    security(("token" = []))
)]
async fn profile(
    ExtractPrincipal(principal): ExtractPrincipal,
    Extension(conn): Extension<DatabaseConnection>,
) -> Result<Json<ApiResponse<User>>, AuthRouteError> {
    let user = lingo_core::analytics::profile(&conn, principal.user_id).await?;
    Ok(Json(ApiResponse::ok(user)))
}

#[utoipa::path(
    put,
    path = "/api/auth/profile/username",
    request_body = UpdateUsernameRequest,
    responses(
        (status = OK, description = "Username updated"),
        (status = CONFLICT, description = "Username already exists"),
    ),
    tag = "auth",
    security(("token" = []))
)]
async fn update_username(
    ExtractPrincipal(principal): ExtractPrincipal,
    Extension(conn): Extension<DatabaseConnection>,
    Json(payload): Json<UpdateUsernameRequest>,
) -> Result<Json<ApiResponse<()>>, AuthRouteError> {
    auth::update_username(&conn, principal.user_id, &payload.new_username).await?;
    Ok(Json(ApiResponse::success()))
}

#[utoipa::path(
    put,
    path = "/api/auth/profile/password",
    request_body = ChangePasswordRequest,
    responses(
        (status = OK, body = ApiResponse<PasswordChangeData>, description = "Password rotated, all sessions revoked, fresh session returned"),
        (status = UNAUTHORIZED, description = "Current password incorrect"),
    ),
    tag = "auth",
    security(("token" = []))
)]
async fn change_password(
    ExtractPrincipal(principal): ExtractPrincipal,
    Extension(conn): Extension<DatabaseConnection>,
    Extension(app_config): Extension<AppConfig>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<PasswordChangeData>>, AuthRouteError> {
    let session = auth::change_password(
        &conn,
        app_config.auth(),
        principal.user_id,
        &payload.current_password,
        &payload.new_password,
    )
    .await?;
    Ok(Json(ApiResponse::ok(PasswordChangeData {
        session_token: session.token,
    })))
}

#[utoipa::path(
    delete,
    path = "/api/auth/profile",
    request_body = DeleteAccountRequest,
    responses(
        (status = OK, description = "Account and all owned records deleted"),
        (status = UNAUTHORIZED, description = "Password incorrect"),
    ),
    tag = "auth",
    security(("token" = []))
)]
async fn delete_account(
    ExtractPrincipal(principal): ExtractPrincipal,
    Extension(conn): Extension<DatabaseConnection>,
    Extension(app_config): Extension<AppConfig>,
    Extension(locks): Extension<UserLocks>,
    Json(payload): Json<DeleteAccountRequest>,
) -> Result<Json<ApiResponse<()>>, AuthRouteError> {
    auth::delete_account(&conn, app_config.auth(), principal.user_id, &payload.password).await?;
    locks.forget(principal.user_id);
    Ok(Json(ApiResponse::success()))
}
