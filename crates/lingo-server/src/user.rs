use axum::extract::FromRequestParts;
use axum::{Extension, Json, RequestPartsExt};
use axum_auth::AuthBearer;
use http::StatusCode;
use http::request::Parts;
use lingo_db::{session, user};
use lingo_model::envelope::{ApiResponse, ErrorKind};
use lingo_model::user::Principal;
use lingo_model_tools::convert::IntoModel;
use sea_orm::DatabaseConnection;
use std::error::Error;

pub(crate) type Rejection = (StatusCode, Json<ApiResponse<()>>);

pub(crate) fn rejection(kind: ErrorKind, message: &'static str) -> Rejection {
    (kind.status_code(), Json(ApiResponse::error(kind, message)))
}

/// The validated session principal. Resolved once per request and cached
/// in the request extensions so stacked extractors don't re-query.
#[derive(Clone)]
pub(crate) struct Session {
    principal: Principal,
    token: String,
}

#[derive(Clone)]
pub(crate) struct ExtractPrincipal(pub Principal);

/// The raw bearer token of the authenticated request (sign-out needs it).
#[derive(Clone)]
pub(crate) struct ExtractToken(pub String);

impl Session {
    async fn resolve(parts: &mut Parts) -> Result<Self, Rejection> {
        if let Some(cached) = parts.extensions.get::<Session>() {
            return Ok(cached.clone());
        }

        let Ok(AuthBearer(token)) = parts.extract::<AuthBearer>().await else {
            return Err(rejection(ErrorKind::Unauthenticated, "No authentication token provided"));
        };

        let Extension::<DatabaseConnection>(conn) =
            parts.extract::<Extension<DatabaseConnection>>().await.map_err(|error| {
                tracing::error!(error = &error as &dyn Error, "database connection not found in app data");
                rejection(ErrorKind::Internal, "Database connection not found")
            })?;

        let session = match session::Query::find_valid(&conn, &token).await {
            Ok(Some(session)) => session,
            Ok(None) => return Err(rejection(ErrorKind::Unauthenticated, "Invalid or expired session")),
            Err(error) => {
                tracing::error!(error = &error as &dyn Error, "error validating session");
                return Err(rejection(ErrorKind::StoreUnavailable, "Error validating session"));
            }
        };

        let found = match user::Query::find_by_id(&conn, session.user_id).await {
            Ok(Some(found)) => found,
            // The session outlived its user; treat it as revoked.
            Ok(None) => return Err(rejection(ErrorKind::Unauthenticated, "Invalid or expired session")),
            Err(error) => {
                tracing::error!(error = &error as &dyn Error, "error loading session user");
                return Err(rejection(ErrorKind::StoreUnavailable, "Error loading user"));
            }
        };

        let session = Self {
            principal: found.into_model(),
            token,
        };
        parts.extensions.insert(session.clone());
        Ok(session)
    }
}

impl<S> FromRequestParts<S> for ExtractPrincipal
where
    S: Send + Sync,
{
    type Rejection = Rejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::resolve(parts).await?;
        Ok(Self(session.principal))
    }
}

impl<S> FromRequestParts<S> for ExtractToken
where
    S: Send + Sync,
{
    type Rejection = Rejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::resolve(parts).await?;
        Ok(Self(session.token))
    }
}
