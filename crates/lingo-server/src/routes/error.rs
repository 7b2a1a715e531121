use axum::Json;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use lingo_core::analytics::AnalyticsError;
use lingo_core::auth::error::AuthError;
use lingo_core::chat::ChatError;
use lingo_core::progression::error::ProgressionError;
use lingo_core::quiz::error::GenerateError;
use lingo_model::envelope::{ApiResponse, ErrorKind};

pub(crate) fn error_response(kind: ErrorKind, message: String) -> Response {
    (kind.status_code(), Json(ApiResponse::<()>::error(kind, message))).into_response()
}

#[derive(Debug, Error)]
pub(crate) enum AuthRouteError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
}

impl IntoResponse for AuthRouteError {
    fn into_response(self) -> Response {
        let kind = match &self {
            Self::Auth(error) => match error {
                AuthError::InvalidUsername | AuthError::WeakPassword => ErrorKind::InvalidInput,
                AuthError::UsernameTaken => ErrorKind::Conflict,
                AuthError::InvalidCredentials => ErrorKind::Unauthenticated,
                AuthError::UserNotFound => ErrorKind::NotFound,
                AuthError::Database(_) => ErrorKind::StoreUnavailable,
            },
            Self::Analytics(error) => analytics_kind(error),
        };
        error_response(kind, self.to_string())
    }
}

#[derive(Debug, Error)]
pub(crate) enum QuizRouteError {
    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error(transparent)]
    Progression(#[from] ProgressionError),
}

impl IntoResponse for QuizRouteError {
    fn into_response(self) -> Response {
        let kind = match &self {
            Self::Generate(error) => match error {
                GenerateError::InvalidQuestionCount => ErrorKind::InvalidInput,
                GenerateError::UserNotFound => ErrorKind::NotFound,
                GenerateError::Database(_) => ErrorKind::StoreUnavailable,
                GenerateError::BankEmpty => ErrorKind::Internal,
            },
            Self::Progression(error) => match error {
                ProgressionError::InvalidQuizStructure(_) => ErrorKind::InvalidInput,
                ProgressionError::UserNotFound => ErrorKind::NotFound,
                ProgressionError::Database(_) => ErrorKind::StoreUnavailable,
                ProgressionError::JsonColumn(_) => ErrorKind::Internal,
            },
        };
        error_response(kind, self.to_string())
    }
}

#[derive(Debug, Error)]
pub(crate) enum PerformanceRouteError {
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
}

impl IntoResponse for PerformanceRouteError {
    fn into_response(self) -> Response {
        let Self::Analytics(error) = &self;
        error_response(analytics_kind(error), self.to_string())
    }
}

#[derive(Debug, Error)]
pub(crate) enum ChatRouteError {
    #[error(transparent)]
    Chat(#[from] ChatError),
}

impl IntoResponse for ChatRouteError {
    fn into_response(self) -> Response {
        let Self::Chat(ChatError::Database(_)) = &self;
        error_response(ErrorKind::StoreUnavailable, self.to_string())
    }
}

fn analytics_kind(error: &AnalyticsError) -> ErrorKind {
    match error {
        AnalyticsError::UserNotFound => ErrorKind::NotFound,
        AnalyticsError::Database(_) => ErrorKind::StoreUnavailable,
        AnalyticsError::Convert(_) => ErrorKind::Internal,
    }
}
