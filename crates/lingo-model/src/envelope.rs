use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use utoipa::ToSchema;

/// Uniform response wrapper carried by every endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: Cow<'static, str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    Unauthenticated,
    Forbidden,
    NotFound,
    Conflict,
    AiUnavailable,
    StoreUnavailable,
    Internal,
}

impl ErrorKind {
    #[must_use]
    pub fn status_code(self) -> StatusCode {
        match self {
            Self::InvalidInput => StatusCode::BAD_REQUEST,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            // AI failures are absorbed by fallback paths and never surface
            // as a failed request.
            Self::AiUnavailable => StatusCode::OK,
            Self::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error<M: Into<Cow<'static, str>>>(kind: ErrorKind, message: M) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                kind,
                message: message.into(),
            }),
        }
    }
}

impl ApiResponse<()> {
    #[must_use]
    pub fn success() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_ok() {
        let response = ApiResponse::ok(42);
        assert_eq!(
            r#"{"success":true,"data":42}"#,
            serde_json::to_string(&response).unwrap()
        );
    }

    #[test]
    fn test_serialize_error() {
        let response = ApiResponse::<()>::error(ErrorKind::Conflict, "Username already exists");
        assert_eq!(
            r#"{"success":false,"error":{"kind":"conflict","message":"Username already exists"}}"#,
            serde_json::to_string(&response).unwrap()
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(StatusCode::BAD_REQUEST, ErrorKind::InvalidInput.status_code());
        assert_eq!(StatusCode::UNAUTHORIZED, ErrorKind::Unauthenticated.status_code());
        assert_eq!(StatusCode::CONFLICT, ErrorKind::Conflict.status_code());
        assert_eq!(StatusCode::OK, ErrorKind::AiUnavailable.status_code());
    }
}
