use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::user::EnglishLevel;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SignUpRequest {
    #[schema(example = "night_owl_42")]
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SignInRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateUsernameRequest {
    pub new_username: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DeleteAccountRequest {
    pub password: String,
}

/// Returned by both signup and signin.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthData {
    pub user_id: Uuid,
    pub session_token: String,
    pub username: String,
    pub english_level: EnglishLevel,
}

/// Returned by a password change: the single fresh session that replaces
/// the revoked ones.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PasswordChangeData {
    pub session_token: String,
}
