use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Username must be 3-20 characters, alphanumeric and underscore only")]
    InvalidUsername,

    #[error("Password must be at least 8 characters with letters and numbers")]
    WeakPassword,

    #[error("Username already exists")]
    UsernameTaken,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}
