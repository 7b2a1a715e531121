use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("requested question count must be between 1 and 10")]
    InvalidQuestionCount,

    #[error("user not found")]
    UserNotFound,

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// Configuration bug: the static bank must cover every level.
    #[error("fallback bank has no questions for this level")]
    BankEmpty,
}
