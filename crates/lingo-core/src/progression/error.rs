use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProgressionError {
    #[error("invalid quiz structure: {0}")]
    InvalidQuizStructure(String),

    #[error("user not found")]
    UserNotFound,

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("invalid json column: {0}")]
    JsonColumn(#[from] serde_json::Error),
}
