use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("invalid json column: {0}")]
    JsonColumn(#[from] serde_json::Error),
}
