use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// The chat platform rejected or failed a call.
    #[error("chat platform error: {0}")]
    Upstream(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn upstream(err: anyhow::Error) -> Self {
        AppError::Upstream(err.to_string())
    }
}
