use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Insufficient data: need {required} bars, got {provided}")]
    InsufficientData { required: usize, provided: usize },

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Invalid series: {0}")]
    InvalidSeries(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl AppError {
    /// Whether the error came from the data collaborator rather than the series itself.
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            AppError::Provider(_) | AppError::Reqwest(_) | AppError::SerdeJson(_) | AppError::Anyhow(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
