use thiserror::Error;

/// Message shown when the server gave no usable error body.
pub const GENERIC_FETCH_MESSAGE: &str = "Server error while fetching tickets";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    AuthFailure(String),

    #[error("{}", .message.as_deref().unwrap_or(GENERIC_FETCH_MESSAGE))]
    FetchFailure { message: Option<String> },

    #[error("Malformed ticket record at index {index}: {reason}")]
    MalformedRecord { index: usize, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse failure category exposed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureKind {
    Auth,
    Fetch,
    Malformed,
    Other,
}

impl AppError {
    pub fn kind(&self) -> FailureKind {
        match self {
            AppError::AuthFailure(_) => FailureKind::Auth,
            AppError::FetchFailure { .. } | AppError::Http(_) => FailureKind::Fetch,
            AppError::MalformedRecord { .. } => FailureKind::Malformed,
            AppError::Serde(_) | AppError::Io(_) | AppError::Config(_) => FailureKind::Other,
        }
    }
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
