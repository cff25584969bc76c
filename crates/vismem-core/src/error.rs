use thiserror::Error;

#[derive(Debug, Error)]
pub enum VismemError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Non-success status from the backend, with the `detail` field of a
    /// structured error body when one was present.
    #[error("Backend error {status}: {detail}")]
    Remote { status: u16, detail: String },

    #[error("No authentication token found")]
    MissingToken,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl VismemError {
    /// Local precondition failures: no network call was made and no
    /// operation flag was ever set.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingToken | Self::InvalidInput(_) | Self::Config(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, VismemError>;
