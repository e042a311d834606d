use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{message}")]
    Validation {
        message: String,
        valid: Option<Vec<String>>,
    },

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            valid: None,
        }
    }

    /// A validation failure on an enumerated field, carrying the accepted values.
    pub fn invalid_choice(message: impl Into<String>, valid: &[&str]) -> Self {
        Self::Validation {
            message: message.into(),
            valid: Some(valid.iter().map(|v| v.to_string()).collect()),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    pub fn is_embedding(&self) -> bool {
        matches!(self, Self::Embedding(_))
    }

    /// Re-tags a failure raised while embedding so callers can tell it apart
    /// from store or internal failures.
    pub fn into_embedding(self) -> Self {
        match self {
            Self::Embedding(_) => self,
            other => Self::Embedding(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
