use bss_core::DomainError;
use thiserror::Error;

/// Storage/repository errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("codec error for {key}: {message}")]
    Codec { key: String, message: String },

    #[error("seed error: {0}")]
    Seed(String),

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    pub fn codec(key: impl Into<String>, err: impl core::fmt::Display) -> Self {
        Self::Codec {
            key: key.into(),
            message: err.to_string(),
        }
    }

    pub fn not_found(kind: &'static str, id: impl core::fmt::Display) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

pub(crate) fn map_sqlx_error(op: &'static str, err: sqlx::Error) -> StoreError {
    StoreError::Backend(format!("{op}: {err}"))
}
