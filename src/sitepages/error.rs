use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PageError {
    #[error("Page not found in '{domain}': {key}")]
    PageNotFound { domain: String, key: String },

    #[error("Invalid domain name: '{0}'")]
    InvalidDomain(String),

    #[error("Invalid page id: {0}")]
    InvalidId(i64),

    #[error("Page id {id} already exists in '{domain}'")]
    DuplicateId { domain: String, id: i64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt metadata document {}: {source}", path.display())]
    CorruptMetadata {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage root has not been set")]
    RootNotSet,

    #[error("Storage root already set to {}", .0.display())]
    RootAlreadySet(PathBuf),

    #[error("Store error: {0}")]
    Store(String),
}

impl PageError {
    pub fn not_found(domain: &str, key: impl Into<String>) -> Self {
        PageError::PageNotFound {
            domain: domain.to_string(),
            key: key.into(),
        }
    }

    /// True for lookups that matched nothing; every other variant is a real failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PageError::PageNotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, PageError>;
