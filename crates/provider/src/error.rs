use database::DbError;
use thiserror::Error;

/// The two failure modes a caller can meaningfully react to: the store is
/// reachable but has no such row, or the store itself cannot answer. The
/// distinction is what lets the failover layer substitute synthetic data
/// only for the latter.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("No data for symbol {0}")]
    NotFound(String),

    #[error("Price/profile provider unavailable: {0}")]
    Unavailable(String),
}

impl From<DbError> for ProviderError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound => ProviderError::NotFound(String::new()),
            other => ProviderError::Unavailable(other.to_string()),
        }
    }
}
