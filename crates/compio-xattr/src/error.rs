//! Error type for the async xattr operations

use std::any::Any;
use std::io;
use thiserror::Error;
use xattr_compat::XattrError;

/// Result type for async xattr operations
pub type Result<T> = std::result::Result<T, AsyncXattrError>;

/// Errors from async xattr operations
#[derive(Debug, Error)]
pub enum AsyncXattrError {
    /// The attribute call itself failed
    #[error(transparent)]
    Xattr(#[from] XattrError),

    /// The descriptor could not be handed to the blocking pool
    #[error("failed to duplicate file descriptor: {0}")]
    Dup(#[source] io::Error),

    /// The blocking task panicked
    #[error("blocking xattr task panicked")]
    SpawnJoin(Box<dyn Any + Send>),
}

impl AsyncXattrError {
    /// The errno behind the failure, when there is one
    #[must_use]
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            Self::Xattr(e) => e.raw_os_error(),
            Self::Dup(e) => e.raw_os_error(),
            Self::SpawnJoin(_) => None,
        }
    }

    /// Whether the attribute does not exist
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Xattr(e) if e.is_not_found())
    }
}

impl From<AsyncXattrError> for io::Error {
    fn from(err: AsyncXattrError) -> Self {
        match err {
            AsyncXattrError::Xattr(e) => e.into(),
            AsyncXattrError::Dup(e) => e,
            AsyncXattrError::SpawnJoin(_) => io::Error::other("blocking xattr task panicked"),
        }
    }
}
