//! Shared error type for document store adapters.

use thiserror::Error;

/// Failures raised by document store adapters.
///
/// All collections live in the same hosted store, so the repositories share
/// one error taxonomy: the backend could not be reached, the operation was
/// rejected, or a stored document could not be decoded into a domain record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("document store unreachable: {message}")]
    Connection {
        /// Transport-level detail.
        message: String,
    },
    /// The store rejected or failed the operation.
    #[error("document store operation failed: {message}")]
    Query {
        /// Store-reported detail.
        message: String,
    },
    /// A stored document could not be decoded into a domain record.
    #[error("stored document is malformed: {message}")]
    Decode {
        /// Decoding detail.
        message: String,
    },
}

impl StoreError {
    /// Build a [`StoreError::Connection`].
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Build a [`StoreError::Query`].
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Build a [`StoreError::Decode`].
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

impl From<StoreError> for crate::domain::Error {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Connection { message } => {
                Self::service_unavailable(format!("document store unreachable: {message}"))
            }
            StoreError::Query { message } => {
                Self::internal(format!("document store operation failed: {message}"))
            }
            StoreError::Decode { message } => {
                Self::internal(format!("stored document is malformed: {message}"))
            }
        }
    }
}
