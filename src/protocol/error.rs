//! Protocol error types

use thiserror::Error;

/// Protocol and configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Device id cannot be carried in the sender field
    #[error("invalid device id {id:?}: {reason}")]
    InvalidDeviceId {
        /// Rejected id
        id: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// Application prefix cannot be told apart from other traffic
    #[error("invalid application prefix {prefix:?}: {reason}")]
    InvalidPrefix {
        /// Rejected prefix
        prefix: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// Obfuscation passphrase is empty
    #[error("obfuscation passphrase must not be empty")]
    EmptyPassphrase,

    /// Message text is empty and cannot be framed
    #[error("message payload must not be empty")]
    EmptyPayload,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
