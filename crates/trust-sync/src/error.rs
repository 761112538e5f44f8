//! Error types for trust-sync.
//!
//! Store failures are strongly typed and propagated without panicking.
//! Schema mismatches are not errors: dumps report them as `Ok(false)`.
//! Private key material is never included in error messages.

/// Errors raised while reconciling or persisting trust state.
#[derive(Debug, thiserror::Error)]
pub enum TrustError {
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Unknown acceptance status code: {0}")]
    InvalidStatusCode(u8),

    #[error("Unknown acceptance name: {0}")]
    InvalidAcceptance(String),

    #[error("Invalid peer name: {0:?}")]
    InvalidName(String),

    #[error("Key store error: {0}")]
    Store(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid file format: {0}")]
    InvalidFileFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, TrustError>;
