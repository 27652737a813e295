use crate::{codec::CodecError, config::ConfigError, schema::SchemaError, session::StoreError};
use derive_more::Display;
use thiserror::Error as ThisError;

///
/// Error
///
/// Every failure surfaced by a repository.
/// Construction-time variants (`Schema`, `UnsupportedType`, `Config`) mean
/// the repository was never built; the rest are returned per call.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("field '{field}' has unsupported type '{type_name}'")]
    UnsupportedType { field: String, type_name: String },

    #[error("repository for '{entity}' used before initialize()")]
    NotInitialized { entity: &'static str },

    #[error("key has {found} value(s) but the partition key has {expected} column(s)")]
    KeyShapeMismatch { expected: usize, found: usize },

    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Passed through unchanged from the session.
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("operation cancelled before it was issued")]
    Cancelled,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Schema(_) => ErrorClass::Schema,
            Self::UnsupportedType { .. } => ErrorClass::Unsupported,
            Self::NotInitialized { .. } => ErrorClass::State,
            Self::KeyShapeMismatch { .. } => ErrorClass::Usage,
            Self::Codec(_) => ErrorClass::Codec,
            Self::Store(_) => ErrorClass::Store,
            Self::Cancelled => ErrorClass::Cancelled,
            Self::Config(_) => ErrorClass::Config,
        }
    }

    /// The underlying store failure, if this error came from the session.
    #[must_use]
    pub const fn as_store_error(&self) -> Option<&StoreError> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}: {self}", self.class())
    }
}

///
/// ErrorClass
/// Stable classification of repository errors.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum ErrorClass {
    #[display("schema")]
    Schema,
    #[display("unsupported")]
    Unsupported,
    #[display("state")]
    State,
    #[display("usage")]
    Usage,
    #[display("codec")]
    Codec,
    #[display("store")]
    Store,
    #[display("cancelled")]
    Cancelled,
    #[display("config")]
    Config,
}
