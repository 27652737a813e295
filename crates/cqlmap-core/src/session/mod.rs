//! Session boundary.
//!
//! The repository never talks to the network itself. It prepares statement
//! text and executes bound statements through a [`Session`], and everything
//! the session returns (rows or failures) passes through unchanged.

pub mod memory;

use crate::value::CqlValue;
use async_trait::async_trait;
use derive_more::Deref;
use thiserror::Error as ThisError;

// re-exports
pub use memory::MemorySession;

///
/// Session
///
/// Minimal driver contract consumed by repositories.
///
/// ## Semantics
/// - `prepare` must be safe to call repeatedly with the same text
/// - `execute` binds `values` positionally to the prepared markers
/// - `default_keyspace` is the keyspace the session is bound to, if any
///

#[async_trait]
pub trait Session: Send + Sync {
    /// Driver-side prepared statement handle.
    type Prepared: Clone + Send + Sync + 'static;

    async fn prepare(&self, statement: &str) -> Result<Self::Prepared, StoreError>;

    async fn execute(
        &self,
        prepared: &Self::Prepared,
        values: &[CqlValue],
        options: ExecuteOptions,
    ) -> Result<ResultRows, StoreError>;

    fn default_keyspace(&self) -> Option<&str>;
}

///
/// ExecuteOptions
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ExecuteOptions {
    /// Page-size hint; the session returns at most one page.
    pub page_size: Option<u32>,
}

impl ExecuteOptions {
    #[must_use]
    pub const fn with_page_size(page_size: u32) -> Self {
        Self {
            page_size: Some(page_size),
        }
    }
}

///
/// ResultRows
/// Rows returned by one execution, values in selected-column order.
///

#[derive(Clone, Debug, Default, Deref, PartialEq)]
pub struct ResultRows {
    pub rows: Vec<Row>,
}

impl ResultRows {
    #[must_use]
    pub const fn empty() -> Self {
        Self { rows: Vec::new() }
    }
}

impl IntoIterator for ResultRows {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

///
/// Row
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    pub values: Vec<CqlValue>,
}

impl Row {
    #[must_use]
    pub const fn new(values: Vec<CqlValue>) -> Self {
        Self { values }
    }
}

///
/// StoreError
///
/// Failure kinds reported by a session. Repositories never wrap, retry or
/// suppress these.
///

#[derive(Clone, Debug, Eq, ThisError, PartialEq)]
pub enum StoreError {
    #[error("connection failed: {message}")]
    Connection { message: String },

    #[error("request timed out: {message}")]
    Timeout { message: String },

    #[error("authentication failed: {message}")]
    Authentication { message: String },

    #[error("no replica available: {message}")]
    Unavailable { message: String },

    #[error("execution failed: {message}")]
    Execution { message: String },
}

impl StoreError {
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution {
            message: message.into(),
        }
    }

    /// Whether the failure is transient from the store's point of view.
    /// Retry policy itself belongs to the caller.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. } | Self::Timeout { .. } | Self::Unavailable { .. }
        )
    }
}
