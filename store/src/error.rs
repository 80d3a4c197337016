//! Error types for inventory store operations.
//!
//! A unified error type covering database access, per-entity query
//! failures, row decoding, and concern persistence. Listing and aggregate
//! operations always name the entity that failed so callers can diagnose
//! which query went wrong.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite operation failure outside a specific entity query.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A listing or aggregate query failed for a specific entity.
    #[error("querying {entity}: {source}")]
    Query {
        entity: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    /// A row could not be decoded into its typed record.
    #[error("decoding {entity} row: {message}")]
    Decode {
        entity: &'static str,
        message: String,
    },

    /// A concern batch was written without any rows.
    #[error("no concerns to write")]
    EmptyConcernBatch,

    /// The ingest statement pattern failed to compile.
    #[error("ingest statement pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// The VM table carries no vCenter identity ("VI SDK UUID").
    #[error("vCenter identity not found in the VM table")]
    MissingVCenterId,
}

impl StoreError {
    /// Attaches entity context to a failed query.
    pub(crate) fn query(entity: &'static str) -> impl FnOnce(rusqlite::Error) -> Self {
        move |source| Self::Query { entity, source }
    }
}

/// Convenience alias for results with [`StoreError`].
pub type Result<T> = std::result::Result<T, StoreError>;
