//! Record store module
//!
//! Holds movie records in an in-memory SQLite table:
//! - `Movie` / `NewMovie` record types
//! - `MovieStore` with the five single-statement operations
//! - Fixed seed records inserted at startup

mod movie;
mod seed;
mod sqlite;

pub use movie::NewMovie;
pub use sqlite::MovieStore;

use thiserror::Error;

/// Errors raised by the record store
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record with the requested id
    #[error("movie {0} not found")]
    NotFound(i64),

    /// Backend failure, message surfaced as-is
    #[error("{0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A previous holder of the connection lock panicked
    #[error("store connection lock poisoned")]
    Poisoned,

    /// The blocking task running a store operation failed
    #[error("store task failed: {0}")]
    Task(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
