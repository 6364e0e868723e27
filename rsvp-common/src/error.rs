//! Common error types for the RSVP service

use thiserror::Error;

use crate::store::StoreError;

/// Common result type for RSVP operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the RSVP crates
#[derive(Error, Debug)]
pub enum Error {
    /// Store operation error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Guest directory could not be loaded from the store
    #[error("Guest directory unavailable: {0}")]
    DirectoryUnavailable(#[source] StoreError),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Some import batches failed; committed batches stay committed
    #[error("Import completed with {failed} errors ({imported} guests imported)")]
    PartialImport { failed: usize, imported: usize },

    /// Guest list file could not be parsed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
