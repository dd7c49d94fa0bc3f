//! Error types for the reading tracker
//!
//! The pure core (selectors, composer, priority scorer, streak tracker) never
//! fails for well-typed input. Errors only surface from item lifecycle
//! transitions, the storage seam and the [`Tracker`](crate::Tracker) façade.
//!
//! # Example
//!
//! ```rust,ignore
//! use readlane::{TrackerError, Verdict};
//!
//! match tracker.submit_verdict("item-1", Verdict::Keep).await {
//!     Ok(item) => { /* item decided */ },
//!     Err(TrackerError::ItemNotFound(id)) => {
//!         eprintln!("Item '{}' does not exist", id);
//!     },
//!     Err(e) => eprintln!("Unexpected error: {}", e),
//! }
//! ```

use thiserror::Error;

/// Tracker error type
///
/// # Variants
///
/// * `ItemNotFound` - No item with the given id exists in storage
/// * `InvalidTransition` - The item's status does not allow the requested change
/// * `StorageError` - The storage backend failed to read or write
/// * `ConfigError` - Invalid configuration (e.g., weights that do not sum to 1)
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Item not found
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// Lifecycle transition not allowed
    #[error("Invalid transition for item {id}: {reason}")]
    InvalidTransition { id: String, reason: String },

    /// Storage error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type alias using TrackerError
pub type Result<T> = std::result::Result<T, TrackerError>;
