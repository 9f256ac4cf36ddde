//! Domain error types
//!
//! This module defines error types specific to domain operations,
//! including validation failures and progress-counter violations.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Group prefix is empty or missing its trailing separator
    #[error("Invalid group prefix: {0}")]
    InvalidPrefix(String),

    /// Object key is empty
    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    /// The downloaded counter would exceed the group total
    #[error("Progress overflow: downloaded {downloaded} would exceed total {total}")]
    ProgressOverflow {
        /// Current downloaded count
        downloaded: u64,
        /// The group's fixed total
        total: u64,
    },
}
