//! ReelSync Ledger - durable per-group completion record
//!
//! Implements the `CompletionLedger` port from `reelsync-core` as a small
//! JSON document on disk: `{ "<prefix>": true, ... }`. It is a driven
//! (secondary) adapter in the hexagonal architecture.
//!
//! Writes are whole-document rewrites on every mutation. That is acceptable
//! because the document is tiny, mutations happen once per group
//! completion, and a single active orchestrator instance is assumed.

pub mod file;

pub use file::FileLedger;

/// Errors that can occur during ledger operations
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Reading or writing the ledger file failed
    #[error("Ledger IO error: {0}")]
    Io(String),

    /// The in-memory document could not be serialized
    #[error("Ledger serialization error: {0}")]
    Serialization(String),
}
