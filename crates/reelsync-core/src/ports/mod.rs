//! Port definitions (trait interfaces for adapters)

pub mod ledger;
pub mod object_store;

pub use ledger::CompletionLedger;
pub use object_store::{ObjectStore, StoreError};
