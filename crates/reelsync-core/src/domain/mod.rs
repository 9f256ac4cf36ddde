//! Domain entities and value types for group synchronization

pub mod errors;
pub mod filter;
pub mod group;
pub mod mapping;
pub mod newtypes;

pub use errors::DomainError;
pub use group::{GroupStatus, SyncGroup};
pub use mapping::{FileMapping, MappingSet};
pub use newtypes::{GroupPrefix, ObjectKey};
