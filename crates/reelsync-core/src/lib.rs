//! ReelSync Core - Domain logic and business rules
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `SyncGroup`, `FileMapping`, `MappingSet`, `GroupStatus`
//! - **Port definitions** - Traits for adapters: `ObjectStore`, `CompletionLedger`
//! - **Configuration** - Typed config with YAML load/save
//!
//! # Architecture
//!
//! This crate follows the hexagonal (ports & adapters) architecture pattern.
//! The domain module contains pure business logic with no network or storage
//! dependencies. Ports define trait interfaces that adapter crates implement.
//! The sync engine orchestrates domain entities through port interfaces.

pub mod config;
pub mod domain;
pub mod ports;
