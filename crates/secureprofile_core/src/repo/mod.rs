//! Repository layer abstractions and session-database implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes enforce `Profile::validate()` before SQL mutations.
//! - Repository APIs return semantic errors (`NotFound`) alongside DB errors.

pub mod profile_repo;
pub mod seed;
