//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the profession data access contract.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `NewProfession::validate()` before
//!   persistence.
//! - Absent rows are reported as `None`/`false`, never as errors.

pub mod memory_repo;
pub mod profession_repo;
