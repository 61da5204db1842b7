//! Domain model for the profession catalogue.
//!
//! # Responsibility
//! - Define the persisted record and the write payload.
//! - Define pagination requests, metadata and envelopes.
//!
//! # Invariants
//! - Every persisted profession is identified by a storage-generated id.
//! - Page sizes are always strictly positive.

pub mod page;
pub mod profession;
