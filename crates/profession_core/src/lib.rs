//! Core persistence logic for the profession catalogue.
//! This crate is the single source of truth for catalogue invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::page::{PageEnvelope, PageRequest, PageRequestError, PageResult, Pagination};
pub use model::profession::{
    NewProfession, Profession, ProfessionId, ProfessionValidationError,
};
pub use repo::memory_repo::MemoryProfessionRepository;
pub use repo::profession_repo::{
    ProfessionRepository, RepoError, RepoResult, SqliteProfessionRepository,
};
pub use service::profession_service::{ProfessionService, ServiceError, ServiceResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
