//! Profession use-case service.
//!
//! # Responsibility
//! - Provide catalogue entry points for callers above the repository.
//! - Reject duplicate names before they reach storage.
//!
//! # Invariants
//! - Service APIs never bypass repository validation.
//! - The duplicate check and the write are separate calls; a concurrent
//!   writer can still win, in which case storage rejects the write.

use crate::model::page::{PageRequest, PageResult};
use crate::model::profession::{NewProfession, Profession, ProfessionId};
use crate::repo::profession_repo::{ProfessionRepository, RepoError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for profession use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Another profession already uses this name (case-insensitive).
    DuplicateName(String),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateName(name) => write!(f, "profession already exists: {name}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::DuplicateName(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::DuplicateName(name) => Self::DuplicateName(name),
            other => Self::Repo(other),
        }
    }
}

/// Use-case service wrapper for profession operations.
pub struct ProfessionService<R: ProfessionRepository> {
    repo: R,
}

impl<R: ProfessionRepository> ProfessionService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Lists one offset/limit page.
    pub fn list_professions(&self, request: &PageRequest) -> ServiceResult<PageResult<Profession>> {
        Ok(self.repo.list(request)?)
    }

    /// Lists a 1-based page, `page = 0` meaning the first page.
    pub fn list_page_number(
        &self,
        page: u32,
        per_page: u32,
    ) -> ServiceResult<PageResult<Profession>> {
        let request = PageRequest::from_page(page, per_page).map_err(RepoError::from)?;
        self.list_professions(&request)
    }

    pub fn get_profession(&self, id: ProfessionId) -> ServiceResult<Option<Profession>> {
        Ok(self.repo.get_by_id(id)?)
    }

    /// Creates a profession unless the name is already taken.
    ///
    /// # Errors
    /// - `DuplicateName` when a profession with the same name exists.
    /// - `Repo(Validation)` for blank or oversized names.
    pub fn create_profession(&self, name: impl Into<String>) -> ServiceResult<Profession> {
        let payload = NewProfession::new(name);
        payload.validate().map_err(RepoError::from)?;

        if self.repo.exists_by_name(&payload.name)? {
            return Err(ServiceError::DuplicateName(payload.name));
        }

        let created = self.repo.create(&payload)?;
        info!(
            "event=profession_created module=service status=ok id={}",
            created.id
        );
        Ok(created)
    }

    /// Renames a profession.
    ///
    /// Returns `Ok(None)` when `id` does not exist. Renaming to a different
    /// casing of the current name skips the duplicate check.
    pub fn update_profession(
        &self,
        id: ProfessionId,
        name: impl Into<String>,
    ) -> ServiceResult<Option<Profession>> {
        let payload = NewProfession::new(name);
        payload.validate().map_err(RepoError::from)?;

        let Some(current) = self.repo.get_by_id(id)? else {
            return Ok(None);
        };
        if !current.has_name(&payload.name) && self.repo.exists_by_name(&payload.name)? {
            return Err(ServiceError::DuplicateName(payload.name));
        }

        let updated = self.repo.update(id, &payload)?;
        info!(
            "event=profession_updated module=service status=ok id={} found={}",
            id,
            updated.is_some()
        );
        Ok(updated)
    }

    /// Deletes a profession; `false` when nothing matched.
    pub fn delete_profession(&self, id: ProfessionId) -> ServiceResult<bool> {
        let removed = self.repo.delete(id)?;
        info!(
            "event=profession_deleted module=service status=ok id={} removed={}",
            id, removed
        );
        Ok(removed)
    }
}
