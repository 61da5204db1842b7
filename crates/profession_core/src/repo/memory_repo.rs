//! In-process profession repository.
//!
//! Mirrors the SQLite repository contract without storage, for callers that
//! need a fast fixture or a disposable catalogue.
//!
//! # Invariants
//! - Ids are assigned from a counter that never goes backwards, so deleted
//!   ids are not reused.
//! - Names stay unique case-insensitively; conflicts surface as
//!   `RepoError::DuplicateName`.
//! - Listing orders by name ascending using byte order, like SQLite's
//!   default `BINARY` collation.

use crate::db::DbError;
use crate::model::page::{PageRequest, PageResult};
use crate::model::profession::{NewProfession, Profession, ProfessionId};
use crate::repo::profession_repo::{ProfessionRepository, RepoError, RepoResult};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MemoryState {
    rows: BTreeMap<ProfessionId, Profession>,
    last_id: ProfessionId,
}

impl MemoryState {
    fn name_taken(&self, name: &str, except: Option<ProfessionId>) -> bool {
        self.rows
            .values()
            .any(|row| Some(row.id) != except && row.has_name(name))
    }
}

/// Mutex-guarded profession store living in process memory.
#[derive(Debug, Default)]
pub struct MemoryProfessionRepository {
    state: Mutex<MemoryState>,
}

impl MemoryProfessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with existing rows; later ids continue after the
    /// highest seeded id.
    pub fn with_rows(rows: impl IntoIterator<Item = Profession>) -> Self {
        let mut state = MemoryState::default();
        for row in rows {
            state.last_id = state.last_id.max(row.id);
            state.rows.insert(row.id, row);
        }
        Self {
            state: Mutex::new(state),
        }
    }

    fn lock(&self) -> RepoResult<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| RepoError::Db(DbError::ConnectionPoisoned))
    }
}

impl ProfessionRepository for MemoryProfessionRepository {
    fn list(&self, request: &PageRequest) -> RepoResult<PageResult<Profession>> {
        let state = self.lock()?;
        let mut sorted: Vec<&Profession> = state.rows.values().collect();
        sorted.sort_by(|left, right| left.name.cmp(&right.name));

        let items = sorted
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.limit() as usize)
            .cloned()
            .collect();
        Ok(PageResult::new(
            items,
            request.pagination(state.rows.len() as u64),
        ))
    }

    fn get_by_id(&self, id: ProfessionId) -> RepoResult<Option<Profession>> {
        Ok(self.lock()?.rows.get(&id).cloned())
    }

    fn create(&self, profession: &NewProfession) -> RepoResult<Profession> {
        profession.validate()?;

        let mut state = self.lock()?;
        if state.name_taken(&profession.name, None) {
            return Err(RepoError::DuplicateName(profession.name.clone()));
        }

        state.last_id += 1;
        let created = Profession::new(state.last_id, profession.name.clone());
        state.rows.insert(created.id, created.clone());
        Ok(created)
    }

    fn update(
        &self,
        id: ProfessionId,
        profession: &NewProfession,
    ) -> RepoResult<Option<Profession>> {
        profession.validate()?;

        let mut state = self.lock()?;
        if !state.rows.contains_key(&id) {
            return Ok(None);
        }
        if state.name_taken(&profession.name, Some(id)) {
            return Err(RepoError::DuplicateName(profession.name.clone()));
        }

        let updated = Profession::new(id, profession.name.clone());
        state.rows.insert(id, updated.clone());
        Ok(Some(updated))
    }

    fn delete(&self, id: ProfessionId) -> RepoResult<bool> {
        Ok(self.lock()?.rows.remove(&id).is_some())
    }

    fn exists_by_name(&self, name: &str) -> RepoResult<bool> {
        Ok(self.lock()?.name_taken(name, None))
    }
}
