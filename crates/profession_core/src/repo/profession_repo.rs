//! Profession repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide paginated CRUD APIs over the `profession` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Every call acquires one connection from its `ConnectionSource` and
//!   releases it before returning.
//! - Write paths call `NewProfession::validate()` before SQL mutations.
//! - Read paths return stored rows as they are; write rules are not
//!   re-applied to data already in the table.
//! - Name lookups and the unique index rely on the Unicode `lower()` that
//!   `open_db` registers on every connection it returns.
//! - `list_page` runs its count and select as two statements on the same
//!   connection without a wrapping transaction; concurrent writers may make
//!   `total_items` disagree with the returned rows.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::{ConnectionSource, DbError};
use crate::model::page::{PageRequest, PageRequestError, PageResult};
use crate::model::profession::{
    NewProfession, Profession, ProfessionId, ProfessionValidationError,
};
use log::{debug, warn};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

const COUNT_SQL: &str = "SELECT COUNT(*) AS count FROM profession;";
const LIST_SQL: &str = "SELECT id, name FROM profession ORDER BY name ASC LIMIT ?1 OFFSET ?2;";
const GET_SQL: &str = "SELECT id, name FROM profession WHERE id = ?1;";
const INSERT_SQL: &str = "INSERT INTO profession (name) VALUES (?1) RETURNING id, name;";
const UPDATE_SQL: &str = "UPDATE profession SET name = ?1 WHERE id = ?2 RETURNING id, name;";
const DELETE_SQL: &str = "DELETE FROM profession WHERE id = ?1;";
const EXISTS_SQL: &str = "SELECT 1 FROM profession WHERE LOWER(name) = LOWER(?1) LIMIT 1;";

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for profession persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Storage failure: connection acquisition or statement execution.
    Db(DbError),
    /// Write payload rejected before reaching storage.
    Validation(ProfessionValidationError),
    /// Offset/limit window rejected before any query ran.
    InvalidPageRequest(PageRequestError),
    /// Another row already uses this name (case-insensitive).
    DuplicateName(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted row cannot be converted to a valid record.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidPageRequest(err) => write!(f, "{err}"),
            Self::DuplicateName(name) => write!(f, "profession name already exists: {name}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "profession repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "profession repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "profession repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted profession data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::InvalidPageRequest(err) => Some(err),
            Self::DuplicateName(_) => None,
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
            Self::MissingRequiredColumn { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<ProfessionValidationError> for RepoError {
    fn from(value: ProfessionValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<PageRequestError> for RepoError {
    fn from(value: PageRequestError) -> Self {
        Self::InvalidPageRequest(value)
    }
}

/// Repository interface for profession CRUD operations.
pub trait ProfessionRepository {
    /// Returns one page ordered by name ascending, plus pagination metadata.
    fn list(&self, request: &PageRequest) -> RepoResult<PageResult<Profession>>;
    fn get_by_id(&self, id: ProfessionId) -> RepoResult<Option<Profession>>;
    /// Inserts a row and returns it with its storage-generated id.
    fn create(&self, profession: &NewProfession) -> RepoResult<Profession>;
    /// Renames the row with `id`; `None` when no such row exists.
    fn update(&self, id: ProfessionId, profession: &NewProfession)
        -> RepoResult<Option<Profession>>;
    /// Returns `true` when a row was removed.
    fn delete(&self, id: ProfessionId) -> RepoResult<bool>;
    /// Case-insensitive name lookup.
    fn exists_by_name(&self, name: &str) -> RepoResult<bool>;

    /// Validates a raw offset/limit window and lists that page.
    ///
    /// # Errors
    /// - `InvalidPageRequest` when `limit == 0`.
    fn list_page(&self, offset: u32, limit: u32) -> RepoResult<PageResult<Profession>> {
        let request = PageRequest::new(offset, limit)?;
        self.list(&request)
    }
}

/// SQLite-backed profession repository.
#[derive(Debug)]
pub struct SqliteProfessionRepository<S> {
    source: S,
}

impl<S: ConnectionSource> SqliteProfessionRepository<S> {
    /// Creates a repository after checking the source lends migrated
    /// connections with the expected `profession` schema.
    pub fn try_new(source: S) -> RepoResult<Self> {
        source.with_connection(ensure_profession_connection_ready)?;
        Ok(Self { source })
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S: ConnectionSource> ProfessionRepository for SqliteProfessionRepository<S> {
    fn list(&self, request: &PageRequest) -> RepoResult<PageResult<Profession>> {
        let started_at = Instant::now();
        let result = self
            .source
            .with_connection(|conn| list_professions(conn, request));
        let detail = match &result {
            Ok(page) => format!(
                "offset={} limit={} returned={} total_items={}",
                request.offset(),
                request.limit(),
                page.items.len(),
                page.pagination.total_items
            ),
            Err(_) => format!("offset={} limit={}", request.offset(), request.limit()),
        };
        log_outcome("profession_list", &detail, started_at, &result);
        result
    }

    fn get_by_id(&self, id: ProfessionId) -> RepoResult<Option<Profession>> {
        let started_at = Instant::now();
        let result = self
            .source
            .with_connection(|conn| get_profession(conn, id));
        let detail = match &result {
            Ok(found) => format!("id={id} found={}", found.is_some()),
            Err(_) => format!("id={id}"),
        };
        log_outcome("profession_get", &detail, started_at, &result);
        result
    }

    fn create(&self, profession: &NewProfession) -> RepoResult<Profession> {
        profession.validate()?;

        let started_at = Instant::now();
        let result = self
            .source
            .with_connection(|conn| insert_profession(conn, profession.name.as_str()));
        let detail = match &result {
            Ok(created) => format!("id={}", created.id),
            Err(_) => format!("name_chars={}", profession.name.chars().count()),
        };
        log_outcome("profession_create", &detail, started_at, &result);
        result
    }

    fn update(
        &self,
        id: ProfessionId,
        profession: &NewProfession,
    ) -> RepoResult<Option<Profession>> {
        profession.validate()?;

        let started_at = Instant::now();
        let result = self
            .source
            .with_connection(|conn| update_profession(conn, id, profession.name.as_str()));
        let detail = match &result {
            Ok(updated) => format!("id={id} found={}", updated.is_some()),
            Err(_) => format!("id={id}"),
        };
        log_outcome("profession_update", &detail, started_at, &result);
        result
    }

    fn delete(&self, id: ProfessionId) -> RepoResult<bool> {
        let started_at = Instant::now();
        let result = self.source.with_connection(|conn| -> RepoResult<bool> {
            let changed = conn.execute(DELETE_SQL, [id])?;
            Ok(changed > 0)
        });
        let detail = match &result {
            Ok(removed) => format!("id={id} removed={removed}"),
            Err(_) => format!("id={id}"),
        };
        log_outcome("profession_delete", &detail, started_at, &result);
        result
    }

    fn exists_by_name(&self, name: &str) -> RepoResult<bool> {
        let started_at = Instant::now();
        let result = self.source.with_connection(|conn| -> RepoResult<bool> {
            let mut stmt = conn.prepare(EXISTS_SQL)?;
            Ok(stmt.exists([name])?)
        });
        let detail = match &result {
            Ok(exists) => format!("name_chars={} exists={exists}", name.chars().count()),
            Err(_) => format!("name_chars={}", name.chars().count()),
        };
        log_outcome("profession_exists", &detail, started_at, &result);
        result
    }
}

fn list_professions(
    conn: &Connection,
    request: &PageRequest,
) -> RepoResult<PageResult<Profession>> {
    let count: i64 = conn.query_row(COUNT_SQL, [], |row| row.get("count"))?;
    let total_items = u64::try_from(count).map_err(|_| {
        RepoError::InvalidData(format!("negative row count `{count}` for profession"))
    })?;

    let mut stmt = conn.prepare(LIST_SQL)?;
    let mut rows = stmt.query(params![request.limit(), request.offset()])?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(parse_profession_row(row)?);
    }

    Ok(PageResult::new(items, request.pagination(total_items)))
}

fn get_profession(conn: &Connection, id: ProfessionId) -> RepoResult<Option<Profession>> {
    let mut stmt = conn.prepare(GET_SQL)?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_profession_row(row)?));
    }

    Ok(None)
}

fn insert_profession(conn: &Connection, name: &str) -> RepoResult<Profession> {
    let mut stmt = conn.prepare(INSERT_SQL)?;
    let mut rows = stmt.query([name])?;
    match rows.next()? {
        Some(row) => parse_profession_row(row),
        None => Err(RepoError::InvalidData(
            "insert into profession returned no row".to_string(),
        )),
    }
}

fn update_profession(
    conn: &Connection,
    id: ProfessionId,
    name: &str,
) -> RepoResult<Option<Profession>> {
    let mut stmt = conn.prepare(UPDATE_SQL)?;
    let mut rows = stmt.query(params![name, id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_profession_row(row)?));
    }

    Ok(None)
}

fn parse_profession_row(row: &Row<'_>) -> RepoResult<Profession> {
    Ok(Profession {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}

fn log_outcome<T>(event: &str, detail: &str, started_at: Instant, result: &RepoResult<T>) {
    let duration_ms = started_at.elapsed().as_millis();
    match result {
        Ok(_) => debug!(
            "event={event} module=repo status=ok {detail} duration_ms={duration_ms}"
        ),
        Err(err) => warn!(
            "event={event} module=repo status=error {detail} duration_ms={duration_ms} error={err}"
        ),
    }
}

fn ensure_profession_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "profession")? {
        return Err(RepoError::MissingRequiredTable("profession"));
    }

    for column in ["id", "name"] {
        if !table_has_column(conn, "profession", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "profession",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
