//! Connection sources lent to repositories one call at a time.
//!
//! # Responsibility
//! - Hand out a migrated connection for the duration of one closure.
//! - Release the connection (or its lock) on every exit path.
//!
//! # Invariants
//! - A connection is never held past the closure passed to
//!   `with_connection`; release happens through `Drop`.
//! - Connections lent by `FileDatabase` and `SharedConnection` are migrated.

use super::{open_db, open_db_in_memory, DbError, DbResult};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Something that can lend a ready SQLite connection for one call.
pub trait ConnectionSource {
    /// Runs `f` with a borrowed connection and releases it afterwards.
    ///
    /// Acquisition failures are converted into the caller's error type.
    fn with_connection<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Connection) -> Result<T, E>,
        E: From<DbError>;
}

impl ConnectionSource for Connection {
    fn with_connection<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Connection) -> Result<T, E>,
        E: From<DbError>,
    {
        f(self)
    }
}

impl<S: ConnectionSource> ConnectionSource for &S {
    fn with_connection<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Connection) -> Result<T, E>,
        E: From<DbError>,
    {
        (**self).with_connection(f)
    }
}

/// File-backed database opening a fresh connection per call.
#[derive(Debug, Clone)]
pub struct FileDatabase {
    path: PathBuf,
}

impl FileDatabase {
    /// Opens the database once to create and migrate it, then keeps the path.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref().to_path_buf();
        drop(open_db(&path)?);
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConnectionSource for FileDatabase {
    fn with_connection<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Connection) -> Result<T, E>,
        E: From<DbError>,
    {
        let conn = open_db(&self.path)?;
        f(&conn)
    }
}

/// One connection shared between threads; callers serialize on a mutex.
#[derive(Debug)]
pub struct SharedConnection {
    conn: Mutex<Connection>,
}

impl SharedConnection {
    /// Wraps a connection returned by `open_db` or `open_db_in_memory`.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Opens a migrated in-memory database.
    pub fn in_memory() -> DbResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    /// Returns the wrapped connection.
    pub fn into_inner(self) -> DbResult<Connection> {
        self.conn
            .into_inner()
            .map_err(|_| DbError::ConnectionPoisoned)
    }
}

impl ConnectionSource for SharedConnection {
    fn with_connection<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Connection) -> Result<T, E>,
        E: From<DbError>,
    {
        let guard = self.conn.lock().map_err(|_| DbError::ConnectionPoisoned)?;
        f(&guard)
    }
}
