//! The module that handles the `SQLite` database required by the client.
//!
//! Records are stored as protobuf blobs produced by `rosa_lib`; the tables
//! only add the columns needed to look them up.
use std::{
    path::PathBuf,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use rosa_lib::error::{GroupModelError, ProtoError};
use rusqlite::Connection;

pub mod groups;
pub mod messages;
pub mod payments;
pub mod schemas;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum DatabaseError {
    #[error("This path is invalid")]
    InvalidPath,
    #[error("Error with the SQLite connection: {0}")]
    Rusqlite(#[from] rusqlite::Error),
    #[error("This data we attempted to retrieve is invalid/unexpected: {0}")]
    CorruptedData(String),
    #[error("This data is already present in the table")]
    AlreadyExists,
    #[error("No such row")]
    NotFound,
}

impl From<GroupModelError> for DatabaseError {
    fn from(value: GroupModelError) -> Self {
        DatabaseError::CorruptedData(value.to_string())
    }
}

impl From<ProtoError> for DatabaseError {
    fn from(value: ProtoError) -> Self {
        DatabaseError::CorruptedData(value.to_string())
    }
}

/// Turns "no rows" into [`DatabaseError::NotFound`] so callers can tell a
/// missing row from a broken database.
pub(crate) fn not_found(error: rusqlite::Error) -> DatabaseError {
    match error {
        rusqlite::Error::QueryReturnedNoRows => DatabaseError::NotFound,
        other => DatabaseError::Rusqlite(other),
    }
}

/// A `SQLite` connection
#[derive(Debug, Clone)]
pub struct Database {
    // If `None`, we open an in-memory database
    database_path: Option<PathBuf>,
    connection: Arc<Mutex<Connection>>,
}

impl Database {
    /// Creates a Database object, opens a connection to the given folder,
    /// and upgrades the database schema if needed.
    pub fn new(database_path: Option<PathBuf>) -> Result<Self, DatabaseError> {
        let mut conn = Self::open_connection(database_path.clone())?;

        Database::upgrade_database_version(&mut conn)?;

        Ok(Self {
            database_path,
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// A simple helper function to open a database in-memory.
    pub fn in_memory() -> Result<Self, DatabaseError> {
        Self::new(None)
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path.is_none()
    }

    /// Acquires the mutex lock to the inner connection
    pub fn get_connection(&self) -> MutexGuard<'_, Connection> {
        // A panic while holding the lock cannot leave a half-applied write:
        // every multi-statement write runs in a transaction.
        self.connection
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Opens a new database connection.
    #[inline]
    fn open_connection(database_path: Option<PathBuf>) -> Result<Connection, DatabaseError> {
        if let Some(mut path) = database_path {
            std::fs::create_dir_all(&path).map_err(|_| DatabaseError::InvalidPath)?;
            path.push("db.sqlite");
            Ok(Connection::open(path)?)
        } else {
            Ok(Connection::open_in_memory()?)
        }
    }
}
