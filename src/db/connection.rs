use rusqlite::functions::FunctionFlags;
use rusqlite::{Connection, OpenFlags};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::errors::ServerError;

// Thread-local connection slots, one per (path, mode).
thread_local! {
    static DB_CONNS: RefCell<HashMap<(String, AccessMode), Connection>> =
        RefCell::new(HashMap::new());
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessMode {
    /// Lookups. The file must already exist.
    ReadOnly,
    /// Schema setup and imports.
    ReadWrite,
}

/// Handle to the property database.
///
/// Holds no connection itself: each thread lazily opens its own, so the
/// handle can be cloned freely and shared across server workers.
#[derive(Debug, Clone)]
pub struct Database {
    path: String,
    mode: AccessMode,
}

impl Database {
    /// Read-only handle used by the lookup path.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mode: AccessMode::ReadOnly,
        }
    }

    /// Writable handle used when loading data. Creates the file if needed.
    pub fn writable(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mode: AccessMode::ReadWrite,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn open(&self) -> Result<Connection, ServerError> {
        let conn = self.open_raw()?;
        register_functions(&conn)?;
        Ok(conn)
    }

    fn open_raw(&self) -> Result<Connection, ServerError> {
        match self.mode {
            AccessMode::ReadOnly => {
                if !Path::new(&self.path).is_file() {
                    return Err(ServerError::ConfigError(format!(
                        "property database not found at '{}'",
                        self.path
                    )));
                }
                let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
                Connection::open_with_flags(&self.path, flags).map_err(|e| {
                    ServerError::ConfigError(format!("Open DB '{}' failed: {e}", self.path))
                })
            }
            AccessMode::ReadWrite => Connection::open(&self.path)
                .map_err(|e| ServerError::DbError(format!("Open DB failed: {e}"))),
        }
    }

    /// Provides this thread's connection to the closure, opening it on first use.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, ServerError>
    where
        F: FnOnce(&mut Connection) -> Result<T, ServerError>,
    {
        DB_CONNS
            .try_with(|cell| {
                let mut slots = cell.borrow_mut();
                let key = (self.path.clone(), self.mode);
                if !slots.contains_key(&key) {
                    debug!(path = %self.path, mode = ?self.mode, "opening connection");
                    let conn = self.open()?;
                    slots.insert(key.clone(), conn);
                }
                let conn = slots.get_mut(&key).ok_or(ServerError::InternalError)?;
                f(conn)
            })
            .map_err(|_| ServerError::InternalError)?
    }

    /// Confirms the data source is present and carries the expected tables.
    /// Any failure here is a configuration fault, not a lookup miss.
    pub fn check(&self) -> Result<(), ServerError> {
        self.with_conn(|conn| {
            for table in ["properties", "assessments"] {
                let found: i64 = conn
                    .query_row(
                        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                        [table],
                        |row| row.get(0),
                    )
                    .map_err(|e| ServerError::ConfigError(format!("unreadable database: {e}")))?;
                if found == 0 {
                    return Err(ServerError::ConfigError(format!(
                        "database '{}' has no '{table}' table",
                        self.path
                    )));
                }
            }
            Ok(())
        })
    }
}

/// SQLite's built-in `lower()` only folds ASCII. `fold_case(x)` applies
/// Rust's Unicode lowercasing so SQL and in-process matching agree.
fn register_functions(conn: &Connection) -> Result<(), ServerError> {
    conn.create_scalar_function(
        "fold_case",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value: Option<String> = ctx.get(0)?;
            Ok(value.map(|v| v.to_lowercase()))
        },
    )?;
    Ok(())
}

/// Initialize database from a SQL schema file
pub fn init_db(db: &Database, schema_path: &str) -> Result<(), ServerError> {
    let schema_sql = fs::read_to_string(schema_path)
        .map_err(|e| ServerError::ConfigError(format!("Failed to read schema file: {e}")))?;

    db.with_conn(|conn| {
        conn.execute_batch(&schema_sql)
            .map_err(|e| ServerError::DbError(format!("Failed to apply schema: {e}")))?;
        Ok(())
    })?;

    info!(schema = schema_path, "database initialized");
    Ok(())
}
