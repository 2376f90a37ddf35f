//! Database connection management

use rusqlite::Connection;

use super::schema;
use crate::config::StoreConfig;
use crate::error::{Error, Result};

/// Owner of the single SQLite connection behind the notes service.
///
/// Starts closed. `open` and `close` move it between the two states; every
/// other caller goes through [`LocalStore::connection`].
pub struct LocalStore {
    config: StoreConfig,
    conn: Option<Connection>,
}

impl LocalStore {
    /// Create a closed store for the given location
    pub const fn new(config: StoreConfig) -> Self {
        Self { config, conn: None }
    }

    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub const fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Open the database file, creating it and its tables if needed
    pub fn open(&mut self) -> Result<()> {
        if self.conn.is_some() {
            return Err(Error::AlreadyOpen);
        }

        let conn = match self.config.resolve_db_path()? {
            Some(path) => {
                tracing::info!("Opening database at {}", path.display());
                Connection::open(&path)?
            }
            None => {
                tracing::info!("Opening in-memory database");
                Connection::open_in_memory()?
            }
        };
        Self::configure(&conn)?;
        schema::ensure(&conn)?;

        self.conn = Some(conn);
        Ok(())
    }

    /// Open unless already open.
    ///
    /// Returns `true` when this call opened the connection.
    pub fn ensure_open(&mut self) -> Result<bool> {
        match self.open() {
            Ok(()) => Ok(true),
            Err(Error::AlreadyOpen) => Ok(false),
            Err(error) => Err(error),
        }
    }

    /// Release the connection
    pub fn close(&mut self) -> Result<()> {
        let conn = self.conn.take().ok_or(Error::NotOpen)?;
        if let Err((conn, error)) = conn.close() {
            self.conn = Some(conn);
            return Err(error.into());
        }
        tracing::info!("Closed database");
        Ok(())
    }

    /// Get a reference to the open connection
    pub fn connection(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or(Error::NotOpen)
    }

    fn configure(conn: &Connection) -> Result<()> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_in_memory() {
        let mut store = LocalStore::new(StoreConfig::in_memory());
        assert!(!store.is_open());
        store.open().unwrap();
        assert!(store.is_open());
    }

    #[test]
    fn test_open_twice_is_already_open() {
        let mut store = LocalStore::new(StoreConfig::in_memory());
        store.open().unwrap();
        assert!(matches!(store.open(), Err(Error::AlreadyOpen)));
    }

    #[test]
    fn test_ensure_open_is_idempotent() {
        let mut store = LocalStore::new(StoreConfig::in_memory());
        assert!(store.ensure_open().unwrap());
        assert!(!store.ensure_open().unwrap());
        assert!(store.is_open());
    }

    #[test]
    fn test_close_without_open() {
        let mut store = LocalStore::new(StoreConfig::in_memory());
        assert!(matches!(store.close(), Err(Error::NotOpen)));
        assert!(matches!(store.connection(), Err(Error::NotOpen)));
    }

    #[test]
    fn test_close_then_reopen() {
        let mut store = LocalStore::new(StoreConfig::in_memory());
        store.open().unwrap();
        store.close().unwrap();
        assert!(!store.is_open());
        store.open().unwrap();
        assert!(store.is_open());
    }

    #[test]
    fn test_file_is_created_in_directory() {
        let tmp = tempdir().unwrap();
        let mut store = LocalStore::new(StoreConfig::in_directory(tmp.path()));
        store.open().unwrap();
        assert!(tmp.path().join("notes.db").exists());
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let mut store = LocalStore::new(StoreConfig::in_memory());
        store.open().unwrap();
        let enabled: i64 = store
            .connection()
            .unwrap()
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }
}
