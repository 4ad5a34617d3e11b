/*!
 * Shared SQLite handle for the dictionary.
 *
 * rusqlite connections are blocking, so async callers hand closures to
 * `call`/`call_in_transaction`, which run them on tokio's blocking pool
 * while holding the connection lock.
 */

use anyhow::{Context, Result};
use log::{debug, info};
use parking_lot::Mutex;
use rusqlite::{Connection, Transaction};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::schema;

/// Cloneable handle to a migrated dictionary database
#[derive(Clone)]
pub struct DatabaseConnection {
    path: PathBuf,
    conn: Arc<Mutex<Connection>>,
}

impl std::fmt::Debug for DatabaseConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConnection")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl DatabaseConnection {
    /// Open the database file at `path`, creating it and its directory if needed
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create dictionary directory {}", dir.display()))?;
        }

        info!("Opening dictionary at {}", path.display());
        let conn = Connection::open(&path)
            .with_context(|| format!("Failed to open dictionary {}", path.display()))?;

        Self::from_connection(path, conn)
    }

    /// Throwaway database, mostly for tests
    pub fn open_in_memory() -> Result<Self> {
        debug!("Opening in-memory dictionary");
        let conn = Connection::open_in_memory().context("Failed to open in-memory dictionary")?;
        Self::from_connection(PathBuf::from(":memory:"), conn)
    }

    fn from_connection(path: PathBuf, mut conn: Connection) -> Result<Self> {
        schema::migrate(&mut conn)?;
        Ok(Self {
            path,
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// `<data dir>/wordbridge/dictionary.db`
    pub fn default_path() -> Result<PathBuf> {
        let data_dir = dirs::data_local_dir()
            .or_else(dirs::data_dir)
            .context("Could not determine the user data directory")?;
        Ok(data_dir.join("wordbridge").join("dictionary.db"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` against the connection on the blocking pool
    pub async fn call<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || f(&conn.lock()))
            .await
            .context("Dictionary task panicked")?
    }

    /// Run `f` inside a transaction that commits when `f` succeeds
    pub async fn call_in_transaction<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut conn = conn.lock();
            let tx = conn.transaction()?;
            let value = f(&tx)?;
            tx.commit()?;
            Ok(value)
        })
        .await
        .context("Dictionary task panicked")?
    }
}
