/*!
 * Dictionary schema and migrations.
 *
 * The schema version lives in SQLite's `user_version` pragma. Each entry of
 * `MIGRATIONS` upgrades the database by one version.
 */

use anyhow::{Context, Result, bail};
use log::{debug, info};
use rusqlite::Connection;

/// Upgrade steps, the one at index `n` moving the database to version `n + 1`
const MIGRATIONS: &[&str] = &[
    // v1: one row per saved word; saving a word again updates it in place
    r#"
    CREATE TABLE user_dictionary (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        word TEXT NOT NULL UNIQUE,
        translation TEXT NOT NULL,
        context TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL
    );
    CREATE INDEX idx_user_dictionary_created_at ON user_dictionary(created_at);
    "#,
];

/// Version a fully migrated database reports
pub const SCHEMA_VERSION: u32 = MIGRATIONS.len() as u32;

/// Bring the database up to `SCHEMA_VERSION`
pub fn migrate(conn: &mut Connection) -> Result<()> {
    let current = schema_version(conn)?;

    if current > SCHEMA_VERSION {
        bail!(
            "Dictionary schema v{} is newer than this build supports (v{})",
            current,
            SCHEMA_VERSION
        );
    }
    if current == SCHEMA_VERSION {
        debug!("Dictionary schema is current (v{})", current);
        return Ok(());
    }

    let tx = conn.transaction().context("Failed to start migration")?;
    for (index, migration) in MIGRATIONS.iter().enumerate().skip(current as usize) {
        let version = index as u32 + 1;
        tx.execute_batch(migration)
            .with_context(|| format!("Failed to migrate dictionary to v{}", version))?;
        info!("Migrated dictionary schema to v{}", version);
    }
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    tx.commit().context("Failed to commit migration")?;

    Ok(())
}

/// Schema version stored in the database; 0 for a new file
pub fn schema_version(conn: &Connection) -> Result<u32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .context("Failed to read dictionary schema version")
}
