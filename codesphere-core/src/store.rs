//! Persistent key-value store adapter.
//!
//! Wraps the shared WAL-mode SQLite database behind the two-method contract
//! the rest of the application relies on: `read(key, default)` and
//! `write(key, value)`. Values are JSON-encoded strings; a missing row, a
//! failed query, or a value that no longer decodes all collapse to the
//! caller's default, and write failures are logged and swallowed — callers
//! must never assume persistence succeeded. There is no transactional
//! guarantee across keys.

use std::time::Duration;

use rusqlite::OptionalExtension;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_rusqlite::Connection;

/// Logical key for the persisted theme selection.
pub const KEY_THEME: &str = "codesphere-theme";
/// Logical key for the persisted file collection.
pub const KEY_FILES: &str = "codesphere-files";
/// Logical key for the persisted active file id.
pub const KEY_ACTIVE_FILE: &str = "codesphere-active-file";
/// Logical key for the persisted review history.
pub const KEY_HISTORY: &str = "codesphere-history";

/// Handle to the opened store. Cheap to clone; clones share the connection,
/// so flush tasks can be spawned with an owned copy.
#[derive(Clone)]
pub struct Store {
    conn: Connection,
}

/// Opens (or creates) the store at `path`, configures WAL mode, and applies
/// schema migrations via the `schema_version` table.
///
/// This is the single entry point for all store connections. `busy_timeout`
/// is set via the `Connection` method (not a PRAGMA string) so the setting
/// takes effect regardless of pragma caching.
///
/// # Errors
///
/// Returns `tokio_rusqlite::Error` if the file cannot be opened, WAL
/// configuration fails, or schema DDL fails.
pub async fn open_store(path: &str) -> Result<Store, tokio_rusqlite::Error> {
    let conn = Connection::open(path).await?;

    // WAL pragmas are connection-level settings re-applied on every open.
    conn.call(|db| {
        db.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA synchronous=NORMAL;",
        )?;
        db.busy_timeout(Duration::from_secs(5))?;
        Ok(())
    })
    .await?;

    // Checkpoint any leftover WAL from a previous run.
    conn.call(|db| {
        db.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    })
    .await?;

    conn.call(|db| {
        crate::schema::migrate(db)?;
        Ok(())
    })
    .await?;

    Ok(Store { conn })
}

impl Store {
    /// Reads and JSON-decodes the value under `key`.
    ///
    /// Returns `default` on a missing row, a query failure, or a decode
    /// failure — never raises. Decode failures are logged at warn because
    /// they mean a previous session (or another writer) stored something
    /// this version no longer understands.
    pub async fn read<T>(&self, key: &str, default: T) -> T
    where
        T: DeserializeOwned + Send + 'static,
    {
        let key_owned = key.to_owned();
        let raw = self
            .conn
            .call(move |db| -> Result<Option<String>, tokio_rusqlite::Error> {
                let value = db
                    .query_row(
                        "SELECT value FROM kv WHERE key = ?1",
                        rusqlite::params![&key_owned],
                        |r| r.get::<_, String>(0),
                    )
                    .optional()?;
                Ok(value)
            })
            .await;

        let text = match raw {
            Ok(Some(text)) => text,
            Ok(None) => return default,
            Err(err) => {
                tracing::warn!("store read for {key} failed: {err}");
                return default;
            }
        };

        match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("store value under {key} no longer decodes: {err}");
                default
            }
        }
    }

    /// JSON-encodes `value` and upserts it under `key`.
    ///
    /// Failures (encode, lock contention, disk) are logged and swallowed;
    /// the session simply continues with in-memory state for that slice.
    pub async fn write<T>(&self, key: &str, value: &T)
    where
        T: Serialize,
    {
        let text = match serde_json::to_string(value) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!("store encode for {key} failed: {err}");
                return;
            }
        };

        let key_owned = key.to_owned();
        let result = self
            .conn
            .call(move |db| -> Result<(), tokio_rusqlite::Error> {
                let tx =
                    db.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
                tx.execute(
                    "INSERT INTO kv (key, value) VALUES (?1, ?2)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                    rusqlite::params![&key_owned, &text],
                )?;
                tx.commit()?;
                Ok(())
            })
            .await;

        if let Err(err) = result {
            tracing::warn!("store write for {key} failed: {err}");
        }
    }
}
