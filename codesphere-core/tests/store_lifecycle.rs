//! Integration test for the key-value store lifecycle.
//!
//! Exercises: open_store, migrate, read-default behaviour, JSON round-trips
//! for every persisted slice, decode-failure fallback, and persistence
//! across connections.

use codesphere_core::store::{self, KEY_ACTIVE_FILE, KEY_FILES, KEY_HISTORY, KEY_THEME};
use codesphere_core::types::{HistoryEntry, Language, RiskLevel, SourceFile, ThemeKind};

fn temp_db_path() -> String {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.keep().join("test.db");
    path.to_string_lossy().to_string()
}

#[tokio::test]
async fn full_store_lifecycle() {
    let path = temp_db_path();
    let store = store::open_store(&path).await.unwrap();

    // Missing keys fall back to the caller's default.
    let theme: ThemeKind = store.read(KEY_THEME, ThemeKind::Light).await;
    assert_eq!(theme, ThemeKind::Light);
    let files: Vec<SourceFile> = store.read(KEY_FILES, Vec::new()).await;
    assert!(files.is_empty());

    // Round-trip each persisted slice.
    store.write(KEY_THEME, &ThemeKind::Dark).await;
    let theme: ThemeKind = store.read(KEY_THEME, ThemeKind::Light).await;
    assert_eq!(theme, ThemeKind::Dark);

    let files = vec![
        SourceFile {
            id: "a".to_owned(),
            name: "main.js".to_owned(),
            language: Language::Javascript,
            code: "let x = 1;".to_owned(),
        },
        SourceFile {
            id: "b".to_owned(),
            name: "untitled-2.js".to_owned(),
            language: Language::Python,
            code: String::new(),
        },
    ];
    store.write(KEY_FILES, &files).await;
    store.write(KEY_ACTIVE_FILE, &"b".to_owned()).await;

    let loaded: Vec<SourceFile> = store.read(KEY_FILES, Vec::new()).await;
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].code, "let x = 1;");
    assert_eq!(loaded[1].language, Language::Python);
    let active: String = store.read(KEY_ACTIVE_FILE, String::new()).await;
    assert_eq!(active, "b");

    let history = vec![HistoryEntry {
        id: "h1".to_owned(),
        file_name: "main.js".to_owned(),
        timestamp: "10:15:00".to_owned(),
        language: Language::Javascript,
        score: 8,
        risk: RiskLevel::Moderate,
    }];
    store.write(KEY_HISTORY, &history).await;

    // Overwriting a key replaces its value (upsert, not append).
    store.write(KEY_ACTIVE_FILE, &"a".to_owned()).await;
    let active: String = store.read(KEY_ACTIVE_FILE, String::new()).await;
    assert_eq!(active, "a");

    // Values survive reopening the store.
    let reopened = store::open_store(&path).await.unwrap();
    let theme: ThemeKind = reopened.read(KEY_THEME, ThemeKind::Light).await;
    assert_eq!(theme, ThemeKind::Dark);
    let history: Vec<HistoryEntry> = reopened.read(KEY_HISTORY, Vec::new()).await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].risk, RiskLevel::Moderate);
}

#[tokio::test]
async fn schema_is_versioned_and_wal_mode_is_active() {
    let path = temp_db_path();
    let _store = store::open_store(&path).await.unwrap();

    let db = rusqlite::Connection::open(&path).unwrap();
    let version: i64 = db
        .query_row("SELECT MAX(version) FROM schema_version", [], |r| r.get(0))
        .unwrap();
    assert_eq!(version, 1, "schema_version should be 1");

    let journal: String = db
        .query_row("PRAGMA journal_mode", [], |r| r.get(0))
        .unwrap();
    assert_eq!(journal, "wal", "journal_mode should be wal");

    let pk_type: String = db
        .query_row(
            "SELECT type FROM pragma_table_info('kv') WHERE name = 'key'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(pk_type, "TEXT", "kv.key should be TEXT");
}

#[tokio::test]
async fn undecodable_values_fall_back_to_the_default() {
    let path = temp_db_path();
    let store = store::open_store(&path).await.unwrap();

    // Simulate a corrupt (or future-versioned) value written by hand.
    {
        let db = rusqlite::Connection::open(&path).unwrap();
        db.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)",
            rusqlite::params![KEY_FILES, "{not json"],
        )
        .unwrap();
    }

    let files: Vec<SourceFile> = store.read(KEY_FILES, Vec::new()).await;
    assert!(files.is_empty(), "corrupt value should yield the default");

    // A valid value of the wrong shape also yields the default.
    store.write(KEY_THEME, &42_u32).await;
    let theme: ThemeKind = store.read(KEY_THEME, ThemeKind::Dark).await;
    assert_eq!(theme, ThemeKind::Dark);
}
