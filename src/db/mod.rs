use rusqlite::{Connection, Result};
use std::path::{Path, PathBuf};

pub mod wordlist;

const APP_DIR: &str = "vocab-quiz";
const DB_FILE: &str = "vocab-quiz.db";

/// Per-user data directory; holds the database and the logs.
pub fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
}

pub fn get_db_path() -> PathBuf {
    data_dir().join(DB_FILE)
}

pub fn init_db() -> Result<Connection> {
    open_at(&get_db_path())
}

pub fn open_at(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).ok();
    }

    let conn = Connection::open(db_path)?;

    run_migrations(&conn)?;

    Ok(conn)
}

pub(crate) fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS word_lists (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            position INTEGER NOT NULL,
            words_json TEXT NOT NULL,
            synced_at INTEGER NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_word_lists_position ON word_lists(position)",
        [],
    )?;

    Ok(())
}
