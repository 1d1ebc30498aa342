//! Local mirror of the user's word lists, shown while a fresh fetch is running.

use crate::error::Result;
use crate::models::{Word, WordList};
use chrono::{DateTime, Local, TimeZone};
use rusqlite::{Connection, params};

/// Replaces the mirror with `lists`, keeping their order.
pub fn replace_word_lists(conn: &mut Connection, lists: &[WordList]) -> Result<()> {
    let synced_at = Local::now().timestamp();
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM word_lists", [])?;
    for (position, list) in lists.iter().enumerate() {
        let words_json = serde_json::to_string(&list.words)?;
        tx.execute(
            "INSERT INTO word_lists (id, name, position, words_json, synced_at)
             VALUES (?, ?, ?, ?, ?)",
            params![list.id, list.name, position as i64, words_json, synced_at],
        )?;
    }
    tx.commit()?;
    tracing::debug!("Mirrored {} word lists", lists.len());
    Ok(())
}

pub fn load_word_lists(conn: &Connection) -> Result<Vec<WordList>> {
    let mut stmt =
        conn.prepare("SELECT id, name, words_json FROM word_lists ORDER BY position")?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
        ))
    })?;

    let mut lists = Vec::new();
    for row in rows {
        let (id, name, words_json) = row?;
        let words: Vec<Word> = serde_json::from_str(&words_json)?;
        lists.push(WordList { id, name, words });
    }
    Ok(lists)
}

pub fn last_synced(conn: &Connection) -> Result<Option<DateTime<Local>>> {
    let seconds: Option<i64> =
        conn.query_row("SELECT MAX(synced_at) FROM word_lists", [], |row| row.get(0))?;
    Ok(seconds.and_then(|s| Local.timestamp_opt(s, 0).single()))
}

pub fn clear(conn: &Connection) -> Result<()> {
    conn.execute("DELETE FROM word_lists", [])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::run_migrations;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn list(id: i64, name: &str, words: &[&str]) -> WordList {
        WordList {
            id,
            name: name.to_string(),
            words: words
                .iter()
                .map(|w| Word {
                    id: format!("{}-{}", id, w),
                    english: w.to_string(),
                    turkish: String::new(),
                    meaning_en: String::new(),
                    part_of_speech: "adj".to_string(),
                    example: String::new(),
                    example_tr: String::new(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_replace_then_load_keeps_order() {
        let mut conn = conn();
        let lists = vec![list(9, "Zeta", &["quick"]), list(2, "Alpha", &["happy", "sad"])];
        replace_word_lists(&mut conn, &lists).unwrap();

        let loaded = load_word_lists(&conn).unwrap();
        assert_eq!(loaded, lists);
        assert!(last_synced(&conn).unwrap().is_some());
    }

    #[test]
    fn test_replace_drops_stale_lists() {
        let mut conn = conn();
        replace_word_lists(&mut conn, &[list(1, "Old", &[]), list(2, "Kept", &[])]).unwrap();
        replace_word_lists(&mut conn, &[list(2, "Kept", &["new"])]).unwrap();

        let loaded = load_word_lists(&conn).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].words[0].english, "new");
    }

    #[test]
    fn test_clear_empties_mirror() {
        let mut conn = conn();
        replace_word_lists(&mut conn, &[list(1, "A", &["x"])]).unwrap();
        clear(&conn).unwrap();
        assert!(load_word_lists(&conn).unwrap().is_empty());
        assert!(last_synced(&conn).unwrap().is_none());
    }

    #[test]
    fn test_file_backed_mirror_survives_reopen() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("mirror.db");
        {
            let mut conn = crate::db::open_at(&path).unwrap();
            replace_word_lists(&mut conn, &[list(4, "Saved", &["tired"])]).unwrap();
        }
        let conn = crate::db::open_at(&path).unwrap();
        assert_eq!(load_word_lists(&conn).unwrap()[0].name, "Saved");
    }
}
