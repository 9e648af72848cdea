//! Per-photo notes (memory_notes), keyed by image filename

use std::collections::HashMap;

use crate::db::{Database, DbResult};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS memory_notes (
        filename TEXT PRIMARY KEY,
        note TEXT NOT NULL DEFAULT ''
    );
";

/// Keyed mapping from image filename to its note.
///
/// A filename with no stored note reads as the empty string. Clearing a note
/// is `save_note(filename, "")`; rows are never removed.
pub trait NoteStore: Send + Sync {
    fn get_note(&self, filename: &str) -> DbResult<String>;

    /// Insert or replace the note for `filename` in one statement
    fn save_note(&self, filename: &str, note: &str) -> DbResult<()>;

    /// Every stored note, for rendering the whole gallery at once
    fn notes(&self) -> DbResult<HashMap<String, String>>;
}

pub struct MemoryNoteStore {
    db: Database,
}

impl MemoryNoteStore {
    pub fn open(path: &str) -> DbResult<Self> {
        Ok(Self {
            db: Database::open(path, SCHEMA)?,
        })
    }
}

impl NoteStore for MemoryNoteStore {
    fn get_note(&self, filename: &str) -> DbResult<String> {
        let conn = self.db.conn()?;
        let note = conn.query_row(
            "SELECT note FROM memory_notes WHERE filename = ?1",
            [filename],
            |row| row.get::<_, String>(0),
        );
        match note {
            Ok(note) => Ok(note),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(String::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save_note(&self, filename: &str, note: &str) -> DbResult<()> {
        let conn = self.db.conn()?;
        conn.execute(
            "INSERT INTO memory_notes (filename, note) VALUES (?1, ?2)
             ON CONFLICT(filename) DO UPDATE SET note = excluded.note",
            rusqlite::params![filename, note],
        )?;
        Ok(())
    }

    fn notes(&self) -> DbResult<HashMap<String, String>> {
        let conn = self.db.conn()?;
        let mut stmt = conn.prepare("SELECT filename, note FROM memory_notes")?;
        let notes = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<Result<HashMap<_, _>, _>>()?;
        Ok(notes)
    }
}
