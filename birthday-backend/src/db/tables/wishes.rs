//! Wish database operations (wishes)

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::db::{Database, DbResult};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS wishes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        message TEXT NOT NULL,
        created_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_wishes_created_at ON wishes(created_at);
";

/// A guest-submitted birthday message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wish {
    pub id: i64,
    pub name: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Form body of the "Send a Birthday Wish" form
#[derive(Debug, Deserialize)]
pub struct CreateWishRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub message: String,
}

pub struct WishStore {
    db: Database,
}

impl WishStore {
    pub fn open(path: &str) -> DbResult<Self> {
        Ok(Self {
            db: Database::open(path, SCHEMA)?,
        })
    }

    /// Insert a wish stamped with the current time. Callers validate that
    /// both fields are non-empty.
    pub fn add_wish(&self, name: &str, message: &str) -> DbResult<Wish> {
        let conn = self.db.conn()?;
        // Stored with microsecond precision so lexical order is time order
        let now = Utc::now().trunc_subsecs(6);

        conn.execute(
            "INSERT INTO wishes (name, message, created_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![name, message, now.to_rfc3339_opts(SecondsFormat::Micros, true)],
        )?;

        Ok(Wish {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            message: message.to_string(),
            created_at: now,
        })
    }

    /// All wishes, newest first
    pub fn list_wishes(&self) -> DbResult<Vec<Wish>> {
        let conn = self.db.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, message, created_at FROM wishes
             ORDER BY created_at DESC, id DESC",
        )?;

        let wishes = stmt
            .query_map([], Self::row_to_wish)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(wishes)
    }

    /// Delete a wish. Returns false when no wish had that id.
    pub fn delete_wish(&self, id: i64) -> DbResult<bool> {
        let conn = self.db.conn()?;
        let rows_affected = conn.execute("DELETE FROM wishes WHERE id = ?1", [id])?;
        Ok(rows_affected > 0)
    }

    fn row_to_wish(row: &rusqlite::Row) -> rusqlite::Result<Wish> {
        let created_at_str: String = row.get(3)?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
            })?;

        Ok(Wish {
            id: row.get(0)?,
            name: row.get(1)?,
            message: row.get(2)?,
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_store() -> (TempDir, WishStore) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wishes.db");
        let store = WishStore::open(path.to_str().unwrap()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_add_then_delete_leaves_empty_list() {
        let (_dir, store) = open_store();

        let wish = store.add_wish("Ann", "Happy day!").unwrap();
        let wishes = store.list_wishes().unwrap();
        assert_eq!(wishes.len(), 1);
        assert_eq!(wishes[0].name, "Ann");
        assert_eq!(wishes[0].message, "Happy day!");
        assert_eq!(wishes[0].id, wish.id);

        assert!(store.delete_wish(wish.id).unwrap());
        assert!(store.list_wishes().unwrap().is_empty());
    }

    #[test]
    fn test_ids_increase_and_newest_first() {
        let (_dir, store) = open_store();

        let first = store.add_wish("Ann", "one").unwrap();
        let second = store.add_wish("Bob", "two").unwrap();
        let third = store.add_wish("Cid", "three").unwrap();
        assert!(second.id > first.id);
        assert!(third.id > second.id);

        let names: Vec<String> = store
            .list_wishes()
            .unwrap()
            .into_iter()
            .map(|w| w.name)
            .collect();
        assert_eq!(names, vec!["Cid", "Bob", "Ann"]);
    }

    #[test]
    fn test_ordering_follows_created_at() {
        let (dir, store) = open_store();

        // Back-date a row directly so insertion order and time order disagree
        let conn = rusqlite::Connection::open(dir.path().join("wishes.db")).unwrap();
        conn.execute(
            "INSERT INTO wishes (name, message, created_at) VALUES ('Old', 'from the past', '2001-01-01T00:00:00.000000Z')",
            [],
        )
        .unwrap();
        drop(conn);
        store.add_wish("New", "from today").unwrap();

        let wishes = store.list_wishes().unwrap();
        assert_eq!(wishes[0].name, "New");
        assert_eq!(wishes[1].name, "Old");
        assert!(wishes[0].created_at > wishes[1].created_at);
    }

    #[test]
    fn test_delete_keeps_other_wishes() {
        let (_dir, store) = open_store();

        let keep_a = store.add_wish("Ann", "a").unwrap();
        let gone = store.add_wish("Bob", "b").unwrap();
        let keep_c = store.add_wish("Cid", "c").unwrap();

        store.delete_wish(gone.id).unwrap();
        let ids: Vec<i64> = store.list_wishes().unwrap().iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![keep_c.id, keep_a.id]);
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let (_dir, store) = open_store();
        store.add_wish("Ann", "hi").unwrap();

        assert!(!store.delete_wish(9999).unwrap());
        assert_eq!(store.list_wishes().unwrap().len(), 1);
    }

    #[test]
    fn test_wishes_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("wishes.db");
        let path = path.to_str().unwrap();

        WishStore::open(path).unwrap().add_wish("Ann", "still here").unwrap();
        let reopened = WishStore::open(path).unwrap();
        assert_eq!(reopened.list_wishes().unwrap()[0].message, "still here");
    }
}
