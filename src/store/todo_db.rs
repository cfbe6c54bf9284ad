use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};

use crate::error::Result;
use crate::model::{TodoDraft, TodoId, TodoItem};

/// Result of [`TodoDb::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inserted {
    pub rows: usize,
    pub id: TodoId,
}

/// Synchronous access to the `TodoItem` table.
///
/// Not shared across threads: [`crate::store::StoreHandle`] moves one of these
/// onto its executor thread and serializes every call through it.
pub struct TodoDb {
    conn: Connection,
}

impl TodoDb {
    /// Open (or create) the database file and make sure the table exists.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;\
             PRAGMA busy_timeout=5000;",
        )?;
        let db = Self { conn };
        db.create_tables()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.create_tables()?;
        Ok(db)
    }

    fn create_tables(&self) -> Result<()> {
        // AUTOINCREMENT keeps ids of deleted rows from being handed out again.
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS TodoItem (
                Id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
                Title TEXT,
                Description TEXT,
                IsCompleted INTEGER NOT NULL DEFAULT 0
            );",
        )?;
        Ok(())
    }

    pub fn list_all(&self) -> Result<Vec<TodoItem>> {
        let mut stmt = self
            .conn
            .prepare("SELECT Id, Title, Description, IsCompleted FROM TodoItem ORDER BY Id")?;
        let items = stmt
            .query_map([], |row| {
                Ok(TodoItem {
                    id: row.get(0)?,
                    title: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    description: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    is_completed: row.get::<_, Option<bool>>(3)?.unwrap_or(false),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(items)
    }

    pub fn insert(&self, draft: &TodoDraft) -> Result<Inserted> {
        let rows = self.conn.execute(
            "INSERT INTO TodoItem (Title, Description, IsCompleted) VALUES (?1, ?2, ?3)",
            params![draft.title, draft.description, draft.is_completed],
        )?;
        Ok(Inserted {
            rows,
            id: self.conn.last_insert_rowid(),
        })
    }

    pub fn delete_by_id(&self, id: TodoId) -> Result<usize> {
        let rows = self
            .conn
            .execute("DELETE FROM TodoItem WHERE Id = ?1", params![id])?;
        Ok(rows)
    }

    pub fn update_fields(
        &self,
        id: TodoId,
        title: &str,
        description: &str,
        is_completed: bool,
    ) -> Result<usize> {
        let rows = self.conn.execute(
            "UPDATE TodoItem SET Title = ?1, Description = ?2, IsCompleted = ?3 WHERE Id = ?4",
            params![title, description, is_completed, id],
        )?;
        Ok(rows)
    }

    /// Read the flag, invert it, write it back. Returns 0 when `id` is absent.
    pub fn toggle_completed(&self, id: TodoId) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let current: Option<Option<bool>> = tx
            .query_row(
                "SELECT IsCompleted FROM TodoItem WHERE Id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        let Some(current) = current else {
            return Ok(0);
        };
        let rows = tx.execute(
            "UPDATE TodoItem SET IsCompleted = ?1 WHERE Id = ?2",
            params![!current.unwrap_or(false), id],
        )?;
        tx.commit()?;
        Ok(rows)
    }

    pub fn delete_where_completed(&self) -> Result<usize> {
        let rows = self
            .conn
            .execute("DELETE FROM TodoItem WHERE IsCompleted = 1", [])?;
        Ok(rows)
    }

    /// Delete every row one id at a time.
    pub fn delete_all(&self) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let ids = {
            let mut stmt = tx.prepare("SELECT Id FROM TodoItem")?;
            let ids = stmt
                .query_map([], |row| row.get::<_, TodoId>(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            ids
        };
        let mut rows = 0;
        for id in ids {
            rows += tx.execute("DELETE FROM TodoItem WHERE Id = ?1", params![id])?;
        }
        tx.commit()?;
        Ok(rows)
    }

    /// Expose the raw connection (for tests).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(db: &TodoDb, drafts: &[(&str, bool)]) -> Vec<TodoId> {
        drafts
            .iter()
            .map(|(title, done)| {
                db.insert(&TodoDraft::new(*title).completed(*done))
                    .unwrap()
                    .id
            })
            .collect()
    }

    #[test]
    fn insert_then_list_round_trips_fields() {
        let db = TodoDb::open_memory().unwrap();
        let draft = TodoDraft::new("Buy milk").with_description("2 litres");

        let inserted = db.insert(&draft).unwrap();
        assert_eq!(inserted.rows, 1);

        let all = db.list_all().unwrap();
        assert_eq!(all, vec![draft.into_item(inserted.id)]);
    }

    #[test]
    fn empty_title_is_persisted_as_is() {
        let db = TodoDb::open_memory().unwrap();
        let inserted = db.insert(&TodoDraft::new("")).unwrap();
        let all = db.list_all().unwrap();
        assert_eq!(all[0].id, inserted.id);
        assert_eq!(all[0].title, "");
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let db = TodoDb::open_memory().unwrap();
        let ids = seed(&db, &[("a", false), ("b", false)]);
        assert_eq!(db.delete_by_id(ids[1]).unwrap(), 1);

        let next = db.insert(&TodoDraft::new("c")).unwrap();
        assert!(next.id > ids[1]);
    }

    #[test]
    fn delete_missing_id_affects_nothing() {
        let db = TodoDb::open_memory().unwrap();
        seed(&db, &[("a", false)]);
        let before = db.list_all().unwrap();

        assert_eq!(db.delete_by_id(404).unwrap(), 0);
        assert_eq!(db.list_all().unwrap(), before);
    }

    #[test]
    fn update_fields_overwrites_all_columns() {
        let db = TodoDb::open_memory().unwrap();
        let ids = seed(&db, &[("draft", false)]);

        assert_eq!(db.update_fields(ids[0], "final", "notes", true).unwrap(), 1);
        assert_eq!(db.update_fields(999, "x", "y", false).unwrap(), 0);

        let item = &db.list_all().unwrap()[0];
        assert_eq!(item.title, "final");
        assert_eq!(item.description, "notes");
        assert!(item.is_completed);
    }

    #[test]
    fn toggle_twice_restores_flag() {
        let db = TodoDb::open_memory().unwrap();
        let ids = seed(&db, &[("a", false)]);

        assert_eq!(db.toggle_completed(ids[0]).unwrap(), 1);
        assert!(db.list_all().unwrap()[0].is_completed);
        assert_eq!(db.toggle_completed(ids[0]).unwrap(), 1);
        assert!(!db.list_all().unwrap()[0].is_completed);
    }

    #[test]
    fn toggle_missing_id_returns_zero() {
        let db = TodoDb::open_memory().unwrap();
        assert_eq!(db.toggle_completed(12).unwrap(), 0);
    }

    #[test]
    fn delete_where_completed_keeps_open_items() {
        let db = TodoDb::open_memory().unwrap();
        seed(&db, &[("a", true), ("b", false), ("c", true), ("d", false)]);

        assert_eq!(db.delete_where_completed().unwrap(), 2);
        let titles: Vec<String> = db.list_all().unwrap().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["b", "d"]);
    }

    #[test]
    fn delete_all_empties_table() {
        let db = TodoDb::open_memory().unwrap();
        seed(&db, &[("a", true), ("b", false), ("c", false)]);

        assert_eq!(db.delete_all().unwrap(), 3);
        assert!(db.list_all().unwrap().is_empty());
        assert_eq!(db.delete_all().unwrap(), 0);
    }

    #[test]
    fn null_columns_read_as_defaults() {
        let db = TodoDb::open_memory().unwrap();
        db.conn()
            .execute("INSERT INTO TodoItem (Title) VALUES (NULL)", [])
            .unwrap();

        let item = &db.list_all().unwrap()[0];
        assert_eq!(item.title, "");
        assert_eq!(item.description, "");
        assert!(!item.is_completed);
    }

    #[test]
    fn reopen_keeps_existing_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todo.db");
        {
            let db = TodoDb::open(&path).unwrap();
            seed(&db, &[("persisted", false)]);
        }
        let db = TodoDb::open(&path).unwrap();
        let all = db.list_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "persisted");
    }
}
