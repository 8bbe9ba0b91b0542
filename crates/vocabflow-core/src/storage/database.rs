//! SQLite-based library storage.
//!
//! Provides persistent storage for:
//! - Word lists (words and consolidation queue stored as JSON columns)
//! - Daily memorize counters keyed by list and reference day
//! - Key-value store for application state (e.g. the active session)

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, warn};

use super::data_dir;
use crate::error::{CoreError, DatabaseError, Result};
use crate::model::{Word, WordId, WordList};
use crate::progress::{format_day, parse_day};

/// SQLite database holding the learner's library.
pub struct Database {
    conn: Connection,
}

/// Raw `lists` row before JSON decoding.
struct ListRow {
    id: String,
    name: String,
    description: String,
    words: String,
    queue_ids: String,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data dir>/vocabflow.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("vocabflow.db");
        Self::open_at(&path)
    }

    /// Open (or create) a database file at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        debug!(path = %path.display(), "database opened");
        Ok(db)
    }

    /// Open an in-memory database (for tests and dry runs).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS lists (
                id          TEXT PRIMARY KEY,
                position    INTEGER NOT NULL,
                name        TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                words       TEXT NOT NULL DEFAULT '[]',
                queue_ids   TEXT NOT NULL DEFAULT '[]',
                updated_at  TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS daily_counts (
                list_id TEXT NOT NULL,
                day     TEXT NOT NULL,
                count   INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (list_id, day)
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_lists_position ON lists(position);
            CREATE INDEX IF NOT EXISTS idx_daily_counts_day ON daily_counts(day);",
        )?;
        Ok(())
    }

    // ── Lists ────────────────────────────────────────────────────────

    /// All lists in display order.
    pub fn lists(&self) -> Result<Vec<WordList>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description, words, queue_ids
             FROM lists
             ORDER BY position, rowid",
        )?;
        let rows = stmt.query_map([], read_list_row)?;

        let mut lists = Vec::new();
        for row in rows {
            lists.push(decode_list(row?)?);
        }
        Ok(lists)
    }

    pub fn find_list(&self, id: &str) -> Result<Option<WordList>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, description, words, queue_ids FROM lists WHERE id = ?1",
                params![id],
                read_list_row,
            )
            .optional()?;
        row.map(decode_list).transpose()
    }

    /// # Errors
    /// `ListNotFound` when no list has this id.
    pub fn load_list(&self, id: &str) -> Result<WordList> {
        self.find_list(id)?
            .ok_or_else(|| CoreError::ListNotFound(id.to_string()))
    }

    /// Insert or update a list. New lists are appended after the existing ones.
    pub fn save_list(&self, list: &WordList) -> Result<()> {
        upsert_list(&self.conn, list)?;
        debug!(list_id = %list.id, words = list.words.len(), "list saved");
        Ok(())
    }

    /// Persist a list touched by a completed card and, when `counter_day` is
    /// set, bump that day's memorize counter, in one transaction.
    ///
    /// Either both writes land or neither does, so a failed call can be
    /// retried without applying the card twice. Returns the new counter value.
    pub fn record_completion(
        &self,
        list: &WordList,
        counter_day: Option<NaiveDate>,
    ) -> Result<Option<u32>> {
        let tx = self.conn.unchecked_transaction()?;
        upsert_list(&tx, list)?;
        let count = match counter_day {
            Some(day) => Some(bump_daily_count(&tx, &list.id, day)?),
            None => None,
        };
        tx.commit()?;
        debug!(list_id = %list.id, ?count, "completion recorded");
        Ok(count)
    }

    /// Delete a list and its daily counters. Returns `false` if it did not exist.
    pub fn delete_list(&self, id: &str) -> Result<bool> {
        let tx = self.conn.unchecked_transaction()?;
        let removed = tx.execute("DELETE FROM lists WHERE id = ?1", params![id])?;
        tx.execute("DELETE FROM daily_counts WHERE list_id = ?1", params![id])?;
        tx.commit()?;
        if removed > 0 {
            info!(list_id = %id, "list deleted");
        }
        Ok(removed > 0)
    }

    /// Replace the whole library in one transaction (backup import, reset).
    ///
    /// Daily counters are kept.
    pub fn replace_all(&self, lists: &[WordList]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM lists", [])?;
        let now = Utc::now().to_rfc3339();
        for (position, list) in lists.iter().enumerate() {
            tx.execute(
                "INSERT INTO lists (id, position, name, description, words, queue_ids, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    list.id,
                    position as i64,
                    list.name,
                    list.description,
                    serde_json::to_string(&list.words)?,
                    serde_json::to_string(&list.consolidation_queue_ids)?,
                    now,
                ],
            )?;
        }
        tx.commit()?;
        info!(lists = lists.len(), "library replaced");
        Ok(())
    }

    /// Insert the starter list into an empty library.
    ///
    /// Returns `true` if anything was inserted.
    pub fn seed_defaults(&self) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM lists", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(false);
        }
        self.save_list(&WordList::starter())?;
        info!("seeded starter list");
        Ok(true)
    }

    // ── Daily counters ───────────────────────────────────────────────

    /// Memorize completions for a list on a reference day. Missing days are 0.
    pub fn daily_count(&self, list_id: &str, day: NaiveDate) -> Result<u32> {
        let count = self
            .conn
            .query_row(
                "SELECT count FROM daily_counts WHERE list_id = ?1 AND day = ?2",
                params![list_id, format_day(day)],
                |row| row.get::<_, u32>(0),
            )
            .optional()?;
        Ok(count.unwrap_or(0))
    }

    /// Add one completion and return the new count.
    pub fn increment_daily_count(&self, list_id: &str, day: NaiveDate) -> Result<u32> {
        bump_daily_count(&self.conn, list_id, day)
    }

    /// Per-day totals in `[from, to]`, for one list or summed over all lists.
    pub fn daily_counts(
        &self,
        list_id: Option<&str>,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<BTreeMap<NaiveDate, u32>> {
        let mut stmt = self.conn.prepare(
            "SELECT day, SUM(count)
             FROM daily_counts
             WHERE day >= ?1 AND day <= ?2 AND (?3 IS NULL OR list_id = ?3)
             GROUP BY day",
        )?;
        let rows = stmt.query_map(params![format_day(from), format_day(to), list_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?))
        })?;

        let mut counts = BTreeMap::new();
        for row in rows {
            let (key, count) = row?;
            match parse_day(&key) {
                Some(day) => {
                    counts.insert(day, count);
                }
                None => warn!(day = %key, "skipping malformed daily counter row"),
            }
        }
        Ok(counts)
    }

    // ── Key-value store ──────────────────────────────────────────────

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn kv_delete(&self, key: &str) -> Result<(), rusqlite::Error> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

fn upsert_list(conn: &Connection, list: &WordList) -> Result<()> {
    let words = serde_json::to_string(&list.words)?;
    let queue_ids = serde_json::to_string(&list.consolidation_queue_ids)?;
    conn.execute(
        "INSERT INTO lists (id, position, name, description, words, queue_ids, updated_at)
         VALUES (?1, (SELECT COALESCE(MAX(position), -1) + 1 FROM lists), ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            description = excluded.description,
            words = excluded.words,
            queue_ids = excluded.queue_ids,
            updated_at = excluded.updated_at",
        params![
            list.id,
            list.name,
            list.description,
            words,
            queue_ids,
            Utc::now().to_rfc3339(),
        ],
    )?;
    Ok(())
}

fn bump_daily_count(conn: &Connection, list_id: &str, day: NaiveDate) -> Result<u32> {
    let key = format_day(day);
    conn.execute(
        "INSERT INTO daily_counts (list_id, day, count) VALUES (?1, ?2, 1)
         ON CONFLICT(list_id, day) DO UPDATE SET count = count + 1",
        params![list_id, key],
    )?;
    let count = conn.query_row(
        "SELECT count FROM daily_counts WHERE list_id = ?1 AND day = ?2",
        params![list_id, key],
        |row| row.get::<_, u32>(0),
    )?;
    Ok(count)
}

fn read_list_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ListRow> {
    Ok(ListRow {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        words: row.get(3)?,
        queue_ids: row.get(4)?,
    })
}

fn decode_list(row: ListRow) -> Result<WordList> {
    let corrupt = |message: String| DatabaseError::CorruptRow {
        table: "lists".into(),
        message,
    };
    let words: Vec<Word> = serde_json::from_str(&row.words)
        .map_err(|e| corrupt(format!("words of '{}': {e}", row.id)))?;
    let consolidation_queue_ids: BTreeSet<WordId> = serde_json::from_str(&row.queue_ids)
        .map_err(|e| corrupt(format!("queue of '{}': {e}", row.id)))?;
    Ok(WordList {
        id: row.id,
        name: row.name,
        description: row.description,
        words,
        consolidation_queue_ids,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    #[test]
    fn save_and_load_list() {
        let db = Database::open_memory().unwrap();
        let mut list = WordList::starter();
        list.enqueue("w2");
        list.words[0].record_mastery(123);
        db.save_list(&list).unwrap();

        let loaded = db.load_list("list-1").unwrap();
        assert_eq!(loaded, list);
    }

    #[test]
    fn load_missing_list_is_not_found() {
        let db = Database::open_memory().unwrap();
        assert!(matches!(
            db.load_list("nope"),
            Err(CoreError::ListNotFound(_))
        ));
    }

    #[test]
    fn save_keeps_position_on_update() {
        let db = Database::open_memory().unwrap();
        let first = WordList::new("First", "");
        let mut second = WordList::new("Second", "");
        db.save_list(&first).unwrap();
        db.save_list(&second).unwrap();
        second.name = "Second (renamed)".into();
        db.save_list(&second).unwrap();

        let names: Vec<String> = db.lists().unwrap().into_iter().map(|l| l.name).collect();
        assert_eq!(names, vec!["First", "Second (renamed)"]);
    }

    #[test]
    fn seed_only_fills_empty_library() {
        let db = Database::open_memory().unwrap();
        assert!(db.seed_defaults().unwrap());
        assert!(!db.seed_defaults().unwrap());
        assert_eq!(db.lists().unwrap().len(), 1);
    }

    #[test]
    fn daily_counter_is_per_list_and_day() {
        let db = Database::open_memory().unwrap();
        assert_eq!(db.daily_count("a", day(1)).unwrap(), 0);
        assert_eq!(db.increment_daily_count("a", day(1)).unwrap(), 1);
        assert_eq!(db.increment_daily_count("a", day(1)).unwrap(), 2);
        assert_eq!(db.increment_daily_count("b", day(1)).unwrap(), 1);
        assert_eq!(db.daily_count("a", day(2)).unwrap(), 0);

        let all = db.daily_counts(None, day(1), day(2)).unwrap();
        assert_eq!(all.get(&day(1)), Some(&3));
        let only_a = db.daily_counts(Some("a"), day(1), day(2)).unwrap();
        assert_eq!(only_a.get(&day(1)), Some(&2));
    }

    #[test]
    fn record_completion_writes_list_and_counter() {
        let db = Database::open_memory().unwrap();
        db.seed_defaults().unwrap();
        let mut list = db.load_list("list-1").unwrap();
        list.words[0].record_mastery(10);

        assert_eq!(db.record_completion(&list, Some(day(4))).unwrap(), Some(1));
        assert_eq!(db.record_completion(&list, None).unwrap(), None);
        assert_eq!(db.load_list("list-1").unwrap(), list);
        assert_eq!(db.daily_count("list-1", day(4)).unwrap(), 1);
    }

    #[test]
    fn record_completion_rolls_back_when_counter_fails() {
        let db = Database::open_memory().unwrap();
        db.seed_defaults().unwrap();
        let before = db.load_list("list-1").unwrap();
        db.conn().execute_batch("DROP TABLE daily_counts").unwrap();

        let mut list = before.clone();
        list.words[0].record_mastery(10);
        assert!(db.record_completion(&list, Some(day(4))).is_err());

        let stored = db.load_list("list-1").unwrap();
        assert_eq!(stored, before);
        assert!(stored.words[0].mastered_dates.is_empty());
    }

    #[test]
    fn delete_list_drops_counters() {
        let db = Database::open_memory().unwrap();
        db.seed_defaults().unwrap();
        db.increment_daily_count("list-1", day(3)).unwrap();
        assert!(db.delete_list("list-1").unwrap());
        assert!(!db.delete_list("list-1").unwrap());
        assert_eq!(db.daily_count("list-1", day(3)).unwrap(), 0);
    }

    #[test]
    fn replace_all_swaps_library() {
        let db = Database::open_memory().unwrap();
        db.seed_defaults().unwrap();
        let replacement = vec![WordList::new("A", ""), WordList::new("B", "")];
        db.replace_all(&replacement).unwrap();
        assert_eq!(db.lists().unwrap(), replacement);
    }

    #[test]
    fn corrupt_payload_is_reported() {
        let db = Database::open_memory().unwrap();
        db.conn()
            .execute(
                "INSERT INTO lists (id, position, name, words, updated_at)
                 VALUES ('bad', 0, 'Bad', 'not json', '')",
                [],
            )
            .unwrap();
        assert!(matches!(
            db.load_list("bad"),
            Err(CoreError::Database(DatabaseError::CorruptRow { .. }))
        ));
    }

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
        db.kv_delete("test").unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
    }
}
