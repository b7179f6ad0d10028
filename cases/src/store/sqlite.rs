use super::*;
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::params;
use std::path::Path;
use std::path::PathBuf;

fn init_db(conn: &Connection) -> anyhow::Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode=WAL;
        CREATE TABLE IF NOT EXISTS kv_slots (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn open_conn(path: &Path) -> anyhow::Result<Connection> {
    let conn = Connection::open(path)?;
    init_db(&conn)?;
    Ok(conn)
}

/// Slot stored as one row of a SQLite key-value table.
#[derive(Debug, Clone)]
pub struct SqliteSlot {
    path: PathBuf,
    key: String,
}

impl SqliteSlot {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            key: SLOT_KEY.to_string(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CaseSlot for SqliteSlot {
    fn read(&self) -> anyhow::Result<Option<String>> {
        let conn = open_conn(&self.path)?;
        let value = conn
            .query_row(
                "SELECT value FROM kv_slots WHERE key=?1",
                params![self.key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&self, payload: &str) -> anyhow::Result<()> {
        let conn = open_conn(&self.path)?;
        conn.execute(
            "INSERT INTO kv_slots (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET
                value=excluded.value,
                updated_at=excluded.updated_at",
            params![self.key, payload, crate::types::now_timestamp()],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_replaces_previous_payload() {
        let dir = tempfile::tempdir().unwrap();
        let slot = SqliteSlot::new(dir.path().join("cases.db"));
        assert!(slot.read().unwrap().is_none());
        slot.write("[{\"id\":\"a\"}]").unwrap();
        slot.write("[]").unwrap();
        assert_eq!(slot.read().unwrap().as_deref(), Some("[]"));
    }
}
