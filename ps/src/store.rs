//! SQLite-backed task store

use chrono::{DateTime, Utc};
use eyre::{Context, Result};
use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// A stored task row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Row id assigned by the store
    pub id: i64,
    pub title: String,
    /// Estimated duration in minutes
    pub est_minutes: u32,
    /// 1 = important, 2 = normal, 3 = minor
    pub priority: u8,
    pub done: bool,
    /// Creation timestamp (UTC)
    pub created: DateTime<Utc>,
}

/// Fields for creating a task; id, done and created are assigned by the store
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub est_minutes: u32,
    pub priority: u8,
}

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    est_minutes INTEGER NOT NULL DEFAULT 45,
    priority INTEGER NOT NULL DEFAULT 2,
    done INTEGER NOT NULL DEFAULT 0,
    created TEXT NOT NULL
)";

/// The task store; one SQLite database file
pub struct TaskStore {
    conn: Connection,
}

impl TaskStore {
    /// Open or create the store at the given database path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create store directory")?;
        }
        let conn = Connection::open(path).context("Failed to open task database")?;
        conn.execute(SCHEMA, [])?;
        debug!(path = %path.display(), "Opened task store");
        Ok(Self { conn })
    }

    /// In-memory store for tests and throwaway sessions
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        conn.execute(SCHEMA, [])?;
        Ok(Self { conn })
    }

    /// Insert a task and return the stored row
    pub fn create(&self, new: &NewTask) -> Result<Task> {
        let created = Utc::now();
        self.conn.execute(
            "INSERT INTO tasks (title, est_minutes, priority, done, created) VALUES (?1, ?2, ?3, 0, ?4)",
            params![new.title, new.est_minutes, new.priority, created.to_rfc3339()],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(id, title = %new.title, "Task created");
        Ok(Task {
            id,
            title: new.title.clone(),
            est_minutes: new.est_minutes,
            priority: new.priority,
            done: false,
            created,
        })
    }

    /// All tasks, ordered by priority then id
    pub fn list(&self) -> Result<Vec<Task>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, est_minutes, priority, done, created FROM tasks ORDER BY priority, id")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u32>(2)?,
                row.get::<_, u8>(3)?,
                row.get::<_, bool>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        let mut tasks = Vec::new();
        for row in rows {
            let (id, title, est_minutes, priority, done, created) = row?;
            let created = DateTime::parse_from_rfc3339(&created)
                .context("Invalid created timestamp in store")?
                .with_timezone(&Utc);
            tasks.push(Task {
                id,
                title,
                est_minutes,
                priority,
                done,
                created,
            });
        }
        Ok(tasks)
    }

    /// Mark a task done; returns false when the id does not exist
    pub fn mark_done(&self, id: i64) -> Result<bool> {
        let n = self.conn.execute("UPDATE tasks SET done = 1 WHERE id = ?1", params![id])?;
        debug!(id, updated = n, "mark_done");
        Ok(n > 0)
    }

    /// Delete completed tasks, returning how many were removed
    pub fn clear_done(&self) -> Result<usize> {
        let n = self.conn.execute("DELETE FROM tasks WHERE done = 1", [])?;
        info!(removed = n, "Cleared completed tasks");
        Ok(n)
    }
}
