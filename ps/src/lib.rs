//! PlanStore - durable task storage for day planning
//!
//! Keeps the tasks a user chose to save out of an agenda. One SQLite
//! database file, one `tasks` table, no history. The planner only ever
//! creates rows; listing and completion live behind the `ps` CLI.
//!
//! # Example
//!
//! ```ignore
//! use planstore::{NewTask, TaskStore};
//!
//! let store = TaskStore::open("tasks.db")?;
//! store.create(&NewTask { title: "Write report".into(), est_minutes: 60, priority: 1 })?;
//! for task in store.list()? {
//!     println!("{} {}", task.id, task.title);
//! }
//! ```

pub mod cli;
pub mod config;
mod store;

pub use store::{NewTask, Task, TaskStore};

/// Default estimate for a task created without one
pub const DEFAULT_EST_MINUTES: u32 = 45;

/// Default priority (1 = important, 2 = normal, 3 = minor)
pub const DEFAULT_PRIORITY: u8 = 2;
