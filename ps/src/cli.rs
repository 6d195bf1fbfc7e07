//! CLI argument parsing for planstore

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ps")]
#[command(author, version, about = "Durable task store for day planning", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List stored tasks in priority order
    List,

    /// Add a task
    Add {
        /// Task title
        #[arg(required = true)]
        title: String,

        /// Estimated duration in minutes
        #[arg(short = 'm', long, default_value_t = crate::DEFAULT_EST_MINUTES)]
        minutes: u32,

        /// Priority: 1 (important) to 3 (minor)
        #[arg(short, long, default_value_t = crate::DEFAULT_PRIORITY)]
        priority: u8,
    },

    /// Mark a task done
    Done {
        /// Task id as shown by `list`
        #[arg(required = true)]
        id: i64,
    },

    /// Delete completed tasks
    Clear,
}
