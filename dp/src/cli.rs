//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Dayplan - conversational day planner
#[derive(Parser)]
#[command(
    name = "dp",
    about = "Turn a goal description into a time-boxed agenda and refine it conversationally",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive planning chat
    Chat {
        /// Session id; separate conversations keep separate plans
        #[arg(short, long, default_value = "cli")]
        session: String,
    },

    /// One-shot: build an agenda from a goal description
    Plan {
        /// Free-form description of the day's obligations
        prompt: String,
    },

    /// List tasks saved in the durable store
    Tasks,

    /// Mark a saved task as done
    Done {
        /// Task id as shown by `tasks`
        id: i64,
    },
}
