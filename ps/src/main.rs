use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::info;

use planstore::cli::{Cli, Command};
use planstore::config::Config;
use planstore::{NewTask, TaskStore};

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::level_filters::LevelFilter::INFO.into()),
        )
        .init();
}

fn main() -> Result<()> {
    setup_logging();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    let store = TaskStore::open(&config.store_path)?;

    info!(path = %config.store_path.display(), "planstore starting");

    match cli.command {
        Command::List => {
            let tasks = store.list()?;
            if tasks.is_empty() {
                println!("No tasks stored");
            } else {
                for t in tasks {
                    let marker = if t.done { "✓".green() } else { "·".dimmed() };
                    println!(
                        "{} {:>3}  {} ({} min, p{})",
                        marker,
                        t.id.to_string().cyan(),
                        t.title,
                        t.est_minutes,
                        t.priority
                    );
                }
            }
        }
        Command::Add {
            title,
            minutes,
            priority,
        } => {
            let task = store.create(&NewTask {
                title,
                est_minutes: minutes.max(5),
                priority: priority.clamp(1, 3),
            })?;
            println!("{} Added task {}: {}", "✓".green(), task.id.to_string().cyan(), task.title);
        }
        Command::Done { id } => {
            if store.mark_done(id)? {
                println!("{} Task {} marked done", "✓".green(), id);
            } else {
                println!("{} No task with id {}", "!".yellow(), id);
            }
        }
        Command::Clear => {
            let removed = store.clear_done()?;
            println!("{} Removed {} completed task(s)", "✓".green(), removed);
        }
    }

    Ok(())
}
