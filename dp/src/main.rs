//! Dayplan CLI entry point

use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result, eyre};
use tracing::info;
use tracing_subscriber::EnvFilter;

use dayplan::cli::{Cli, Command};
use dayplan::config::Config;
use dayplan::controller::{Controller, TaskSink};
use dayplan::llm::create_client;
use dayplan::plan::RawTask;
use dayplan::session::SessionManager;
use planstore::{NewTask, TaskStore};

const CHAT_HELP: &str = "Commands inside chat:
  <describe your day>          first message builds the agenda
  from 14:00 to 16:00 <task>   move and resize a task
  at 18 <task>                 move a task
  for 30 minutes <task>        change a task's duration
  3 meals                      re-space meal breaks
  keep                         save the agenda to the task store
  new tasks                    drop the agenda and start over
  help                         this message";

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();
    Ok(())
}

/// Durable-store adapter behind the controller's TaskSink seam
struct StoreSink(std::sync::Mutex<TaskStore>);

impl TaskSink for StoreSink {
    fn create(&self, task: &RawTask) -> Result<()> {
        let store = self.0.lock().map_err(|_| eyre!("task store lock poisoned"))?;
        store.create(&NewTask {
            title: task.title.clone(),
            est_minutes: task.est_minutes,
            priority: task.priority,
        })?;
        Ok(())
    }
}

fn build_sessions(config: &Config) -> Result<SessionManager> {
    let llm = create_client(&config.llm)?;
    let store = TaskStore::open(&config.store_path)?;
    let sink: Arc<dyn TaskSink> = Arc::new(StoreSink(std::sync::Mutex::new(store)));
    Ok(SessionManager::new(Controller::new(llm, sink)))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(model = %config.llm.model, "dayplan starting");

    match cli.command {
        Command::Chat { session } => cmd_chat(&config, &session).await,
        Command::Plan { prompt } => cmd_plan(&config, &prompt).await,
        Command::Tasks => cmd_tasks(&config),
        Command::Done { id } => cmd_done(&config, id),
    }
}

async fn cmd_chat(config: &Config, session: &str) -> Result<()> {
    let sessions = build_sessions(config)?;

    println!(
        "{}",
        "Describe your day and I will draw up an agenda. Type 'help' for commands, Ctrl-D to quit.".dimmed()
    );

    let mut rl = rustyline::DefaultEditor::new()?;
    loop {
        match rl.readline("> ") {
            Ok(line) => {
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }
                if line.eq_ignore_ascii_case("help") {
                    println!("{}", CHAT_HELP);
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                let reply = sessions.turn(session, &line).await;
                println!("{}", reply);
            }
            Err(rustyline::error::ReadlineError::Interrupted) | Err(rustyline::error::ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

async fn cmd_plan(config: &Config, prompt: &str) -> Result<()> {
    let sessions = build_sessions(config)?;
    let reply = sessions.turn("oneshot", prompt).await;
    println!("{}", reply);
    Ok(())
}

fn cmd_tasks(config: &Config) -> Result<()> {
    let store = TaskStore::open(&config.store_path)?;
    let tasks = store.list()?;

    if tasks.is_empty() {
        println!("No saved tasks");
        return Ok(());
    }
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
    Ok(())
}

fn cmd_done(config: &Config, id: i64) -> Result<()> {
    let store = TaskStore::open(&config.store_path)?;
    if store.mark_done(id)? {
        println!("{} Task {} marked done", "✓".green(), id);
    } else {
        println!("{} No task with id {}", "!".yellow(), id);
    }
    Ok(())
}
