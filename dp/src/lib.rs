//! Dayplan - conversational day planning engine
//!
//! Turns a free-form description of a day's obligations into a concrete
//! time-boxed agenda and supports iterative refinement of that agenda
//! (move a task, shorten it, add meals) without the user restating
//! everything.
//!
//! # Core Concepts
//!
//! - **Deterministic extraction**: times, durations, ranges, meal counts
//!   and wake/sleep boundaries are parsed with fixed rules, never a model
//! - **Full replan**: every edit recomputes the whole day from the
//!   original prompt plus the patched task list, nothing is incremental
//! - **Absence routes**: an extractor finding nothing is a routing
//!   signal for the controller, not an error
//!
//! # Modules
//!
//! - [`parse`] - lexical extractors for the command surface
//! - [`plan`] - day window, meal anchors, greedy allocation, rendering
//! - [`resolve`] - fuzzy reference resolution against plan titles
//! - [`controller`] - the turn-by-turn conversation state machine
//! - [`session`] - per-conversation state keyed by session id
//! - [`llm`] / [`intake`] - the external task-extraction collaborator
//! - [`config`] / [`cli`] - configuration and command-line surface

pub mod cli;
pub mod config;
pub mod controller;
pub mod intake;
pub mod llm;
pub mod parse;
pub mod plan;
pub mod resolve;
pub mod session;

// Re-export commonly used types
pub use config::{Config, LlmConfig};
pub use controller::{Controller, ConversationState, TaskSink};
pub use intake::{IntakeError, extract_tasks};
pub use llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, OpenAIClient, create_client};
pub use plan::{DayLabel, DayWindow, Plan, PlacedTask, PlanError, RawTask, plan_day, render_agenda};
pub use session::SessionManager;
