//! Conversation controller - the turn-by-turn state machine
//!
//! Decides whether an incoming message starts a new plan, edits the
//! existing one, resets, or commits, and routes to the lexical
//! extractors and the reference resolver accordingly. Intents are
//! classified in a fixed precedence: reset, keep, goal-vs-change, then
//! field edits in a fixed order, then a clarification reply. Every
//! successful edit triggers a full replan from the original prompt plus
//! the patched task list; nothing is incremental.

use chrono::{Local, NaiveDate, NaiveTime};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::intake;
use crate::llm::LlmClient;
use crate::parse;
use crate::plan::{self, PlacedTask, PlanError, RawTask, render_agenda};
use crate::resolve;

/// Durable-store seam. The controller only ever creates tasks, once per
/// task, on an explicit keep command; listing and completion belong to
/// the store's own surface.
pub trait TaskSink: Send + Sync {
    fn create(&self, task: &RawTask) -> eyre::Result<()>;
}

/// Per-conversation state. An empty `current_plan` means the next
/// message is a new goal description; non-empty means an edit or a
/// commit is expected.
#[derive(Debug, Clone, Default)]
pub struct ConversationState {
    pub original_prompt: String,
    pub raw_tasks: Vec<RawTask>,
    pub current_plan: Vec<PlacedTask>,
    /// Set by a successful keep, cleared by any successful replan;
    /// makes repeated keeps idempotent
    pub committed: bool,
}

impl ConversationState {
    pub fn has_plan(&self) -> bool {
        !self.current_plan.is_empty()
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

const RESET_PHRASES: &[&str] = &[
    "новые задачи",
    "заново",
    "с нуля",
    "начать заново",
    "new tasks",
    "start over",
    "from scratch",
];

const KEEP_COMMANDS: &[&str] = &["оставь", "keep"];

const GOAL_WORDS: &[&str] = &[
    "хочу",
    "надо",
    "нужно",
    "планирую",
    "собираюсь",
    "i want",
    "need to",
    "i plan",
    "going to",
];

const CHANGE_WORDS: &[&str] = &[
    "измени",
    "переделай",
    "поменяй",
    "сдвинь",
    "подвинь",
    "поправь",
    "короче",
    "дольше",
    "позже",
    "раньше",
    "время",
    "диапазон",
    "минут",
    "час",
    "change",
    "move",
    "shift",
    "shorten",
    "longer",
    "earlier",
    "later",
    "time",
    "range",
    "minute",
    "hour",
];

mod replies {
    pub const EMPTY_REQUEST: &str = "Empty request.";
    pub const RESET_OK: &str = "Ok! Send me your tasks and I will draw up a new agenda.";
    pub const NOTHING_TO_KEEP: &str = "There is no agenda to save yet.";
    pub const ALREADY_KEPT: &str = "This agenda is already saved.";
    pub const KEPT: &str = "Done! The agenda is saved.";
    pub const KEEP_FAILED: &str = "Saving failed, please try again.";
    pub const INTAKE_FAILED: &str = "I could not extract tasks from that message.";
    pub const NO_TASKS: &str = "I found no tasks in your message.";
    pub const CLARIFY: &str = "I did not catch what to change. Name a concrete time, duration or range \
        (for example \"at 22:00\", \"for 5 minutes\", \"from 14:00 to 16:00\"), or say \"new tasks\".";
    pub const FIRST_TURN_HINT: &str = "\n\nIf you want to adjust anything, just say so. To save the agenda, say \"keep\".";
    pub const RANGE_UPDATED: &str = "Range updated. Say \"keep\" to save.";
    pub const TIME_UPDATED: &str = "Time updated. Say \"keep\" to save.";
    pub const DURATION_UPDATED: &str = "Duration updated. Say \"keep\" to save.";
    pub const MEALS_UPDATED: &str = "Meals updated. Say \"keep\" to save.";
}

/// Tagged intent, classified before any extractor runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intent {
    Reset,
    Keep,
    NewGoal,
    Edit,
    FirstTurn,
}

/// Fixed precedence: reset beats keep beats everything; with no plan any
/// text is a first turn; with a plan, a goal keyword without a change
/// keyword supersedes it, everything else is an edit attempt.
fn classify(text: &str, has_plan: bool) -> Intent {
    let low = text.to_lowercase();

    if RESET_PHRASES.iter().any(|p| low.contains(p)) {
        return Intent::Reset;
    }
    if KEEP_COMMANDS.iter().any(|k| low.trim() == *k) {
        return Intent::Keep;
    }
    if !has_plan {
        return Intent::FirstTurn;
    }

    let is_change = CHANGE_WORDS.iter().any(|w| low.contains(w));
    let is_goal = GOAL_WORDS.iter().any(|w| low.contains(w));
    if is_goal && !is_change {
        return Intent::NewGoal;
    }

    Intent::Edit
}

fn infeasible_reply(err: &PlanError) -> String {
    format!("That does not fit: {}. Try fewer meals or a longer day.", err)
}

pub struct Controller {
    llm: Arc<dyn LlmClient>,
    sink: Arc<dyn TaskSink>,
}

impl Controller {
    pub fn new(llm: Arc<dyn LlmClient>, sink: Arc<dyn TaskSink>) -> Self {
        Self { llm, sink }
    }

    /// Process one conversational turn against today's date.
    pub async fn handle_turn(&self, state: &mut ConversationState, text: &str) -> String {
        self.handle_turn_at(Local::now().date_naive(), state, text).await
    }

    /// Process one turn with an explicit planning date. Every outcome is
    /// a user-facing reply; nothing here is fatal.
    pub async fn handle_turn_at(&self, date: NaiveDate, state: &mut ConversationState, text: &str) -> String {
        let text = text.trim();
        if text.is_empty() {
            return replies::EMPTY_REQUEST.to_string();
        }

        let intent = classify(text, state.has_plan());
        debug!(?intent, has_plan = state.has_plan(), "handle_turn: classified");

        match intent {
            Intent::Reset => {
                state.clear();
                replies::RESET_OK.to_string()
            }
            Intent::Keep => self.commit(state),
            Intent::NewGoal => {
                debug!("handle_turn: new goal supersedes the current plan");
                state.clear();
                self.first_turn(date, state, text).await
            }
            Intent::FirstTurn => self.first_turn(date, state, text).await,
            Intent::Edit => self.edit(date, state, text),
        }
    }

    /// Copy the current plan into the durable store, once.
    fn commit(&self, state: &mut ConversationState) -> String {
        if !state.has_plan() {
            return replies::NOTHING_TO_KEEP.to_string();
        }
        if state.committed {
            return replies::ALREADY_KEPT.to_string();
        }

        for task in &state.current_plan {
            if let Err(e) = self.sink.create(&task.to_raw()) {
                warn!(error = %e, title = %task.title, "commit: store rejected task");
                return replies::KEEP_FAILED.to_string();
            }
        }

        state.committed = true;
        info!(count = state.current_plan.len(), "commit: agenda saved");
        replies::KEPT.to_string()
    }

    /// First turn: intake via the LLM, then a full replan. State is only
    /// touched after both the await and the replan succeeded, so a
    /// cancelled or failed intake leaves it unchanged.
    async fn first_turn(&self, date: NaiveDate, state: &mut ConversationState, text: &str) -> String {
        let tasks = match intake::extract_tasks(&self.llm, text).await {
            Ok(t) => t,
            Err(e) => {
                warn!(error = %e, "first_turn: intake failed");
                return replies::INTAKE_FAILED.to_string();
            }
        };
        if tasks.is_empty() {
            return replies::NO_TASKS.to_string();
        }

        let plan = match plan::plan_day(date, text, &tasks) {
            Ok(p) => p,
            Err(e) => return infeasible_reply(&e),
        };

        let answer = render_agenda(&plan);
        state.original_prompt = text.to_string();
        state.raw_tasks = tasks;
        state.current_plan = plan.tasks;
        state.committed = false;

        format!("{}{}", answer, replies::FIRST_TURN_HINT)
    }

    /// Field edits in fixed priority order: range, then single time,
    /// then duration, then meal count. The first extractor that returns
    /// a value wins; range/time/duration also need the resolver to point
    /// at a task in the current plan, else the next extractor is tried.
    fn edit(&self, date: NaiveDate, state: &mut ConversationState, text: &str) -> String {
        if let Some((range_start, range_end)) = parse::time_range(text) {
            if let Some(idx) = resolve::match_task(text, &state.current_plan) {
                return self.apply_range(date, state, idx, range_start, range_end);
            }
            debug!("edit: range parsed but no task matched");
        }

        if let Some(time) = parse::clock_time(text) {
            if let Some(idx) = resolve::match_task(text, &state.current_plan) {
                return self.apply_time(date, state, idx, time);
            }
            debug!("edit: time parsed but no task matched");
        }

        if let Some(minutes) = parse::duration_minutes(text) {
            if let Some(idx) = resolve::match_task(text, &state.current_plan) {
                return self.apply_duration(date, state, idx, minutes);
            }
            debug!("edit: duration parsed but no task matched");
        }

        if let Some(count) = parse::meal_count(text) {
            return self.apply_meal_count(date, state, count);
        }

        replies::CLARIFY.to_string()
    }

    fn apply_range(
        &self,
        date: NaiveDate,
        state: &mut ConversationState,
        idx: usize,
        start: (u32, u32),
        end: (u32, u32),
    ) -> String {
        let mut patched = state.current_plan.clone();

        let start_min = (start.0 * 60 + start.1) as i64;
        let mut end_min = (end.0 * 60 + end.1) as i64;
        // an end at or before the start reads as wrapping into the evening
        if end_min <= start_min {
            end_min += 12 * 60;
        }

        let task = &mut patched[idx];
        task.start = at_time(date, start);
        task.est_minutes = (end_min - start_min) as u32;

        self.replan_patched(date, state, patched, replies::RANGE_UPDATED)
    }

    fn apply_time(&self, date: NaiveDate, state: &mut ConversationState, idx: usize, time: (u32, u32)) -> String {
        let mut patched = state.current_plan.clone();
        // the engine replans from scratch, so a patched start only lives
        // until the allocator assigns fresh ones
        patched[idx].start = at_time(date, time);

        self.replan_patched(date, state, patched, replies::TIME_UPDATED)
    }

    fn apply_duration(&self, date: NaiveDate, state: &mut ConversationState, idx: usize, minutes: u32) -> String {
        let mut patched = state.current_plan.clone();
        patched[idx].est_minutes = minutes;

        self.replan_patched(date, state, patched, replies::DURATION_UPDATED)
    }

    /// Meal-count edits rewrite the raw list instead of patching one
    /// task: old meal tasks go, one placeholder the anchor placer will
    /// recognize comes in, and the prompt gains an explicit meal clause.
    fn apply_meal_count(&self, date: NaiveDate, state: &mut ConversationState, count: u32) -> String {
        let mut tasks: Vec<RawTask> = state
            .raw_tasks
            .iter()
            .filter(|t| !plan::is_meal_like(&t.title))
            .cloned()
            .collect();
        tasks.push(RawTask {
            title: "Meal".to_string(),
            est_minutes: plan::DEFAULT_MEAL_MINUTES,
            priority: 2,
        });

        let prompt = format!("{}. Need {} meals", state.original_prompt, count);

        match plan::plan_day(date, &prompt, &tasks) {
            Ok(plan) => {
                let answer = render_agenda(&plan);
                state.original_prompt = prompt;
                state.raw_tasks = tasks;
                state.current_plan = plan.tasks;
                state.committed = false;
                format!("{}\n\n{}", answer, replies::MEALS_UPDATED)
            }
            Err(e) => infeasible_reply(&e),
        }
    }

    /// Re-derive the base task list from the patched plan and replan
    /// from the original prompt. A failed replan leaves the previous
    /// state intact.
    fn replan_patched(
        &self,
        date: NaiveDate,
        state: &mut ConversationState,
        patched: Vec<PlacedTask>,
        note: &str,
    ) -> String {
        let base: Vec<RawTask> = patched.iter().map(PlacedTask::to_raw).collect();

        match plan::plan_day(date, &state.original_prompt, &base) {
            Ok(plan) => {
                let answer = render_agenda(&plan);
                state.raw_tasks = base;
                state.current_plan = plan.tasks;
                state.committed = false;
                format!("{}\n\n{}", answer, note)
            }
            Err(e) => infeasible_reply(&e),
        }
    }
}

fn at_time(date: NaiveDate, (h, m): (u32, u32)) -> chrono::NaiveDateTime {
    // bound-checked by the extractors
    date.and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_beats_everything() {
        assert_eq!(classify("начать заново", true), Intent::Reset);
        assert_eq!(classify("start over please", false), Intent::Reset);
    }

    #[test]
    fn keep_must_be_exact() {
        assert_eq!(classify("keep", true), Intent::Keep);
        assert_eq!(classify("  оставь  ", true), Intent::Keep);
        // keep inside a sentence is not a commit
        assert_eq!(classify("keep the meeting at 9", true), Intent::Edit);
    }

    #[test]
    fn goal_without_change_supersedes_plan() {
        assert_eq!(classify("хочу сходить в зал", true), Intent::NewGoal);
        assert_eq!(classify("i want to read a book", true), Intent::NewGoal);
    }

    #[test]
    fn goal_with_change_word_stays_an_edit() {
        // "минут" marks it as a change request despite "хочу"
        assert_eq!(classify("хочу на отчёт 30 минут", true), Intent::Edit);
        assert_eq!(classify("i want the report to take 30 minutes", true), Intent::Edit);
    }

    #[test]
    fn anything_without_a_plan_is_a_first_turn() {
        assert_eq!(classify("разобрать почту и погулять", false), Intent::FirstTurn);
        assert_eq!(classify("хочу погулять", false), Intent::FirstTurn);
    }

    #[test]
    fn plain_text_with_a_plan_is_an_edit_attempt() {
        assert_eq!(classify("подвинь отчёт", true), Intent::Edit);
        assert_eq!(classify("что-то непонятное", true), Intent::Edit);
    }

    #[test]
    fn infeasible_reply_names_the_bound() {
        let err = PlanError::WindowTooShort {
            total_minutes: 60,
            meal_count: 3,
            meal_duration: 20,
        };
        let reply = infeasible_reply(&err);
        assert!(reply.contains("60-minute day"));
        assert!(reply.contains("3 meals"));
    }
}
