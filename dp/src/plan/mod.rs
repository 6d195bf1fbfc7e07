//! Day planning pipeline: window, meal anchors, greedy allocation,
//! agenda rendering
//!
//! [`plan_day`] recomputes everything from scratch on every call: the
//! prompt supplies the day window and the meal count, the task list
//! supplies the work to place. Nothing is incremental by design; an
//! edited task list simply goes through the same pipeline again.

mod allocate;
mod anchors;
mod render;
mod types;
mod window;

pub use render::render_agenda;
pub use types::{DayLabel, DayWindow, MealSlot, Plan, PlacedTask, PlanError, RawTask, Segment};

pub(crate) use anchors::{DEFAULT_MEAL_MINUTES, is_meal_like};

use chrono::NaiveDate;
use tracing::debug;

use crate::parse;

/// Build the full day plan from the original prompt and the base tasks.
pub fn plan_day(date: NaiveDate, prompt: &str, base_tasks: &[RawTask]) -> Result<Plan, PlanError> {
    let window = window::build(date, prompt);
    let meal_count = parse::meal_count(prompt).unwrap_or(0);
    debug!(
        total_minutes = window.total_minutes,
        meal_count,
        task_count = base_tasks.len(),
        "plan_day: planning"
    );

    let (normal, meal_duration) = anchors::split_meals(base_tasks, meal_count);
    let slots = anchors::place_meal_slots(&window, meal_count, meal_duration)?;
    let mut segments = anchors::free_segments(&window, &slots);

    let mut tasks = allocate::allocate(&mut segments, normal, &window);
    for (i, slot) in slots.iter().enumerate() {
        tasks.push(PlacedTask {
            title: format!("Meal {}", i + 1),
            est_minutes: slot.duration_minutes() as u32,
            priority: 2,
            start: slot.start,
        });
    }

    // chronological presentation order; real instants keep overflow past
    // midnight ordered correctly
    tasks.sort_by_key(|t| t.start);

    Ok(Plan {
        tasks,
        label: window.label,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn task(title: &str, est: u32, priority: u8) -> RawTask {
        RawTask {
            title: title.to_string(),
            est_minutes: est,
            priority,
        }
    }

    #[test]
    fn plans_tasks_around_meals() {
        let prompt = "встаю в 8:00, ложусь в 22:00, ем 3 раза в день";
        let tasks = vec![task("Отчёт", 60, 1), task("Прогулка", 45, 3), task("Поесть", 20, 2)];

        let plan = plan_day(date(), prompt, &tasks).unwrap();

        let titles: Vec<_> = plan.tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Отчёт", "Прогулка", "Meal 1", "Meal 2", "Meal 3"]);

        // slots for a 840-minute day with 20-minute meals
        let meal1 = &plan.tasks[2];
        assert_eq!(meal1.start, date().and_hms_opt(11, 20, 0).unwrap());

        // starts are non-decreasing
        assert!(plan.tasks.windows(2).all(|w| w[0].start <= w[1].start));
    }

    #[test]
    fn meal_like_tasks_stay_normal_without_count() {
        let prompt = "разобрать день";
        let tasks = vec![task("Поесть", 30, 2)];

        let plan = plan_day(date(), prompt, &tasks).unwrap();
        assert_eq!(plan.tasks.len(), 1);
        assert_eq!(plan.tasks[0].title, "Поесть");
    }

    #[test]
    fn short_day_with_meals_is_infeasible() {
        let prompt = "встаю в 8:00, ложусь в 9:00, ем 3 раза";
        let err = plan_day(date(), prompt, &[task("Дело", 30, 2)]).unwrap_err();
        assert!(matches!(err, PlanError::WindowTooShort { .. }));
    }

    #[test]
    fn overflow_keeps_chronological_order() {
        let prompt = "встаю в 8:00, ложусь в 10:00";
        let tasks = vec![task("Большое дело", 100, 1), task("Ещё одно", 60, 2)];

        let plan = plan_day(date(), prompt, &tasks).unwrap();
        assert_eq!(plan.tasks[0].start, date().and_hms_opt(8, 0, 0).unwrap());
        // second task overflows past the 10:00 window end
        assert_eq!(plan.tasks[1].start, date().and_hms_opt(10, 0, 0).unwrap());
    }
}
