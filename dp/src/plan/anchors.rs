//! Meal anchor placement and free-segment derivation

use chrono::Duration;
use tracing::debug;

use super::types::{DayWindow, MealSlot, PlanError, RawTask, Segment};

/// Title substrings that mark a task as a meal
const MEAL_MARKERS: &[&str] = &[
    "прием пищи",
    "приём пищи",
    "еда",
    "поесть",
    "перекус",
    "meal",
    "breakfast",
    "lunch",
    "dinner",
    "snack",
];

/// Fallback meal length when no meal-like task provides an estimate
pub(crate) const DEFAULT_MEAL_MINUTES: u32 = 20;

pub(crate) fn is_meal_like(title: &str) -> bool {
    let low = title.to_lowercase();
    MEAL_MARKERS.iter().any(|m| low.contains(m))
}

/// Split the base tasks into the normal pool and a meal duration.
///
/// Meal-like tasks become anchors only when the user asked for a meal
/// count; otherwise they stay ordinary tasks. The duration comes from
/// the first meal-like task when its estimate is plausible (at most an
/// hour), else the default.
pub(crate) fn split_meals(tasks: &[RawTask], meal_count: u32) -> (Vec<RawTask>, u32) {
    let mut meal_duration = None;
    let mut normal = Vec::with_capacity(tasks.len());

    for t in tasks {
        let est = t.est_minutes.max(5);
        if meal_count > 0 && is_meal_like(&t.title) {
            if meal_duration.is_none() {
                meal_duration = Some(if est <= 60 { est } else { DEFAULT_MEAL_MINUTES });
            }
        } else {
            normal.push(RawTask {
                title: t.title.clone(),
                est_minutes: est,
                priority: t.priority,
            });
        }
    }

    (normal, meal_duration.unwrap_or(DEFAULT_MEAL_MINUTES))
}

/// Compute evenly spaced meal slots inside the window.
///
/// Slot i (1-based) centers at `floor(total * i / (count+1))` minutes
/// into the window, shifted left when it would overrun the window end.
/// Increasing index order gives increasing start times.
pub(crate) fn place_meal_slots(
    window: &DayWindow,
    meal_count: u32,
    meal_duration: u32,
) -> Result<Vec<MealSlot>, PlanError> {
    if meal_count == 0 {
        return Ok(Vec::new());
    }

    let total = window.total_minutes;
    // disjointness bound: slot centers sit one interval apart, so slots
    // can only collide once the interval drops below the meal duration
    if total < meal_duration as i64 * (meal_count as i64 + 1) {
        return Err(PlanError::WindowTooShort {
            total_minutes: total,
            meal_count,
            meal_duration,
        });
    }

    let interval = total as f64 / (meal_count as f64 + 1.0);
    let mut slots = Vec::with_capacity(meal_count as usize);

    for i in 1..=meal_count {
        let center = (interval * i as f64) as i64;
        let mut start_min = (center - meal_duration as i64 / 2).max(0);
        if start_min + meal_duration as i64 > total {
            start_min = total - meal_duration as i64;
        }

        let start = window.start + Duration::minutes(start_min);
        slots.push(MealSlot {
            start,
            end: start + Duration::minutes(meal_duration as i64),
        });
    }

    debug!(meal_count, meal_duration, "place_meal_slots: placed");
    Ok(slots)
}

/// Derive the free segments around the meal slots, in temporal order:
/// before the first slot, between slots, and after the last one.
pub(crate) fn free_segments(window: &DayWindow, slots: &[MealSlot]) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut cur = window.start;

    for slot in slots {
        if slot.start > cur {
            segments.push(Segment::new(cur, slot.start));
        }
        cur = slot.end;
    }
    if cur < window.end {
        segments.push(Segment::new(cur, window.end));
    }

    segments
}
