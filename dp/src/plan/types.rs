//! Value objects for day planning
//!
//! Everything here is re-created on every replan; no placed task
//! outlives one planning pass.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A task as extracted from the goal description, before placement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTask {
    pub title: String,
    /// Estimated duration in minutes, at least 5
    pub est_minutes: u32,
    /// 1 = important, 2 = normal, 3 = minor
    pub priority: u8,
}

/// A task with a concrete start instant inside (or, for overflow, after)
/// the day window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedTask {
    pub title: String,
    pub est_minutes: u32,
    pub priority: u8,
    pub start: NaiveDateTime,
}

impl PlacedTask {
    pub fn end(&self) -> NaiveDateTime {
        self.start + Duration::minutes(self.est_minutes as i64)
    }

    /// Project back to the placement-free form used as replan input
    pub fn to_raw(&self) -> RawTask {
        RawTask {
            title: self.title.clone(),
            est_minutes: self.est_minutes,
            priority: self.priority,
        }
    }
}

/// Which day the agenda is for. Labels the rendering only; the window
/// always builds on the date the caller passes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayLabel {
    #[default]
    Today,
    Tomorrow,
    DayAfterTomorrow,
}

impl fmt::Display for DayLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Today => write!(f, "today"),
            Self::Tomorrow => write!(f, "tomorrow"),
            Self::DayAfterTomorrow => write!(f, "day after tomorrow"),
        }
    }
}

/// The instant interval between wake and sleep times
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub total_minutes: i64,
    pub label: DayLabel,
}

/// A contiguous unused sub-interval of the day window; `cursor` marks
/// the next unallocated instant and only ever moves forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub cursor: NaiveDateTime,
}

impl Segment {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            start,
            end,
            cursor: start,
        }
    }

    /// Minutes left between the cursor and the segment end
    pub fn free_minutes(&self) -> i64 {
        (self.end - self.cursor).num_minutes()
    }
}

/// A fixed-position meal interval; every slot in one plan shares a
/// duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MealSlot {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl MealSlot {
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// One full day agenda, tasks in ascending start order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub tasks: Vec<PlacedTask>,
    pub label: DayLabel,
}

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("a {total_minutes}-minute day cannot fit {meal_count} meals of {meal_duration} minutes")]
    WindowTooShort {
        total_minutes: i64,
        meal_count: u32,
        meal_duration: u32,
    },
}
