//! Greedy first-fit allocation of tasks into free segments

use chrono::Duration;
use tracing::debug;

use super::types::{DayWindow, PlacedTask, RawTask, Segment};

/// Place tasks into the segments in priority order.
///
/// Tasks are stable-sorted by ascending priority, so equal priorities
/// keep their extraction order. Each task lands at the cursor of the
/// first segment with enough free time; tasks that fit nowhere stack
/// sequentially past the window end and never slot into earlier gaps.
pub(crate) fn allocate(segments: &mut [Segment], mut tasks: Vec<RawTask>, window: &DayWindow) -> Vec<PlacedTask> {
    tasks.sort_by_key(|t| t.priority);

    let mut placed = Vec::with_capacity(tasks.len());
    let mut tail_cursor = window.end;

    for task in tasks {
        let est = Duration::minutes(task.est_minutes as i64);
        let mut start = None;

        for seg in segments.iter_mut() {
            if seg.free_minutes() >= task.est_minutes as i64 {
                start = Some(seg.cursor);
                seg.cursor = seg.cursor + est;
                break;
            }
        }

        let start = match start {
            Some(s) => s,
            None => {
                debug!(title = %task.title, est_minutes = task.est_minutes, "allocate: overflow past window end");
                let s = tail_cursor;
                tail_cursor = tail_cursor + est;
                s
            }
        };

        placed.push(PlacedTask {
            title: task.title,
            est_minutes: task.est_minutes,
            priority: task.priority,
            start,
        });
    }

    placed
}
