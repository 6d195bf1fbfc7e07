//! Day window construction from wake/sleep boundaries

use chrono::{Duration, NaiveDate, NaiveTime};

use super::types::DayWindow;
use crate::parse;

/// Span added when the parsed sleep time is not after the wake time,
/// modeling a bedtime past midnight without explicit next-day notation.
const WRAP_FALLBACK_HOURS: i64 = 16;

/// Build the day window for `date` from the boundaries found in the
/// prompt. Cannot fail: the extractors bound-check hours and minutes.
pub fn build(date: NaiveDate, prompt: &str) -> DayWindow {
    let ws = parse::wake_sleep(prompt);

    // bound-checked upstream; the midnight fallback is unreachable
    let wake = NaiveTime::from_hms_opt(ws.wake.0, ws.wake.1, 0).unwrap_or_default();
    let sleep = NaiveTime::from_hms_opt(ws.sleep.0, ws.sleep.1, 0).unwrap_or_default();

    let start = date.and_time(wake);
    let mut end = date.and_time(sleep);
    while end <= start {
        end = end + Duration::hours(WRAP_FALLBACK_HOURS);
    }

    DayWindow {
        start,
        end,
        total_minutes: (end - start).num_minutes(),
        label: ws.label,
    }
}
