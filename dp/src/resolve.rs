//! Fuzzy reference resolution against the current plan's titles
//!
//! Matches a free-text mention ("move the report to 14:00") to one task
//! of the current plan by normalized substring and prefix scoring.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::plan::PlacedTask;

static NON_ALNUM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-zа-яё0-9 ]+").expect("valid regex"));
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Lowercase, strip everything but Latin/Cyrillic letters and digits,
/// collapse whitespace.
pub(crate) fn normalize(text: &str) -> String {
    let t = text.to_lowercase();
    let t = NON_ALNUM_RE.replace_all(&t, " ");
    WHITESPACE_RE.replace_all(t.trim(), " ").to_string()
}

/// Score how strongly the normalized text refers to the normalized title:
/// +5 for the whole title appearing as a substring, +3 per title word of
/// more than 3 characters contained in the text, +1 per (title word,
/// text word) pair where either is a prefix of the other.
fn score(title_norm: &str, text_norm: &str) -> u32 {
    let mut s = 0;

    if !title_norm.is_empty() && text_norm.contains(title_norm) {
        s += 5;
    }

    for w in title_norm.split_whitespace() {
        if w.chars().count() > 3 && text_norm.contains(w) {
            s += 3;
        }
    }

    for w1 in title_norm.split_whitespace() {
        for w2 in text_norm.split_whitespace() {
            if w1.starts_with(w2) || w2.starts_with(w1) {
                s += 1;
            }
        }
    }

    s
}

/// Find the task the text most plausibly refers to.
///
/// Strict `>` during the scan keeps the earliest index on ties; a zero
/// best score means no match.
pub fn match_task(text: &str, tasks: &[PlacedTask]) -> Option<usize> {
    if tasks.is_empty() {
        return None;
    }

    let text_norm = normalize(text);
    let mut best_score = 0;
    let mut best_idx = None;

    for (i, task) in tasks.iter().enumerate() {
        let s = score(&normalize(&task.title), &text_norm);
        if s > best_score {
            best_score = s;
            best_idx = Some(i);
        }
    }

    debug!(?best_idx, best_score, "match_task: scanned");
    best_idx
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn placed(title: &str) -> PlacedTask {
        PlacedTask {
            title: title.to_string(),
            est_minutes: 30,
            priority: 2,
            start: NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn normalize_strips_punctuation_and_case() {
        assert_eq!(normalize("  Написать   отчёт! "), "написать отчёт");
        assert_eq!(normalize("Team-Meeting (weekly)"), "team meeting weekly");
    }

    #[test]
    fn whole_title_mention_wins() {
        let tasks = vec![placed("Прогулка"), placed("Написать отчёт")];
        let idx = match_task("сдвинь написать отчёт на 14:00", &tasks);
        assert_eq!(idx, Some(1));
    }

    #[test]
    fn partial_word_mention_matches() {
        let tasks = vec![placed("Team meeting"), placed("Write report")];
        assert_eq!(match_task("move the report to 14:00", &tasks), Some(1));
        assert_eq!(match_task("shift the meeting earlier", &tasks), Some(0));
    }

    #[test]
    fn no_overlap_means_no_match() {
        let tasks = vec![placed("Прогулка")];
        assert_eq!(match_task("9000", &tasks), None);
    }

    #[test]
    fn resolution_is_idempotent() {
        let tasks = vec![placed("Прогулка"), placed("Звонок маме")];
        let a = match_task("перенеси звонок", &tasks);
        let b = match_task("перенеси звонок", &tasks);
        assert_eq!(a, b);
        assert_eq!(a, Some(1));
    }

    #[test]
    fn ties_keep_the_earliest_task() {
        let tasks = vec![placed("Звонок один"), placed("Звонок один")];
        assert_eq!(match_task("звонок один", &tasks), Some(0));
    }

    #[test]
    fn empty_plan_never_matches() {
        assert_eq!(match_task("anything", &[]), None);
    }
}
