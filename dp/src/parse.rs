//! Lexical extractors for the conversational command surface
//!
//! Each function scans raw text for one kind of value and returns an
//! `Option` - absence is a routing signal for the controller, never an
//! error. Rules within an extractor run in a fixed order and the first
//! match wins. The lexicon covers the Russian forms of the source
//! product plus their English equivalents.

use regex::Regex;
use std::sync::LazyLock;

use crate::plan::DayLabel;

static HM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d{1,2}):(\d{2})").expect("valid regex"));

static QUALIFIED_HOUR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})\s*(утра|вечера|am|pm)\b").expect("valid regex"));

static AT_HOUR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(?:в|at)\s*(\d{1,2})\b").expect("valid regex"));

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)\s*(?:мин|min)").expect("valid regex"));

static RANGE_HM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2}):(\d{2}).*?(\d{1,2}):(\d{2})").expect("valid regex"));

static RANGE_FROM_TO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:с|from)\s*(\d{1,2})\s*(?:до|to)\s*(\d{1,2})").expect("valid regex"));

static RANGE_DASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})\s*[–-]\s*(\d{1,2})").expect("valid regex"));

static MEAL_COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*(?:раз|при[её]м(?:ов|а)?|meals?)").expect("valid regex"));

static WAKE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:встаю|просыпаюсь|подъ[её]м|wake up|get up)[^.,;]*").expect("valid regex"));

static SLEEP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:ложусь|иду спать|спать|go to bed|go to sleep)[^.,;]*").expect("valid regex"));

/// Number words one..ten, checked in table order; the first one contained
/// in the text wins.
const NUMBER_WORDS: &[(&str, u32)] = &[
    ("одну", 1),
    ("одна", 1),
    ("один", 1),
    ("one", 1),
    ("две", 2),
    ("два", 2),
    ("two", 2),
    ("три", 3),
    ("three", 3),
    ("четыре", 4),
    ("four", 4),
    ("пять", 5),
    ("five", 5),
    ("шесть", 6),
    ("six", 6),
    ("семь", 7),
    ("seven", 7),
    ("восемь", 8),
    ("eight", 8),
    ("девять", 9),
    ("nine", 9),
    ("десять", 10),
    ("ten", 10),
];

/// Meal-count words two..seven; only consulted when a food hint is present.
const MEAL_COUNT_WORDS: &[(&str, u32)] = &[
    ("два", 2),
    ("две", 2),
    ("two", 2),
    ("три", 3),
    ("three", 3),
    ("четыре", 4),
    ("four", 4),
    ("пять", 5),
    ("five", 5),
    ("шесть", 6),
    ("six", 6),
    ("семь", 7),
    ("seven", 7),
];

const FOOD_HINTS: &[&str] = &["пищ", "еды", "meal", "food"];

const MINUTES_UNITS: &[&str] = &["мин", "min"];

/// Wake/sleep boundaries and the day label extracted from a prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WakeSleep {
    pub wake: (u32, u32),
    pub sleep: (u32, u32),
    pub label: DayLabel,
}

/// Extract a time of day.
///
/// Rules, first match wins: an `H:MM` anywhere; a bare hour with a
/// morning/evening qualifier (evening hours below 12 shift by +12,
/// a morning 12 maps to 0); `в H` / `at H`. Out-of-range candidates
/// reject the rule and the next one is tried.
pub fn clock_time(text: &str) -> Option<(u32, u32)> {
    let t = text.to_lowercase();

    if let Some(c) = HM_RE.captures(&t) {
        let h: u32 = c[1].parse().ok()?;
        let m: u32 = c[2].parse().ok()?;
        if h <= 23 && m <= 59 {
            return Some((h, m));
        }
    }

    if let Some(c) = QUALIFIED_HOUR_RE.captures(&t) {
        let h: u32 = c[1].parse().ok()?;
        if h <= 23 {
            let qualifier = &c[2];
            let evening = qualifier == "вечера" || qualifier == "pm";
            let morning = qualifier == "утра" || qualifier == "am";
            let h = if evening && h < 12 {
                h + 12
            } else if morning && h == 12 {
                0
            } else {
                h
            };
            return Some((h, 0));
        }
    }

    if let Some(c) = AT_HOUR_RE.captures(&t) {
        let h: u32 = c[1].parse().ok()?;
        if h <= 23 {
            return Some((h, 0));
        }
    }

    None
}

/// Extract a duration in minutes: digits with a minutes unit, or a
/// number word co-occurring with a minutes unit anywhere in the text.
pub fn duration_minutes(text: &str) -> Option<u32> {
    let t = text.to_lowercase();

    if let Some(c) = DURATION_RE.captures(&t) {
        return c[1].parse().ok();
    }

    if MINUTES_UNITS.iter().any(|u| t.contains(u)) {
        for (word, n) in NUMBER_WORDS {
            if t.contains(word) {
                return Some(*n);
            }
        }
    }

    None
}

/// Extract a time range as a pair of (hour, minute) tuples.
///
/// Rules: two `H:MM` times with arbitrary text between; `с H до H` /
/// `from H to H`; an `H–H` dash form. Hours above 23 (or minutes above
/// 59) reject the rule.
pub fn time_range(text: &str) -> Option<((u32, u32), (u32, u32))> {
    let t = text.to_lowercase();

    if let Some(c) = RANGE_HM_RE.captures(&t) {
        let h1: u32 = c[1].parse().ok()?;
        let m1: u32 = c[2].parse().ok()?;
        let h2: u32 = c[3].parse().ok()?;
        let m2: u32 = c[4].parse().ok()?;
        if h1 <= 23 && m1 <= 59 && h2 <= 23 && m2 <= 59 {
            return Some(((h1, m1), (h2, m2)));
        }
    }

    if let Some(c) = RANGE_FROM_TO_RE.captures(&t) {
        let h1: u32 = c[1].parse().ok()?;
        let h2: u32 = c[2].parse().ok()?;
        if h1 <= 23 && h2 <= 23 {
            return Some(((h1, 0), (h2, 0)));
        }
    }

    if let Some(c) = RANGE_DASH_RE.captures(&t) {
        let h1: u32 = c[1].parse().ok()?;
        let h2: u32 = c[2].parse().ok()?;
        if h1 <= 23 && h2 <= 23 {
            return Some(((h1, 0), (h2, 0)));
        }
    }

    None
}

/// Extract a meal-repeat count: digits with a times/meals token, or a
/// small number word co-occurring with a food hint.
pub fn meal_count(text: &str) -> Option<u32> {
    let t = text.to_lowercase();

    if let Some(c) = MEAL_COUNT_RE.captures(&t) {
        return c[1].parse().ok();
    }

    if FOOD_HINTS.iter().any(|h| t.contains(h)) {
        for (word, n) in MEAL_COUNT_WORDS {
            if t.contains(word) {
                return Some(*n);
            }
        }
    }

    None
}

/// Extract the day label and the wake/sleep boundaries.
///
/// The wake and sleep verbs anchor a fragment running to the next
/// punctuation; the fragment is handed to [`clock_time`]. Missing or
/// unparsable boundaries fall back to 08:00 and 22:00.
pub fn wake_sleep(text: &str) -> WakeSleep {
    let t = text.to_lowercase();

    let label = if t.contains("послезавтра") || t.contains("day after tomorrow") {
        DayLabel::DayAfterTomorrow
    } else if t.contains("завтра") || t.contains("tomorrow") {
        DayLabel::Tomorrow
    } else {
        DayLabel::Today
    };

    let mut wake = (8, 0);
    let mut sleep = (22, 0);

    if let Some(m) = WAKE_RE.find(&t) {
        if let Some(hm) = clock_time(m.as_str()) {
            wake = hm;
        }
    }

    if let Some(m) = SLEEP_RE.find(&t) {
        if let Some(hm) = clock_time(m.as_str()) {
            sleep = hm;
        }
    }

    WakeSleep { wake, sleep, label }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_time_prefers_hm_form() {
        assert_eq!(clock_time("встреча в 18:30"), Some((18, 30)));
        assert_eq!(clock_time("at 7:05 sharp"), Some((7, 5)));
    }

    #[test]
    fn clock_time_applies_evening_shift() {
        assert_eq!(clock_time("7 вечера"), Some((19, 0)));
        assert_eq!(clock_time("9 pm"), Some((21, 0)));
        // already past noon, no shift
        assert_eq!(clock_time("15 вечера"), Some((15, 0)));
    }

    #[test]
    fn clock_time_maps_morning_twelve_to_zero() {
        assert_eq!(clock_time("12 утра"), Some((0, 0)));
        assert_eq!(clock_time("12 am"), Some((0, 0)));
    }

    #[test]
    fn clock_time_bare_hour() {
        assert_eq!(clock_time("в 18"), Some((18, 0)));
        assert_eq!(clock_time("at 7"), Some((7, 0)));
    }

    #[test]
    fn clock_time_out_of_range_falls_through() {
        // 25:70 rejects the H:MM rule, and no later rule applies
        assert_eq!(clock_time("25:70"), None);
        // the H:MM rule rejects, the bare-hour rule still fires
        assert_eq!(clock_time("99:99 но лучше в 10"), Some((10, 0)));
        assert_eq!(clock_time("nothing here"), None);
    }

    #[test]
    fn duration_digits_with_unit() {
        assert_eq!(duration_minutes("сократи до 45 мин"), Some(45));
        assert_eq!(duration_minutes("make it 90 minutes"), Some(90));
    }

    #[test]
    fn duration_number_word_needs_unit() {
        assert_eq!(duration_minutes("за пять минут"), Some(5));
        assert_eq!(duration_minutes("five minutes will do"), Some(5));
        assert_eq!(duration_minutes("пять часов"), None);
    }

    #[test]
    fn range_two_hm_times() {
        assert_eq!(time_range("отчёт с 14:00 до 16:30"), Some(((14, 0), (16, 30))));
    }

    #[test]
    fn range_from_to_hours() {
        assert_eq!(time_range("с 9 до 11"), Some(((9, 0), (11, 0))));
        assert_eq!(time_range("from 9 to 11"), Some(((9, 0), (11, 0))));
    }

    #[test]
    fn range_dash_form() {
        assert_eq!(time_range("зал 9-11"), Some(((9, 0), (11, 0))));
        assert_eq!(time_range("gym 9–11"), Some(((9, 0), (11, 0))));
    }

    #[test]
    fn range_rejects_out_of_range_hours() {
        assert_eq!(time_range("с 99 до 11"), None);
        // an out-of-range H:MM pair rejects the first rule; the from/to
        // rule still fires on the valid hours
        assert_eq!(time_range("25:99 и 31:77, но можно с 9 до 11"), Some(((9, 0), (11, 0))));
    }

    #[test]
    fn meal_count_digit_forms() {
        assert_eq!(meal_count("ем 3 раза в день"), Some(3));
        assert_eq!(meal_count("5 приёмов пищи"), Some(5));
        assert_eq!(meal_count("2 meals please"), Some(2));
    }

    #[test]
    fn meal_count_words_need_food_hint() {
        assert_eq!(meal_count("три приёма пищи"), Some(3));
        assert_eq!(meal_count("three meals"), Some(3));
        assert_eq!(meal_count("три задачи"), None);
    }

    #[test]
    fn wake_sleep_defaults() {
        let ws = wake_sleep("просто список дел");
        assert_eq!(ws.wake, (8, 0));
        assert_eq!(ws.sleep, (22, 0));
        assert_eq!(ws.label, DayLabel::Today);
    }

    #[test]
    fn wake_sleep_parses_boundaries() {
        let ws = wake_sleep("завтра встаю в 7, ложусь в 23");
        assert_eq!(ws.wake, (7, 0));
        assert_eq!(ws.sleep, (23, 0));
        assert_eq!(ws.label, DayLabel::Tomorrow);
    }

    #[test]
    fn wake_sleep_english_boundaries() {
        let ws = wake_sleep("tomorrow I get up at 9:30 and go to bed at 23:00");
        assert_eq!(ws.wake, (9, 30));
        assert_eq!(ws.sleep, (23, 0));
        assert_eq!(ws.label, DayLabel::Tomorrow);
    }

    #[test]
    fn day_after_tomorrow_wins_over_tomorrow() {
        let ws = wake_sleep("послезавтра подъём в 6");
        assert_eq!(ws.label, DayLabel::DayAfterTomorrow);
        assert_eq!(ws.wake, (6, 0));

        let ws = wake_sleep("the day after tomorrow");
        assert_eq!(ws.label, DayLabel::DayAfterTomorrow);
    }
}
