//! String normalization rules shared by the course and lesson extractors.
//!
//! The patterns here are part of the output contract: the timetable viewer
//! groups lessons by `activity` and `occurrence`, and depends on the `"Err"`
//! and `"01"` defaults.

use std::sync::LazyLock;

use regex::Regex;
use timetable_core::Day;

/// `_(N)` marker the portal appends to repeated offerings of one course.
static OFFERING_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_\([0-9]+\)").expect("valid offering marker regex"));
static ACTIVITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-(?:[A-Za-z]|[^/\W])+").expect("valid activity regex"));
static OCCURRENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/[0-9]+").expect("valid occurrence regex"));

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

pub(crate) const DEFAULT_ACTIVITY: &str = "Err";
pub(crate) const DEFAULT_OCCURRENCE: &str = "01";

/// Removes every `_(N)` offering marker so repeated offerings collapse to one
/// identifier: `"COMP1100_S1_(2)"` becomes `"COMP1100_S1"`.
///
/// Repeats until no marker is left, since removing one marker can join its
/// neighbours into a new one (`"x__(1)(2)"`).
#[must_use]
pub fn strip_offering_marker(s: &str) -> String {
    let mut out = s.to_owned();
    while OFFERING_MARKER_RE.is_match(&out) {
        out = OFFERING_MARKER_RE.replace_all(&out, "").into_owned();
    }
    out
}

/// Maps an English weekday name to its index (Monday = 0). Matching is exact;
/// anything else is [`Day::NotFound`].
#[must_use]
pub fn day_to_num(s: &str) -> Day {
    WEEKDAYS
        .iter()
        .position(|day| *day == s)
        .and_then(|i| u8::try_from(i).ok())
        .map_or(Day::NotFound, Day::Index)
}

/// Extracts the activity code following the first `-` in a lesson name:
/// `"COMP1100_S1-LecA/01"` yields `"LecA"`.
#[must_use]
pub fn parse_activity(name: &str) -> String {
    ACTIVITY_RE
        .find(name)
        .map_or(DEFAULT_ACTIVITY, |m| &m.as_str()[1..])
        .to_owned()
}

/// Extracts the group index following the first `/` in a lesson name:
/// `"COMP1100_S1-TutA/02"` yields `"02"`.
#[must_use]
pub fn parse_occurrence(name: &str) -> String {
    OCCURRENCE_RE
        .find(name)
        .map_or(DEFAULT_OCCURRENCE, |m| &m.as_str()[1..])
        .to_owned()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
