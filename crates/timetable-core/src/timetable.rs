//! Structured records extracted from the timetabling portal.
//!
//! Field names follow the JSON shape the downstream timetable viewer reads:
//! a course's lessons serialize as `classes`, `location_id` serializes as
//! `locationID`, and absent coordinates are omitted rather than written as
//! `null`.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Sentinel written in place of a weekday index when the portal's day string
/// is not one of the seven English weekday names.
pub const DAY_NOT_FOUND: &str = "Not found";

/// One course offering and its scheduled lessons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Display name with the `_(N)` offering marker stripped.
    pub title: String,
    /// Course code with the `_(N)` offering marker stripped, e.g. `"COMP1100_S1"`.
    pub id: String,
    /// Relative link to the portal's detail page, copied verbatim.
    pub link: String,
    /// Free-text teaching period, e.g. `"20 Feb 2023 - 26 May 2023"`.
    pub dates: String,
    /// Lessons in source row order.
    #[serde(rename = "classes")]
    pub lessons: Vec<Lesson>,
}

impl Course {
    #[must_use]
    pub fn lesson_count(&self) -> usize {
        self.lessons.len()
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -- {}", self.title, self.dates)
    }
}

/// A single scheduled class within a [`Course`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub name: String,
    pub day: Day,
    /// Start time exactly as the portal renders it, e.g. `"09:00"`.
    pub start: String,
    pub finish: String,
    /// Teaching weeks, e.g. `"1-6,8-12"`.
    pub weeks: String,
    /// Category code taken from the name, e.g. `"LecA"`; `"Err"` when absent.
    pub activity: String,
    /// Group index taken from the name, e.g. `"02"`; `"01"` when absent.
    pub occurrence: String,
    /// One or more location names joined with `"; "`.
    pub location: String,
    /// Campus map URL of the first location link; empty when the cell had no link.
    #[serde(rename = "locationID")]
    pub location_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<String>,
}

impl Lesson {
    #[must_use]
    pub fn is_geolocated(&self) -> bool {
        self.lat.is_some() && self.lon.is_some()
    }
}

/// Day of the week as an index (Monday = 0 .. Sunday = 6), or the portal
/// sentinel for a day string that could not be recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Day {
    Index(u8),
    NotFound,
}

impl Serialize for Day {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Day::Index(i) => serializer.serialize_u8(*i),
            Day::NotFound => serializer.serialize_str(DAY_NOT_FOUND),
        }
    }
}

impl<'de> Deserialize<'de> for Day {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawDay {
            Index(u8),
            Text(String),
        }

        match RawDay::deserialize(deserializer)? {
            RawDay::Index(i) if i <= 6 => Ok(Day::Index(i)),
            RawDay::Index(i) => Err(serde::de::Error::custom(format!(
                "day index {i} is outside 0..=6"
            ))),
            RawDay::Text(s) if s == DAY_NOT_FOUND => Ok(Day::NotFound),
            RawDay::Text(s) => Err(serde::de::Error::custom(format!(
                "expected a day index or \"{DAY_NOT_FOUND}\", got \"{s}\""
            ))),
        }
    }
}
