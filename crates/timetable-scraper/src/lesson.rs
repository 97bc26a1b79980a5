//! Lesson extraction from a single timetable row.
//!
//! The portal renders each lesson as a `<tr>` with at least eight cells:
//!
//! | cell | content |
//! |------|---------|
//! | 0 | `<a>` whose leading text is the lesson name |
//! | 1 | weekday name |
//! | 2 | start time |
//! | 3 | finish time |
//! | 5 | `<a>` with the teaching weeks |
//! | 7 | location text, or one `<a>` per location linking to the campus map |
//!
//! Cells 4 and 6 (duration and staff) are not used.

use scraper::ElementRef;
use timetable_core::Lesson;

use crate::error::RowParseError;
use crate::geodata::{GeodataResolver, LocationSearch};
use crate::markup::{self, CELL, LINK};
use crate::normalize::{day_to_num, parse_activity, parse_occurrence, strip_offering_marker};

const MIN_CELLS: usize = 8;
const LOCATION_SEPARATOR: &str = "; ";

/// Builds a [`Lesson`] from one table row, resolving its coordinates through
/// `resolver` when the location cell links to the campus map.
///
/// A geocoding failure is not an error: the lesson is returned without
/// `lat`/`lon`.
///
/// # Errors
///
/// Returns [`RowParseError`] if the row has fewer than eight cells or a
/// required link, text node, or `href` is missing.
pub async fn extract_lesson<S: LocationSearch>(
    row: ElementRef<'_>,
    resolver: &mut GeodataResolver<'_, S>,
) -> Result<Lesson, RowParseError> {
    let mut lesson = parse_row(row)?;

    if lesson.location_id.is_empty() {
        return Ok(lesson);
    }

    let point = resolver
        .resolve(&lesson.name, &lesson.location_id, &lesson.location)
        .await;
    if let Some(point) = point {
        lesson.lat = Some(point.latitude);
        lesson.lon = Some(point.longitude);
    }

    Ok(lesson)
}

/// Parses every field of the row except coordinates.
pub(crate) fn parse_row(row: ElementRef<'_>) -> Result<Lesson, RowParseError> {
    let cells: Vec<ElementRef<'_>> = row.select(&CELL).collect();
    if cells.len() < MIN_CELLS {
        return Err(RowParseError::new(format!(
            "expected at least {MIN_CELLS} cells, found {}",
            cells.len()
        )));
    }

    let name_link = first_link(cells[0], "name")?;
    let raw_name = markup::leading_text(name_link)
        .ok_or_else(|| RowParseError::new("name link does not start with text"))?;
    let name = strip_offering_marker(raw_name.trim());

    let weeks = markup::text_of(first_link(cells[5], "weeks")?)
        .trim()
        .to_owned();

    let (location, location_id) = parse_location(cells[7])?;

    Ok(Lesson {
        activity: parse_activity(&name),
        occurrence: parse_occurrence(&name),
        day: day_to_num(&markup::text_of(cells[1])),
        start: markup::text_of(cells[2]),
        finish: markup::text_of(cells[3]),
        name,
        weeks,
        location,
        location_id,
        lat: None,
        lon: None,
    })
}

/// Returns `(location, location_id)`. Without a link the cell text is the
/// location and the id is empty.
fn parse_location(cell: ElementRef<'_>) -> Result<(String, String), RowParseError> {
    let links: Vec<ElementRef<'_>> = cell.select(&LINK).collect();
    let Some(first) = links.first() else {
        return Ok((markup::text_of(cell), String::new()));
    };

    let location_id = first
        .value()
        .attr("href")
        .ok_or_else(|| RowParseError::new("location link has no href"))?
        .to_owned();
    let location = links
        .iter()
        .map(|a| markup::text_of(*a))
        .collect::<Vec<_>>()
        .join(LOCATION_SEPARATOR);

    Ok((location, location_id))
}

fn first_link<'a>(cell: ElementRef<'a>, field: &str) -> Result<ElementRef<'a>, RowParseError> {
    cell.select(&LINK)
        .next()
        .ok_or_else(|| RowParseError::new(format!("{field} cell has no link")))
}
