//! Course extraction from one header/table fragment pair.

use scraper::ElementRef;
use timetable_core::Course;

use crate::error::ExtractError;
use crate::geodata::{GeodataResolver, LocationSearch};
use crate::lesson::extract_lesson;
use crate::markup::{self, DATE_HEADING, HEADING, LINK, ROW};
use crate::normalize::strip_offering_marker;

/// The portal appends the class list to the heading, e.g.
/// `"Programming as Problem Solving (Class: LecA, TutA)"`.
const CLASS_SUFFIX: &str = " (Class:";

/// Builds a [`Course`] from a collapsible header and its timetable body.
///
/// Rows are extracted in document order; a table body without rows yields
/// a course with no lessons.
///
/// # Errors
///
/// - [`ExtractError::Header`] if the header lacks its heading, link, `href`,
///   or date heading.
/// - [`ExtractError::Row`] for the first row that fails to parse. The error
///   carries the raw row markup and the course identity; rows already
///   resolved are discarded with the course.
pub async fn extract_course<S: LocationSearch>(
    header: ElementRef<'_>,
    table: ElementRef<'_>,
    resolver: &mut GeodataResolver<'_, S>,
) -> Result<Course, ExtractError> {
    let mut course = parse_header(header)?;

    for (row_index, row) in table.select(&ROW).enumerate() {
        match extract_lesson(row, resolver).await {
            Ok(lesson) => course.lessons.push(lesson),
            Err(source) => {
                return Err(ExtractError::Row {
                    course: course.to_string(),
                    row_index,
                    row_markup: row.html(),
                    source,
                });
            }
        }
    }

    tracing::debug!(
        course = %course,
        id = %course.id,
        lessons = course.lessons.len(),
        "extracted course"
    );
    Ok(course)
}

/// Identity fields of the course; `lessons` is left empty.
fn parse_header(header: ElementRef<'_>) -> Result<Course, ExtractError> {
    let malformed = |reason: &str| ExtractError::Header {
        reason: reason.to_owned(),
        markup: header.html(),
    };

    let heading = header
        .select(&HEADING)
        .next()
        .ok_or_else(|| malformed("no <h3> heading"))?;
    let heading_text = markup::text_of(heading);
    let title_text = heading_text
        .split(CLASS_SUFFIX)
        .next()
        .unwrap_or_default();

    let link = header
        .select(&LINK)
        .next()
        .ok_or_else(|| malformed("no course link"))?;
    let href = link
        .value()
        .attr("href")
        .ok_or_else(|| malformed("course link has no href"))?;

    let dates = header
        .select(&DATE_HEADING)
        .next()
        .ok_or_else(|| malformed("no date heading"))?;

    Ok(Course {
        title: strip_offering_marker(title_text),
        id: strip_offering_marker(&markup::text_of(link)),
        link: href.to_owned(),
        dates: markup::text_of(dates).trim().to_owned(),
        lessons: Vec::new(),
    })
}
