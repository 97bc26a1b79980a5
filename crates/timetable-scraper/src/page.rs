//! Splits a fetched timetable page into course header/table pairs.

use scraper::{ElementRef, Html};
use timetable_core::Course;

use crate::course::extract_course;
use crate::error::{ExtractError, FragmentKind};
use crate::geodata::{GeodataResolver, LocationSearch};
use crate::markup::{COLLAPSIBLE_HEADER, TABLE_BODY};

/// Extracts every course on a timetable page, in page order.
///
/// The i-th collapsible header is paired with the i-th table body. The page
/// is all-or-nothing: the first failing course aborts it.
///
/// # Errors
///
/// - [`ExtractError::Structural`] if the page has no headers or no table
///   bodies (typically a login or session-expired page).
/// - [`ExtractError::UnpairedFragment`] if the header and table counts differ.
/// - Any error from [`extract_course`].
pub async fn split_page<S: LocationSearch>(
    html: &str,
    resolver: &mut GeodataResolver<'_, S>,
) -> Result<Vec<Course>, ExtractError> {
    let document = Html::parse_document(html);
    let tables: Vec<ElementRef<'_>> = document.select(&TABLE_BODY).collect();
    let headers: Vec<ElementRef<'_>> = document.select(&COLLAPSIBLE_HEADER).collect();

    if tables.is_empty() || headers.is_empty() {
        return Err(ExtractError::Structural {
            headers: headers.len(),
            tables: tables.len(),
            markup: html.to_owned(),
        });
    }

    if headers.len() != tables.len() {
        let index = headers.len().min(tables.len());
        let missing = if headers.len() < tables.len() {
            FragmentKind::Header
        } else {
            FragmentKind::Table
        };
        return Err(ExtractError::UnpairedFragment { index, missing });
    }

    let mut courses = Vec::with_capacity(headers.len());
    for (header, table) in headers.into_iter().zip(tables) {
        courses.push(extract_course(header, table, resolver).await?);
    }
    Ok(courses)
}
