//! `extract` command: saved portal pages in, course JSON out.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use timetable_core::{AppConfig, Course};
use timetable_scraper::{split_page, ExtractError, GeodataResolver, MapSearchClient};

use crate::geodata_store;

pub(crate) async fn run_extract(
    config: &AppConfig,
    pages: &[PathBuf],
    geodata_path: &Path,
    out: Option<&Path>,
) -> anyhow::Result<()> {
    let started = Instant::now();
    let mut cache = geodata_store::load(geodata_path)?;
    let cached_before = cache.len();

    let client = MapSearchClient::with_base_url(
        config.request_timeout_secs,
        &config.user_agent,
        &config.map_search_url,
    )?;
    let mut resolver = GeodataResolver::new(&mut cache, &client);

    let mut courses: Vec<Course> = Vec::new();
    for page_path in pages {
        let html = std::fs::read_to_string(page_path)
            .with_context(|| format!("reading page {}", page_path.display()))?;

        match split_page(&html, &mut resolver).await {
            Ok(page_courses) => {
                tracing::info!(
                    page = %page_path.display(),
                    courses = page_courses.len(),
                    "extracted page"
                );
                courses.extend(page_courses);
            }
            Err(err) => {
                report_failure(page_path, &err);
                return Err(err).with_context(|| format!("extracting {}", page_path.display()));
            }
        }
    }

    let stats = resolver.stats();
    write_courses(&courses, out)?;

    if cache.len() > cached_before {
        geodata_store::save(geodata_path, &cache)?;
        tracing::info!(
            path = %geodata_path.display(),
            added = cache.len() - cached_before,
            "saved geodata cache"
        );
    }

    tracing::info!(
        courses = courses.len(),
        lessons = courses.iter().map(Course::lesson_count).sum::<usize>(),
        geolocated = courses
            .iter()
            .flat_map(|c| &c.lessons)
            .filter(|l| l.is_geolocated())
            .count(),
        cache_hits = stats.cache_hits,
        remote_hits = stats.remote_hits,
        geocode_failures = stats.failures,
        elapsed_secs = started.elapsed().as_secs_f64(),
        "scraping complete"
    );
    Ok(())
}

fn report_failure(page_path: &Path, err: &ExtractError) {
    if matches!(err, ExtractError::Structural { .. }) {
        tracing::error!(
            page = %page_path.display(),
            "page is not a timetable result; the portal session has likely expired"
        );
    }
    if let Some(markup) = err.markup() {
        tracing::debug!(page = %page_path.display(), markup, "offending markup");
    }
}

/// Writes courses as one JSON object keyed by course id, the shape the
/// timetable viewer loads.
fn write_courses(courses: &[Course], out: Option<&Path>) -> anyhow::Result<()> {
    let mut by_id: BTreeMap<&str, &Course> = BTreeMap::new();
    for course in courses {
        if by_id.insert(course.id.as_str(), course).is_some() {
            tracing::warn!(id = %course.id, "duplicate course id; keeping the later course");
        }
    }

    let json = serde_json::to_string_pretty(&by_id)?;
    match out {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("writing courses to {}", path.display())),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
