//! Loading and persisting the geodata cache document.

use std::path::Path;

use anyhow::Context;
use timetable_scraper::GeodataCache;

/// Reads the cache from `path`; a missing file starts an empty cache.
pub(crate) fn load(path: &Path) -> anyhow::Result<GeodataCache> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "geodata cache not found; starting empty");
        return Ok(GeodataCache::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading geodata cache {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing geodata cache {}", path.display()))
}

pub(crate) fn save(path: &Path, cache: &GeodataCache) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(cache)?;
    std::fs::write(path, json)
        .with_context(|| format!("writing geodata cache {}", path.display()))
}
