//! Two-tier coordinate resolution: local cache first, remote name search on
//! a miss, with the remote result written back to the cache.

use std::sync::LazyLock;

use regex::Regex;

use super::cache::{CacheLookup, GeoPoint, GeodataCache};
use super::search::LocationSearch;

static MAP_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"show=([0-9]+)").expect("valid map id regex"));

/// Extracts the campus map id from a location link such as
/// `http://www.anu.edu.au/maps#show=11414`.
///
/// Returns `None` when the link has no `show=<digits>` or the digits do not
/// fit an `i64`; the latter is logged at debug level.
#[must_use]
pub fn map_id(location_id: &str) -> Option<i64> {
    let digits = MAP_ID_RE.captures(location_id)?.get(1)?.as_str();
    match digits.parse() {
        Ok(id) => Some(id),
        Err(e) => {
            tracing::debug!(location_id, error = %e, "map id out of range");
            None
        }
    }
}

/// Outcome counters for one resolver's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolverStats {
    pub cache_hits: usize,
    pub remote_hits: usize,
    pub failures: usize,
}

/// Resolves lesson locations to coordinates.
///
/// Holds the only mutable reference to the [`GeodataCache`] for the duration
/// of a run; the cache grows through [`GeodataCache::append`] alone.
pub struct GeodataResolver<'a, S> {
    cache: &'a mut GeodataCache,
    search: &'a S,
    stats: ResolverStats,
}

impl<'a, S: LocationSearch> GeodataResolver<'a, S> {
    pub fn new(cache: &'a mut GeodataCache, search: &'a S) -> Self {
        Self {
            cache,
            search,
            stats: ResolverStats::default(),
        }
    }

    #[must_use]
    pub fn stats(&self) -> ResolverStats {
        self.stats
    }

    /// Returns coordinates for `location_id`, or `None` when they cannot be
    /// found. Failures are logged with the lesson name, location and map id;
    /// they never propagate.
    ///
    /// `location_id` without a `show=<digits>` map id resolves to `None`
    /// without a lookup or a request.
    pub async fn resolve(
        &mut self,
        lesson_name: &str,
        location_id: &str,
        location: &str,
    ) -> Option<GeoPoint> {
        let map_id = map_id(location_id)?;

        match self.cache.lookup(map_id) {
            CacheLookup::Hit(point) => {
                self.stats.cache_hits += 1;
                return Some(point.clone());
            }
            CacheLookup::Dangling => {
                self.stats.failures += 1;
                tracing::warn!(
                    lesson = lesson_name,
                    location,
                    map_id,
                    "cached location has no point and no resolvable related point"
                );
                return None;
            }
            CacheLookup::Miss => {}
        }

        match self.search.search(location).await {
            Ok(point) => {
                self.cache.append(map_id, point.clone());
                self.stats.remote_hits += 1;
                tracing::debug!(map_id, location, "cached location from name search");
                Some(point)
            }
            Err(e) => {
                self.stats.failures += 1;
                tracing::warn!(
                    lesson = lesson_name,
                    location,
                    map_id,
                    location_id,
                    error = %e,
                    "could not find location"
                );
                None
            }
        }
    }
}
