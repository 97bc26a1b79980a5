//! In-memory form of the persisted geodata document.
//!
//! The document was seeded from coordinates recorded by earlier scrapes after
//! the campus map's per-building API was retired. It has two levels:
//!
//! ```json
//! {
//!   "items": [
//!     { "id": 11414, "point": { "latitude": "-35.27", "longitude": "149.12" } },
//!     { "id": 20, "related_points": [99] }
//!   ],
//!   "points": { "99": { "latitude": "-35.28", "longitude": "149.11" } }
//! }
//! ```
//!
//! Entries without their own `point` borrow the first related point (usually
//! the parent building).

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeodataCache {
    #[serde(default)]
    pub items: Vec<GeoItem>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub points: BTreeMap<String, GeoPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoItem {
    /// Campus map id, as found in `maps#show=<id>` links.
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point: Option<GeoPoint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_points: Vec<i64>,
    /// Fields of historical entries that the resolver does not read, kept so
    /// a load/save cycle leaves them intact.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Coordinates held as strings, exactly as the timetable output carries them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(deserialize_with = "coordinate")]
    pub latitude: String,
    #[serde(deserialize_with = "coordinate")]
    pub longitude: String,
}

impl GeoPoint {
    #[must_use]
    pub fn new(latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        Self {
            latitude: latitude.into(),
            longitude: longitude.into(),
        }
    }
}

/// Accepts a coordinate written either as a JSON string or a JSON number.
fn coordinate<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCoordinate {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawCoordinate::deserialize(deserializer)? {
        RawCoordinate::Text(s) => s,
        RawCoordinate::Number(n) => n.to_string(),
    })
}

/// Result of looking a map id up in the cache.
#[derive(Debug, PartialEq, Eq)]
pub enum CacheLookup<'a> {
    Hit(&'a GeoPoint),
    /// The id is cached but has no point and its first related point is not
    /// in `points`.
    Dangling,
    Miss,
}

impl GeodataCache {
    /// Finds the first entry with `map_id` and returns its point, following
    /// the first related point when the entry has none of its own.
    #[must_use]
    pub fn lookup(&self, map_id: i64) -> CacheLookup<'_> {
        let Some(item) = self.items.iter().find(|item| item.id == map_id) else {
            return CacheLookup::Miss;
        };

        if let Some(point) = &item.point {
            return CacheLookup::Hit(point);
        }

        item.related_points
            .first()
            .and_then(|related| self.points.get(&related.to_string()))
            .map_or(CacheLookup::Dangling, CacheLookup::Hit)
    }

    /// Appends a resolved point under `map_id`.
    ///
    /// Existing entries are never replaced: returns `false` and leaves the
    /// cache unchanged if `map_id` is already present.
    pub fn append(&mut self, map_id: i64, point: GeoPoint) -> bool {
        if self.items.iter().any(|item| item.id == map_id) {
            return false;
        }
        self.items.push(GeoItem {
            id: map_id,
            point: Some(point),
            related_points: Vec::new(),
            extra: serde_json::Map::new(),
        });
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
