//! Location geocoding: a persisted cache of campus map points with a remote
//! name-search fallback for locations the cache has never seen.

mod cache;
mod resolver;
mod search;

pub use cache::{CacheLookup, GeoItem, GeoPoint, GeodataCache};
pub use resolver::{map_id, GeodataResolver, ResolverStats};
pub use search::{LocationSearch, MapSearchClient};
