pub mod course;
pub mod error;
pub mod geodata;
pub mod lesson;
pub mod normalize;
pub mod page;

mod markup;

pub use course::extract_course;
pub use error::{ExtractError, FragmentKind, GeocodeError, RowParseError};
pub use geodata::{
    CacheLookup, GeoItem, GeoPoint, GeodataCache, GeodataResolver, LocationSearch,
    MapSearchClient, ResolverStats,
};
pub use lesson::extract_lesson;
pub use normalize::{day_to_num, strip_offering_marker};
pub use page::split_page;
