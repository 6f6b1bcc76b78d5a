//! Geospatial crop-disease zone analysis.
//!
//! Takes a snapshot of geotagged classification observations and derives
//! the structures a map layer draws: deduplicated disease zones with a
//! dominant disease each, nearest-neighbour links between diseased points,
//! an outbreak outline, and tap disambiguation groups.

pub mod disease;
pub mod engine;
pub mod error;
pub mod geodesy;
pub mod linker;
pub mod observation;
pub mod summary;
pub mod synth;
pub mod tap;
pub mod zone;
pub mod zones;

pub use disease::{Disease, SeverityRanking};
pub use engine::{AnalysisReport, EngineConfig, ZoneEngine};
pub use error::{EngineError, ParseError};
pub use geodesy::{haversine_m, Bounds, GeoPoint};
pub use linker::{build_edges, outbreak_polygon, Edge};
pub use observation::{Observation, ObservationSet};
pub use tap::{classify_tap, resolve_tap, Group, TapResolution};
pub use zone::{analyze_zone, DiseaseBreakdown, Zone, ZoneRadii};
pub use zones::build_zones;
