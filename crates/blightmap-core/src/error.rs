use thiserror::Error;

use crate::disease::Disease;

/// Everything the engine can reject. Raised at the boundary, before any
/// analysis runs; the analysis functions themselves are infallible.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("observation #{index} has an empty id")]
    EmptyId { index: usize },

    #[error("duplicate observation id: {0}")]
    DuplicateId(String),

    #[error("observation {id}: non-finite coordinate ({lat}, {lng})")]
    NonFiniteCoordinate { id: String, lat: f64, lng: f64 },

    #[error("observation {id}: coordinate out of range ({lat}, {lng})")]
    CoordinateOutOfRange { id: String, lat: f64, lng: f64 },

    #[error("observation {id}: negative timestamp {timestamp}")]
    NegativeTimestamp { id: String, timestamp: i64 },

    #[error("severity ranking does not rank {0}")]
    UnrankedDisease(Disease),

    #[error("severity ranking lists {0} more than once")]
    DuplicateRank(Disease),

    #[error("severity ranking cannot include healthy")]
    HealthyRanked,

    #[error("{name} must be a positive finite number of metres, got {value}")]
    InvalidRadius { name: &'static str, value: f64 },

    #[error("no observation with id {0}")]
    UnknownObservation(String),
}

/// Failure while loading a snapshot from JSON.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed observation JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] EngineError),
}
