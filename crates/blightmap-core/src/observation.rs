//! Geotagged classification records and the validated snapshot the engine
//! consumes.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::disease::Disease;
use crate::error::{EngineError, ParseError};
use crate::geodesy::GeoPoint;

/// A single geotagged disease-classification data point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub id: String,
    #[serde(alias = "latitude")]
    pub lat: f64,
    #[serde(alias = "longitude")]
    pub lng: f64,
    /// `None` while the photo is still unclassified.
    #[serde(default)]
    pub disease: Option<Disease>,
    /// Capture time, epoch milliseconds.
    pub timestamp: i64,
}

impl Observation {
    pub fn new(id: impl Into<String>, lat: f64, lng: f64, disease: Option<Disease>, timestamp: i64) -> Self {
        Self { id: id.into(), lat, lng, disease, timestamp }
    }

    #[inline]
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }

    /// Classified and not healthy.
    pub fn is_diseased(&self) -> bool {
        self.disease.is_some_and(Disease::is_diseased)
    }

    /// Disease tag if diseased, `None` for healthy or unclassified.
    pub fn diseased_tag(&self) -> Option<Disease> {
        self.disease.filter(|d| d.is_diseased())
    }

    fn check(&self, index: usize) -> Result<(), EngineError> {
        if self.id.trim().is_empty() {
            return Err(EngineError::EmptyId { index });
        }
        if !self.lat.is_finite() || !self.lng.is_finite() {
            return Err(EngineError::NonFiniteCoordinate { id: self.id.clone(), lat: self.lat, lng: self.lng });
        }
        if !self.point().is_valid() {
            return Err(EngineError::CoordinateOutOfRange { id: self.id.clone(), lat: self.lat, lng: self.lng });
        }
        if self.timestamp < 0 {
            return Err(EngineError::NegativeTimestamp { id: self.id.clone(), timestamp: self.timestamp });
        }
        Ok(())
    }
}

/// An ordered, validated snapshot of observations.
///
/// Order is significant: zone seeds are picked in this order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ObservationSet {
    items: Vec<Observation>,
}

impl ObservationSet {
    /// Validate every record and keep input order. Fails on the first bad
    /// record rather than dropping it.
    pub fn new(items: Vec<Observation>) -> Result<Self, EngineError> {
        let mut ids = HashSet::with_capacity(items.len());
        for (index, obs) in items.iter().enumerate() {
            obs.check(index)?;
            if !ids.insert(obs.id.as_str()) {
                return Err(EngineError::DuplicateId(obs.id.clone()));
            }
        }
        Ok(Self { items })
    }

    /// Parse a JSON array of observations and validate it.
    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        let items: Vec<Observation> = serde_json::from_str(json)?;
        Ok(Self::new(items)?)
    }

    pub fn as_slice(&self) -> &[Observation] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Result<&Observation, EngineError> {
        self.items
            .iter()
            .find(|o| o.id == id)
            .ok_or_else(|| EngineError::UnknownObservation(id.to_string()))
    }

    pub fn diseased(&self) -> impl Iterator<Item = &Observation> {
        self.items.iter().filter(|o| o.is_diseased())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
