//! Geographic primitives for observation analysis.
//! All coordinate math uses f64 degrees; distances are metres.
//!
//! `haversine_m` is the only distance function in the crate. Zone membership,
//! deduplication, linking and tap resolution all go through it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A point in geographic coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees, -90 to +90.
    pub lat: f64,
    /// Longitude in degrees, -180 to +180.
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Both components finite and inside the geographic ranges.
    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Point displaced by `north_m` / `east_m` metres on a local flat-earth
    /// approximation. Only meant for building fixtures a few km across.
    pub fn offset_m(self, north_m: f64, east_m: f64) -> Self {
        let dlat = (north_m / EARTH_RADIUS_M).to_degrees();
        let dlng = (east_m / (EARTH_RADIUS_M * self.lat.to_radians().cos())).to_degrees();
        Self { lat: self.lat + dlat, lng: self.lng + dlng }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}°N, {:.6}°E", self.lat, self.lng)
    }
}

/// Great-circle distance in metres (haversine).
///
/// Non-finite input yields a non-finite result; callers validate first.
/// Finite input always yields a finite distance in `[0, πR]`, antipodes
/// included.
pub fn haversine_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let dphi = (b.lat - a.lat).to_radians();
    let dlambda = (b.lng - a.lng).to_radians();

    // Rounding can push `h` just past 1 for antipodal pairs.
    let h = ((dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2)).clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Inclusive geofence test: `b` lies within `radius_m` of `a`.
pub fn within(a: GeoPoint, b: GeoPoint, radius_m: f64) -> bool {
    haversine_m(a, b) <= radius_m
}

/// Axis-aligned lat/lng bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_lat: f64,
    pub min_lng: f64,
    pub max_lat: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// Smallest box containing every point, or `None` for an empty input.
    pub fn enclosing<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = GeoPoint>,
    {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => Bounds { min_lat: p.lat, min_lng: p.lng, max_lat: p.lat, max_lng: p.lng },
                Some(b) => Bounds {
                    min_lat: b.min_lat.min(p.lat),
                    min_lng: b.min_lng.min(p.lng),
                    max_lat: b.max_lat.max(p.lat),
                    max_lng: b.max_lng.max(p.lng),
                },
            })
        })
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new((self.min_lat + self.max_lat) / 2.0, (self.min_lng + self.max_lng) / 2.0)
    }

    pub fn contains(&self, p: GeoPoint) -> bool {
        (self.min_lat..=self.max_lat).contains(&p.lat) && (self.min_lng..=self.max_lng).contains(&p.lng)
    }
}
