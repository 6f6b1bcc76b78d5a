//! Analysis orchestrator: runs every stage over one observation snapshot.

use serde::{Deserialize, Serialize};

use crate::disease::SeverityRanking;
use crate::error::EngineError;
use crate::geodesy::{Bounds, GeoPoint};
use crate::linker::{build_edges, outbreak_polygon, Edge, LINK_CUTOFF_M};
use crate::observation::ObservationSet;
use crate::summary::{summarize, DiseaseSummary};
use crate::tap::{classify_tap, TapResolution};
use crate::zone::{Zone, ZoneRadii, BOUNDARY_RADIUS_M, PROXIMITY_RADIUS_M};
use crate::zones::build_zones;

// ── Config ────────────────────────────────────────────────────────────────────

/// Engine tunables. Defaults reproduce the field app's map behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Default 50. Zone membership (inclusive) and seed deduplication (exclusive).
    pub proximity_radius_m: f64,
    /// Default 30. Rendered zone circle; no effect on analysis.
    pub boundary_radius_m: f64,
    /// Default 50. Tap grouping radius (exclusive).
    pub tap_radius_m: f64,
    /// Default 1000. Longest nearest-neighbour link kept (exclusive).
    pub link_cutoff_m: f64,
    /// Most severe first. Must rank every diseased tag exactly once.
    pub severity: SeverityRanking,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            proximity_radius_m: PROXIMITY_RADIUS_M,
            boundary_radius_m: BOUNDARY_RADIUS_M,
            tap_radius_m: PROXIMITY_RADIUS_M,
            link_cutoff_m: LINK_CUTOFF_M,
            severity: SeverityRanking::default(),
        }
    }
}

impl EngineConfig {
    /// Reject radii that are not positive finite metres. The severity ranking
    /// is already checked when it is constructed or deserialised.
    pub fn validate(&self) -> Result<(), EngineError> {
        let radii = [
            ("proximityRadiusM", self.proximity_radius_m),
            ("boundaryRadiusM", self.boundary_radius_m),
            ("tapRadiusM", self.tap_radius_m),
            ("linkCutoffM", self.link_cutoff_m),
        ];
        for (name, value) in radii {
            if !value.is_finite() || value <= 0.0 {
                return Err(EngineError::InvalidRadius { name, value });
            }
        }
        Ok(())
    }

    fn zone_radii(&self) -> ZoneRadii {
        ZoneRadii { proximity_m: self.proximity_radius_m, boundary_m: self.boundary_radius_m }
    }
}

// ── Output ────────────────────────────────────────────────────────────────────

/// Everything the map layer draws for one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub zones: Vec<Zone>,
    pub edges: Vec<Edge>,
    /// Convex outline of diseased points; absent below three.
    pub outbreak_polygon: Option<Vec<GeoPoint>>,
    /// Box to fit the viewport to; absent for an empty snapshot.
    pub bounds: Option<Bounds>,
    pub summary: DiseaseSummary,
}

// ── Engine ────────────────────────────────────────────────────────────────────

/// Stateless analysis engine. Every call recomputes from the snapshot.
#[derive(Debug, Clone, Default)]
pub struct ZoneEngine {
    config: EngineConfig,
}

impl ZoneEngine {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the full analysis.
    ///
    /// Stage order:
    ///   1. Zone seeds and per-seed analysis
    ///   2. Nearest-neighbour links
    ///   3. Outbreak outline
    ///   4. Viewport bounds and summary counts
    pub fn analyze(&self, observations: &ObservationSet) -> AnalysisReport {
        let all = observations.as_slice();

        let zones = build_zones(all, self.config.zone_radii(), &self.config.severity);
        let edges = build_edges(all, self.config.link_cutoff_m);
        let outbreak_polygon = outbreak_polygon(all);
        let bounds = Bounds::enclosing(all.iter().map(|o| o.point()));
        let summary = summarize(all);

        tracing::debug!(
            observations = all.len(),
            diseased = summary.diseased,
            zones = zones.len(),
            edges = edges.len(),
            "analysis complete"
        );

        AnalysisReport { zones, edges, outbreak_polygon, bounds, summary }
    }

    /// Resolve a tap on the observation with id `selected_id`.
    pub fn resolve_tap(&self, observations: &ObservationSet, selected_id: &str) -> Result<TapResolution, EngineError> {
        let selected = observations.get(selected_id)?;
        Ok(classify_tap(selected, observations.as_slice(), self.config.tap_radius_m))
    }
}
