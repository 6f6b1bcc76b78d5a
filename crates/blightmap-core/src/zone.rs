//! Single-seed zone analysis: gather diseased neighbours of a seed and
//! resolve the dominant disease.
//!
//! Dominance is count first, severity rank second. The breakdown keeps
//! first-seen order so that the scan is reproducible for a given input order.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::disease::{Disease, SeverityRanking};
use crate::geodesy::{within, GeoPoint};
use crate::observation::Observation;

/// Neighbourhood radius for zone membership, deduplication and tap grouping.
pub const PROXIMITY_RADIUS_M: f64 = 50.0;
/// Radius of the boundary circle handed to the renderer.
pub const BOUNDARY_RADIUS_M: f64 = 30.0;

/// Radii used by zone analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneRadii {
    /// Membership radius (inclusive) around a seed.
    pub proximity_m: f64,
    /// Display-only radius copied onto each zone.
    pub boundary_m: f64,
}

impl Default for ZoneRadii {
    fn default() -> Self {
        Self { proximity_m: PROXIMITY_RADIUS_M, boundary_m: BOUNDARY_RADIUS_M }
    }
}

// ── Breakdown ─────────────────────────────────────────────────────────────────

/// Per-disease counts in the order each disease was first encountered.
///
/// Serialises as a JSON object whose keys keep that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiseaseBreakdown {
    entries: Vec<(Disease, usize)>,
}

impl DiseaseBreakdown {
    pub fn tally<I>(diseases: I) -> Self
    where
        I: IntoIterator<Item = Disease>,
    {
        let mut breakdown = Self::default();
        for d in diseases {
            breakdown.add(d);
        }
        breakdown
    }

    pub fn add(&mut self, disease: Disease) {
        match self.entries.iter_mut().find(|(d, _)| *d == disease) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((disease, 1)),
        }
    }

    pub fn get(&self, disease: Disease) -> usize {
        self.entries.iter().find(|(d, _)| *d == disease).map_or(0, |&(_, c)| c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Disease, usize)> + '_ {
        self.entries.iter().copied()
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|&(_, c)| c).sum()
    }

    /// Highest count wins; on equal counts the strictly higher severity rank
    /// wins; otherwise the earlier entry stays.
    pub fn dominant(&self, ranking: &SeverityRanking) -> Option<(Disease, usize)> {
        let mut best: Option<(Disease, usize)> = None;
        for (disease, count) in self.iter() {
            let replaces = match best {
                None => true,
                Some((best_disease, best_count)) => {
                    count > best_count
                        || (count == best_count && ranking.rank(disease) > ranking.rank(best_disease))
                }
            };
            if replaces {
                best = Some((disease, count));
            }
        }
        best
    }
}

impl Serialize for DiseaseBreakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (disease, count) in &self.entries {
            map.serialize_entry(disease.tag(), count)?;
        }
        map.end()
    }
}

// ── Zone ──────────────────────────────────────────────────────────────────────

/// A cluster of diseased observations around one seed, with its resolved
/// dominant disease.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub seed_id: String,
    pub center_lat: f64,
    pub center_lng: f64,
    pub radius_meters: f64,
    pub dominant_disease: Disease,
    pub dominant_count: usize,
    pub total_diseased_in_zone: usize,
    pub disease_breakdown: DiseaseBreakdown,
}

impl Zone {
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(self.center_lat, self.center_lng)
    }
}

/// Analyse the neighbourhood of `seed` within `all`.
///
/// Returns `None` for a healthy or unclassified seed. A diseased seed is
/// always its own neighbour, so it always yields a zone.
pub fn analyze_zone(
    seed: &Observation,
    all: &[Observation],
    radii: ZoneRadii,
    ranking: &SeverityRanking,
) -> Option<Zone> {
    if !seed.is_diseased() {
        return None;
    }
    let center = seed.point();

    let breakdown = DiseaseBreakdown::tally(
        all.iter()
            .filter(|m| within(center, m.point(), radii.proximity_m))
            .filter_map(Observation::diseased_tag),
    );

    let (dominant_disease, dominant_count) = breakdown.dominant(ranking)?;

    Some(Zone {
        seed_id: seed.id.clone(),
        center_lat: seed.lat,
        center_lng: seed.lng,
        radius_meters: radii.boundary_m,
        dominant_disease,
        dominant_count,
        total_diseased_in_zone: breakdown.total(),
        disease_breakdown: breakdown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geodesy::haversine_m;

    fn at(id: &str, p: GeoPoint, disease: Option<Disease>) -> Observation {
        Observation::new(id, p.lat, p.lng, disease, 0)
    }

    #[test]
    fn breakdown_keeps_first_seen_order() {
        let b = DiseaseBreakdown::tally([Disease::Blast, Disease::BrownSpot, Disease::Blast]);
        let order: Vec<(Disease, usize)> = b.iter().collect();
        assert_eq!(order, [(Disease::Blast, 2), (Disease::BrownSpot, 1)]);
        assert_eq!(b.total(), 3);
        assert_eq!(b.get(Disease::Unknown), 0);
    }

    #[test]
    fn breakdown_serialises_in_first_seen_order() {
        let b = DiseaseBreakdown::tally([Disease::BrownSpot, Disease::BacterialLeafBlight, Disease::BrownSpot]);
        let json = serde_json::to_string(&b).unwrap();
        assert_eq!(json, r#"{"brown_spot":2,"bacterial_leaf_blight":1}"#);
    }

    #[test]
    fn higher_count_beats_severity() {
        let b = DiseaseBreakdown::tally([Disease::BrownSpot, Disease::BacterialLeafBlight, Disease::BrownSpot]);
        assert_eq!(b.dominant(&SeverityRanking::default()), Some((Disease::BrownSpot, 2)));
    }

    #[test]
    fn severity_breaks_count_ties_in_either_scan_order() {
        let ranking = SeverityRanking::default();
        let ab = DiseaseBreakdown::tally([Disease::Blast, Disease::Blast, Disease::BacterialLeafBlight, Disease::BacterialLeafBlight]);
        let ba = DiseaseBreakdown::tally([Disease::BacterialLeafBlight, Disease::BacterialLeafBlight, Disease::Blast, Disease::Blast]);
        assert_eq!(ab.dominant(&ranking), Some((Disease::BacterialLeafBlight, 2)));
        assert_eq!(ba.dominant(&ranking), Some((Disease::BacterialLeafBlight, 2)));
    }

    #[test]
    fn empty_breakdown_has_no_dominant() {
        assert_eq!(DiseaseBreakdown::default().dominant(&SeverityRanking::default()), None);
    }

    #[test]
    fn healthy_seed_yields_no_zone() {
        let p = GeoPoint::new(10.0, 106.0);
        let all = vec![at("h", p, Some(Disease::Healthy)), at("d", p, Some(Disease::Blast))];
        assert!(analyze_zone(&all[0], &all, ZoneRadii::default(), &SeverityRanking::default()).is_none());
        let pending = at("p", p, None);
        assert!(analyze_zone(&pending, &all, ZoneRadii::default(), &SeverityRanking::default()).is_none());
    }

    #[test]
    fn membership_radius_is_inclusive_and_ignores_healthy() {
        let seed_p = GeoPoint::new(10.0, 106.0);
        let all = vec![
            at("seed", seed_p, Some(Disease::Blast)),
            at("near", seed_p.offset_m(30.0, 0.0), Some(Disease::BrownSpot)),
            at("edge", seed_p.offset_m(0.0, 49.9), Some(Disease::BrownSpot)),
            at("far", seed_p.offset_m(60.0, 0.0), Some(Disease::BacterialLeafBlight)),
            at("ok", seed_p, Some(Disease::Healthy)),
            at("pending", seed_p, None),
        ];
        let zone = analyze_zone(&all[0], &all, ZoneRadii::default(), &SeverityRanking::default()).unwrap();
        assert_eq!(zone.total_diseased_in_zone, 3);
        assert_eq!(zone.dominant_disease, Disease::BrownSpot);
        assert_eq!(zone.dominant_count, 2);
        assert_eq!(zone.disease_breakdown.get(Disease::BacterialLeafBlight), 0);
        assert_eq!(zone.seed_id, "seed");
        assert_eq!(zone.center(), seed_p);
        assert_eq!(zone.radius_meters, BOUNDARY_RADIUS_M);
    }

    #[test]
    fn member_exactly_on_the_radius_counts() {
        let seed_p = GeoPoint::new(10.0, 106.0);
        let all = vec![
            at("seed", seed_p, Some(Disease::Blast)),
            at("rim", seed_p.offset_m(0.0, 50.0), Some(Disease::BrownSpot)),
        ];
        let d = haversine_m(all[0].point(), all[1].point());
        let radii = ZoneRadii { proximity_m: d, ..ZoneRadii::default() };
        let zone = analyze_zone(&all[0], &all, radii, &SeverityRanking::default()).unwrap();
        assert_eq!(zone.total_diseased_in_zone, 2);
        assert_eq!(zone.disease_breakdown.get(Disease::BrownSpot), 1);
    }

    #[test]
    fn zone_serialises_with_camel_case_keys() {
        let p = GeoPoint::new(0.0, 0.0);
        let all = vec![at("a", p, Some(Disease::Blast))];
        let zone = analyze_zone(&all[0], &all, ZoneRadii::default(), &SeverityRanking::default()).unwrap();
        let v = serde_json::to_value(&zone).unwrap();
        assert_eq!(v["dominantDisease"], "blast");
        assert_eq!(v["totalDiseasedInZone"], 1);
        assert_eq!(v["radiusMeters"], 30.0);
        assert_eq!(v["diseaseBreakdown"]["blast"], 1);
    }
}
