//! Greedy first-seed zone deduplication.
//!
//! Walks the snapshot in input order. The first diseased observation not
//! already within the proximity radius of an accepted centre becomes a zone
//! seed; later diseased observations inside that radius are absorbed. This is
//! order-dependent on purpose: reordering the input may move zone centres.

#[cfg(feature = "threading")]
use rayon::prelude::*;

use crate::disease::SeverityRanking;
use crate::geodesy::{haversine_m, GeoPoint};
use crate::observation::Observation;
use crate::zone::{analyze_zone, Zone, ZoneRadii};

/// Pick zone seeds in input order.
///
/// An observation is skipped when it lies strictly closer than
/// `proximity_m` to a centre accepted earlier in the walk.
pub fn select_seeds(all: &[Observation], proximity_m: f64) -> Vec<&Observation> {
    all.iter()
        .filter(|o| o.is_diseased())
        .fold(
            (Vec::new(), Vec::<GeoPoint>::new()),
            |(mut seeds, mut accepted_centers), o| {
                let p = o.point();
                let covered = accepted_centers.iter().any(|&c| haversine_m(c, p) < proximity_m);
                if !covered {
                    accepted_centers.push(p);
                    seeds.push(o);
                }
                (seeds, accepted_centers)
            },
        )
        .0
}

/// Build the deduplicated zone list for a snapshot.
///
/// Seeds are chosen sequentially; with the `threading` feature the
/// per-seed analysis then runs in parallel. Output order is seed order in
/// both cases.
pub fn build_zones(all: &[Observation], radii: ZoneRadii, ranking: &SeverityRanking) -> Vec<Zone> {
    let seeds = select_seeds(all, radii.proximity_m);
    tracing::debug!(seeds = seeds.len(), observations = all.len(), "zone seeds selected");

    #[cfg(feature = "threading")]
    let zones: Vec<Zone> = seeds
        .par_iter()
        .filter_map(|seed| analyze_zone(seed, all, radii, ranking))
        .collect();

    #[cfg(not(feature = "threading"))]
    let zones: Vec<Zone> = seeds
        .iter()
        .filter_map(|seed| analyze_zone(seed, all, radii, ranking))
        .collect();

    zones
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disease::Disease;

    fn diseased(id: &str, p: GeoPoint, d: Disease) -> Observation {
        Observation::new(id, p.lat, p.lng, Some(d), 0)
    }

    #[test]
    fn empty_and_all_healthy_inputs_yield_no_zones() {
        let ranking = SeverityRanking::default();
        assert!(build_zones(&[], ZoneRadii::default(), &ranking).is_empty());

        let p = GeoPoint::new(10.0, 106.0);
        let healthy = vec![
            Observation::new("a", p.lat, p.lng, Some(Disease::Healthy), 0),
            Observation::new("b", p.lat, p.lng, None, 0),
        ];
        assert!(build_zones(&healthy, ZoneRadii::default(), &ranking).is_empty());
    }

    #[test]
    fn first_seen_point_becomes_the_seed() {
        let origin = GeoPoint::new(10.0, 106.0);
        let all = vec![
            diseased("first", origin, Disease::Blast),
            diseased("second", origin.offset_m(20.0, 0.0), Disease::Blast),
        ];
        let zones = build_zones(&all, ZoneRadii::default(), &SeverityRanking::default());
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].seed_id, "first");

        let reversed: Vec<Observation> = all.into_iter().rev().collect();
        let zones = build_zones(&reversed, ZoneRadii::default(), &SeverityRanking::default());
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].seed_id, "second");
    }

    #[test]
    fn chain_of_points_is_greedy_not_transitive() {
        // a — 40 m — b — 40 m — c: b is absorbed by a, but c is 80 m from a
        // and becomes its own seed even though it is within 50 m of b.
        let a = GeoPoint::new(10.0, 106.0);
        let all = vec![
            diseased("a", a, Disease::Blast),
            diseased("b", a.offset_m(0.0, 40.0), Disease::Blast),
            diseased("c", a.offset_m(0.0, 80.0), Disease::BacterialLeafBlight),
        ];
        let zones = build_zones(&all, ZoneRadii::default(), &SeverityRanking::default());
        let seeds: Vec<&str> = zones.iter().map(|z| z.seed_id.as_str()).collect();
        assert_eq!(seeds, ["a", "c"]);
        // c's neighbourhood still includes b; the 1-1 tie goes to the more
        // severe blight.
        assert_eq!(zones[1].total_diseased_in_zone, 2);
        assert_eq!(zones[1].dominant_disease, Disease::BacterialLeafBlight);
    }

    #[test]
    fn point_exactly_one_radius_away_seeds_its_own_zone() {
        let a = GeoPoint::new(10.0, 106.0);
        let all = vec![
            diseased("a", a, Disease::Blast),
            diseased("b", a.offset_m(0.0, 50.0), Disease::BrownSpot),
        ];
        let radii = ZoneRadii { proximity_m: haversine_m(all[0].point(), all[1].point()), ..ZoneRadii::default() };
        let zones = build_zones(&all, radii, &SeverityRanking::default());
        let seeds: Vec<&str> = zones.iter().map(|z| z.seed_id.as_str()).collect();
        assert_eq!(seeds, ["a", "b"]);
        // Membership is inclusive, so each zone still counts the other point.
        for z in &zones {
            assert_eq!(z.total_diseased_in_zone, 2, "zone {}", z.seed_id);
            assert_eq!(z.disease_breakdown.get(Disease::Blast), 1);
            assert_eq!(z.disease_breakdown.get(Disease::BrownSpot), 1);
        }
    }

    #[cfg(feature = "threading")]
    #[test]
    fn parallel_build_matches_sequential_seed_order() {
        use crate::synth::{scatter_field, FieldParams};

        let ranking = SeverityRanking::default();
        let radii = ZoneRadii::default();
        for seed in [1, 7, 42] {
            let all = scatter_field(&FieldParams { seed, ..FieldParams::default() });
            let sequential: Vec<Zone> = select_seeds(&all, radii.proximity_m)
                .into_iter()
                .filter_map(|s| analyze_zone(s, &all, radii, &ranking))
                .collect();
            assert!(!sequential.is_empty(), "seed {seed}");
            assert_eq!(build_zones(&all, radii, &ranking), sequential, "seed {seed}");
        }
    }

    #[test]
    fn healthy_points_never_seed() {
        let origin = GeoPoint::new(10.0, 106.0);
        let all = vec![
            Observation::new("h", origin.lat, origin.lng, Some(Disease::Healthy), 0),
            diseased("d", origin.offset_m(10.0, 0.0), Disease::BrownSpot),
        ];
        let zones = build_zones(&all, ZoneRadii::default(), &SeverityRanking::default());
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].seed_id, "d");
    }

    #[test]
    fn rebuild_is_identical() {
        let origin = GeoPoint::new(10.0, 106.0);
        let all: Vec<Observation> = (0..12)
            .map(|i| {
                let d = [Disease::Blast, Disease::BrownSpot, Disease::BacterialLeafBlight][i % 3];
                diseased(&format!("o{i}"), origin.offset_m(i as f64 * 17.0, (i % 4) as f64 * 23.0), d)
            })
            .collect();
        let ranking = SeverityRanking::default();
        assert_eq!(
            build_zones(&all, ZoneRadii::default(), &ranking),
            build_zones(&all, ZoneRadii::default(), &ranking)
        );
    }
}
