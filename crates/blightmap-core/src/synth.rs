//! Seeded synthetic observation fields.
//!
//! Used by the report tool's demo mode and by the property tests. The same
//! parameters always produce the same field.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::disease::Disease;
use crate::geodesy::GeoPoint;
use crate::observation::Observation;

/// Timestamp of the first synthetic observation (2024-01-01T00:00:00Z).
const BASE_TIMESTAMP_MS: i64 = 1_704_067_200_000;
/// Spacing between consecutive synthetic captures.
const CAPTURE_INTERVAL_MS: i64 = 60_000;

/// One patch of observations scattered uniformly over a disc.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterSpec {
    pub center: GeoPoint,
    pub radius_m: f64,
    pub count: usize,
    /// Disease most diseased points in this patch carry.
    pub disease: Disease,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldParams {
    pub seed: u64,
    pub clusters: Vec<ClusterSpec>,
    /// 0-1. Probability a point is healthy.
    pub healthy_fraction: f32,
    /// 0-1. Probability a point is still unclassified.
    pub unclassified_fraction: f32,
    /// 0-1. Probability a diseased point carries a random other disease.
    pub mix: f32,
}

impl Default for FieldParams {
    /// Four paddies a few hundred metres apart near Ho Chi Minh City.
    fn default() -> Self {
        let origin = GeoPoint::new(10.8231, 106.6297);
        Self {
            seed: 42,
            clusters: vec![
                ClusterSpec { center: origin, radius_m: 40.0, count: 12, disease: Disease::Blast },
                ClusterSpec { center: origin.offset_m(300.0, 0.0), radius_m: 60.0, count: 20, disease: Disease::BrownSpot },
                ClusterSpec { center: origin.offset_m(0.0, 450.0), radius_m: 30.0, count: 8, disease: Disease::BacterialLeafBlight },
                ClusterSpec { center: origin.offset_m(-2_500.0, 900.0), radius_m: 80.0, count: 15, disease: Disease::Blast },
            ],
            healthy_fraction: 0.25,
            unclassified_fraction: 0.05,
            mix: 0.30,
        }
    }
}

/// Generate the observation field described by `params`, cluster by cluster.
pub fn scatter_field(params: &FieldParams) -> Vec<Observation> {
    let mut rng = StdRng::seed_from_u64(params.seed ^ 0x0B5E_12A7_10C4_7E11);
    let total: usize = params.clusters.iter().map(|c| c.count).sum();
    let mut out = Vec::with_capacity(total);

    for cluster in &params.clusters {
        for _ in 0..cluster.count {
            let point = random_point_in_disc(&mut rng, cluster.center, cluster.radius_m);
            let disease = random_disease(&mut rng, params, cluster.disease);
            let i = out.len();
            out.push(Observation::new(
                format!("obs-{i:05}"),
                point.lat,
                point.lng,
                disease,
                BASE_TIMESTAMP_MS + i as i64 * CAPTURE_INTERVAL_MS,
            ));
        }
    }
    out
}

/// Uniform point over a disc of `radius_m` around `center`.
fn random_point_in_disc(rng: &mut StdRng, center: GeoPoint, radius_m: f64) -> GeoPoint {
    // sqrt keeps the areal density uniform.
    let r = radius_m * rng.gen::<f64>().sqrt();
    let theta: f64 = rng.gen_range(0.0_f64..std::f64::consts::TAU);
    center.offset_m(r * theta.sin(), r * theta.cos())
}

fn random_disease(rng: &mut StdRng, params: &FieldParams, dominant: Disease) -> Option<Disease> {
    let roll: f32 = rng.gen();
    if roll < params.unclassified_fraction {
        return None;
    }
    if roll < params.unclassified_fraction + params.healthy_fraction {
        return Some(Disease::Healthy);
    }
    if rng.gen::<f32>() < params.mix {
        return Some(Disease::DISEASED[rng.gen_range(0..Disease::DISEASED.len())]);
    }
    Some(dominant)
}
