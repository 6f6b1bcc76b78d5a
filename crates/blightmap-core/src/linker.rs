//! Nearest-neighbour links between diseased observations, and the coarse
//! outbreak outline drawn around them.
//!
//! Both are presentation aids. Neither feeds back into zone analysis.

use geo::{ConvexHull, MultiPoint, Point};
use serde::Serialize;

use crate::geodesy::{haversine_m, GeoPoint};
use crate::observation::Observation;

/// Links longer than this are not drawn.
pub const LINK_CUTOFF_M: f64 = 1_000.0;

/// Minimum number of diseased points for an outbreak outline.
pub const MIN_POLYGON_POINTS: usize = 3;

/// Directed nearest-neighbour link. `a → b` and `b → a` may both appear.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub from_id: String,
    pub to_id: String,
}

/// Link every diseased observation to its nearest diseased neighbour.
///
/// Healthy and unclassified records are ignored, so the full snapshot may be
/// passed. Ties go to the neighbour seen first. A link is kept only when it is
/// strictly shorter than `cutoff_m`. At most one edge per diseased point; the
/// result is not deduplicated as an undirected graph.
pub fn build_edges(observations: &[Observation], cutoff_m: f64) -> Vec<Edge> {
    let diseased: Vec<&Observation> = observations.iter().filter(|o| o.is_diseased()).collect();
    if diseased.len() < 2 {
        return Vec::new();
    }

    let mut edges = Vec::with_capacity(diseased.len());
    for (i, a) in diseased.iter().enumerate() {
        let mut nearest: Option<(&Observation, f64)> = None;
        for (j, b) in diseased.iter().enumerate() {
            if i == j {
                continue;
            }
            let d = haversine_m(a.point(), b.point());
            if nearest.map_or(true, |(_, best)| d < best) {
                nearest = Some((*b, d));
            }
        }
        if let Some((b, d)) = nearest {
            if d < cutoff_m {
                edges.push(Edge { from_id: a.id.clone(), to_id: b.id.clone() });
            }
        }
    }
    edges
}

/// Convex outline of the diseased points, as an open ring of vertices.
///
/// `None` below three diseased points. Collinear or coincident inputs give a
/// degenerate ring; the outline is a visual aid only.
pub fn outbreak_polygon(observations: &[Observation]) -> Option<Vec<GeoPoint>> {
    let points: Vec<Point<f64>> = observations
        .iter()
        .filter(|o| o.is_diseased())
        .map(|o| Point::new(o.lng, o.lat))
        .collect();
    if points.len() < MIN_POLYGON_POINTS {
        return None;
    }

    let hull = MultiPoint::new(points).convex_hull();
    let mut ring: Vec<GeoPoint> = hull.exterior().coords().map(|c| GeoPoint::new(c.y, c.x)).collect();
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    Some(ring)
}
