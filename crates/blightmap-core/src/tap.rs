//! Tap disambiguation: which observations share the tapped spot.

use serde::Serialize;

use crate::geodesy::haversine_m;
use crate::observation::Observation;

/// Co-located observations around a tapped one, in snapshot order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub observation_ids: Vec<String>,
}

/// Whether a tap landed on one observation or on a stack of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TapResolution {
    /// Only the tapped observation is nearby; open it directly.
    Single { id: String },
    /// Several observations share the spot; present a picker.
    Cluster(Group),
}

/// Every observation strictly closer than `radius_m` to `selected`,
/// diseased or not. `selected` is included when it belongs to `all`.
pub fn resolve_tap<'a>(selected: &Observation, all: &'a [Observation], radius_m: f64) -> Vec<&'a Observation> {
    let origin = selected.point();
    all.iter().filter(|m| haversine_m(origin, m.point()) < radius_m).collect()
}

/// Classify the result of [`resolve_tap`].
pub fn classify_tap(selected: &Observation, all: &[Observation], radius_m: f64) -> TapResolution {
    let group = resolve_tap(selected, all, radius_m);
    if group.len() <= 1 {
        TapResolution::Single { id: selected.id.clone() }
    } else {
        TapResolution::Cluster(Group { observation_ids: group.iter().map(|o| o.id.clone()).collect() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disease::Disease;
    use crate::geodesy::GeoPoint;
    use crate::zone::PROXIMITY_RADIUS_M;

    fn at(id: &str, p: GeoPoint, disease: Option<Disease>) -> Observation {
        Observation::new(id, p.lat, p.lng, disease, 0)
    }

    #[test]
    fn lone_observation_is_unambiguous() {
        let o = GeoPoint::new(10.0, 106.0);
        let all = vec![at("a", o, Some(Disease::Blast)), at("b", o.offset_m(500.0, 0.0), None)];
        let group = resolve_tap(&all[0], &all, PROXIMITY_RADIUS_M);
        assert_eq!(group.len(), 1);
        assert_eq!(classify_tap(&all[0], &all, PROXIMITY_RADIUS_M), TapResolution::Single { id: "a".into() });
    }

    #[test]
    fn groups_all_classifications() {
        let o = GeoPoint::new(10.0, 106.0);
        let all = vec![
            at("healthy", o.offset_m(5.0, 0.0), Some(Disease::Healthy)),
            at("tapped", o, Some(Disease::Blast)),
            at("pending", o.offset_m(0.0, 8.0), None),
        ];
        let resolution = classify_tap(&all[1], &all, PROXIMITY_RADIUS_M);
        assert_eq!(
            resolution,
            TapResolution::Cluster(Group {
                observation_ids: vec!["healthy".into(), "tapped".into(), "pending".into()]
            })
        );
    }

    #[test]
    fn radius_is_exclusive() {
        let o = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 0.0005);
        let d = haversine_m(o, b);
        let all = vec![at("a", o, None), at("b", b, None)];
        assert_eq!(resolve_tap(&all[0], &all, d).len(), 1);
        assert_eq!(resolve_tap(&all[0], &all, d + 1e-6).len(), 2);
    }

    #[test]
    fn resolution_serialises_with_kind_tag() {
        let v = serde_json::to_value(TapResolution::Cluster(Group { observation_ids: vec!["a".into(), "b".into()] })).unwrap();
        assert_eq!(v["kind"], "cluster");
        assert_eq!(v["observationIds"][1], "b");
        let v = serde_json::to_value(TapResolution::Single { id: "a".into() }).unwrap();
        assert_eq!(v["kind"], "single");
    }
}
