//! Snapshot-wide classification counts.

use serde::Serialize;

use crate::disease::Disease;
use crate::observation::Observation;
use crate::zone::DiseaseBreakdown;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseSummary {
    pub total: usize,
    /// Healthy plus diseased.
    pub classified: usize,
    /// Observations the classifier has not labelled yet.
    pub unclassified: usize,
    pub healthy: usize,
    pub diseased: usize,
    /// Diseased counts per tag, first-seen order.
    pub by_disease: DiseaseBreakdown,
}

pub fn summarize(observations: &[Observation]) -> DiseaseSummary {
    let mut summary = DiseaseSummary { total: observations.len(), ..Default::default() };
    for obs in observations {
        match obs.disease {
            None => summary.unclassified += 1,
            Some(Disease::Healthy) => summary.healthy += 1,
            Some(d) => {
                summary.diseased += 1;
                summary.by_disease.add(d);
            }
        }
    }
    summary.classified = summary.healthy + summary.diseased;
    summary
}
