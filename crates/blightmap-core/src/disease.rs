//! Disease tags and the severity order used to break dominance ties.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Classifier output for a single observation.
///
/// Labels the classifier may emit in future parse as `Unknown`, which still
/// counts as diseased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Disease {
    BacterialLeafBlight,
    Blast,
    BrownSpot,
    Healthy,
    Unknown,
}

impl Disease {
    /// Every variant that counts as diseased, most severe first in the default order.
    pub const DISEASED: [Disease; 4] =
        [Disease::BacterialLeafBlight, Disease::Blast, Disease::BrownSpot, Disease::Unknown];

    /// Wire tag, identical to the serde representation.
    pub fn tag(self) -> &'static str {
        match self {
            Disease::BacterialLeafBlight => "bacterial_leaf_blight",
            Disease::Blast => "blast",
            Disease::BrownSpot => "brown_spot",
            Disease::Healthy => "healthy",
            Disease::Unknown => "unknown",
        }
    }

    /// Parse a classifier label. Never fails: unrecognised labels map to `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "bacterial_leaf_blight" => Disease::BacterialLeafBlight,
            "blast" => Disease::Blast,
            "brown_spot" => Disease::BrownSpot,
            "healthy" => Disease::Healthy,
            _ => Disease::Unknown,
        }
    }

    pub fn is_diseased(self) -> bool {
        self != Disease::Healthy
    }
}

impl From<String> for Disease {
    fn from(label: String) -> Self {
        Disease::from_label(&label)
    }
}

impl fmt::Display for Disease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// ── Severity ──────────────────────────────────────────────────────────────────

/// Total order over the diseased variants, most severe first.
///
/// Construction guarantees every diseased variant appears exactly once and
/// `Healthy` does not appear, so two distinct diseases never share a rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Disease>", into = "Vec<Disease>")]
pub struct SeverityRanking {
    order: Vec<Disease>,
}

impl SeverityRanking {
    pub fn new(order: Vec<Disease>) -> Result<Self, EngineError> {
        let mut seen = Vec::with_capacity(order.len());
        for &d in &order {
            if !d.is_diseased() {
                return Err(EngineError::HealthyRanked);
            }
            if seen.contains(&d) {
                return Err(EngineError::DuplicateRank(d));
            }
            seen.push(d);
        }
        if let Some(&missing) = Disease::DISEASED.iter().find(|d| !seen.contains(*d)) {
            return Err(EngineError::UnrankedDisease(missing));
        }
        Ok(Self { order })
    }

    /// Rank of `disease`: higher is more severe. The most severe of the four
    /// diseased variants ranks 4 and the least severe ranks 1. `Healthy`
    /// ranks 0.
    pub fn rank(&self, disease: Disease) -> u8 {
        self.order
            .iter()
            .position(|&d| d == disease)
            .map_or(0, |pos| (self.order.len() - pos) as u8)
    }

    /// Diseases from most to least severe.
    pub fn order(&self) -> &[Disease] {
        &self.order
    }
}

impl Default for SeverityRanking {
    /// bacterial_leaf_blight (4) > blast (3) > brown_spot (2) > unknown (1).
    fn default() -> Self {
        Self { order: Disease::DISEASED.to_vec() }
    }
}

impl TryFrom<Vec<Disease>> for SeverityRanking {
    type Error = EngineError;

    fn try_from(order: Vec<Disease>) -> Result<Self, Self::Error> {
        Self::new(order)
    }
}

impl From<SeverityRanking> for Vec<Disease> {
    fn from(ranking: SeverityRanking) -> Self {
        ranking.order
    }
}
