//! Merchant and card-benefit types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Coordinate;

/// The best benefit one of the user's cards offers at a merchant.
///
/// `score` is non-negative; higher is better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenefitSummary {
    pub card_name: String,
    pub score: f64,
    pub benefit_text: String,
}

/// A merchant returned by the merchant provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantCandidate {
    /// Provider identifier used for place-detail lookups.
    pub place_id: Option<String>,
    pub name: String,
    pub category: String,
    pub address: String,
    pub location: Coordinate,
    pub distance_meters: f64,
    pub top_benefit: Option<BenefitSummary>,
}

impl MerchantCandidate {
    /// Score of the top benefit, or 0 when no owned card applies.
    pub fn benefit_score(&self) -> f64 {
        self.top_benefit.as_ref().map_or(0.0, |b| b.score)
    }
}

/// Relative bucket of a benefit score within its peer set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BenefitTier {
    High,
    Medium,
    Low,
}

impl fmt::Display for BenefitTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BenefitTier::High => "high",
            BenefitTier::Medium => "medium",
            BenefitTier::Low => "low",
        })
    }
}

/// A candidate annotated with its tier.
#[derive(Debug, Clone, PartialEq)]
pub struct TieredMerchant {
    pub candidate: MerchantCandidate,
    pub tier: BenefitTier,
}

/// Ranked, capped output of one nearby search.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyResult {
    pub merchants: Vec<TieredMerchant>,
    /// Provider's indoor determination.
    pub is_indoor: bool,
    pub building_name: Option<String>,
    /// Search generation this result was produced for.
    pub generation: u64,
}

impl NearbyResult {
    /// Scores of every merchant in the result, in order.
    pub fn scores(&self) -> Vec<f64> {
        self.merchants
            .iter()
            .map(|m| m.candidate.benefit_score())
            .collect()
    }
}

/// Display-only details for a merchant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDetails {
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub rating: Option<f64>,
    #[serde(default)]
    pub opening_hours: Vec<String>,
    #[serde(default)]
    pub photos: Vec<String>,
}
