//! Relative benefit tiers.
//!
//! Scores are bucketed into tertiles by rank over the positive scores of
//! the current candidate set. Tiers are relative: they must be recomputed
//! whenever the set changes.

use std::cmp::Ordering;

use crate::domain::{BenefitTier, MerchantCandidate, TieredMerchant};

/// Tertile boundaries computed from one peer set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TierThresholds {
    /// No positive scores: everything is medium.
    Empty,
    /// A single positive score: any positive score is high.
    Single,
    /// Strictly above `top` is high, strictly below `bottom` is low.
    Tertiles { top: f64, bottom: f64 },
}

impl TierThresholds {
    /// Compute thresholds from a peer set. Non-positive and non-finite
    /// scores are ignored.
    pub fn from_scores(scores: &[f64]) -> Self {
        let mut positive: Vec<f64> = scores
            .iter()
            .copied()
            .filter(|s| s.is_finite() && *s > 0.0)
            .collect();

        match positive.len() {
            0 => TierThresholds::Empty,
            1 => TierThresholds::Single,
            n => {
                positive.sort_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));
                let k = n / 3;
                TierThresholds::Tertiles {
                    top: positive[k],
                    bottom: positive[n - 1 - k],
                }
            }
        }
    }

    /// Tier of `score` relative to these thresholds.
    pub fn classify(&self, score: f64) -> BenefitTier {
        match *self {
            TierThresholds::Empty => BenefitTier::Medium,
            TierThresholds::Single => {
                if score > 0.0 {
                    BenefitTier::High
                } else {
                    BenefitTier::Low
                }
            }
            TierThresholds::Tertiles { top, bottom } => {
                if score > top {
                    BenefitTier::High
                } else if score < bottom {
                    BenefitTier::Low
                } else {
                    BenefitTier::Medium
                }
            }
        }
    }
}

/// Tier of `score` within `scores`.
///
/// ```
/// use discovery_server::discovery::classify_tier;
/// use discovery_server::domain::BenefitTier;
///
/// let scores = [30.0, 20.0, 10.0];
/// assert_eq!(classify_tier(&scores, 30.0), BenefitTier::High);
/// assert_eq!(classify_tier(&scores, 20.0), BenefitTier::Medium);
/// assert_eq!(classify_tier(&scores, 10.0), BenefitTier::Low);
/// ```
pub fn classify_tier(scores: &[f64], score: f64) -> BenefitTier {
    TierThresholds::from_scores(scores).classify(score)
}

/// Annotate each candidate with its tier relative to the whole set.
///
/// Candidates without a benefit are classified with a score of 0.
pub fn assign_tiers(candidates: Vec<MerchantCandidate>) -> Vec<TieredMerchant> {
    let scores: Vec<f64> = candidates.iter().map(|c| c.benefit_score()).collect();
    let thresholds = TierThresholds::from_scores(&scores);

    candidates
        .into_iter()
        .zip(scores)
        .map(|(candidate, score)| TieredMerchant {
            tier: thresholds.classify(score),
            candidate,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BenefitSummary, Coordinate};

    fn candidate(name: &str, score: Option<f64>) -> MerchantCandidate {
        MerchantCandidate {
            place_id: None,
            name: name.to_string(),
            category: "cafe".to_string(),
            address: String::new(),
            location: Coordinate::new(37.5, 127.0).unwrap(),
            distance_meters: 0.0,
            top_benefit: score.map(|s| BenefitSummary {
                card_name: "Card".to_string(),
                score: s,
                benefit_text: String::new(),
            }),
        }
    }

    #[test]
    fn empty_set_is_medium() {
        assert_eq!(classify_tier(&[], 5.0), BenefitTier::Medium);
        assert_eq!(classify_tier(&[0.0, -1.0], 5.0), BenefitTier::Medium);
    }

    #[test]
    fn single_score() {
        assert_eq!(classify_tier(&[8.0], 8.0), BenefitTier::High);
        assert_eq!(classify_tier(&[8.0, 0.0], 0.0), BenefitTier::Low);
    }

    #[test]
    fn equal_scores_are_all_medium() {
        let scores = [10.0, 10.0, 10.0];
        for s in scores {
            assert_eq!(classify_tier(&scores, s), BenefitTier::Medium);
        }
    }

    #[test]
    fn three_distinct_scores() {
        let scores = [30.0, 20.0, 10.0];
        assert_eq!(classify_tier(&scores, 30.0), BenefitTier::High);
        assert_eq!(classify_tier(&scores, 20.0), BenefitTier::Medium);
        assert_eq!(classify_tier(&scores, 10.0), BenefitTier::Low);
    }

    #[test]
    fn input_order_does_not_matter() {
        let scores = [10.0, 30.0, 20.0];
        assert_eq!(classify_tier(&scores, 30.0), BenefitTier::High);
        assert_eq!(classify_tier(&scores, 10.0), BenefitTier::Low);
    }

    #[test]
    fn six_scores_split_into_pairs() {
        let scores = [60.0, 50.0, 40.0, 30.0, 20.0, 10.0];
        let tiers: Vec<_> = scores.iter().map(|s| classify_tier(&scores, *s)).collect();
        assert_eq!(
            tiers,
            vec![
                BenefitTier::High,
                BenefitTier::High,
                BenefitTier::Medium,
                BenefitTier::Medium,
                BenefitTier::Low,
                BenefitTier::Low,
            ]
        );
    }

    #[test]
    fn ties_at_boundary_fall_to_medium() {
        // Top threshold is 20; the second 20 is not strictly above it.
        let scores = [30.0, 20.0, 20.0, 10.0];
        assert_eq!(classify_tier(&scores, 20.0), BenefitTier::Medium);
        assert_eq!(classify_tier(&scores, 30.0), BenefitTier::High);
        assert_eq!(classify_tier(&scores, 10.0), BenefitTier::Low);
    }

    #[test]
    fn unscored_candidates_are_low_among_scored_peers() {
        let tiered = assign_tiers(vec![
            candidate("a", Some(30.0)),
            candidate("b", None),
            candidate("c", Some(20.0)),
            candidate("d", Some(10.0)),
        ]);

        assert_eq!(tiered[0].tier, BenefitTier::High);
        assert_eq!(tiered[1].tier, BenefitTier::Low);
        assert_eq!(tiered[2].tier, BenefitTier::Medium);
        assert_eq!(tiered[3].tier, BenefitTier::Low);
    }

    #[test]
    fn assign_preserves_order() {
        let tiered = assign_tiers(vec![candidate("x", None), candidate("y", None)]);
        let names: Vec<_> = tiered.iter().map(|t| t.candidate.name.as_str()).collect();
        assert_eq!(names, vec!["x", "y"]);
        assert!(tiered.iter().all(|t| t.tier == BenefitTier::Medium));
    }
}
