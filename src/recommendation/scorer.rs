//! Treatment Suitability Scoring
//!
//! Additive heuristic over a catalog treatment and the grower's preferences:
//!
//! 1. Base: effectiveness percentage
//! 2. Farming type: organic +25 for organic treatments, -20 otherwise;
//!    chemical +15 for non-organic; mixed unchanged
//! 3. Budget (cost per acre, default 1000): low +15 below 1000, -15 above 2000;
//!    high +5 above 2000; medium unchanged
//! 4. Priority bonus: (5 - priority) × 2, priority default 3
//! 5. Clamp to [0, 100]

use super::preferences::{Budget, FarmingType};
use crate::store::TreatmentRecord;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

const ORGANIC_MATCH_BONUS: f64 = 25.0;
const ORGANIC_MISMATCH_PENALTY: f64 = 20.0;
const CHEMICAL_MATCH_BONUS: f64 = 15.0;

const LOW_COST_LIMIT: f64 = 1000.0;
const HIGH_COST_LIMIT: f64 = 2000.0;
const LOW_BUDGET_ADJUSTMENT: f64 = 15.0;
const HIGH_BUDGET_BONUS: f64 = 5.0;

const PRIORITY_CEILING: f64 = 5.0;
const PRIORITY_WEIGHT: f64 = 2.0;

/// Score a treatment for a preference profile
///
/// # Returns
/// Suitability in [0, 100]. Pure and deterministic.
pub fn score_treatment(treatment: &TreatmentRecord, farming_type: FarmingType, budget: Budget) -> f64 {
    let mut score = treatment.effectiveness_percentage;

    score += match farming_type {
        FarmingType::Organic if treatment.is_organic => ORGANIC_MATCH_BONUS,
        FarmingType::Organic => -ORGANIC_MISMATCH_PENALTY,
        FarmingType::Chemical if !treatment.is_organic => CHEMICAL_MATCH_BONUS,
        FarmingType::Chemical | FarmingType::Mixed => 0.0,
    };

    let cost = treatment.cost_or_default();
    score += match budget {
        Budget::Low if cost < LOW_COST_LIMIT => LOW_BUDGET_ADJUSTMENT,
        Budget::Low if cost > HIGH_COST_LIMIT => -LOW_BUDGET_ADJUSTMENT,
        Budget::High if cost > HIGH_COST_LIMIT => HIGH_BUDGET_BONUS,
        _ => 0.0,
    };

    score += (PRIORITY_CEILING - treatment.priority_or_default() as f64) * PRIORITY_WEIGHT;

    // NaN effectiveness would survive clamp; treat it as the floor
    if score.is_nan() {
        return MIN_SCORE;
    }
    score.clamp(MIN_SCORE, MAX_SCORE)
}
