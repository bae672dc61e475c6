//! Recommendation output shapes (serialized as-is by the HTTP layer)

use serde::Serialize;

use super::preferences::Preferences;
use super::severity::SeverityTier;
use crate::store::{CulturalPractice, DiseaseRecord, PracticeRating, TreatmentRecord};

pub const BASELINE_ACTIONS: [&str; 3] = [
    "Remove and destroy heavily infected leaves/plants immediately",
    "Isolate affected area to prevent spread",
    "Sanitize all tools and equipment with disinfectant",
];

pub const ESCALATED_ACTIONS: [&str; 3] = [
    "Stop overhead irrigation immediately to reduce humidity",
    "Improve field drainage and air circulation",
    "Consider consulting agricultural extension officer",
];

pub const WHAT_TO_CHECK: &str = "Disease spread, new spots, plant health, treatment effectiveness";

/// Catalog treatment with its suitability score (transient, ranking only)
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredTreatment {
    pub treatment: TreatmentRecord,
    /// Rounded to one decimal
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub disease_info: DiseaseSummary,
    pub treatments: Vec<TreatmentView>,
    pub cultural_practices: Vec<PracticeView>,
    pub immediate_actions: Vec<&'static str>,
    pub monitoring: MonitoringPlan,
    pub preferences: Preferences,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiseaseSummary {
    pub name: String,
    pub description: Option<String>,
    pub symptoms: Option<String>,
    pub affected_percentage: f64,
    pub severity: &'static str,
    pub severity_level: u8,
    pub urgency: &'static str,
}

impl DiseaseSummary {
    pub fn new(disease: DiseaseRecord, affected_percentage: f64, tier: SeverityTier) -> Self {
        Self {
            name: disease.disease_name,
            description: disease.description,
            symptoms: disease.symptoms,
            affected_percentage,
            severity: tier.display_text(),
            severity_level: tier.id(),
            urgency: tier.urgency(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreatmentView {
    pub name: String,
    #[serde(rename = "type")]
    pub category: String,
    pub recommendation_score: f64,
    pub effectiveness: f64,
    pub is_organic: bool,
    pub details: TreatmentDetails,
    pub safety: SafetyInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreatmentDetails {
    pub active_ingredient: String,
    pub products: String,
    pub how_to_apply: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
    pub cost_per_acre: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SafetyInfo {
    pub precautions: String,
    pub waiting_days_before_harvest: i64,
}

impl From<ScoredTreatment> for TreatmentView {
    fn from(scored: ScoredTreatment) -> Self {
        let t = scored.treatment;
        let cost_per_acre = match t.known_cost() {
            Some(cost) => format!("₹{:.0}", cost),
            None => "₹N/A".to_string(),
        };
        Self {
            details: TreatmentDetails {
                active_ingredient: or_default(t.active_ingredient, "N/A"),
                products: or_default(t.product_names, "N/A"),
                how_to_apply: or_default(t.application_method, "Follow product label"),
                dosage: or_default(t.dosage, "As per recommendation"),
                frequency: or_default(t.frequency, "As needed"),
                duration: or_default(t.duration, "Until recovery"),
                cost_per_acre,
            },
            safety: SafetyInfo {
                precautions: or_default(t.precautions, "Follow safety guidelines"),
                waiting_days_before_harvest: t.waiting_days_before_harvest.unwrap_or(0),
            },
            name: t.treatment_name,
            category: t.category_name,
            recommendation_score: scored.score,
            effectiveness: t.effectiveness_percentage,
            is_organic: t.is_organic,
        }
    }
}

/// Missing and blank text both fall back to the display default
fn or_default(value: Option<String>, default: &str) -> String {
    value
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PracticeView {
    pub practice_name: String,
    pub description: Option<String>,
    pub timing: Option<String>,
    pub effectiveness: Option<PracticeRating>,
}

impl From<CulturalPractice> for PracticeView {
    fn from(p: CulturalPractice) -> Self {
        Self {
            practice_name: p.practice_name,
            description: p.description,
            timing: p.timing,
            effectiveness: p.effectiveness,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitoringPlan {
    pub frequency: &'static str,
    pub duration: &'static str,
    pub what_to_check: &'static str,
}

impl MonitoringPlan {
    pub fn for_tier(tier: SeverityTier) -> Self {
        Self {
            frequency: tier.monitoring_frequency(),
            duration: tier.monitoring_duration(),
            what_to_check: WHAT_TO_CHECK,
        }
    }
}

/// Baseline actions, plus the escalated set for Severe and Critical
pub fn immediate_actions(tier: SeverityTier) -> Vec<&'static str> {
    let mut actions = BASELINE_ACTIONS.to_vec();
    if tier.is_escalated() {
        actions.extend(ESCALATED_ACTIONS);
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_fills_display_defaults() {
        let t = TreatmentRecord::new(7, "Copper hydroxide", 75.0).category("Chemical Fungicide");
        let view = TreatmentView::from(ScoredTreatment { treatment: t, score: 79.0 });

        assert_eq!(view.details.active_ingredient, "N/A");
        assert_eq!(view.details.how_to_apply, "Follow product label");
        assert_eq!(view.details.dosage, "As per recommendation");
        assert_eq!(view.details.frequency, "As needed");
        assert_eq!(view.details.duration, "Until recovery");
        assert_eq!(view.details.cost_per_acre, "₹N/A");
        assert_eq!(view.safety.precautions, "Follow safety guidelines");
        assert_eq!(view.safety.waiting_days_before_harvest, 0);
    }

    #[test]
    fn test_zero_cost_displays_as_missing() {
        let t = TreatmentRecord::new(8, "Sulfur dust", 62.0).cost(0.0);
        let view = TreatmentView::from(ScoredTreatment { treatment: t, score: 66.0 });
        assert_eq!(view.details.cost_per_acre, "₹N/A");
    }

    #[test]
    fn test_view_keeps_catalog_values() {
        let mut t = TreatmentRecord::new(7, "Mancozeb", 85.0).cost(1249.6);
        t.dosage = Some("2 g/L".to_string());
        t.precautions = Some("   ".to_string());
        t.waiting_days_before_harvest = Some(7);

        let view = TreatmentView::from(ScoredTreatment { treatment: t, score: 91.0 });

        assert_eq!(view.details.cost_per_acre, "₹1250");
        assert_eq!(view.details.dosage, "2 g/L");
        assert_eq!(view.safety.precautions, "Follow safety guidelines");
        assert_eq!(view.safety.waiting_days_before_harvest, 7);
    }

    #[test]
    fn test_view_json_uses_type_key() {
        let t = TreatmentRecord::new(1, "Neem oil", 60.0).category("Organic");
        let json = serde_json::to_value(TreatmentView::from(ScoredTreatment { treatment: t, score: 64.0 })).unwrap();
        assert_eq!(json["type"], "Organic");
        assert_eq!(json["recommendation_score"], 64.0);
    }

    #[test]
    fn test_immediate_actions_by_tier() {
        assert_eq!(immediate_actions(SeverityTier::Mild).len(), 3);
        assert_eq!(immediate_actions(SeverityTier::Moderate).len(), 3);
        let severe = immediate_actions(SeverityTier::Severe);
        assert_eq!(severe.len(), 6);
        assert_eq!(severe[..3], BASELINE_ACTIONS);
        assert_eq!(immediate_actions(SeverityTier::Critical).len(), 6);
    }
}
