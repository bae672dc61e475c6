//! Treatment Catalog
//!
//! Typed records for the catalog rows and the read interface the
//! recommendation engine queries. The production backend is SQLite
//! (`sqlite.rs`); tests can plug in anything implementing `TreatmentStore`.

pub mod sqlite;

use serde::Serialize;

use crate::error::StoreError;

pub use sqlite::SqliteStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Read-only queries needed to build a recommendation
pub trait TreatmentStore {
    /// Disease row whose name equals `name`, or whose underscore-free form
    /// equals `lookup_form`
    fn find_disease(&self, name: &str, lookup_form: &str) -> StoreResult<Option<DiseaseRecord>>;

    /// All treatments for a disease, ordered by priority then effectiveness (desc)
    fn treatments_for_disease(&self, disease_id: i64) -> StoreResult<Vec<TreatmentRecord>>;

    /// Treatment ids flagged as recommended for a severity level
    fn recommended_treatment_ids(&self, severity_id: u8) -> StoreResult<Vec<i64>>;

    /// Cultural practices for a disease, most effective first
    fn cultural_practices(&self, disease_id: i64) -> StoreResult<Vec<CulturalPractice>>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiseaseRecord {
    pub disease_id: i64,
    pub disease_name: String,
    pub description: Option<String>,
    pub symptoms: Option<String>,
}

/// One treatment joined with its category name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreatmentRecord {
    pub treatment_id: i64,
    pub disease_id: i64,
    pub treatment_name: String,
    pub category_name: String,
    pub effectiveness_percentage: f64,
    pub is_organic: bool,
    /// Rupees per acre
    pub cost_per_acre: Option<f64>,
    /// Lower value = higher priority
    pub priority: Option<i64>,
    pub active_ingredient: Option<String>,
    pub product_names: Option<String>,
    pub application_method: Option<String>,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub duration: Option<String>,
    pub precautions: Option<String>,
    pub waiting_days_before_harvest: Option<i64>,
}

impl TreatmentRecord {
    /// Cost assumed when the catalog has none (NULL or 0)
    pub const DEFAULT_COST_PER_ACRE: f64 = 1000.0;
    /// Priority assumed when the catalog has none (NULL or 0)
    pub const DEFAULT_PRIORITY: i64 = 3;

    /// Minimal record; everything optional left empty
    pub fn new(treatment_id: i64, treatment_name: impl Into<String>, effectiveness_percentage: f64) -> Self {
        Self {
            treatment_id,
            disease_id: 0,
            treatment_name: treatment_name.into(),
            category_name: String::new(),
            effectiveness_percentage,
            is_organic: false,
            cost_per_acre: None,
            priority: None,
            active_ingredient: None,
            product_names: None,
            application_method: None,
            dosage: None,
            frequency: None,
            duration: None,
            precautions: None,
            waiting_days_before_harvest: None,
        }
    }

    pub fn organic(mut self, is_organic: bool) -> Self {
        self.is_organic = is_organic;
        self
    }

    pub fn cost(mut self, cost_per_acre: f64) -> Self {
        self.cost_per_acre = Some(cost_per_acre);
        self
    }

    pub fn priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn category(mut self, category_name: impl Into<String>) -> Self {
        self.category_name = category_name.into();
        self
    }

    /// Stored cost, with 0 read as "not recorded"
    pub fn known_cost(&self) -> Option<f64> {
        self.cost_per_acre.filter(|&cost| cost != 0.0)
    }

    pub fn cost_or_default(&self) -> f64 {
        self.known_cost().unwrap_or(Self::DEFAULT_COST_PER_ACRE)
    }

    pub fn priority_or_default(&self) -> i64 {
        self.priority
            .filter(|&priority| priority != 0)
            .unwrap_or(Self::DEFAULT_PRIORITY)
    }
}

/// Practice effectiveness as stored: some catalogs use a percentage, some a label
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PracticeRating {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CulturalPractice {
    pub practice_name: String,
    pub description: Option<String>,
    pub timing: Option<String>,
    pub effectiveness: Option<PracticeRating>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_missing_cost_and_priority() {
        let t = TreatmentRecord::new(1, "Copper spray", 70.0);
        assert_eq!(t.cost_or_default(), 1000.0);
        assert_eq!(t.priority_or_default(), 3);

        let t = t.cost(450.0).priority(1);
        assert_eq!(t.cost_or_default(), 450.0);
        assert_eq!(t.priority_or_default(), 1);
    }

    #[test]
    fn test_zero_cost_and_priority_take_defaults() {
        let t = TreatmentRecord::new(1, "Copper spray", 70.0).cost(0.0).priority(0);
        assert_eq!(t.known_cost(), None);
        assert_eq!(t.cost_or_default(), 1000.0);
        assert_eq!(t.priority_or_default(), 3);
    }

    #[test]
    fn test_practice_rating_serializes_bare() {
        let number = serde_json::to_value(PracticeRating::Number(80.0)).unwrap();
        let text = serde_json::to_value(PracticeRating::Text("High".into())).unwrap();
        assert_eq!(number, serde_json::json!(80.0));
        assert_eq!(text, serde_json::json!("High"));
    }
}
