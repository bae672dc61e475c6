//! Recommendation Assembler
//!
//! Turns (disease name, affected percentage, preferences) into a full
//! recommendation by querying the catalog, scoring the candidate treatments and
//! attaching the tier's fixed guidance. Either everything succeeds or the first
//! failure is returned; there is no partial result.

use rustc_hash::FxHashSet;
use std::cmp::Ordering;

use super::preferences::Preferences;
use super::scorer::score_treatment;
use super::severity::SeverityTier;
use super::types::{
    immediate_actions, DiseaseSummary, MonitoringPlan, PracticeView, Recommendation, ScoredTreatment,
    TreatmentView,
};
use crate::classification::round_to;
use crate::error::{AdvisorError, AdvisorResult};
use crate::store::{TreatmentRecord, TreatmentStore};
use crate::utils::{lookup_form, NameNormalizer};

/// Treatments returned per recommendation
pub const TOP_TREATMENTS: usize = 3;

/// One recommendation query
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationRequest {
    pub disease_name: String,
    pub affected_percentage: f64,
    pub preferences: Preferences,
}

impl RecommendationRequest {
    pub fn new(disease_name: impl Into<String>, affected_percentage: f64) -> Self {
        Self {
            disease_name: disease_name.into(),
            affected_percentage,
            preferences: Preferences::default(),
        }
    }

    pub fn with_preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = preferences;
        self
    }

    /// Strict range check for callers that want it (the HTTP layer does)
    pub fn validate(&self) -> AdvisorResult<()> {
        let pct = self.affected_percentage;
        if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
            return Err(AdvisorError::InvalidPercentage(pct));
        }
        Ok(())
    }
}

/// Builds recommendations against one catalog
pub struct RecommendationAssembler<'a, S: TreatmentStore> {
    store: &'a S,
    normalizer: &'a NameNormalizer,
}

impl<'a, S: TreatmentStore> RecommendationAssembler<'a, S> {
    pub fn new(store: &'a S, normalizer: &'a NameNormalizer) -> Self {
        Self { store, normalizer }
    }

    pub fn recommend(&self, request: &RecommendationRequest) -> AdvisorResult<Recommendation> {
        let canonical = self.normalizer.normalize(&request.disease_name);
        let fuzzy = lookup_form(canonical);
        let tier = SeverityTier::assess(request.affected_percentage);

        tracing::debug!(
            disease = canonical,
            severity = tier.display_text(),
            "assembling recommendation"
        );

        let disease = self
            .store
            .find_disease(canonical, &fuzzy)?
            .ok_or_else(|| AdvisorError::DiseaseNotFound(canonical.to_string()))?;
        let disease_id = disease.disease_id;

        let candidates = self.candidates(disease_id, tier, canonical)?;
        let ranked = rank_treatments(candidates, request.preferences);

        let practices = self.store.cultural_practices(disease_id)?;

        tracing::info!(
            disease = %disease.disease_name,
            severity = tier.display_text(),
            treatments = ranked.len().min(TOP_TREATMENTS),
            practices = practices.len(),
            "recommendation ready"
        );

        Ok(Recommendation {
            disease_info: DiseaseSummary::new(disease, request.affected_percentage, tier),
            treatments: ranked
                .into_iter()
                .take(TOP_TREATMENTS)
                .map(TreatmentView::from)
                .collect(),
            cultural_practices: practices.into_iter().map(PracticeView::from).collect(),
            immediate_actions: immediate_actions(tier),
            monitoring: MonitoringPlan::for_tier(tier),
            preferences: request.preferences,
        })
    }

    /// Treatments for the disease, narrowed to the tier's recommended set when
    /// that leaves at least one
    fn candidates(
        &self,
        disease_id: i64,
        tier: SeverityTier,
        canonical: &str,
    ) -> AdvisorResult<Vec<TreatmentRecord>> {
        let all = self.store.treatments_for_disease(disease_id)?;
        if all.is_empty() {
            return Err(AdvisorError::NoTreatmentsFound(canonical.to_string()));
        }

        let recommended: FxHashSet<i64> = self
            .store
            .recommended_treatment_ids(tier.id())?
            .into_iter()
            .collect();
        if recommended.is_empty() {
            tracing::debug!(severity = tier.id(), "no severity mapping, using all treatments");
            return Ok(all);
        }

        let filtered: Vec<TreatmentRecord> = all
            .into_iter()
            .filter(|t| recommended.contains(&t.treatment_id))
            .collect();
        if !filtered.is_empty() {
            return Ok(filtered);
        }

        tracing::debug!(
            severity = tier.id(),
            "severity mapping matched no treatments, falling back to all"
        );
        Ok(self.store.treatments_for_disease(disease_id)?)
    }
}

/// Score, round to one decimal and sort best first
///
/// Equal scores keep their incoming (priority, effectiveness) order.
pub fn rank_treatments(treatments: Vec<TreatmentRecord>, preferences: Preferences) -> Vec<ScoredTreatment> {
    let mut scored: Vec<ScoredTreatment> = treatments
        .into_iter()
        .map(|treatment| {
            let score = round_to(
                score_treatment(&treatment, preferences.farming_type, preferences.budget),
                1,
            );
            ScoredTreatment { treatment, score }
        })
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored
}
