//! Treatment Recommendation
//!
//! Severity tiers, preference-aware treatment scoring, and the assembler that
//! combines them with catalog data.

pub mod assembler;
pub mod preferences;
pub mod scorer;
pub mod severity;
pub mod types;

pub use assembler::{rank_treatments, RecommendationAssembler, RecommendationRequest, TOP_TREATMENTS};
pub use preferences::{Budget, FarmingType, Preferences};
pub use scorer::score_treatment;
pub use severity::SeverityTier;
pub use types::{
    DiseaseSummary, MonitoringPlan, PracticeView, Recommendation, SafetyInfo, ScoredTreatment,
    TreatmentDetails, TreatmentView,
};
