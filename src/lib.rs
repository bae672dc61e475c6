//! Crop Disease Advisor
//!
//! Decision pipeline behind the tomato leaf diagnosis service.
//!
//! - `classification/`: two-stage gate (leaf detector, then disease detector)
//! - `recommendation/`: severity tiers, treatment scoring, recommendation assembly
//! - `store/`: typed access to the SQLite treatment catalog
//! - `utils/`: disease name normalization and image preparation
//! - `api_server` (feature `api`): axum HTTP surface

pub mod classification;
pub mod config;
pub mod error;
pub mod recommendation;
pub mod store;
pub mod utils;

#[cfg(feature = "api")]
pub mod api_server;

// Re-export commonly used types
pub use classification::{
    ClassNames, ClassificationGate, ClassificationOutcome, DiseaseClassifier, DiseasePrediction,
    LeafClassifier, LeafVerdict,
};
pub use config::AdvisorConfig;
pub use error::{AdvisorError, AdvisorResult, StoreError};
pub use recommendation::{
    Budget, FarmingType, Preferences, Recommendation, RecommendationAssembler, RecommendationRequest,
    SeverityTier,
};
pub use store::{SqliteStore, TreatmentRecord, TreatmentStore};
pub use utils::NameNormalizer;

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};
