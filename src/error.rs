//! Error types for the decision pipeline
//!
//! Every failure is request-scoped: callers get one of these variants back and the
//! process keeps serving.

use thiserror::Error;

/// Failures raised by the treatment catalog
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("catalog query failed: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("catalog not available at {path}")]
    Missing { path: String },
}

/// Errors surfaced by classification and recommendation
#[derive(Debug, Error)]
pub enum AdvisorError {
    /// A classifier was not loaded at startup
    #[error("{0} model not loaded")]
    ClassifierUnavailable(&'static str),

    #[error("invalid image: {0}")]
    InvalidImageInput(String),

    /// The classifier ran but failed or returned something unusable
    #[error("inference failed: {0}")]
    Inference(String),

    #[error("Disease '{0}' not found in database. Available diseases can be checked in the system.")]
    DiseaseNotFound(String),

    #[error("No treatments found for '{0}' in database.")]
    NoTreatmentsFound(String),

    #[error("Failed to get recommendations: {0}")]
    Store(#[from] StoreError),

    #[error("invalid {field} '{value}' (expected one of: {expected})")]
    InvalidPreferenceValue {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("affected percentage must be within 0-100, got {0}")]
    InvalidPercentage(f64),
}

pub type AdvisorResult<T> = Result<T, AdvisorError>;
