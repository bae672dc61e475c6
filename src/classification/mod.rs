//! Two-Stage Classification Gate
//!
//! Stage 1 asks the leaf detector whether the photo shows a crop leaf at all.
//! Only accepted images reach stage 2, where the disease detector ranks every
//! known class.
//!
//! ## Decision rules
//! - Leaf gate: accepted iff P(non-leaf) < 0.5. This split is fixed; the
//!   configurable leaf threshold is reported, never applied.
//! - Disease: first arg-max wins. `is_confident` compares against the
//!   configurable threshold (default 0.6) and is advisory only.

pub mod classifier;
pub mod class_names;
pub mod disease_info;
#[cfg(feature = "onnx")]
pub mod onnx;

use serde::Serialize;
use std::cmp::Ordering;
use std::sync::Arc;

use crate::config::{DEFAULT_DISEASE_CONFIDENCE_THRESHOLD, DEFAULT_IMAGE_SIZE, DEFAULT_MAX_UPLOAD_BYTES};
use crate::error::{AdvisorError, AdvisorResult};
use crate::utils::{image_prep, ImageTensor};

pub use classifier::{DiseaseClassifier, LeafClassifier};
pub use class_names::{ClassNameSource, ClassNames, FALLBACK_CLASS_NAMES};
pub use disease_info::describe_disease;

/// Fixed stage-1 decision boundary
pub const LEAF_DECISION_BOUNDARY: f32 = 0.5;

/// Stage-1 result
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LeafVerdict {
    pub is_leaf: bool,
    pub confidence: f32,
    pub raw_probability: f32,
}

impl LeafVerdict {
    pub fn from_probability(non_leaf_probability: f32) -> Self {
        let is_leaf = non_leaf_probability < LEAF_DECISION_BOUNDARY;
        let confidence = if is_leaf {
            1.0 - non_leaf_probability
        } else {
            non_leaf_probability
        };
        Self {
            is_leaf,
            confidence,
            raw_probability: non_leaf_probability,
        }
    }

    pub fn label(&self) -> &'static str {
        if self.is_leaf {
            "Tomato Leaf"
        } else {
            "Not a Tomato Leaf"
        }
    }
}

/// One entry of the ranked class list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedPrediction {
    pub disease: String,
    /// Percent, rounded to two decimals
    pub confidence: f64,
}

/// Stage-2 result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiseasePrediction {
    pub disease_id: String,
    pub confidence: f32,
    pub is_confident: bool,
    /// Every class exactly once, highest confidence first
    pub ranked_predictions: Vec<RankedPrediction>,
    /// Present when the leaf gate ran before this prediction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leaf: Option<LeafVerdict>,
}

impl DiseasePrediction {
    pub fn confidence_percent(&self) -> f64 {
        round_to(self.confidence as f64 * 100.0, 2)
    }

    pub fn top(&self, n: usize) -> &[RankedPrediction] {
        &self.ranked_predictions[..n.min(self.ranked_predictions.len())]
    }
}

/// Terminal outcome of the gate
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ClassificationOutcome {
    /// Not recognized as the target leaf type
    Rejected { leaf: LeafVerdict },
    Classified(DiseasePrediction),
}

/// Immutable classification context, built once at startup
pub struct ClassificationGate {
    leaf: Option<Arc<dyn LeafClassifier>>,
    disease: Option<Arc<dyn DiseaseClassifier>>,
    class_names: ClassNames,
    disease_confidence_threshold: f32,
    image_size: u32,
    max_upload_bytes: usize,
}

impl ClassificationGate {
    /// Gate with no classifiers loaded yet
    pub fn new(class_names: ClassNames) -> Self {
        Self {
            leaf: None,
            disease: None,
            class_names,
            disease_confidence_threshold: DEFAULT_DISEASE_CONFIDENCE_THRESHOLD,
            image_size: DEFAULT_IMAGE_SIZE,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_leaf_classifier(mut self, leaf: Arc<dyn LeafClassifier>) -> Self {
        self.leaf = Some(leaf);
        self
    }

    pub fn with_disease_classifier(mut self, disease: Arc<dyn DiseaseClassifier>) -> Self {
        self.disease = Some(disease);
        self
    }

    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.disease_confidence_threshold = threshold;
        self
    }

    pub fn with_image_limits(mut self, image_size: u32, max_upload_bytes: usize) -> Self {
        self.image_size = image_size;
        self.max_upload_bytes = max_upload_bytes;
        self
    }

    pub fn leaf_loaded(&self) -> bool {
        self.leaf.is_some()
    }

    pub fn disease_loaded(&self) -> bool {
        self.disease.is_some()
    }

    pub fn class_names(&self) -> &ClassNames {
        &self.class_names
    }

    pub fn disease_confidence_threshold(&self) -> f32 {
        self.disease_confidence_threshold
    }

    pub fn image_size(&self) -> u32 {
        self.image_size
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// Fails with `ClassifierUnavailable` unless both stages can run
    pub fn ensure_ready(&self) -> AdvisorResult<()> {
        self.require_leaf()?;
        self.require_disease()?;
        Ok(())
    }

    pub fn ensure_disease_ready(&self) -> AdvisorResult<()> {
        self.require_disease().map(|_| ())
    }

    /// Full two-stage pipeline on raw upload bytes
    pub fn classify_image(&self, bytes: &[u8]) -> AdvisorResult<ClassificationOutcome> {
        // Fail before decoding anything
        self.ensure_ready()?;
        let input = image_prep::prepare(bytes, self.image_size, self.max_upload_bytes)?;
        self.classify(&input)
    }

    /// Full two-stage pipeline on a prepared tensor
    pub fn classify(&self, input: &ImageTensor) -> AdvisorResult<ClassificationOutcome> {
        let leaf = self.require_leaf()?;
        let disease = self.require_disease()?;

        let verdict = check_leaf(leaf.as_ref(), input)?;
        tracing::info!(
            "[STAGE 1] {} (confidence {:.2}%)",
            verdict.label(),
            verdict.confidence * 100.0
        );

        if !verdict.is_leaf {
            return Ok(ClassificationOutcome::Rejected { leaf: verdict });
        }

        let mut prediction = self.detect_disease(disease.as_ref(), input)?;
        prediction.leaf = Some(verdict);
        Ok(ClassificationOutcome::Classified(prediction))
    }

    /// Stage 2 only, for callers that already know the photo is a leaf
    pub fn classify_disease_only_image(&self, bytes: &[u8]) -> AdvisorResult<DiseasePrediction> {
        self.ensure_disease_ready()?;
        let input = image_prep::prepare(bytes, self.image_size, self.max_upload_bytes)?;
        self.classify_disease_only(&input)
    }

    pub fn classify_disease_only(&self, input: &ImageTensor) -> AdvisorResult<DiseasePrediction> {
        let disease = self.require_disease()?;
        self.detect_disease(disease.as_ref(), input)
    }

    fn require_leaf(&self) -> AdvisorResult<&Arc<dyn LeafClassifier>> {
        self.leaf
            .as_ref()
            .ok_or(AdvisorError::ClassifierUnavailable("Leaf detection"))
    }

    fn require_disease(&self) -> AdvisorResult<&Arc<dyn DiseaseClassifier>> {
        self.disease
            .as_ref()
            .ok_or(AdvisorError::ClassifierUnavailable("Disease detection"))
    }

    fn detect_disease(
        &self,
        model: &dyn DiseaseClassifier,
        input: &ImageTensor,
    ) -> AdvisorResult<DiseasePrediction> {
        let probabilities = model.class_probabilities(input)?;
        let prediction = rank_predictions(
            &probabilities,
            &self.class_names,
            self.disease_confidence_threshold,
        )?;

        tracing::info!(
            "[STAGE 2] {} ({:.2}%{})",
            prediction.disease_id,
            prediction.confidence_percent(),
            if prediction.is_confident { "" } else { ", low confidence" }
        );

        Ok(prediction)
    }
}

fn check_leaf(model: &dyn LeafClassifier, input: &ImageTensor) -> AdvisorResult<LeafVerdict> {
    let p = model.non_leaf_probability(input)?;
    if !(0.0..=1.0).contains(&p) {
        return Err(AdvisorError::Inference(format!(
            "{} returned probability {} outside [0, 1]",
            model.name(),
            p
        )));
    }
    Ok(LeafVerdict::from_probability(p))
}

/// Turn a probability vector into a ranked prediction
///
/// The vector must line up with `class_names`. Ties keep class-list order.
pub fn rank_predictions(
    probabilities: &[f32],
    class_names: &ClassNames,
    confidence_threshold: f32,
) -> AdvisorResult<DiseasePrediction> {
    if probabilities.len() != class_names.len() {
        return Err(AdvisorError::Inference(format!(
            "disease model returned {} probabilities for {} classes",
            probabilities.len(),
            class_names.len()
        )));
    }
    if let Some(bad) = probabilities.iter().find(|p| !(0.0..=1.0).contains(*p)) {
        return Err(AdvisorError::Inference(format!(
            "disease model returned probability {} outside [0, 1]",
            bad
        )));
    }

    // First maximum wins
    let (best_idx, best_prob) = probabilities
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best: Option<(usize, f32)>, (i, p)| match best {
            Some((_, bp)) if bp >= p => best,
            _ => Some((i, p)),
        })
        .ok_or_else(|| AdvisorError::Inference("disease model returned no values".to_string()))?;

    // Sorted on the displayed percent, so equal-looking entries keep class order
    let mut ranked_predictions: Vec<RankedPrediction> = class_names
        .names()
        .iter()
        .zip(probabilities)
        .map(|(disease, &p)| RankedPrediction {
            disease: disease.clone(),
            confidence: round_to(p as f64 * 100.0, 2),
        })
        .collect();
    ranked_predictions.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });

    Ok(DiseasePrediction {
        disease_id: class_names.names()[best_idx].clone(),
        confidence: best_prob,
        is_confident: best_prob >= confidence_threshold,
        ranked_predictions,
        leaf: None,
    })
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
