//! Classifier contracts
//!
//! Both models consume the same normalized NHWC tensor. Implementations must be
//! shareable across request threads; a backend that is not thread-safe has to
//! serialize access internally.

use crate::error::AdvisorResult;
use crate::utils::ImageTensor;

/// Stage 1: is this a leaf of the crop we know about?
pub trait LeafClassifier: Send + Sync {
    /// Probability of the "non-target" class (0 = leaf, 1 = something else)
    fn non_leaf_probability(&self, input: &ImageTensor) -> AdvisorResult<f32>;

    fn name(&self) -> &str;
}

/// Stage 2: which disease does the leaf show?
pub trait DiseaseClassifier: Send + Sync {
    /// One probability per class, in class-list order
    fn class_probabilities(&self, input: &ImageTensor) -> AdvisorResult<Vec<f32>>;

    fn name(&self) -> &str;
}
