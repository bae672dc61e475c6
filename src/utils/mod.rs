//! Utility modules shared by the classification and recommendation halves
//!
//! - Normalization: disease label aliases and catalog lookup forms
//! - Image preparation: decode/resize/scale uploads into model tensors

pub mod normalization;
pub mod image_prep;

// Re-export commonly used types
pub use normalization::{NameNormalizer, lookup_form};
pub use image_prep::{ImageTensor, prepare};
