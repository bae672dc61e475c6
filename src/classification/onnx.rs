//! ONNX Runtime classifier backend
//!
//! Both models are exported to ONNX and run through `ort`. A `Session` needs
//! `&mut self` to run, so each model sits behind a `Mutex`; concurrent requests
//! are serialized per model.

use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use ort::value::Tensor;

use super::classifier::{DiseaseClassifier, LeafClassifier};
use crate::error::{AdvisorError, AdvisorResult};
use crate::utils::ImageTensor;

/// A loaded ONNX model taking one NHWC image tensor
pub struct OnnxModel {
    session: Mutex<Session>,
    name: String,
}

impl OnnxModel {
    /// Load a model from disk
    pub fn load(model_path: &Path) -> anyhow::Result<Self> {
        if !model_path.exists() {
            anyhow::bail!("model file not found: {:?}", model_path);
        }

        let session = Session::builder()
            .map_err(|e| anyhow::anyhow!("session builder: {}", e))?
            .with_intra_threads(2)
            .map_err(|e| anyhow::anyhow!("session threads: {}", e))?
            .commit_from_file(model_path)
            .map_err(|e| anyhow::anyhow!("loading {:?}: {}", model_path, e))?;

        let name = model_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("onnx-model")
            .to_string();

        tracing::debug!(model = %name, "ONNX model loaded");

        Ok(Self {
            session: Mutex::new(session),
            name,
        })
    }

    /// Run the model and return its first output, flattened
    fn run(&self, input: &ImageTensor) -> AdvisorResult<Vec<f32>> {
        let tensor = Tensor::from_array((input.shape().to_vec(), input.data.clone()))
            .map_err(|e| AdvisorError::Inference(format!("tensor creation error: {}", e)))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| AdvisorError::Inference(format!("session lock poisoned: {}", e)))?;

        let outputs = session
            .run(ort::inputs![tensor])
            .map_err(|e| AdvisorError::Inference(e.to_string()))?;

        let (_name, output) = outputs
            .iter()
            .next()
            .ok_or_else(|| AdvisorError::Inference("no output tensor".to_string()))?;

        let (_shape, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| AdvisorError::Inference(format!("tensor extraction failed: {}", e)))?;

        Ok(data.to_vec())
    }
}

/// Binary leaf detector (sigmoid output, 1 = not a leaf)
pub struct OnnxLeafClassifier {
    model: OnnxModel,
}

impl OnnxLeafClassifier {
    pub fn load(model_path: &Path) -> anyhow::Result<Self> {
        Ok(Self {
            model: OnnxModel::load(model_path)?,
        })
    }
}

impl LeafClassifier for OnnxLeafClassifier {
    fn non_leaf_probability(&self, input: &ImageTensor) -> AdvisorResult<f32> {
        let output = self.model.run(input)?;
        output
            .first()
            .copied()
            .ok_or_else(|| AdvisorError::Inference("leaf model returned no values".to_string()))
    }

    fn name(&self) -> &str {
        &self.model.name
    }
}

/// Multi-class disease detector (softmax output)
pub struct OnnxDiseaseClassifier {
    model: OnnxModel,
}

impl OnnxDiseaseClassifier {
    pub fn load(model_path: &Path) -> anyhow::Result<Self> {
        Ok(Self {
            model: OnnxModel::load(model_path)?,
        })
    }
}

impl DiseaseClassifier for OnnxDiseaseClassifier {
    fn class_probabilities(&self, input: &ImageTensor) -> AdvisorResult<Vec<f32>> {
        self.model.run(input)
    }

    fn name(&self) -> &str {
        &self.model.name
    }
}
