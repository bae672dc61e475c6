//! Runtime configuration
//!
//! Defaults match the deployed service layout (`models/` next to the catalog
//! file). Every field can be overridden from the environment, or the whole
//! struct can be read from a JSON file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_IMAGE_SIZE: u32 = 224;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const DEFAULT_LEAF_THRESHOLD: f32 = 0.5;
pub const DEFAULT_DISEASE_CONFIDENCE_THRESHOLD: f32 = 0.6;
pub const DEFAULT_PORT: u16 = 7860;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdvisorConfig {
    pub base_dir: PathBuf,
    pub leaf_model_path: PathBuf,
    pub disease_model_path: PathBuf,
    pub class_names_path: PathBuf,
    pub catalog_path: PathBuf,
    pub image_size: u32,
    pub max_upload_bytes: usize,
    /// Reported by model-info; the leaf gate itself always splits at 0.5
    pub leaf_threshold: f32,
    pub disease_confidence_threshold: f32,
    pub port: u16,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self::with_base_dir(PathBuf::from("."))
    }
}

impl AdvisorConfig {
    /// Default layout rooted at `base_dir`
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        let models = base_dir.join("models");
        Self {
            leaf_model_path: models.join("final_leaf_model.onnx"),
            disease_model_path: models.join("disease_model.onnx"),
            class_names_path: models.join("class_names.json"),
            catalog_path: base_dir.join("tomato_treatments.db"),
            base_dir,
            image_size: DEFAULT_IMAGE_SIZE,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            leaf_threshold: DEFAULT_LEAF_THRESHOLD,
            disease_confidence_threshold: DEFAULT_DISEASE_CONFIDENCE_THRESHOLD,
            port: DEFAULT_PORT,
        }
    }

    /// Read configuration from a JSON file (missing fields take defaults)
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config JSON: {:?}", path))
    }

    /// Defaults overridden by environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` but with an injectable variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_dir = lookup("ADVISOR_BASE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let mut config = Self::with_base_dir(base_dir);

        if let Some(path) = lookup("LEAF_MODEL_PATH") {
            config.leaf_model_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("DISEASE_MODEL_PATH") {
            config.disease_model_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("CLASS_NAMES_PATH") {
            config.class_names_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("TREATMENT_DB_PATH") {
            config.catalog_path = PathBuf::from(path);
        }

        config.image_size = parse_or(&lookup, "IMAGE_SIZE", config.image_size);
        config.max_upload_bytes = parse_or(&lookup, "MAX_UPLOAD_BYTES", config.max_upload_bytes);
        config.leaf_threshold = parse_or(&lookup, "LEAF_CONFIDENCE_THRESHOLD", config.leaf_threshold);
        config.disease_confidence_threshold = parse_or(
            &lookup,
            "DISEASE_CONFIDENCE_THRESHOLD",
            config.disease_confidence_threshold,
        );
        config.port = parse_or(&lookup, "PORT", config.port);

        config
    }

    pub fn max_upload_mb(&self) -> f64 {
        self.max_upload_bytes as f64 / (1024.0 * 1024.0)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy + std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring {}={:?}: not a valid value, using {}", key, raw, default);
            default
        }),
        None => default,
    }
}
