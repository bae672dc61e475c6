//! Disease class list
//!
//! The disease model's output vector is only meaningful together with the
//! ordered class list it was trained on. The list is read from
//! `class_names.json`; without it we fall back to the legacy 11-class order,
//! which silently mislabels predictions if the model was retrained with a
//! different order.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Legacy class order used when no artifact is available
pub const FALLBACK_CLASS_NAMES: [&str; 11] = [
    "Bacterial_spot",
    "Early_blight",
    "Late_blight",
    "Leaf_Mold",
    "Septoria_leaf_spot",
    "Spider_mites Two-spotted_spider_mite",
    "Target_Spot",
    "Tomato_Yellow_Leaf_Curl_Virus",
    "Tomato_mosaic_virus",
    "healthy",
    "powdery_mildew",
];

/// Where the class list came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum ClassNameSource {
    Artifact(PathBuf),
    Fallback,
    Inline,
}

#[derive(Debug, Clone)]
pub struct ClassNames {
    names: Vec<String>,
    source: ClassNameSource,
}

impl ClassNames {
    /// Read a JSON array of class names
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read class list: {:?}", path))?;

        let names: Vec<String> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse class list JSON: {:?}", path))?;

        if names.is_empty() {
            anyhow::bail!("Class list {:?} is empty", path);
        }

        Ok(Self {
            names,
            source: ClassNameSource::Artifact(path.to_path_buf()),
        })
    }

    /// Load from `path`, or use the legacy list if that fails
    pub fn load_or_fallback(path: &Path) -> Self {
        match Self::load(path) {
            Ok(names) => {
                tracing::info!("Loaded {} class names from {:?}", names.len(), path);
                names
            }
            Err(e) => {
                tracing::warn!(
                    "Using fallback class names ({} classes), predictions may be mislabelled: {:#}",
                    FALLBACK_CLASS_NAMES.len(),
                    e
                );
                Self::fallback()
            }
        }
    }

    pub fn fallback() -> Self {
        Self {
            names: FALLBACK_CLASS_NAMES.iter().map(|s| s.to_string()).collect(),
            source: ClassNameSource::Fallback,
        }
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            source: ClassNameSource::Inline,
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn source(&self) -> &ClassNameSource {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("class_names.json");
        fs::write(&path, r#"["healthy", "Late_blight"]"#).unwrap();

        let names = ClassNames::load(&path).unwrap();
        assert_eq!(names.names(), &["healthy".to_string(), "Late_blight".to_string()]);
        assert_eq!(names.source(), &ClassNameSource::Artifact(path));
    }

    #[test]
    fn test_missing_artifact_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let names = ClassNames::load_or_fallback(&dir.path().join("nope.json"));

        assert_eq!(names.len(), 11);
        assert_eq!(names.get(0), Some("Bacterial_spot"));
        assert_eq!(names.get(9), Some("healthy"));
        assert_eq!(names.source(), &ClassNameSource::Fallback);
    }

    #[test]
    fn test_empty_artifact_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("class_names.json");
        fs::write(&path, "[]").unwrap();

        assert!(ClassNames::load(&path).is_err());
        assert_eq!(ClassNames::load_or_fallback(&path).source(), &ClassNameSource::Fallback);
    }
}
