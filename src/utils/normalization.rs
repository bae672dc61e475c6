//! Disease Name Normalization
//!
//! Maps the many spellings a disease label arrives in (dataset folder names,
//! lowercase variants, `Tomato_`-prefixed forms) onto the single canonical
//! identifier used for catalog lookups.
//!
//! Unknown names are passed through untouched so the catalog lookup can
//! reject them with a proper not-found error.

use rustc_hash::FxHashMap;

/// Raw label → canonical identifier
static DISEASE_ALIASES: &[(&str, &str)] = &[
    ("Bacterial_spot", "Bacterial_spot"),
    ("bacterial_spot", "Bacterial_spot"),
    ("Tomato_Bacterial_spot", "Bacterial_spot"),
    ("Early_blight", "Early_blight"),
    ("early_blight", "Early_blight"),
    ("Tomato_Early_blight", "Early_blight"),
    ("Late_blight", "Late_blight"),
    ("late_blight", "Late_blight"),
    ("Tomato_Late_blight", "Late_blight"),
    ("Leaf_Mold", "Leaf_Mold"),
    ("leaf_mold", "Leaf_Mold"),
    ("Tomato_Leaf_Mold", "Leaf_Mold"),
    ("Septoria_leaf_spot", "Septoria_leaf_spot"),
    ("septoria_leaf_spot", "Septoria_leaf_spot"),
    ("Tomato_Septoria_leaf_spot", "Septoria_leaf_spot"),
    ("Spider_mites Two-spotted_spider_mite", "Spider_mites Two-spotted_spider_mite"),
    ("Tomato_Spider_mites_Two_spotted_spider_mite", "Spider_mites Two-spotted_spider_mite"),
    ("spider_mites", "Spider_mites Two-spotted_spider_mite"),
    ("Target_Spot", "Target_Spot"),
    ("target_spot", "Target_Spot"),
    ("Tomato_Target_Spot", "Target_Spot"),
    ("Tomato_Yellow_Leaf_Curl_Virus", "Tomato_Yellow_Leaf_Curl_Virus"),
    ("yellow_leaf_curl", "Tomato_Yellow_Leaf_Curl_Virus"),
    ("Tomato_mosaic_virus", "Tomato_mosaic_virus"),
    ("mosaic_virus", "Tomato_mosaic_virus"),
    ("healthy", "healthy"),
    ("Healthy", "healthy"),
    ("Tomato_healthy", "healthy"),
    ("powdery_mildew", "powdery_mildew"),
    ("Powdery_mildew", "powdery_mildew"),
];

/// Alias table built once at startup and shared read-only
#[derive(Debug, Clone)]
pub struct NameNormalizer {
    aliases: FxHashMap<&'static str, &'static str>,
}

impl Default for NameNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl NameNormalizer {
    pub fn new() -> Self {
        let aliases = DISEASE_ALIASES.iter().copied().collect();
        Self { aliases }
    }

    /// Canonical identifier for `raw`, or `raw` itself when no alias matches
    pub fn normalize<'a>(&self, raw: &'a str) -> &'a str {
        self.aliases.get(raw).copied().unwrap_or(raw)
    }

    /// Whether `raw` is a known alias
    pub fn is_known(&self, raw: &str) -> bool {
        self.aliases.contains_key(raw)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

/// Fuzzy lookup form: underscores become spaces, outer whitespace trimmed
///
/// Matches catalog rows stored as "Early blight" against "Early_blight".
pub fn lookup_form(name: &str) -> String {
    name.replace('_', " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_prefixed_names() {
        let n = NameNormalizer::new();
        assert_eq!(n.normalize("Tomato_healthy"), "healthy");
        assert_eq!(n.normalize("Tomato_Late_blight"), "Late_blight");
        assert_eq!(
            n.normalize("Tomato_Spider_mites_Two_spotted_spider_mite"),
            "Spider_mites Two-spotted_spider_mite"
        );
    }

    #[test]
    fn test_case_variants() {
        let n = NameNormalizer::new();
        assert_eq!(n.normalize("Healthy"), "healthy");
        assert_eq!(n.normalize("leaf_mold"), "Leaf_Mold");
        assert_eq!(n.normalize("Powdery_mildew"), "powdery_mildew");
    }

    #[test]
    fn test_canonical_names_map_to_themselves() {
        let n = NameNormalizer::new();
        for (_, canonical) in DISEASE_ALIASES {
            assert_eq!(n.normalize(canonical), *canonical);
        }
    }

    #[test]
    fn test_unknown_name_passes_through() {
        let n = NameNormalizer::new();
        assert_eq!(n.normalize("Blossom_end_rot"), "Blossom_end_rot");
        assert!(!n.is_known("Blossom_end_rot"));
        assert_eq!(n.normalize(""), "");
    }

    #[test]
    fn test_lookup_form() {
        assert_eq!(lookup_form("Early_blight"), "Early blight");
        assert_eq!(lookup_form(" Leaf_Mold_ "), "Leaf Mold");
        assert_eq!(lookup_form("healthy"), "healthy");
    }
}
