//! Short per-class descriptions shown next to a prediction

static DESCRIPTIONS: &[(&str, &str)] = &[
    ("Bacterial_spot", "Bacterial spot causes dark, greasy-looking spots on leaves and fruit."),
    ("Early_blight", "Early blight causes dark spots with concentric rings on older leaves."),
    ("Late_blight", "Late blight causes water-soaked spots that turn brown and can kill plants quickly."),
    ("Leaf_Mold", "Leaf mold causes pale green to yellowish spots on upper leaf surfaces."),
    ("Septoria_leaf_spot", "Septoria leaf spot causes small circular spots with dark borders on leaves."),
    ("Spider_mites Two-spotted_spider_mite", "Spider mites cause stippling, yellowing, and webbing on leaves."),
    ("Target_Spot", "Target spot causes brown spots with concentric rings on leaves."),
    ("Tomato_Yellow_Leaf_Curl_Virus", "Yellow leaf curl virus causes upward curling and yellowing of leaves."),
    ("Tomato_mosaic_virus", "Mosaic virus causes mottled light and dark green patterns on leaves."),
    ("healthy", "The plant appears healthy with no signs of disease."),
    ("powdery_mildew", "Powdery mildew appears as white powdery spots on leaves."),
];

pub const UNKNOWN_DESCRIPTION: &str = "Information not available";

/// Description for a canonical class name
pub fn describe_disease(name: &str) -> &'static str {
    DESCRIPTIONS
        .iter()
        .find(|(class, _)| *class == name)
        .map(|(_, text)| *text)
        .unwrap_or(UNKNOWN_DESCRIPTION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::class_names::FALLBACK_CLASS_NAMES;

    #[test]
    fn test_every_fallback_class_is_described() {
        for class in FALLBACK_CLASS_NAMES {
            assert_ne!(describe_disease(class), UNKNOWN_DESCRIPTION, "{class}");
        }
    }

    #[test]
    fn test_unknown_class() {
        assert_eq!(describe_disease("Tomato_healthy"), UNKNOWN_DESCRIPTION);
    }
}
