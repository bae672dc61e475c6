// Shared catalog fixture for integration tests
#![allow(dead_code)]

use crop_disease_advisor::SqliteStore;
use std::path::{Path, PathBuf};

/// Small catalog covering the interesting shapes:
/// - Early_blight: five treatments, severity mappings for every tier
/// - Late_blight: mapped only at Critical
/// - "Leaf Mold": stored with a space, treatment never mapped (fallback path)
/// - Bacterial_spot, healthy: no treatments
pub const CATALOG_SQL: &str = "
INSERT INTO diseases VALUES (1, 'Early_blight', 'Fungal disease caused by Alternaria solani', 'Concentric rings on older leaves');
INSERT INTO diseases VALUES (2, 'Late_blight', 'Oomycete disease caused by Phytophthora infestans', 'Water-soaked lesions');
INSERT INTO diseases VALUES (3, 'Leaf Mold', 'Fungal disease favoured by humidity', 'Yellow patches, olive mould underneath');
INSERT INTO diseases VALUES (4, 'Bacterial_spot', 'Bacterial disease', 'Greasy dark spots');
INSERT INTO diseases VALUES (5, 'healthy', 'No disease detected', NULL);

INSERT INTO treatment_categories VALUES (1, 'Chemical Fungicide');
INSERT INTO treatment_categories VALUES (2, 'Biological Control');
INSERT INTO treatment_categories VALUES (3, 'Organic Fungicide');

INSERT INTO severity_levels VALUES (1, 'Mild', 0, 10);
INSERT INTO severity_levels VALUES (2, 'Moderate', 10.01, 30);
INSERT INTO severity_levels VALUES (3, 'Severe', 30.01, 60);
INSERT INTO severity_levels VALUES (4, 'Critical', 60.01, 100);

INSERT INTO treatments VALUES (101, 1, 1, 'Mancozeb 75% WP', 85, 0, 1200, 1, 'Mancozeb', 'Dithane M-45',
    'Foliar spray', '2.5 g/L', 'Every 7-10 days', '3-4 weeks', 'Wear gloves and mask', 7);
INSERT INTO treatments VALUES (102, 1, 1, 'Chlorothalonil 75% WP', 88, 0, 2400, 2, 'Chlorothalonil', 'Kavach',
    'Foliar spray', '2 g/L', 'Every 7 days', '3 weeks', 'Avoid spraying near water bodies', 7);
INSERT INTO treatments VALUES (103, 1, 2, 'Trichoderma viride', 65, 1, 600, 2, 'Trichoderma viride', NULL,
    'Soil application', NULL, NULL, NULL, NULL, NULL);
INSERT INTO treatments VALUES (104, 1, 3, 'Neem oil', 55, 1, 450, 3, 'Azadirachtin', 'Neemazal',
    '', '5 ml/L', 'Weekly', NULL, NULL, 0);
INSERT INTO treatments VALUES (105, 1, 1, 'Copper oxychloride', 75, 0, NULL, NULL, 'Copper oxychloride', 'Blitox',
    'Foliar spray', '3 g/L', NULL, NULL, NULL, 3);
INSERT INTO treatments VALUES (201, 2, 1, 'Metalaxyl + Mancozeb', 90, 0, 1800, 1, 'Metalaxyl', 'Ridomil Gold',
    'Foliar spray', '2.5 g/L', 'Every 10 days', '4 weeks', 'Do not exceed 4 sprays', 7);
INSERT INTO treatments VALUES (202, 2, 2, 'Bacillus subtilis', 60, 1, 700, 2, 'Bacillus subtilis', NULL,
    'Foliar spray', NULL, NULL, NULL, NULL, 0);
INSERT INTO treatments VALUES (301, 3, 3, 'Sulfur dust', 62, 1, 500, 2, 'Sulfur', NULL,
    'Dusting', NULL, NULL, NULL, NULL, NULL);

INSERT INTO treatment_severity_mapping VALUES (103, 1, 1);
INSERT INTO treatment_severity_mapping VALUES (104, 1, 1);
INSERT INTO treatment_severity_mapping VALUES (101, 2, 1);
INSERT INTO treatment_severity_mapping VALUES (103, 2, 1);
INSERT INTO treatment_severity_mapping VALUES (104, 2, 1);
INSERT INTO treatment_severity_mapping VALUES (101, 3, 1);
INSERT INTO treatment_severity_mapping VALUES (102, 3, 1);
INSERT INTO treatment_severity_mapping VALUES (103, 3, 0);
INSERT INTO treatment_severity_mapping VALUES (101, 4, 1);
INSERT INTO treatment_severity_mapping VALUES (102, 4, 1);
INSERT INTO treatment_severity_mapping VALUES (201, 4, 1);
INSERT INTO treatment_severity_mapping VALUES (202, 4, 1);

INSERT INTO cultural_practices VALUES (1, 1, 'Mulching', 'Prevents soil splash onto lower leaves', 'At transplanting', 70);
INSERT INTO cultural_practices VALUES (2, 1, 'Crop rotation', 'Avoid solanaceous crops for 2-3 years', 'Every season', 85);
INSERT INTO cultural_practices VALUES (3, 1, 'Staking', 'Keeps foliage off the ground', 'Early growth', 60);
INSERT INTO cultural_practices VALUES (4, 2, 'Destroy volunteers', 'Remove volunteer potato and tomato plants', 'Before planting', 80);
";

/// In-memory catalog with the fixture loaded
pub fn seeded_store() -> SqliteStore {
    let store = SqliteStore::open_in_memory().expect("in-memory catalog");
    store.execute_batch(CATALOG_SQL).expect("seed catalog");
    store
}

/// Write the fixture catalog to `dir` and return its path
pub fn catalog_file(dir: &Path) -> PathBuf {
    let path = dir.join("tomato_treatments.db");
    let store = SqliteStore::open_writable(&path).expect("catalog file");
    store.create_schema().expect("schema");
    store.execute_batch(CATALOG_SQL).expect("seed catalog");
    path
}
