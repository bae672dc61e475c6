//! SQLite-backed treatment catalog
//!
//! The catalog is a read-only file built offline (see `bin/build_catalog.rs`).
//! A store wraps one connection and is opened per request; nothing is pooled.

use std::path::Path;

use rusqlite::types::Value;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Row};

use super::{
    CulturalPractice, DiseaseRecord, PracticeRating, StoreResult, TreatmentRecord, TreatmentStore,
};
use crate::error::StoreError;

/// Catalog DDL (used by tests and the catalog builder)
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS diseases (
    disease_id INTEGER PRIMARY KEY,
    disease_name TEXT NOT NULL UNIQUE,
    description TEXT,
    symptoms TEXT
);

CREATE TABLE IF NOT EXISTS treatment_categories (
    category_id INTEGER PRIMARY KEY,
    category_name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS severity_levels (
    severity_id INTEGER PRIMARY KEY,
    severity_name TEXT NOT NULL,
    min_percentage REAL,
    max_percentage REAL
);

CREATE TABLE IF NOT EXISTS treatments (
    treatment_id INTEGER PRIMARY KEY,
    disease_id INTEGER NOT NULL REFERENCES diseases(disease_id),
    category_id INTEGER NOT NULL REFERENCES treatment_categories(category_id),
    treatment_name TEXT NOT NULL,
    effectiveness_percentage REAL NOT NULL,
    is_organic INTEGER NOT NULL DEFAULT 0,
    cost_per_acre_inr REAL,
    priority INTEGER,
    active_ingredient TEXT,
    product_names TEXT,
    application_method TEXT,
    dosage TEXT,
    frequency TEXT,
    duration TEXT,
    precautions TEXT,
    waiting_days_before_harvest INTEGER
);

CREATE TABLE IF NOT EXISTS treatment_severity_mapping (
    treatment_id INTEGER NOT NULL REFERENCES treatments(treatment_id),
    severity_id INTEGER NOT NULL REFERENCES severity_levels(severity_id),
    is_recommended INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS cultural_practices (
    practice_id INTEGER PRIMARY KEY,
    disease_id INTEGER NOT NULL REFERENCES diseases(disease_id),
    practice_name TEXT NOT NULL,
    description TEXT,
    timing TEXT,
    effectiveness
);
";

/// Tables reported by `table_counts`
pub const CATALOG_TABLES: [&str; 6] = [
    "diseases",
    "treatments",
    "cultural_practices",
    "treatment_categories",
    "severity_levels",
    "treatment_severity_mapping",
];

const TREATMENT_COLUMNS: &str = "
    t.treatment_id, t.disease_id, t.treatment_name, tc.category_name,
    t.effectiveness_percentage, t.is_organic, t.cost_per_acre_inr, t.priority,
    t.active_ingredient, t.product_names, t.application_method, t.dosage,
    t.frequency, t.duration, t.precautions, t.waiting_days_before_harvest";

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open an existing catalog file read-only
    pub fn open(path: &Path) -> StoreResult<Self> {
        if !path.exists() {
            return Err(StoreError::Missing {
                path: path.display().to_string(),
            });
        }
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        Ok(Self { conn })
    }

    /// Open (or create) a catalog file for writing
    pub fn open_writable(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// Empty in-memory catalog with the schema applied (for testing)
    pub fn open_in_memory() -> StoreResult<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.create_schema()?;
        Ok(store)
    }

    pub fn create_schema(&self) -> StoreResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Run a multi-statement SQL script (seed data, catalog dumps)
    pub fn execute_batch(&self, sql: &str) -> StoreResult<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    /// Row count for every catalog table
    pub fn table_counts(&self) -> StoreResult<Vec<(&'static str, i64)>> {
        CATALOG_TABLES
            .iter()
            .map(|table| -> StoreResult<(&'static str, i64)> {
                let count: i64 = self
                    .conn
                    .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
                Ok((*table, count))
            })
            .collect()
    }

    /// First `limit` disease names, by id
    pub fn disease_names(&self, limit: usize) -> StoreResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT disease_name FROM diseases ORDER BY disease_id LIMIT ?1")?;
        let names = stmt
            .query_map(params![limit as i64], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }
}

impl TreatmentStore for SqliteStore {
    fn find_disease(&self, name: &str, lookup_form: &str) -> StoreResult<Option<DiseaseRecord>> {
        let disease = self
            .conn
            .query_row(
                "SELECT disease_id, disease_name, description, symptoms
                 FROM diseases
                 WHERE disease_name = ?1 OR REPLACE(disease_name, '_', ' ') = ?2
                 ORDER BY CASE WHEN disease_name = ?1 THEN 0 ELSE 1 END, disease_id
                 LIMIT 1",
                params![name, lookup_form],
                |row| {
                    Ok(DiseaseRecord {
                        disease_id: row.get(0)?,
                        disease_name: row.get(1)?,
                        description: row.get(2)?,
                        symptoms: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(disease)
    }

    fn treatments_for_disease(&self, disease_id: i64) -> StoreResult<Vec<TreatmentRecord>> {
        let sql = format!(
            "SELECT {TREATMENT_COLUMNS}
             FROM treatments t
             JOIN treatment_categories tc ON t.category_id = tc.category_id
             WHERE t.disease_id = ?1
             ORDER BY t.priority, t.effectiveness_percentage DESC, t.treatment_id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let treatments = stmt
            .query_map(params![disease_id], parse_treatment_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(treatments)
    }

    fn recommended_treatment_ids(&self, severity_id: u8) -> StoreResult<Vec<i64>> {
        let mut stmt = self.conn.prepare(
            "SELECT treatment_id FROM treatment_severity_mapping
             WHERE severity_id = ?1 AND is_recommended = 1",
        )?;
        let ids = stmt
            .query_map(params![severity_id as i64], |row| row.get(0))?
            .collect::<Result<Vec<i64>, _>>()?;
        Ok(ids)
    }

    fn cultural_practices(&self, disease_id: i64) -> StoreResult<Vec<CulturalPractice>> {
        let mut stmt = self.conn.prepare(
            "SELECT practice_name, description, timing, effectiveness
             FROM cultural_practices
             WHERE disease_id = ?1
             ORDER BY effectiveness DESC",
        )?;
        let practices = stmt
            .query_map(params![disease_id], |row| {
                Ok(CulturalPractice {
                    practice_name: row.get(0)?,
                    description: row.get(1)?,
                    timing: row.get(2)?,
                    effectiveness: parse_rating(row.get(3)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(practices)
    }
}

fn parse_treatment_row(row: &Row<'_>) -> rusqlite::Result<TreatmentRecord> {
    Ok(TreatmentRecord {
        treatment_id: row.get(0)?,
        disease_id: row.get(1)?,
        treatment_name: row.get(2)?,
        category_name: row.get(3)?,
        effectiveness_percentage: row.get(4)?,
        is_organic: row.get::<_, Option<bool>>(5)?.unwrap_or(false),
        cost_per_acre: row.get(6)?,
        priority: row.get(7)?,
        active_ingredient: row.get(8)?,
        product_names: row.get(9)?,
        application_method: row.get(10)?,
        dosage: row.get(11)?,
        frequency: row.get(12)?,
        duration: row.get(13)?,
        precautions: row.get(14)?,
        waiting_days_before_harvest: row.get(15)?,
    })
}

fn parse_rating(value: Value) -> Option<PracticeRating> {
    match value {
        Value::Integer(n) => Some(PracticeRating::Number(n as f64)),
        Value::Real(x) => Some(PracticeRating::Number(x)),
        Value::Text(s) => Some(PracticeRating::Text(s)),
        Value::Null | Value::Blob(_) => None,
    }
}
