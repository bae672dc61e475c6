//! Build the SQLite treatment catalog from a SQL script
//!
//! Replaces any existing catalog file, runs the script, then prints row counts
//! and a few disease names so the result can be eyeballed.
//!
//! Usage:
//!   cargo run --bin build_catalog -- [treatment_database.sql] [tomato_treatments.db]

use anyhow::{Context, Result};
use crop_disease_advisor::SqliteStore;
use std::path::PathBuf;
use std::time::Instant;

const DEFAULT_SQL_SCRIPT: &str = "treatment_database.sql";
const DEFAULT_CATALOG: &str = "tomato_treatments.db";
const SAMPLE_DISEASES: usize = 5;

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let sql_path = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_SQL_SCRIPT.to_string()));
    let db_path = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_CATALOG.to_string()));

    println!("\n{}", "=".repeat(60));
    println!("Treatment Catalog Build");
    println!("{}", "=".repeat(60));
    println!();

    if !sql_path.exists() {
        anyhow::bail!("SQL script not found: {:?}", sql_path);
    }

    if db_path.exists() {
        println!("Removing old catalog: {:?}", db_path);
        std::fs::remove_file(&db_path)
            .with_context(|| format!("Failed to remove {:?}", db_path))?;
    }

    let start = Instant::now();
    println!("Creating catalog from {:?}...", sql_path);

    let script = std::fs::read_to_string(&sql_path)
        .with_context(|| format!("Failed to read SQL script: {:?}", sql_path))?;

    let store = SqliteStore::open_writable(&db_path)?;
    store
        .execute_batch(&script)
        .context("SQL script failed; check it for syntax errors")?;

    println!("  ✓ Script executed in {:.2?}", start.elapsed());

    println!("\nRow counts:");
    for (table, count) in store.table_counts()? {
        println!("  {:<28} {:>6}", table, count);
    }

    println!("\nSample diseases:");
    for name in store.disease_names(SAMPLE_DISEASES)? {
        println!("  - {}", name);
    }

    let absolute = std::fs::canonicalize(&db_path).unwrap_or(db_path);
    println!("\nCatalog ready: {}", absolute.display());
    println!("{}", "=".repeat(60));

    Ok(())
}
