//! bricklog-import - bulk import set numbers into the collection
//!
//! Reads a CSV export (a `set_number` column) or a plain list of set
//! numbers, one per line, and inserts the ones not already present.
//! Metadata is not fetched here; the web service resolves it lazily when
//! the collection is listed.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use bricklog_web::types::SetNumber;

#[derive(Parser, Debug)]
#[command(
    name = "bricklog-import",
    about = "Bulk import LEGO set numbers from a CSV file"
)]
struct Args {
    /// CSV file with a set_number column, or one set number per line
    file: PathBuf,

    /// Root folder override (default: BRICKLOG_ROOT or the platform data dir)
    #[arg(long)]
    root: Option<String>,
}

/// Pull candidate set number strings out of CSV or plain text content
///
/// Only the first column is considered; a recognized header row is
/// skipped.
fn parse_set_numbers(content: &str) -> Vec<String> {
    const HEADERS: [&str; 3] = ["set_number", "setnumber", "set number"];

    let mut values = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let first_field = line
            .split(',')
            .next()
            .unwrap_or("")
            .trim()
            .trim_matches('"')
            .trim();
        if first_field.is_empty() {
            continue;
        }
        if index == 0 && HEADERS.contains(&first_field.to_lowercase().as_str()) {
            continue;
        }
        values.push(first_field.to_string());
    }
    values
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let root_folder = bricklog_common::config::resolve_root_folder(args.root.as_deref());
    bricklog_common::config::ensure_root_folder(&root_folder)
        .map_err(|e| anyhow::anyhow!("Failed to initialize root folder: {}", e))?;
    let db_path = bricklog_common::config::database_path(&root_folder);
    let pool = bricklog_web::db::init_database_pool(&db_path).await?;

    let content = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let candidates = parse_set_numbers(&content);
    info!(
        "Found {} records in {}",
        candidates.len(),
        args.file.display()
    );

    let mut imported = 0usize;
    let mut skipped = 0usize;
    let mut failed: Vec<(String, String)> = Vec::new();

    for candidate in candidates {
        let set_number = match SetNumber::parse(&candidate) {
            Ok(set_number) => set_number,
            Err(e) => {
                failed.push((candidate, e.to_string()));
                continue;
            }
        };

        if bricklog_web::db::sets::find_by_set_number(&pool, set_number.as_str())
            .await?
            .is_some()
        {
            info!("Set {} already exists, skipping", set_number);
            skipped += 1;
            continue;
        }

        match bricklog_web::db::sets::insert_basic(&pool, set_number.as_str()).await {
            Ok(_) => {
                info!("Imported set {}", set_number);
                imported += 1;
            }
            Err(e) => {
                failed.push((set_number.to_string(), e.to_string()));
            }
        }
    }

    info!(
        "Import complete: {} imported, {} skipped, {} failed",
        imported,
        skipped,
        failed.len()
    );
    for (set_number, reason) in &failed {
        warn!("Failed import {}: {}", set_number, reason);
    }

    Ok(())
}
