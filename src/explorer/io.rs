//! Dataset loading and snapshot export.

use super::types::{Metadata, PartitionNode, SplitStrategy};
use crate::error::{CanopyError, Result, ResultExt as _};
use chrono::{DateTime, Utc};
use polars::prelude::*;
use serde::Serialize;
use std::path::Path;

/// Load a dataset from a CSV, JSON, or Parquet file.
///
/// CSV schemas are inferred over the first 10k rows with date parsing
/// enabled; string columns of any format that cast cleanly to datetimes are
/// re-typed afterwards so temporal classification sees a temporal dtype.
///
/// # Errors
///
/// Returns an error for unsupported extensions or unreadable files.
pub fn load_dataset(path: &Path) -> Result<DataFrame> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();

    let df = match ext.as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_infer_schema_length(Some(10_000))
            .with_has_header(true)
            .with_try_parse_dates(true)
            .finish()?
            .collect()
            .context("Failed to read CSV")?,
        "json" => JsonReader::new(std::fs::File::open(path)?)
            .finish()
            .context("Failed to read JSON")?,
        "parquet" => ParquetReader::new(std::fs::File::open(path)?)
            .finish()
            .context("Failed to read Parquet")?,
        _ => return Err(CanopyError::UnsupportedFormat(ext)),
    };

    try_parse_temporal_columns(df)
}

/// Re-type string columns that parse cleanly as datetimes.
///
/// A cast counts as clean when it introduces no new nulls.
fn try_parse_temporal_columns(mut df: DataFrame) -> Result<DataFrame> {
    let candidates: Vec<String> = df
        .get_columns()
        .iter()
        .filter(|c| c.dtype().is_string())
        .map(|c| c.name().to_string())
        .collect();

    for name in candidates {
        let series = df.column(&name)?.as_materialized_series().clone();
        if series.is_empty() {
            continue;
        }
        if let Ok(casted) = series.cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
            && casted.null_count() == series.null_count()
        {
            df.replace(&name, casted)?;
        }
    }

    Ok(df)
}

/// Export envelope tying a tree to the inputs that produced it, so a
/// visualization can consume one self-contained file.
#[derive(Serialize, Debug)]
pub struct Snapshot<'a> {
    pub source: String,
    pub exported_at: DateTime<Utc>,
    pub strategy: SplitStrategy,
    pub selected_features: &'a [String],
    pub metadata: &'a Metadata,
    pub tree: &'a PartitionNode,
}

impl<'a> Snapshot<'a> {
    pub fn new(
        source: &Path,
        strategy: SplitStrategy,
        selected_features: &'a [String],
        metadata: &'a Metadata,
        tree: &'a PartitionNode,
    ) -> Self {
        Self {
            source: source.display().to_string(),
            exported_at: Utc::now(),
            strategy,
            selected_features,
            metadata,
            tree,
        }
    }
}

/// Write `snapshot` to `path` as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn save_snapshot(snapshot: &Snapshot<'_>, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot)
        .map_err(|e| CanopyError::Export(format!("Failed to serialize snapshot: {e}")))?;

    std::fs::write(path, json).context("Failed to write snapshot")?;

    Ok(())
}
