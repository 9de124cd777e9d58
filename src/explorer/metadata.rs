//! Column classification and binning inference.
//!
//! Every candidate feature column (anything that is not the label or the
//! prediction) is classified exactly once: low-cardinality columns become
//! categorical regardless of dtype, numeric columns become quantitative with
//! two interior thresholds, temporal columns are tagged but carry no binning
//! scheme yet, and everything else falls back to categorical over its
//! distinct values.

use super::types::{
    BIN_LABELS, Feature, FeatureKind, LABEL_COLUMN, MAX_CATEGORICAL_VALUES, Metadata, NUM_BINS,
    PREDICTION_COLUMN, SplitStrategy,
};
use crate::error::{CanopyError, Result};
use polars::prelude::*;
use std::collections::HashMap;

/// Derive display metadata for every feature column of `df`.
///
/// Returns `Ok(None)` when the frame exposes no columns at all, mirroring
/// the soft-failure contract of the partition builder. A frame with columns
/// but no `label` column is malformed input and reported as an error.
///
/// # Errors
///
/// Returns an error if the label column is absent or a column cannot be
/// profiled.
pub fn infer(df: &DataFrame, strategy: SplitStrategy) -> Result<Option<Metadata>> {
    if df.width() == 0 {
        return Ok(None);
    }

    let columns: Vec<String> = df
        .get_columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect();

    let label_column = df
        .column(LABEL_COLUMN)
        .map_err(|_| CanopyError::MissingColumn(LABEL_COLUMN.to_owned()))?;
    let label_values = first_seen_values(label_column.as_materialized_series());

    let feature_names: Vec<String> = columns
        .iter()
        .filter(|name| name.as_str() != LABEL_COLUMN && name.as_str() != PREDICTION_COLUMN)
        .cloned()
        .collect();
    let has_predictions = columns.iter().any(|name| name == PREDICTION_COLUMN);

    let mut features = HashMap::with_capacity(feature_names.len());
    for name in &feature_names {
        let feature = classify_column(df.column(name)?, strategy)?;
        features.insert(name.clone(), feature);
    }

    Ok(Some(Metadata {
        features,
        feature_names,
        label: LABEL_COLUMN.to_owned(),
        label_values,
        has_predictions,
    }))
}

fn classify_column(column: &Column, strategy: SplitStrategy) -> Result<Feature> {
    let series = column.as_materialized_series();
    let name = series.name().to_string();
    let non_null = series.drop_nulls();
    let distinct = non_null.n_unique()?;

    // Low cardinality wins over dtype: a numeric column with a handful of
    // distinct values reads as categories.
    if distinct <= MAX_CATEGORICAL_VALUES {
        return categorical(name, &non_null);
    }

    let dtype = series.dtype();

    if dtype.is_numeric() {
        let casted = non_null.cast(&DataType::Float64)?;
        let ca = casted.f64()?;

        let (min, max) = match (ca.min(), ca.max()) {
            (Some(min), Some(max)) => (min, max),
            _ => {
                return Err(CanopyError::DataProcessing(format!(
                    "column '{name}' has no numeric extent"
                )));
            }
        };

        let thresholds = match strategy {
            SplitStrategy::Interval => interval_thresholds(min, max),
            SplitStrategy::Quantile => quantile_thresholds(ca)?,
        };

        return Ok(Feature {
            name,
            kind: FeatureKind::Quantitative,
            values: BIN_LABELS.iter().map(|label| (*label).to_owned()).collect(),
            extent: Some((min, max)),
            thresholds,
        });
    }

    if dtype.is_temporal() {
        // No binning scheme for dates yet; consumers get a bare descriptor.
        return Ok(Feature {
            name,
            kind: FeatureKind::Temporal,
            values: Vec::new(),
            extent: None,
            thresholds: Vec::new(),
        });
    }

    categorical(name, &non_null)
}

fn categorical(name: String, series: &Series) -> Result<Feature> {
    Ok(Feature {
        name,
        kind: FeatureKind::Categorical,
        values: sorted_distinct(series)?,
        extent: None,
        thresholds: Vec::new(),
    })
}

/// Interior cut points evenly spaced across the extent.
fn interval_thresholds(min: f64, max: f64) -> Vec<f64> {
    let bin_size = (max - min) / NUM_BINS as f64;
    (1..NUM_BINS).map(|k| min + k as f64 * bin_size).collect()
}

/// Interior cut points at the sample quantiles, linear interpolation.
fn quantile_thresholds(ca: &Float64Chunked) -> Result<Vec<f64>> {
    (1..NUM_BINS)
        .map(|k| -> Result<f64> {
            ca.quantile(k as f64 / NUM_BINS as f64, QuantileMethod::Linear)?
                .ok_or_else(|| {
                    CanopyError::DataProcessing("quantile of an empty column".to_owned())
                })
        })
        .collect()
}

/// Distinct values sorted ascending in the column's native order.
fn sorted_distinct(series: &Series) -> Result<Vec<String>> {
    let unique = series.unique()?.sort(SortOptions::default())?;
    Ok(unique.iter().map(|value| render_value(&value)).collect())
}

/// Distinct values in first-seen row order (not sorted).
fn first_seen_values(series: &Series) -> Vec<String> {
    // `Series::iter` requires a single chunk; CSV reads produce many.
    let series = series.rechunk();
    let mut seen: Vec<String> = Vec::new();
    for value in series.iter() {
        let rendered = render_value(&value);
        if !seen.contains(&rendered) {
            seen.push(rendered);
        }
    }
    seen
}

/// Strings render without quoting; everything else through `Display`.
pub(crate) fn render_value(value: &AnyValue<'_>) -> String {
    match value.get_str() {
        Some(s) => s.to_owned(),
        None => value.to_string(),
    }
}
