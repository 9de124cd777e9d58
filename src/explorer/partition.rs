//! Recursive partitioning of a dataset over a chosen feature sequence.
//!
//! The builder extracts the label, prediction, and selected feature columns
//! once up front, then recurses over row-index subsets: each node owns a
//! `Vec<u32>` of row positions and its children partition that set. Group
//! order always follows the first row that produced each group, so a fixed
//! input reproduces the same tree.

use super::metadata::render_value;
use super::types::{
    Feature, FeatureKind, GroupCounts, GroupMap, Metadata, NUM_BINS, NodeBody, PREDICTION_COLUMN,
    PartitionNode, PredictionOutcome,
};
use crate::error::{CanopyError, Result};
use polars::prelude::*;

/// Build the partition tree for `df` from `metadata` and the ordered
/// `selected_features`.
///
/// Mirrors the soft-failure contract of [`super::metadata::infer`]: an absent
/// `metadata` yields `Ok(None)` rather than an error.
///
/// # Errors
///
/// Returns an error if a selected feature is unknown or temporal, or a
/// required column is absent from the frame.
pub fn build(
    metadata: Option<&Metadata>,
    selected_features: &[String],
    df: &DataFrame,
) -> Result<Option<PartitionNode>> {
    let Some(metadata) = metadata else {
        return Ok(None);
    };

    let builder = TreeBuilder::prepare(metadata, selected_features, df)?;
    let rows: Vec<u32> = (0..df.height() as u32).collect();
    let root = builder.split(&rows, 0, String::new(), String::new());
    Ok(Some(root))
}

/// Per-row values of one selected feature, extracted before recursion.
enum FeatureValues {
    /// Rendered values for exact-equality grouping.
    Keys(Vec<String>),
    /// Numeric values for threshold binning; `None` falls into no bin.
    Numbers(Vec<Option<f64>>),
}

struct TreeBuilder<'a> {
    selected: &'a [String],
    labels: Vec<String>,
    predictions: Option<Vec<String>>,
    /// Descriptor and extracted values per selected feature, same order.
    feature_values: Vec<(&'a Feature, FeatureValues)>,
}

impl<'a> TreeBuilder<'a> {
    fn prepare(
        metadata: &'a Metadata,
        selected: &'a [String],
        df: &DataFrame,
    ) -> Result<Self> {
        let labels = rendered_column(df, &metadata.label)?;
        let predictions = if metadata.has_predictions {
            Some(rendered_column(df, PREDICTION_COLUMN)?)
        } else {
            None
        };

        let mut feature_values = Vec::with_capacity(selected.len());
        for name in selected {
            let feature = metadata
                .feature(name)
                .ok_or_else(|| CanopyError::MissingColumn(name.clone()))?;

            let values = match feature.kind {
                FeatureKind::Quantitative => {
                    let casted = df
                        .column(name)?
                        .as_materialized_series()
                        .cast(&DataType::Float64)?;
                    FeatureValues::Numbers(casted.f64()?.into_iter().collect())
                }
                FeatureKind::Categorical => FeatureValues::Keys(rendered_column(df, name)?),
                FeatureKind::Temporal => {
                    return Err(CanopyError::UnsplittableFeature(name.clone()));
                }
            };
            feature_values.push((feature, values));
        }

        Ok(Self {
            selected,
            labels,
            predictions,
            feature_values,
        })
    }

    fn split(
        &self,
        rows: &[u32],
        depth: usize,
        split_feature: String,
        split_label: String,
    ) -> PartitionNode {
        let mut counts = GroupCounts::new();
        for &row in rows {
            *counts.entry(&self.labels[row as usize]) += 1;
        }

        let (prediction_counts, prediction_results) = match &self.predictions {
            Some(predictions) => {
                let mut by_prediction = GroupCounts::new();
                let mut results: GroupMap<PredictionOutcome> = GroupMap::new();
                for &row in rows {
                    let prediction = &predictions[row as usize];
                    *by_prediction.entry(prediction) += 1;

                    let outcome = results.entry(prediction);
                    if *prediction == self.labels[row as usize] {
                        outcome.correct += 1;
                    } else {
                        outcome.incorrect += 1;
                    }
                }
                (Some(by_prediction), Some(results))
            }
            None => (None, None),
        };

        let body = if depth < self.selected.len() {
            let (feature, values) = &self.feature_values[depth];
            let groups = match values {
                FeatureValues::Numbers(numbers) => bin_groups(rows, numbers, &feature.thresholds),
                FeatureValues::Keys(keys) => key_groups(rows, keys),
            };

            // Bin labels pair with groups by position, as the metadata lists
            // them.
            let children = groups
                .iter()
                .enumerate()
                .map(|(i, group)| {
                    let label = feature.values.get(i).cloned().unwrap_or_default();
                    self.split(group, depth + 1, feature.name.clone(), label)
                })
                .collect();
            NodeBody::Split { children }
        } else {
            NodeBody::Leaf { value: rows.len() }
        };

        PartitionNode {
            counts,
            prediction_counts,
            prediction_results,
            split_feature,
            split_label,
            body,
        }
    }
}

/// Exactly [`NUM_BINS`] contiguous groups over the thresholds: half-open
/// `[low, high)` bins, with the last bin closed above. Empty bins stay in
/// the output so children keep their positional labels.
fn bin_groups(rows: &[u32], numbers: &[Option<f64>], thresholds: &[f64]) -> Vec<Vec<u32>> {
    let mut groups = vec![Vec::new(); NUM_BINS];
    for &row in rows {
        let Some(value) = numbers[row as usize] else {
            continue;
        };
        let bin = thresholds
            .iter()
            .take_while(|threshold| value >= **threshold)
            .count();
        groups[bin].push(row);
    }
    groups
}

/// Groups by exact value equality, ordered by first occurrence.
fn key_groups(rows: &[u32], keys: &[String]) -> Vec<Vec<u32>> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: Vec<Vec<u32>> = Vec::new();
    for &row in rows {
        let key = keys[row as usize].as_str();
        match order.iter().position(|seen| *seen == key) {
            Some(index) => groups[index].push(row),
            None => {
                order.push(key);
                groups.push(vec![row]);
            }
        }
    }
    groups
}

fn rendered_column(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    let series = df
        .column(name)
        .map_err(|_| CanopyError::MissingColumn(name.to_owned()))?
        .as_materialized_series()
        // `Series::iter` requires a single chunk; CSV reads produce many.
        .rechunk();
    Ok(series.iter().map(|value| render_value(&value)).collect())
}
