use serde::ser::SerializeMap as _;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Conventional name of the label column.
pub const LABEL_COLUMN: &str = "label";

/// Conventional name of the optional prediction column.
pub const PREDICTION_COLUMN: &str = "prediction";

/// Number of bins a quantitative feature is split into.
pub const NUM_BINS: usize = 3;

/// Verbal bin labels for quantitative features, low to high.
pub const BIN_LABELS: [&str; NUM_BINS] = ["low", "medium", "high"];

/// Columns with at most this many distinct values are categorical, whatever
/// their dtype.
pub const MAX_CATEGORICAL_VALUES: usize = 5;

/// How the cut points of a quantitative feature are chosen.
#[derive(Clone, Copy, Default, Serialize, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum SplitStrategy {
    /// Evenly spaced thresholds across the extent.
    Interval,
    /// Thresholds at the 1/3 and 2/3 sample quantiles.
    #[default]
    Quantile,
}

impl SplitStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Interval => "interval",
            Self::Quantile => "quantile",
        }
    }

    /// Parse a strategy name. Anything other than `"interval"` falls back to
    /// quantile, which is what existing callers of the old API expect.
    pub fn from_name(name: &str) -> Self {
        if name == "interval" {
            Self::Interval
        } else {
            Self::Quantile
        }
    }
}

impl fmt::Display for SplitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SplitStrategy {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

/// Classification of one feature column, decided once during inference.
#[derive(Clone, Copy, Serialize, PartialEq, Eq, Debug)]
pub enum FeatureKind {
    #[serde(rename = "C")]
    Categorical,
    #[serde(rename = "Q")]
    Quantitative,
    #[serde(rename = "T")]
    Temporal,
}

impl FeatureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Categorical => "C",
            Self::Quantitative => "Q",
            Self::Temporal => "T",
        }
    }

    /// Temporal features carry no binning scheme and cannot split rows.
    pub fn is_splittable(&self) -> bool {
        !matches!(self, Self::Temporal)
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classification and binning scheme for one feature column.
#[derive(Clone, Serialize, PartialEq, Debug)]
pub struct Feature {
    pub name: String,
    pub kind: FeatureKind,

    /// Category labels, or the verbal bins for quantitative features.
    /// Empty for temporal features.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,

    /// (min, max) of a quantitative column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extent: Option<(f64, f64)>,

    /// Interior cut points of a quantitative column; always `NUM_BINS - 1`
    /// entries when present.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub thresholds: Vec<f64>,
}

/// Derived description of a dataset: one [`Feature`] per candidate column
/// plus the label/prediction summary. Immutable after creation; recomputed
/// whenever the dataset or strategy changes.
#[derive(Clone, Serialize, PartialEq, Debug)]
pub struct Metadata {
    pub features: HashMap<String, Feature>,

    /// All columns except the label and prediction, in frame order.
    pub feature_names: Vec<String>,

    pub label: String,

    /// Distinct label values in first-seen row order.
    pub label_values: Vec<String>,

    pub has_predictions: bool,
}

impl Metadata {
    pub fn feature(&self, name: &str) -> Option<&Feature> {
        self.features.get(name)
    }

    /// Features eligible for splitting, in frame order.
    pub fn selectable_features(&self) -> Vec<&str> {
        self.feature_names
            .iter()
            .filter(|name| {
                self.feature(name)
                    .is_some_and(|feature| feature.kind.is_splittable())
            })
            .map(String::as_str)
            .collect()
    }
}

/// Value → aggregate mapping that preserves first-seen insertion order.
///
/// Partition trees must be exactly reproducible for a fixed input, so group
/// order follows the first row that produced each key. Serializes as a JSON
/// object in that order.
#[derive(Clone, PartialEq, Debug)]
pub struct GroupMap<V>(Vec<(String, V)>);

impl<V> GroupMap<V> {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    /// Aggregate slot for `key`, created with `V::default()` on first sight.
    pub fn entry(&mut self, key: &str) -> &mut V
    where
        V: Default,
    {
        let index = match self.0.iter().position(|(k, _)| k == key) {
            Some(index) => index,
            None => {
                self.0.push((key.to_owned(), V::default()));
                self.0.len() - 1
            }
        };
        &mut self.0[index].1
    }
}

impl<V> Default for GroupMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Serialize> Serialize for GroupMap<V> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Label value → row count for one partition node.
pub type GroupCounts = GroupMap<usize>;

impl GroupCounts {
    /// Total rows across all groups.
    pub fn total(&self) -> usize {
        self.iter().map(|(_, count)| *count).sum()
    }
}

/// How often one prediction value agreed with the label.
#[derive(Clone, Copy, Default, Serialize, PartialEq, Eq, Debug)]
pub struct PredictionOutcome {
    pub correct: usize,
    pub incorrect: usize,
}

/// One node of the partition tree.
#[derive(Clone, Serialize, PartialEq, Debug)]
pub struct PartitionNode {
    /// Label value → row count over this node's rows.
    pub counts: GroupCounts,

    /// Prediction value → row count; present iff the dataset has predictions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction_counts: Option<GroupCounts>,

    /// Prediction value → correct/incorrect counts against the label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction_results: Option<GroupMap<PredictionOutcome>>,

    /// Feature that produced this node from its parent; empty at the root.
    pub split_feature: String,

    /// Bin or category label that produced this node; empty at the root.
    pub split_label: String,

    #[serde(flatten)]
    pub body: NodeBody,
}

/// A node either splits further or terminates with its row count.
#[derive(Clone, Serialize, PartialEq, Debug)]
#[serde(untagged)]
pub enum NodeBody {
    Split { children: Vec<PartitionNode> },
    Leaf { value: usize },
}

impl PartitionNode {
    pub fn children(&self) -> Option<&[PartitionNode]> {
        match &self.body {
            NodeBody::Split { children } => Some(children),
            NodeBody::Leaf { .. } => None,
        }
    }

    pub fn leaf_value(&self) -> Option<usize> {
        match &self.body {
            NodeBody::Split { .. } => None,
            NodeBody::Leaf { value } => Some(*value),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(&self.body, NodeBody::Leaf { .. })
    }

    /// Rows in this node, read back from the label counts.
    pub fn row_count(&self) -> usize {
        self.counts.total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_map_preserves_insertion_order() {
        let mut counts = GroupCounts::new();
        *counts.entry("b") += 1;
        *counts.entry("a") += 1;
        *counts.entry("b") += 1;
        *counts.entry("c") += 1;

        let keys: Vec<&str> = counts.keys().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert_eq!(counts.get("b"), Some(&2));
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn test_group_map_serializes_as_object() {
        let mut counts = GroupCounts::new();
        *counts.entry("square") += 3;
        *counts.entry("circle") += 2;

        let json = serde_json::to_string(&counts).expect("Failed to serialize counts");
        assert_eq!(json, r#"{"square":3,"circle":2}"#);
    }

    #[test]
    fn test_strategy_parse_falls_back_to_quantile() {
        assert_eq!(SplitStrategy::from_name("interval"), SplitStrategy::Interval);
        assert_eq!(SplitStrategy::from_name("quantile"), SplitStrategy::Quantile);
        assert_eq!(SplitStrategy::from_name("whatever"), SplitStrategy::Quantile);

        let parsed: SplitStrategy = "interval".parse().expect("parse is infallible");
        assert_eq!(parsed, SplitStrategy::Interval);
    }

    #[test]
    fn test_feature_kind_tags() {
        assert_eq!(FeatureKind::Categorical.as_str(), "C");
        assert_eq!(FeatureKind::Quantitative.as_str(), "Q");
        assert_eq!(FeatureKind::Temporal.as_str(), "T");
        assert!(FeatureKind::Categorical.is_splittable());
        assert!(!FeatureKind::Temporal.is_splittable());
    }
}
