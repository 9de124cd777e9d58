//! Explicit state ownership for the exploration loop.
//!
//! An [`Explorer`] owns the three watched inputs (dataset, split strategy,
//! feature selection) and recomputes the derived metadata and tree whenever
//! one of them changes. The hosting application mutates through the setters
//! and reads the derived values back; there is no hidden reactive layer.

use super::types::{Metadata, PartitionNode, SplitStrategy};
use super::{metadata, partition};
use crate::error::Result;
use polars::prelude::DataFrame;

pub struct Explorer {
    dataset: DataFrame,
    strategy: SplitStrategy,
    selected_features: Vec<String>,
    metadata: Option<Metadata>,
    tree: Option<PartitionNode>,
}

impl Explorer {
    /// Create a session over `dataset` with an empty feature selection.
    ///
    /// # Errors
    ///
    /// Returns an error if metadata inference or the initial build fails.
    pub fn new(dataset: DataFrame, strategy: SplitStrategy) -> Result<Self> {
        let mut explorer = Self {
            dataset,
            strategy,
            selected_features: Vec::new(),
            metadata: None,
            tree: None,
        };
        explorer.refresh_metadata()?;
        explorer.refresh_tree()?;
        Ok(explorer)
    }

    /// Replace the dataset. Metadata and tree are derived anew; selections
    /// that no longer resolve against the new metadata are dropped.
    pub fn set_dataset(&mut self, dataset: DataFrame) -> Result<()> {
        self.dataset = dataset;
        self.refresh_metadata()?;
        let current = std::mem::take(&mut self.selected_features);
        self.selected_features = self.filter_selection(current);
        self.refresh_tree()
    }

    /// Change the threshold strategy and recompute everything derived.
    pub fn set_strategy(&mut self, strategy: SplitStrategy) -> Result<()> {
        self.strategy = strategy;
        self.refresh_metadata()?;
        self.refresh_tree()
    }

    /// Choose the split order. Unknown and temporal features are dropped
    /// from the selection so the builder never sees an unsplittable one.
    pub fn select_features(&mut self, names: Vec<String>) -> Result<()> {
        self.selected_features = self.filter_selection(names);
        self.refresh_tree()
    }

    pub fn dataset(&self) -> &DataFrame {
        &self.dataset
    }

    pub fn strategy(&self) -> SplitStrategy {
        self.strategy
    }

    pub fn selected_features(&self) -> &[String] {
        &self.selected_features
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    /// The current partition tree; `None` only when the dataset exposed no
    /// columns to classify.
    pub fn tree(&self) -> Option<&PartitionNode> {
        self.tree.as_ref()
    }

    fn refresh_metadata(&mut self) -> Result<()> {
        self.metadata = metadata::infer(&self.dataset, self.strategy)?;
        Ok(())
    }

    fn refresh_tree(&mut self) -> Result<()> {
        self.tree = partition::build(
            self.metadata.as_ref(),
            &self.selected_features,
            &self.dataset,
        )?;
        Ok(())
    }

    fn filter_selection(&self, names: Vec<String>) -> Vec<String> {
        names
            .into_iter()
            .filter(|name| {
                match self.metadata.as_ref().and_then(|m| m.feature(name)) {
                    Some(feature) if feature.kind.is_splittable() => true,
                    Some(_) => {
                        tracing::warn!("dropping temporal feature '{name}' from selection");
                        false
                    }
                    None => {
                        tracing::warn!("dropping unknown feature '{name}' from selection");
                        false
                    }
                }
            })
            .collect()
    }
}
