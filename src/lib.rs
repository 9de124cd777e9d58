//! # Canopy - Partition Trees for Feature Exploration
//!
//! Canopy computes summary statistics and a recursive partition tree over a
//! tabular dataset for use in interactive feature-exploration views. It
//! classifies each column as categorical, quantitative, or temporal, derives
//! display thresholds, and splits rows by a user-chosen feature sequence into
//! a tree of per-node label counts (plus prediction-vs-label outcomes when a
//! `prediction` column is present).
//!
//! ## Quick Start
//!
//! ```no_run
//! use canopy::explorer::types::SplitStrategy;
//! use canopy::explorer::{Explorer, load_dataset};
//!
//! # fn example() -> canopy::error::Result<()> {
//! let df = load_dataset("data.csv".as_ref())?;
//!
//! let mut session = Explorer::new(df, SplitStrategy::Quantile)?;
//! session.select_features(vec!["color".to_owned(), "area".to_owned()])?;
//!
//! if let Some(tree) = session.tree() {
//!     println!("{} rows at the root", tree.row_count());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Modules
//!
//! - [`explorer`]: metadata inference, partition building, and the session
//!   object that owns the exploration state
//!   - [`explorer::metadata`]: column classification and binning
//!   - [`explorer::partition`]: the recursive splitter
//! - [`error`]: error types and handling utilities
//! - [`logging`]: tracing setup for the CLI
//!
//! ## Key Concepts
//!
//! Metadata is derived once per dataset (and per strategy choice) and stays
//! immutable; the partition builder derives a fresh tree on every change to
//! the dataset, metadata, or selected-feature ordering. All grouping
//! preserves first-seen row order, so a fixed input always reproduces the
//! same tree.

#![warn(clippy::all, rust_2018_idioms)]

pub mod error;
pub mod explorer;
pub mod logging;
