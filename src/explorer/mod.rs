//! Feature exploration core: metadata inference, partition building, and the
//! session object that ties them to a dataset.

pub mod io;
pub mod metadata;
pub mod partition;
pub mod session;
pub mod types;

pub use io::{Snapshot, load_dataset, save_snapshot};
pub use metadata::infer;
pub use partition::build;
pub use session::Explorer;
pub use types::{
    Feature, FeatureKind, GroupCounts, GroupMap, Metadata, NodeBody, PartitionNode,
    PredictionOutcome, SplitStrategy,
};

#[cfg(test)]
mod tests;
