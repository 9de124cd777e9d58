use anyhow::{Context as _, Result, bail};
use canopy::explorer::types::{Feature, FeatureKind, SplitStrategy};
use canopy::explorer::{self, Explorer, PartitionNode, Snapshot};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "canopy", about = "Feature partition explorer for tabular datasets")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify a dataset's features and show the inferred binning
    Metadata {
        /// Path to the dataset (CSV, JSON, Parquet)
        file: PathBuf,

        /// Threshold strategy: "interval", or anything else for quantile
        #[arg(long, default_value = "quantile", value_parser = parse_strategy)]
        strategy: SplitStrategy,

        /// Write the metadata as JSON to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Partition a dataset by a feature sequence and print the tree
    Explore {
        /// Path to the dataset (CSV, JSON, Parquet)
        file: PathBuf,

        /// Comma-separated feature names, split in the given order
        #[arg(short, long, value_delimiter = ',')]
        features: Vec<String>,

        /// Threshold strategy: "interval", or anything else for quantile
        #[arg(long, default_value = "quantile", value_parser = parse_strategy)]
        strategy: SplitStrategy,

        /// Write a JSON snapshot (metadata + tree) to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn parse_strategy(s: &str) -> Result<SplitStrategy, String> {
    // Unknown names fall back to quantile rather than failing.
    Ok(SplitStrategy::from_name(s))
}

pub fn run_command(command: Commands) -> Result<()> {
    match command {
        Commands::Metadata {
            file,
            strategy,
            output,
        } => handle_metadata(&file, strategy, output),
        Commands::Explore {
            file,
            features,
            strategy,
            output,
        } => handle_explore(&file, features, strategy, output),
    }
}

fn handle_metadata(file: &Path, strategy: SplitStrategy, output: Option<PathBuf>) -> Result<()> {
    let df = explorer::load_dataset(file).context("Failed to load dataset")?;

    let Some(metadata) = explorer::infer(&df, strategy)? else {
        bail!("{} has no columns to classify", file.display());
    };

    println!(
        "{}: {} rows, {} features ({} strategy)",
        file.display(),
        df.height(),
        metadata.feature_names.len(),
        strategy
    );
    println!("label values: {}", metadata.label_values.join(", "));
    if metadata.has_predictions {
        println!("predictions: present");
    }
    for name in &metadata.feature_names {
        if let Some(feature) = metadata.feature(name) {
            print_feature(feature);
        }
    }
    println!(
        "splittable: {}",
        metadata.selectable_features().join(", ")
    );

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&metadata)?;
        std::fs::write(&path, json).context("Failed to write metadata")?;
        println!("Metadata written to {}", path.display());
    }
    Ok(())
}

fn print_feature(feature: &Feature) {
    match feature.kind {
        FeatureKind::Quantitative => {
            let (min, max) = feature.extent.unwrap_or_default();
            println!(
                "  {} [Q] extent {min}..{max}, thresholds {:?}",
                feature.name, feature.thresholds
            );
        }
        FeatureKind::Categorical => {
            println!("  {} [C] {}", feature.name, feature.values.join(", "));
        }
        FeatureKind::Temporal => {
            println!("  {} [T] (not splittable)", feature.name);
        }
    }
}

fn handle_explore(
    file: &Path,
    features: Vec<String>,
    strategy: SplitStrategy,
    output: Option<PathBuf>,
) -> Result<()> {
    let df = explorer::load_dataset(file).context("Failed to load dataset")?;

    let mut session = Explorer::new(df, strategy)?;
    session.select_features(features)?;

    let (Some(metadata), Some(tree)) = (session.metadata(), session.tree()) else {
        bail!("{} has no columns to partition", file.display());
    };

    println!(
        "{}: {} rows split by [{}]",
        file.display(),
        tree.row_count(),
        session.selected_features().join(", ")
    );
    print_tree(tree, 0);

    if let Some(path) = output {
        let snapshot = Snapshot::new(
            file,
            session.strategy(),
            session.selected_features(),
            metadata,
            tree,
        );
        explorer::save_snapshot(&snapshot, &path)?;
        println!("Snapshot written to {}", path.display());
    }
    Ok(())
}

fn print_tree(node: &PartitionNode, depth: usize) {
    let indent = "  ".repeat(depth);
    let counts = node
        .counts
        .iter()
        .map(|(label, count)| format!("{label}: {count}"))
        .collect::<Vec<_>>()
        .join(", ");

    if depth == 0 {
        println!("{indent}(root) {} rows [{counts}]", node.row_count());
    } else {
        println!(
            "{indent}{} = {} ({} rows) [{counts}]",
            node.split_feature,
            node.split_label,
            node.row_count()
        );
    }

    if let Some(children) = node.children() {
        for child in children {
            print_tree(child, depth + 1);
        }
    }
}
