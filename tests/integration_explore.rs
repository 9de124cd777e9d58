//! Integration tests for the full exploration workflow.
//!
//! These tests run the complete pipeline on fixture files and verify the
//! end-to-end results: load, classify, partition, export.

use canopy::error::CanopyError;
use canopy::explorer::types::{FeatureKind, PartitionNode, SplitStrategy};
use canopy::explorer::{Explorer, Snapshot, build, infer, load_dataset, save_snapshot};
use std::path::{Path, PathBuf};

fn assert_counts_consistent(node: &PartitionNode) {
    match node.children() {
        Some(children) => {
            let child_total: usize = children.iter().map(|c| c.counts.total()).sum();
            assert_eq!(child_total, node.counts.total());
            for child in children {
                assert_counts_consistent(child);
            }
        }
        None => assert_eq!(node.leaf_value(), Some(node.counts.total())),
    }
}

#[test]
fn test_classify_shapes_csv() {
    let df = load_dataset(Path::new("testdata/shapes.csv")).expect("fixture loads");
    assert_eq!(df.height(), 12);

    let metadata = infer(&df, SplitStrategy::Interval)
        .expect("inference succeeds")
        .expect("fixture has columns");

    assert_eq!(metadata.feature_names, vec!["color", "area"]);
    assert_eq!(metadata.label_values, vec!["square", "circle"]);
    assert!(metadata.has_predictions);

    let color = metadata.feature("color").expect("color is a feature");
    assert_eq!(color.kind, FeatureKind::Categorical);
    assert_eq!(color.values, vec!["blue", "green", "red"]);

    let area = metadata.feature("area").expect("area is a feature");
    assert_eq!(area.kind, FeatureKind::Quantitative);
    assert_eq!(area.extent, Some((1.0, 12.0)));
    assert_eq!(area.thresholds.len(), 2);
}

#[test]
fn test_explore_shapes_end_to_end() {
    let df = load_dataset(Path::new("testdata/shapes.csv")).expect("fixture loads");

    let mut session = Explorer::new(df, SplitStrategy::Interval).expect("session builds");
    session
        .select_features(vec!["color".to_owned(), "area".to_owned()])
        .expect("selection resolves");

    let tree = session.tree().expect("tree derived");
    assert_eq!(tree.row_count(), 12);
    assert_eq!(tree.counts.get("square"), Some(&6));
    assert_eq!(tree.counts.get("circle"), Some(&6));
    assert_counts_consistent(tree);

    // First level groups by color, second by area bins.
    let colors = tree.children().expect("color splits the root");
    assert_eq!(colors.len(), 3);
    for color_node in colors {
        assert_eq!(color_node.split_feature, "color");
        let bins = color_node.children().expect("area splits each color");
        assert_eq!(bins.len(), 3);
        assert!(bins.iter().all(PartitionNode::is_leaf));
    }

    // Prediction outcomes survive to every node.
    let results = tree
        .prediction_results
        .as_ref()
        .expect("fixture has predictions");
    let correct: usize = results.iter().map(|(_, outcome)| outcome.correct).sum();
    let incorrect: usize = results.iter().map(|(_, outcome)| outcome.incorrect).sum();
    assert_eq!(correct + incorrect, 12);
    assert_eq!(incorrect, 3);
}

#[test]
fn test_weather_csv_has_no_predictions_and_a_temporal_column() {
    let df = load_dataset(Path::new("testdata/weather.csv")).expect("fixture loads");

    let metadata = infer(&df, SplitStrategy::Quantile)
        .expect("inference succeeds")
        .expect("fixture has columns");

    assert!(!metadata.has_predictions);
    assert_eq!(
        metadata.feature("recorded_at").map(|f| f.kind),
        Some(FeatureKind::Temporal)
    );
    assert_eq!(
        metadata.feature("temperature").map(|f| f.kind),
        Some(FeatureKind::Quantitative)
    );
    assert_eq!(
        metadata.feature("outlook").map(|f| f.kind),
        Some(FeatureKind::Categorical)
    );

    let tree = build(Some(&metadata), &["outlook".to_owned()], &df)
        .expect("build succeeds")
        .expect("metadata present");
    assert!(tree.prediction_counts.is_none());
    assert_counts_consistent(&tree);
}

#[test]
fn test_unsupported_extension_is_an_error() {
    let err = load_dataset(Path::new("testdata/shapes.txt")).expect_err("txt is unsupported");
    assert!(matches!(err, CanopyError::UnsupportedFormat(ext) if ext == "txt"));
}

#[test]
fn test_snapshot_round_trips_through_json() {
    let df = load_dataset(Path::new("testdata/shapes.csv")).expect("fixture loads");

    let mut session = Explorer::new(df, SplitStrategy::Quantile).expect("session builds");
    session
        .select_features(vec!["color".to_owned()])
        .expect("selection resolves");

    let metadata = session.metadata().expect("metadata derived");
    let tree = session.tree().expect("tree derived");
    let snapshot = Snapshot::new(
        Path::new("testdata/shapes.csv"),
        session.strategy(),
        session.selected_features(),
        metadata,
        tree,
    );

    let path: PathBuf = std::env::temp_dir().join("canopy_snapshot_test.json");
    save_snapshot(&snapshot, &path).expect("snapshot writes");

    let json = std::fs::read_to_string(&path).expect("snapshot reads back");
    let value: serde_json::Value = serde_json::from_str(&json).expect("snapshot is valid JSON");

    assert_eq!(value["strategy"], "quantile");
    assert_eq!(value["selected_features"][0], "color");
    assert_eq!(value["metadata"]["label"], "label");
    assert_eq!(value["tree"]["counts"]["square"], 6);
    assert!(value["tree"]["children"].is_array());

    std::fs::remove_file(&path).ok();
}
