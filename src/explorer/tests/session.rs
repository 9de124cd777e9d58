use crate::explorer::Explorer;
use crate::explorer::types::{FeatureKind, SplitStrategy};
use anyhow::Result;
use polars::prelude::*;

fn colours_df() -> Result<DataFrame> {
    Ok(df! {
        "label" => &["x", "y", "x", "y", "x", "y", "x", "y", "x", "y"],
        "color" => &["red", "blue", "green", "red", "blue", "green", "red", "blue", "green", "red"],
        "score" => &[1i64, 2, 3, 4, 5, 6, 7, 8, 9, 100],
    }?)
}

#[test]
fn test_new_session_derives_metadata_and_tree() -> Result<()> {
    let session = Explorer::new(colours_df()?, SplitStrategy::Quantile)?;

    let metadata = session.metadata().expect("metadata derived on creation");
    assert_eq!(metadata.feature_names, vec!["color", "score"]);

    let tree = session.tree().expect("tree derived on creation");
    assert!(tree.is_leaf());
    assert_eq!(tree.leaf_value(), Some(10));
    Ok(())
}

#[test]
fn test_selection_rebuilds_the_tree() -> Result<()> {
    let mut session = Explorer::new(colours_df()?, SplitStrategy::Quantile)?;

    session.select_features(vec!["color".to_owned()])?;

    let tree = session.tree().expect("tree derived");
    let children = tree.children().expect("color splits the root");
    assert_eq!(children.len(), 3);

    session.select_features(Vec::new())?;
    assert!(session.tree().expect("tree derived").is_leaf());
    Ok(())
}

#[test]
fn test_selection_drops_temporal_and_unknown_features() -> Result<()> {
    let moments = Series::new(
        "moment".into(),
        (0..10i64).map(|i| i * 60_000).collect::<Vec<_>>(),
    )
    .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
    let mut df = colours_df()?;
    df.with_column(moments)?;

    let mut session = Explorer::new(df, SplitStrategy::Quantile)?;
    let metadata = session.metadata().expect("metadata derived");
    assert_eq!(
        metadata.feature("moment").map(|f| f.kind),
        Some(FeatureKind::Temporal)
    );

    session.select_features(vec![
        "color".to_owned(),
        "moment".to_owned(),
        "ghost".to_owned(),
    ])?;

    assert_eq!(session.selected_features().len(), 1);
    assert_eq!(session.selected_features()[0], "color");
    let tree = session.tree().expect("tree derived");
    assert_eq!(tree.children().map(|children| children.len()), Some(3));
    Ok(())
}

#[test]
fn test_strategy_change_moves_thresholds() -> Result<()> {
    let mut session = Explorer::new(colours_df()?, SplitStrategy::Quantile)?;
    session.select_features(vec!["score".to_owned()])?;

    // Quantile cut points of 1..9 plus an outlier sit at 4 and 7.
    let quantile_sizes: Vec<usize> = session
        .tree()
        .expect("tree derived")
        .children()
        .expect("score splits the root")
        .iter()
        .map(|c| c.row_count())
        .collect();
    assert_eq!(quantile_sizes, vec![3, 3, 4]);

    session.set_strategy(SplitStrategy::Interval)?;

    // Interval cut points of [1, 100] are 34 and 67: the outlier isolates.
    let interval_sizes: Vec<usize> = session
        .tree()
        .expect("tree derived")
        .children()
        .expect("score splits the root")
        .iter()
        .map(|c| c.row_count())
        .collect();
    assert_eq!(interval_sizes, vec![9, 0, 1]);

    let metadata = session.metadata().expect("metadata derived");
    let feature = metadata.feature("score").expect("score is a feature");
    assert_eq!(feature.thresholds, vec![34.0, 67.0]);
    Ok(())
}

#[test]
fn test_dataset_change_drops_stale_selection() -> Result<()> {
    let mut session = Explorer::new(colours_df()?, SplitStrategy::Quantile)?;
    session.select_features(vec!["color".to_owned()])?;

    let replacement = df! {
        "label" => &["a", "b", "a"],
        "size" => &[1i64, 2, 3],
    }?;
    session.set_dataset(replacement)?;

    assert!(session.selected_features().is_empty());
    let metadata = session.metadata().expect("metadata derived");
    assert_eq!(metadata.feature_names, vec!["size"]);
    assert!(session.tree().expect("tree derived").is_leaf());
    Ok(())
}
