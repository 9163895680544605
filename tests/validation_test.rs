//! Tests for configuration and dataset validation
//!
//! Every rejected configuration must fail before any mining cycle
//! runs, and each failure names the offending value.

use carmine::{mine, ClassColumn, Dataset, Error, Metric, MinerConfig};
use rstest::rstest;
use tempfile::TempDir;

// ============================================================================
// Config Validation (Data-Driven)
// ============================================================================

#[rstest]
#[case("zero_delta", "delta")]
#[case("negative_delta", "delta")]
#[case("nan_delta", "delta")]
#[case("inverted_bounds", "exceeds")]
#[case("negative_lower", "negative")]
#[case("lift_metric", "confidence")]
fn test_invalid_configs_are_rejected(#[case] name: &str, #[case] expected_fragment: &str) {
    let config = match name {
        "zero_delta" => MinerConfig {
            delta: 0.0,
            ..MinerConfig::default()
        },
        "negative_delta" => MinerConfig {
            delta: -0.05,
            ..MinerConfig::default()
        },
        "nan_delta" => MinerConfig {
            delta: f64::NAN,
            ..MinerConfig::default()
        },
        "inverted_bounds" => MinerConfig {
            lower_bound_min_support: 0.9,
            upper_bound_min_support: 0.1,
            ..MinerConfig::default()
        },
        "negative_lower" => MinerConfig {
            lower_bound_min_support: -0.2,
            ..MinerConfig::default()
        },
        "lift_metric" => MinerConfig {
            metric_type: Metric::Lift,
            ..MinerConfig::default()
        },
        _ => panic!("Unknown test case: {}", name),
    };

    let err = config.validate().unwrap_err();
    assert!(matches!(err, Error::Config(_)), "{}: wrong error kind", name);
    assert!(
        err.to_string().contains(expected_fragment),
        "{}: message '{}' missing '{}'",
        name,
        err,
        expected_fragment
    );

    // mining with the same config must fail identically, before any cycle
    let mut dataset = Dataset::new("ok");
    dataset.add_column("f");
    dataset.add_column("class");
    dataset.push(&["a", "p"]).unwrap();
    assert!(mine(&dataset, &config).is_err(), "{}: mine accepted it", name);
}

// ============================================================================
// Dataset Rejections
// ============================================================================

fn categorical_rows() -> Dataset {
    let mut dataset = Dataset::new("rows");
    dataset.add_column("f1");
    dataset.add_column("class");
    dataset.push(&["a", "p"]).unwrap();
    dataset.push(&["b", "q"]).unwrap();
    dataset
}

#[test]
fn test_class_index_out_of_range() {
    let config = MinerConfig {
        class_column: ClassColumn::Index(7),
        ..MinerConfig::default()
    };
    let err = mine(&categorical_rows(), &config).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert!(err.to_string().contains("out of range"));
}

#[test]
fn test_dataset_without_columns_is_rejected() {
    let dataset = Dataset::new("empty");
    let err = mine(&dataset, &MinerConfig::default()).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn test_numeric_feature_column_is_rejected() {
    let mut dataset = Dataset::new("mixed");
    dataset.add_column("f1");
    dataset.add_numeric_column("age");
    dataset.add_column("class");
    dataset.push(&["a", "34", "p"]).unwrap();
    dataset.push(&["b", "27", "q"]).unwrap();

    let err = mine(&dataset, &MinerConfig::default()).unwrap_err();
    assert!(matches!(err, Error::DataType(_)));
    assert!(err.to_string().contains("age"));
}

#[test]
fn test_numeric_class_column_is_rejected() {
    let mut dataset = Dataset::new("mixed");
    dataset.add_column("f1");
    dataset.add_numeric_column("score");
    dataset.push(&["a", "1.5"]).unwrap();

    let err = mine(&dataset, &MinerConfig::default()).unwrap_err();
    assert!(matches!(err, Error::DataType(_)));
    assert!(err.to_string().contains("categorical class"));
}

#[test]
fn test_all_missing_class_under_removal_is_rejected() {
    let mut dataset = Dataset::new("gappy");
    dataset.add_column("f1");
    dataset.add_column("class");
    dataset.push(&["a", "?"]).unwrap();
    dataset.push(&["b", "?"]).unwrap();

    let config = MinerConfig {
        remove_missing_columns: true,
        ..MinerConfig::default()
    };
    let err = mine(&dataset, &config).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert!(err.to_string().contains("class"));
}

#[test]
fn test_record_arity_mismatch_is_rejected() {
    let mut dataset = Dataset::new("rows");
    dataset.add_column("f1");
    dataset.add_column("class");
    let err = dataset.push(&["a", "p", "extra"]).unwrap_err();
    assert!(matches!(err, Error::Dataset(_)));
    assert_eq!(dataset.num_records(), 0);
}

// ============================================================================
// Config Loading
// ============================================================================

#[test]
fn test_load_from_path_dispatches_on_extension() {
    let dir = TempDir::new().unwrap();

    let yaml_path = dir.path().join("miner.yaml");
    std::fs::write(&yaml_path, "num_rules: 7\ndelta: 0.1\n").unwrap();
    let yaml = MinerConfig::load_from_path(&yaml_path).unwrap();
    assert_eq!(yaml.num_rules, Some(7));
    assert_eq!(yaml.delta, 0.1);

    let json_path = dir.path().join("miner.json");
    std::fs::write(&json_path, r#"{"num_rules": 7, "delta": 0.1}"#).unwrap();
    let json = MinerConfig::load_from_path(&json_path).unwrap();
    assert_eq!(json, yaml);

    assert!(MinerConfig::load_from_path(&dir.path().join("absent.yaml")).is_err());
}

#[test]
fn test_unknown_yaml_value_is_an_error() {
    assert!(MinerConfig::from_yaml("metric_type: support\n").is_err());
    assert!(MinerConfig::from_yaml("class_column: third\n").is_err());
    assert!(MinerConfig::from_yaml("class_column:\n  position: 2\n").is_err());
}

#[test]
fn test_class_column_yaml_forms() {
    let first = MinerConfig::from_yaml("class_column: first\n").unwrap();
    assert_eq!(first.class_column, ClassColumn::First);

    let last = MinerConfig::from_yaml("class_column: last\n").unwrap();
    assert_eq!(last.class_column, ClassColumn::Last);

    let indexed = MinerConfig::from_yaml("class_column:\n  index: 2\n").unwrap();
    assert_eq!(indexed.class_column, ClassColumn::Index(2));

    // the JSON loader reads the identical map form
    let json = MinerConfig::from_json(r#"{"class_column": {"index": 2}}"#).unwrap();
    assert_eq!(json.class_column, ClassColumn::Index(2));
}
