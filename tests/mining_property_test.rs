//! Property-based tests for the mining pipeline
//!
//! Uses proptest to generate random datasets and rule lists and
//! verify the invariants the miner promises.

use carmine::{mine, rank_rules, Dataset, Item, ItemSet, Metric, MinerConfig, Rule};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_rule_metrics_are_consistent(dataset in any_dataset()) {
        let outcome = mine(&dataset, &MinerConfig::default()).unwrap();
        for rule in &outcome.rules {
            // confidence is a fraction of the antecedent's matches
            prop_assert!(rule.support <= rule.antecedent.support);
            prop_assert!(rule.confidence >= 0.0);
            prop_assert!(rule.confidence <= 1.0);
            prop_assert!(rule.support >= 1);
            let expected = rule.support as f64 / rule.antecedent.support as f64;
            prop_assert_eq!(rule.confidence, expected);
        }
    }

    #[test]
    fn test_levels_are_anti_monotonic(dataset in any_dataset()) {
        let outcome = mine(&dataset, &MinerConfig::default()).unwrap();
        for window in outcome.levels.windows(2) {
            let (previous, current) = (&window[0], &window[1]);
            for set in &current.sets {
                for skip in 0..set.antecedent.len() {
                    let subset = set.antecedent.without(skip);
                    let prior = previous.sets.iter().find(|prior| {
                        prior.label == set.label && prior.antecedent.items() == subset.as_slice()
                    });
                    match prior {
                        Some(prior) => {
                            // a sub-pattern can only match more records
                            prop_assert!(prior.antecedent.support >= set.antecedent.support);
                            prop_assert!(prior.class_support >= set.class_support);
                        }
                        None => prop_assert!(false, "missing sub-itemset in level {}", previous.size),
                    }
                }
            }
        }
    }

    #[test]
    fn test_counts_match_a_full_rescan(dataset in any_dataset()) {
        let outcome = mine(&dataset, &MinerConfig::default()).unwrap();
        let class_index = dataset.num_columns() - 1;
        let (features, classes) = dataset.class_split(class_index).unwrap();
        for level in &outcome.levels {
            for set in &level.sets {
                let mut support = 0;
                let mut class_support = 0;
                for row in 0..features.num_records() {
                    if features.matches(row, set.antecedent.items()) {
                        support += 1;
                        if classes.label_at(row) == Some(set.label) {
                            class_support += 1;
                        }
                    }
                }
                prop_assert_eq!(set.antecedent.support, support);
                prop_assert_eq!(set.class_support, class_support);
            }
        }
    }

    #[test]
    fn test_rule_target_caps_the_output(dataset in any_dataset(), target in 0usize..8) {
        let config = MinerConfig {
            num_rules: Some(target),
            ..MinerConfig::default()
        };
        let outcome = mine(&dataset, &config).unwrap();
        prop_assert!(outcome.rules.len() <= target);
        prop_assert!(outcome.exhausted == (outcome.rules.len() < target));
    }

    #[test]
    fn test_reported_support_respects_the_floor(dataset in any_dataset()) {
        let config = MinerConfig::default();
        let outcome = mine(&dataset, &config).unwrap();
        let records = dataset.num_records();
        let effective_lower = if records > 0
            && config.lower_bound_min_support * (records as f64) < 1.0
        {
            1.0 / records as f64
        } else {
            config.lower_bound_min_support
        };
        prop_assert!(outcome.min_support >= effective_lower - 1e-6);
        prop_assert!(outcome.cycles >= 1);
    }

    #[test]
    fn test_mining_twice_gives_the_same_outcome(dataset in any_dataset()) {
        let config = MinerConfig {
            num_rules: Some(5),
            ..MinerConfig::default()
        };
        let first = mine(&dataset, &config).unwrap();
        let second = mine(&dataset, &config).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_ranking_matches_a_stable_reference_sort(rules in any_rules()) {
        let mut expected = rules.clone();
        expected.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap()
                .then(b.support.cmp(&a.support))
        });
        let ranked = rank_rules(rules, Metric::Confidence, None);
        prop_assert_eq!(ranked, expected);
    }

    #[test]
    fn test_ranking_cap_is_a_prefix(rules in any_rules(), cap in 0usize..25) {
        let full = rank_rules(rules.clone(), Metric::Confidence, None);
        let capped = rank_rules(rules, Metric::Confidence, Some(cap));
        let expected = &full[..cap.min(full.len())];
        prop_assert_eq!(capped.as_slice(), expected);
    }
}

/// Random categorical datasets: up to 3 feature columns, up to 30
/// records, value codes with occasional missing cells, 2 or 3 class
/// labels with occasional missing class values.
fn any_dataset() -> impl Strategy<Value = Dataset> {
    (1usize..=3, 1usize..=30)
        .prop_flat_map(|(columns, rows)| {
            prop::collection::vec(prop::collection::vec(0u8..4, columns + 1), rows)
        })
        .prop_map(|rows| {
            let columns = rows[0].len() - 1;
            let mut dataset = Dataset::new("generated");
            for index in 0..columns {
                dataset.add_column(&format!("f{}", index));
            }
            dataset.add_column("class");
            for row in &rows {
                let mut values = Vec::with_capacity(row.len());
                for (position, &code) in row.iter().enumerate() {
                    let text = if code == 3 {
                        "?".to_string()
                    } else if position == columns {
                        format!("c{}", code)
                    } else {
                        format!("v{}", code)
                    };
                    values.push(text);
                }
                let record: Vec<&str> = values.iter().map(String::as_str).collect();
                dataset.push(&record).unwrap();
            }
            dataset
        })
}

/// Rule lists with clustered supports and confidences, so ties are
/// common and the tie-breaking order actually gets exercised.
fn any_rules() -> impl Strategy<Value = Vec<Rule>> {
    prop::collection::vec((0usize..6, 0u8..5), 0..20).prop_map(|pairs| {
        pairs
            .into_iter()
            .enumerate()
            .map(|(position, (support, conf_quarter))| {
                let mut antecedent = ItemSet::singleton(Item::new(position, 0));
                antecedent.support = support.max(1);
                Rule {
                    antecedent,
                    class_value: position as u32,
                    support,
                    confidence: f64::from(conf_quarter) / 4.0,
                    lift: 1.0,
                    leverage: 0.0,
                    conviction: 1.0,
                }
            })
            .collect()
    })
}
