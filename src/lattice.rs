//! Level-wise itemset lattice construction
//!
//! Builds the frequent labeled itemsets one antecedent size at a
//! time: generate singletons, count, filter, then repeatedly join,
//! prune, recount, and filter until a level comes up empty. Frequency
//! is judged on the labeled support (antecedent and class together),
//! so the same antecedent can survive under one label and fall under
//! another.
//!
//! Levels stay in generation order: columns ascending, values
//! ascending within a column, class labels ascending within a value.
//! The join relies on that order to stop scanning partners early, and
//! the ranker relies on it as the final tie-break.

use crate::dataset::{ClassView, FeatureView};
use crate::itemset::{Item, ItemSet, LabeledItemSet, Level};
use rayon::prelude::*;
use std::collections::HashSet;

/// Row count below which counting stays on one thread
const PARALLEL_ROW_THRESHOLD: usize = 512;

/// Run the full level-wise search for one support window
///
/// `min_count` and `max_count` are absolute record counts applied to
/// the labeled support of every candidate.
pub fn find_frequent_sets(
    features: &FeatureView<'_>,
    classes: &ClassView<'_>,
    min_count: usize,
    max_count: usize,
) -> Vec<Level> {
    let mut levels = Vec::new();
    let mut current = singletons(features, classes);
    update_counters(&mut current, features, classes);
    current = filter_by_support(current, min_count, max_count);

    let mut size = 1;
    while !current.is_empty() {
        let candidates = merge_level(&current, size - 1);
        let mut next = prune_candidates(candidates, &current);
        levels.push(Level {
            size,
            sets: current,
        });
        update_counters(&mut next, features, classes);
        current = filter_by_support(next, min_count, max_count);
        size += 1;
    }
    levels
}

/// One candidate per (feature, value, class label) triple
pub fn singletons(features: &FeatureView<'_>, classes: &ClassView<'_>) -> Vec<LabeledItemSet> {
    let mut sets = Vec::new();
    for column in 0..features.num_columns() {
        for value in 0..features.num_values(column) {
            for label in 0..classes.num_labels() {
                sets.push(LabeledItemSet::new(
                    ItemSet::singleton(Item::new(column, value as u32)),
                    label as u32,
                ));
            }
        }
    }
    sets
}

/// Join same-label sets sharing all but their last item
///
/// `prefix_len` is the shared-prefix length, one less than the size
/// of the incoming sets. Because each label's subsequence is in
/// lexicographic order, scanning for partners stops at the first
/// same-label set whose prefix no longer matches. Two sets whose last
/// items occupy the same column never merge: a record cannot hold two
/// values in one column.
pub fn merge_level(sets: &[LabeledItemSet], prefix_len: usize) -> Vec<LabeledItemSet> {
    let mut merged = Vec::new();
    for (position, first) in sets.iter().enumerate() {
        for second in &sets[position + 1..] {
            if second.label != first.label {
                continue;
            }
            let a = first.antecedent.items();
            let b = second.antecedent.items();
            if a[..prefix_len] != b[..prefix_len] {
                break;
            }
            if a[prefix_len].column == b[prefix_len].column {
                continue;
            }
            let mut items = a.to_vec();
            items.push(b[prefix_len]);
            merged.push(LabeledItemSet::new(ItemSet::new(items), first.label));
        }
    }
    merged
}

/// Drop candidates with an infrequent immediate sub-itemset
///
/// A candidate survives only if leaving out any single item yields a
/// set present in the previous level under the same label.
pub fn prune_candidates(
    candidates: Vec<LabeledItemSet>,
    previous: &[LabeledItemSet],
) -> Vec<LabeledItemSet> {
    let index: HashSet<(&[Item], u32)> = previous
        .iter()
        .map(|set| (set.antecedent.items(), set.label))
        .collect();
    candidates
        .into_iter()
        .filter(|candidate| {
            (0..candidate.antecedent.len()).all(|skip| {
                let subset = candidate.antecedent.without(skip);
                index.contains(&(subset.as_slice(), candidate.label))
            })
        })
        .collect()
}

/// Count support and labeled support with one pass over the records
pub fn update_counters(
    sets: &mut [LabeledItemSet],
    features: &FeatureView<'_>,
    classes: &ClassView<'_>,
) {
    if features.num_records() < PARALLEL_ROW_THRESHOLD {
        update_counters_sequential(sets, features, classes);
        return;
    }
    let totals = count_matches_parallel(sets, features, classes);
    for (set, (support, class_support)) in sets.iter_mut().zip(totals) {
        set.antecedent.support += support;
        set.class_support += class_support;
    }
}

fn update_counters_sequential(
    sets: &mut [LabeledItemSet],
    features: &FeatureView<'_>,
    classes: &ClassView<'_>,
) {
    for row in 0..features.num_records() {
        for set in sets.iter_mut() {
            if features.matches(row, set.antecedent.items()) {
                set.antecedent.support += 1;
                if classes.label_at(row) == Some(set.label) {
                    set.class_support += 1;
                }
            }
        }
    }
}

/// Shard the rows, count per shard, and merge by elementwise sum
fn count_matches_parallel(
    sets: &[LabeledItemSet],
    features: &FeatureView<'_>,
    classes: &ClassView<'_>,
) -> Vec<(usize, usize)> {
    (0..features.num_records())
        .into_par_iter()
        .fold(
            || vec![(0usize, 0usize); sets.len()],
            |mut acc, row| {
                for (slot, set) in acc.iter_mut().zip(sets) {
                    if features.matches(row, set.antecedent.items()) {
                        slot.0 += 1;
                        if classes.label_at(row) == Some(set.label) {
                            slot.1 += 1;
                        }
                    }
                }
                acc
            },
        )
        .reduce(
            || vec![(0usize, 0usize); sets.len()],
            |mut left, right| {
                for (a, b) in left.iter_mut().zip(right) {
                    a.0 += b.0;
                    a.1 += b.1;
                }
                left
            },
        )
}

/// Keep sets whose labeled support lies in `[min_count, max_count]`
pub fn filter_by_support(
    sets: Vec<LabeledItemSet>,
    min_count: usize,
    max_count: usize,
) -> Vec<LabeledItemSet> {
    sets.into_iter()
        .filter(|set| set.class_support >= min_count && set.class_support <= max_count)
        .collect()
}
