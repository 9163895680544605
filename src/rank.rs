//! Stable two-pass rule ranking
//!
//! Rules are ordered by metric value descending, ties broken by
//! support descending, remaining ties by discovery order. The order
//! falls out of two stable sorts read back to front: first by support,
//! then by metric, with a full reversal after each pass so that the
//! earlier key survives as the tie-break of the later one.

use crate::rules::{Metric, Rule};
use ordered_float::OrderedFloat;
use std::cmp::Reverse;

/// Order rules best-first and keep at most `cap` of them
///
/// `None` keeps every rule.
pub fn rank_rules(mut rules: Vec<Rule>, metric: Metric, cap: Option<usize>) -> Vec<Rule> {
    rules.sort_by_key(|rule| Reverse(rule.support));
    rules.reverse();
    rules.sort_by_key(|rule| OrderedFloat(rule.metric_value(metric)));
    rules.reverse();
    if let Some(limit) = cap {
        rules.truncate(limit);
    }
    rules
}
