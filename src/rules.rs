//! Rule generation and interestingness metrics
//!
//! Every frequent labeled itemset yields at most one candidate rule:
//! the whole antecedent on the left, its class label on the right.
//! Candidates below the minimum confidence are dropped; the survivors
//! keep their discovery order so the ranker can use it as the final
//! tie-break.

use crate::itemset::{ItemSet, LabeledItemSet, Level};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ranking metric for mined rules
///
/// Class association rule search is driven by confidence; the other
/// metrics are computed on every rule for reporting but cannot steer
/// the search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[default]
    Confidence,
    Lift,
    Leverage,
    Conviction,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Metric::Confidence => "confidence",
            Metric::Lift => "lift",
            Metric::Leverage => "leverage",
            Metric::Conviction => "conviction",
        };
        write!(f, "{name}")
    }
}

/// A class association rule with its four metrics
///
/// `support` is the number of records matching both the antecedent
/// and the class value; the antecedent's own match count lives in
/// `antecedent.support`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Rule {
    pub antecedent: ItemSet,
    pub class_value: u32,
    pub support: usize,
    pub confidence: f64,
    pub lift: f64,
    pub leverage: f64,
    pub conviction: f64,
}

impl Rule {
    /// Build the candidate rule for one labeled itemset
    ///
    /// Returns `None` when the antecedent matches no records, since
    /// no metric is defined there.
    pub fn from_labeled(
        set: &LabeledItemSet,
        class_counts: &[usize],
        num_records: usize,
    ) -> Option<Rule> {
        if set.antecedent.support == 0 {
            return None;
        }
        let n = num_records as f64;
        let premise = set.antecedent.support as f64;
        let rule_support = set.class_support as f64;
        let class_count = class_counts.get(set.label as usize).copied().unwrap_or(0);

        let confidence = rule_support / premise;
        let lift = if class_count == 0 {
            0.0
        } else {
            confidence / (class_count as f64 / n)
        };
        let leverage = rule_support / n - (premise / n) * (class_count as f64 / n);
        // premise - rule_support + 1 is at least one, so this never divides by zero
        let conviction =
            premise * (n - class_count as f64) / (n * (premise - rule_support + 1.0));

        Some(Rule {
            antecedent: set.antecedent.clone(),
            class_value: set.label,
            support: set.class_support,
            confidence,
            lift,
            leverage,
            conviction,
        })
    }

    /// The value this rule scores under the given metric
    pub fn metric_value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Confidence => self.confidence,
            Metric::Lift => self.lift,
            Metric::Leverage => self.leverage,
            Metric::Conviction => self.conviction,
        }
    }
}

/// Turn every frequent labeled itemset into a rule and gate on confidence
///
/// Output order follows the lattice: level by level, generation order
/// within a level.
pub fn generate_rules(
    levels: &[Level],
    min_confidence: f64,
    class_counts: &[usize],
    num_records: usize,
) -> Vec<Rule> {
    let mut rules = Vec::new();
    for level in levels {
        for set in &level.sets {
            if let Some(rule) = Rule::from_labeled(set, class_counts, num_records) {
                if rule.confidence >= min_confidence {
                    rules.push(rule);
                }
            }
        }
    }
    rules
}
