//! Human- and machine-readable run reports
//!
//! `MiningReport` flattens a `MiningOutcome` into resolved strings and
//! plain numbers: serialize it for downstream tooling or render the
//! banner text with `to_report`.

use crate::config::MinerConfig;
use crate::mine::{required_count, MiningOutcome};
use crate::rules::Metric;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Report of one finished mining run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MiningReport {
    pub relation: String,
    pub num_records: usize,
    pub fingerprint: String,
    /// Columns dropped by all-missing removal
    pub removed_columns: Vec<String>,
    /// Support threshold of the final cycle
    pub min_support: f64,
    /// The same threshold as an absolute record count
    pub min_support_count: usize,
    pub min_metric: f64,
    pub metric: Metric,
    /// Requested rule target; `None` means unbounded
    pub requested_rules: Option<usize>,
    pub cycles: usize,
    pub exhausted: bool,
    pub levels: Vec<LevelSummary>,
    pub rules: Vec<RuleSummary>,
}

/// One lattice level of the final cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LevelSummary {
    /// Antecedent size at this level
    pub size: usize,
    /// Number of frequent labeled itemsets
    pub count: usize,
    /// Per-itemset detail, present when the config asks for it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_sets: Option<Vec<ItemSetSummary>>,
}

/// One frequent labeled itemset, fully resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ItemSetSummary {
    pub items: String,
    pub consequent: String,
    /// Records matching the items alone
    pub support: usize,
    /// Records matching items and class together
    pub class_support: usize,
}

/// One ranked rule, fully resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RuleSummary {
    pub antecedent: String,
    pub antecedent_support: usize,
    pub consequent: String,
    pub support: usize,
    pub confidence: f64,
    pub lift: f64,
    pub leverage: f64,
    pub conviction: f64,
}

impl MiningReport {
    /// Resolve an outcome against the config that produced it
    pub fn from_outcome(outcome: &MiningOutcome, config: &MinerConfig) -> Self {
        let schema = &outcome.schema;
        let levels = outcome
            .levels
            .iter()
            .map(|level| LevelSummary {
                size: level.size,
                count: level.sets.len(),
                item_sets: config.output_item_sets.then(|| {
                    level
                        .sets
                        .iter()
                        .map(|set| ItemSetSummary {
                            items: schema.describe_item_set(&set.antecedent),
                            consequent: format!(
                                "{}={}",
                                schema.class_name,
                                schema.class_label(set.label)
                            ),
                            support: set.antecedent.support,
                            class_support: set.class_support,
                        })
                        .collect()
                }),
            })
            .collect();
        let rules = outcome
            .rules
            .iter()
            .map(|rule| RuleSummary {
                antecedent: schema.describe_item_set(&rule.antecedent),
                antecedent_support: rule.antecedent.support,
                consequent: format!(
                    "{}={}",
                    schema.class_name,
                    schema.class_label(rule.class_value)
                ),
                support: rule.support,
                confidence: rule.confidence,
                lift: rule.lift,
                leverage: rule.leverage,
                conviction: rule.conviction,
            })
            .collect();

        MiningReport {
            relation: schema.relation.clone(),
            num_records: schema.num_records,
            fingerprint: schema.fingerprint.clone(),
            removed_columns: schema.removed_columns.clone(),
            min_support: outcome.min_support,
            min_support_count: required_count(outcome.min_support, schema.num_records),
            min_metric: config.min_metric,
            metric: config.metric_type,
            requested_rules: config.num_rules,
            cycles: outcome.cycles,
            exhausted: outcome.exhausted,
            levels,
            rules,
        }
    }

    /// Format as human-readable report
    pub fn to_report(&self) -> String {
        let mut out = String::new();

        out.push_str("CLASS ASSOCIATION RULES\n");
        out.push_str("═══════════════════════════════════════════════════════════════\n\n");

        out.push_str(&format!("Relation: {}\n", self.relation));
        out.push_str(&format!("Instances: {}\n", self.num_records));
        out.push_str(&format!("Fingerprint: {}\n", self.fingerprint));
        if !self.removed_columns.is_empty() {
            out.push_str(&format!(
                "Removed columns: {}\n",
                self.removed_columns.join(", ")
            ));
        }
        out.push('\n');

        out.push_str(&format!(
            "Minimum support: {:.2} ({} instances)\n",
            self.min_support, self.min_support_count
        ));
        out.push_str(&format!(
            "Minimum metric <{}>: {:.2}\n",
            self.metric, self.min_metric
        ));
        out.push_str(&format!("Number of cycles performed: {}\n", self.cycles));
        if self.exhausted {
            out.push_str("Lower support bound reached before the rule target\n");
        }
        out.push('\n');

        out.push_str("Generated sets of large itemsets:\n");
        for level in &self.levels {
            out.push_str(&format!(
                "\nSize of set of large itemsets L({}): {}\n",
                level.size, level.count
            ));
            if let Some(sets) = &level.item_sets {
                for set in sets {
                    out.push_str(&format!(
                        "  {} {} ==> {} {}\n",
                        set.items, set.support, set.consequent, set.class_support
                    ));
                }
            }
        }
        out.push('\n');

        out.push_str("Best rules found:\n\n");
        for (position, rule) in self.rules.iter().enumerate() {
            out.push_str(&format!(
                " {:2}. {} {} ==> {} {}    conf:({:.2}) lift:({:.2}) lev:({:.2}) conv:({:.2})\n",
                position + 1,
                rule.antecedent,
                rule.antecedent_support,
                rule.consequent,
                rule.support,
                rule.confidence,
                rule.lift,
                rule.leverage,
                rule.conviction
            ));
        }

        out
    }
}
