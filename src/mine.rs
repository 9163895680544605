//! Adaptive minimum-support search
//!
//! One mining run walks a small state machine. Starting from the
//! upper support bound (or straight at the floor when no rule target
//! is set), each cycle mines the full lattice, generates and ranks
//! rules, then lowers the support threshold by `delta`. The loop stops
//! as soon as enough rules exist, the floor is passed, or the absolute
//! support requirement falls below one record. Every cycle mines from
//! scratch, so the final cycle alone determines the outcome.
//!
//! The reported `min_support` is the threshold the last cycle actually
//! mined at, captured before the loop steps past it.

use crate::config::MinerConfig;
use crate::dataset::{ClassView, Dataset, FeatureView};
use crate::error::Result;
use crate::itemset::{Item, ItemSet, Level};
use crate::lattice::find_frequent_sets;
use crate::rank::rank_rules;
use crate::rules::{generate_rules, Rule};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Comparison slack for the lower-bound check
const SMALL: f64 = 1e-6;

/// Mine class association rules from a dataset
///
/// Convenience wrapper over [`Miner`].
pub fn mine(dataset: &Dataset, config: &MinerConfig) -> Result<MiningOutcome> {
    Miner::with_config(config.clone()).mine(dataset)
}

/// Class association rule miner
#[derive(Debug, Clone, Default)]
pub struct Miner {
    config: MinerConfig,
}

impl Miner {
    /// Miner with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Miner with an explicit configuration
    pub fn with_config(config: MinerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MinerConfig {
        &self.config
    }

    /// Run the full adaptive search
    ///
    /// Validates the configuration, resolves the class column, applies
    /// the optional all-missing column removal, then loops over mining
    /// cycles until one of the three stopping conditions holds.
    pub fn mine(&self, dataset: &Dataset) -> Result<MiningOutcome> {
        self.config.validate()?;
        let class_index = self.config.class_column.resolve(dataset.num_columns())?;
        let (working, removed_columns, class_index) = if self.config.remove_missing_columns {
            let (reduced, removed, remapped) = dataset.remove_all_missing_columns(class_index)?;
            (Cow::Owned(reduced), removed, remapped)
        } else {
            (Cow::Borrowed(dataset), Vec::new(), class_index)
        };
        let (features, classes) = working.class_split(class_index)?;
        let schema = MiningSchema::capture(&working, &features, &classes, removed_columns);
        let class_counts = classes.label_counts();
        let num_records = working.num_records();

        let mut state = SearchState::new(&self.config, num_records);
        let mut levels;
        let mut ranked;
        loop {
            let min_count = required_count(state.min_support, num_records);
            levels = find_frequent_sets(&features, &classes, min_count, state.max_count);
            let rules = generate_rules(&levels, self.config.min_metric, &class_counts, num_records);
            ranked = rank_rules(rules, self.config.metric_type, self.config.num_rules);
            state.cycles += 1;

            state.advance();
            if !state.should_continue(ranked.len(), num_records) {
                break;
            }
        }

        let exhausted = self
            .config
            .num_rules
            .is_some_and(|target| ranked.len() < target);
        Ok(MiningOutcome {
            rules: ranked,
            levels,
            cycles: state.cycles,
            min_support: state.last_used,
            exhausted,
            schema,
        })
    }
}

/// Everything a finished run exposes
///
/// `levels` holds the frequent itemsets of the last cycle only; each
/// cycle mines from scratch, so earlier cycles leave nothing behind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MiningOutcome {
    /// Ranked rules, best first, capped at the configured target
    pub rules: Vec<Rule>,
    /// Frequent itemset levels of the final cycle
    pub levels: Vec<Level>,
    /// Number of mining cycles performed
    pub cycles: usize,
    /// Minimum support of the final cycle
    pub min_support: f64,
    /// True when the search hit its floor before reaching the rule target
    pub exhausted: bool,
    /// Names behind the integer encoding
    pub schema: MiningSchema,
}

/// Snapshot of the mined dataset's shape and vocabulary
///
/// Rules and itemsets store integer codes; the schema carries the
/// names needed to print them, frozen at mining time so reports stay
/// stable even if the dataset moves on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MiningSchema {
    pub relation: String,
    pub feature_names: Vec<String>,
    /// Value labels per feature column, indexed by value code
    pub feature_values: Vec<Vec<String>>,
    pub class_name: String,
    pub class_values: Vec<String>,
    pub num_records: usize,
    /// Content hash of the mined dataset
    pub fingerprint: String,
    /// Columns dropped by all-missing removal, in original order
    pub removed_columns: Vec<String>,
}

impl MiningSchema {
    pub(crate) fn capture(
        dataset: &Dataset,
        features: &FeatureView<'_>,
        classes: &ClassView<'_>,
        removed_columns: Vec<String>,
    ) -> Self {
        let feature_names = (0..features.num_columns())
            .map(|column| features.column_name(column).to_string())
            .collect();
        let feature_values = (0..features.num_columns())
            .map(|column| features.value_labels(column).to_vec())
            .collect();
        MiningSchema {
            relation: dataset.relation().to_string(),
            feature_names,
            feature_values,
            class_name: classes.name().to_string(),
            class_values: classes.labels().to_vec(),
            num_records: dataset.num_records(),
            fingerprint: dataset.fingerprint(),
            removed_columns,
        }
    }

    /// Render one item as `column=value`
    pub fn describe_item(&self, item: Item) -> String {
        let name = self
            .feature_names
            .get(item.column)
            .map(String::as_str)
            .unwrap_or("?");
        let value = self
            .feature_values
            .get(item.column)
            .and_then(|values| values.get(item.value as usize))
            .map(String::as_str)
            .unwrap_or("?");
        format!("{}={}", name, value)
    }

    /// Render an itemset as space-separated items
    pub fn describe_item_set(&self, set: &ItemSet) -> String {
        set.items()
            .iter()
            .map(|&item| self.describe_item(item))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The class label behind a value code
    pub fn class_label(&self, value: u32) -> &str {
        self.class_values
            .get(value as usize)
            .map(String::as_str)
            .unwrap_or("?")
    }

    /// Render a rule as `antecedent n ==> class=label m`
    ///
    /// `n` is the antecedent match count, `m` the full rule match
    /// count.
    pub fn describe_rule(&self, rule: &Rule) -> String {
        format!(
            "{} {} ==> {}={} {}",
            self.describe_item_set(&rule.antecedent),
            rule.antecedent.support,
            self.class_name,
            self.class_label(rule.class_value),
            rule.support
        )
    }
}

/// Mutable loop state of one run
#[derive(Debug)]
struct SearchState {
    min_support: f64,
    /// Threshold the most recent cycle mined at; `min_support` itself
    /// has already been stepped past it when the loop exits
    last_used: f64,
    effective_lower: f64,
    delta: f64,
    max_count: usize,
    target: Option<usize>,
    cycles: usize,
}

impl SearchState {
    fn new(config: &MinerConfig, num_records: usize) -> Self {
        let effective_lower = effective_lower_bound(config.lower_bound_min_support, num_records);
        let min_support = match config.num_rules {
            None => effective_lower,
            Some(_) => (config.upper_bound_min_support - config.delta).max(effective_lower),
        };
        SearchState {
            min_support,
            last_used: min_support,
            effective_lower,
            delta: config.delta,
            max_count: required_count(config.upper_bound_min_support, num_records),
            target: config.num_rules,
            cycles: 0,
        }
    }

    /// Lower the threshold for the next cycle
    ///
    /// Records the threshold the cycle just mined in `last_used`,
    /// then steps down by `delta`, except when that would cross the
    /// floor from above: then it lands exactly on the floor so one
    /// last cycle runs there. A threshold already at the floor steps
    /// below it, which is what ends the loop.
    fn advance(&mut self) {
        self.last_used = self.min_support;
        if self.min_support == self.effective_lower
            || self.min_support - self.delta > self.effective_lower
        {
            self.min_support -= self.delta;
        } else {
            self.min_support = self.effective_lower;
        }
    }

    /// Whether another cycle should run at the updated threshold
    fn should_continue(&self, ranked_len: usize, num_records: usize) -> bool {
        let satisfied = self.target.is_some_and(|target| ranked_len >= target);
        !satisfied
            && ge_within_tolerance(self.min_support, self.effective_lower)
            && loop_support_count(self.min_support, num_records) >= 1
    }
}

/// Absolute record count for a support fraction
///
/// Exact integer products are used as-is; fractional products round
/// up, so "at least this fraction" stays strict.
pub(crate) fn required_count(fraction: f64, num_records: usize) -> usize {
    let raw = fraction * num_records as f64;
    if raw.fract() == 0.0 {
        raw as usize
    } else {
        (raw + 0.5).round() as usize
    }
}

/// The loop-termination form of the support count
///
/// Truncates instead of rounding up; kept separate from
/// [`required_count`] because the two disagree on half-integer
/// products and the loop guard depends on this one.
pub(crate) fn loop_support_count(min_support: f64, num_records: usize) -> i64 {
    (min_support * num_records as f64 + 0.5) as i64
}

/// `a >= b` up to the comparison slack
pub(crate) fn ge_within_tolerance(a: f64, b: f64) -> bool {
    b - a < SMALL
}

/// Floor raised so a cycle always demands at least one record
fn effective_lower_bound(lower: f64, num_records: usize) -> f64 {
    if num_records > 0 && lower * (num_records as f64) < 1.0 {
        1.0 / num_records as f64
    } else {
        lower
    }
}
