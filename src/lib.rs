// Production-quality lints
#![warn(
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
// Deny truly dangerous patterns
#![deny(clippy::mem_forget)]
// Allow common patterns in library code
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! # carmine
//!
//! Class association rule mining over categorical tabular data.
//!
//! ## Core Concept
//!
//! carmine discovers rules of the form "if the features match this
//! antecedent, then the class is c", ranked by confidence. Frequent
//! antecedent/class combinations are found by a level-wise itemset
//! search, and the minimum-support threshold is not fixed: the miner
//! starts near the upper support bound and keeps lowering the
//! threshold by `delta` until the requested number of rules exists,
//! the configured floor is reached, or a further cycle could not
//! demand even one record.
//!
//! From one run you get:
//!
//! - **Ranked rules** with confidence, lift, leverage, and conviction
//! - **The frequent itemset levels** of the final cycle
//! - **A schema snapshot** that resolves integer codes back to names
//! - **A report** as banner text or serialized JSON/YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use carmine::{mine, Dataset, MinerConfig, MiningReport};
//!
//! let mut dataset = Dataset::new("weather");
//! dataset.add_column("outlook");
//! dataset.add_column("windy");
//! dataset.add_column("play");
//! dataset.push(&["sunny", "FALSE", "no"])?;
//! dataset.push(&["overcast", "TRUE", "yes"])?;
//! dataset.push(&["rainy", "FALSE", "yes"])?;
//!
//! let config = MinerConfig {
//!     num_rules: Some(10),
//!     min_metric: 0.9,
//!     ..MinerConfig::default()
//! };
//!
//! let outcome = mine(&dataset, &config)?;
//! for rule in &outcome.rules {
//!     println!("{}", outcome.schema.describe_rule(rule));
//! }
//!
//! let report = MiningReport::from_outcome(&outcome, &config);
//! println!("{}", report.to_report());
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                                                            │
//! │  DATASET (categorical columns, one class column)           │
//! │       │                                                    │
//! │       │  per cycle, at the current minimum support:        │
//! │       │                                                    │
//! │       ├──► find_frequent_sets(..) ──► Vec<Level>           │
//! │       │                                                    │
//! │       ├──► generate_rules(..)     ──► Vec<Rule>            │
//! │       │                                                    │
//! │       └──► rank_rules(..)         ──► best rules first     │
//! │                                                            │
//! │  mine() drives the cycles, lowering minimum support by     │
//! │  delta until enough rules exist or the floor is reached,   │
//! │  then reports the outcome of the final cycle.              │
//! │                                                            │
//! └────────────────────────────────────────────────────────────┘
//! ```

// Core modules
pub mod config;
pub mod dataset;
pub mod error;
pub mod itemset;

// Mining pipeline
pub mod lattice;
pub mod mine;
pub mod rank;
pub mod report;
pub mod rules;

// Re-exports
pub use config::{ClassColumn, MinerConfig};
pub use dataset::{ClassView, Dataset, FeatureView, MISSING};
pub use error::{Error, Result};
pub use itemset::{Item, ItemSet, LabeledItemSet, Level};
pub use lattice::find_frequent_sets;
pub use mine::{mine, Miner, MiningOutcome, MiningSchema};
pub use rank::rank_rules;
pub use report::{ItemSetSummary, LevelSummary, MiningReport, RuleSummary};
pub use rules::{generate_rules, Metric, Rule};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
