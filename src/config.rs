//! Miner configuration
//!
//! Handles loading `MinerConfig` from YAML or JSON, the defaults for
//! every knob, and the fail-fast validation that keeps the adaptive
//! support loop well-founded.

use crate::error::{Error, Result};
use crate::rules::Metric;
use schemars::JsonSchema;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::Path;

/// Which column carries the class labels
///
/// Config files spell it as the plain string `first` or `last`, or as
/// the map form `index: N` with a zero-based index. YAML and JSON
/// accept the same shapes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, JsonSchema)]
#[schemars(rename_all = "lowercase")]
pub enum ClassColumn {
    First,
    #[default]
    Last,
    /// Zero-based column index
    Index(usize),
}

// Hand-written so the YAML form stays `index: N`; the derived enum
// representation would require a `!index` tag there.
impl Serialize for ClassColumn {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ClassColumn::First => serializer.serialize_str("first"),
            ClassColumn::Last => serializer.serialize_str("last"),
            ClassColumn::Index(index) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("index", index)?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for ClassColumn {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ClassColumnVisitor;

        impl<'de> Visitor<'de> for ClassColumnVisitor {
            type Value = ClassColumn;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("\"first\", \"last\", or a map with an `index` key")
            }

            fn visit_str<E>(self, value: &str) -> std::result::Result<ClassColumn, E>
            where
                E: de::Error,
            {
                match value {
                    "first" => Ok(ClassColumn::First),
                    "last" => Ok(ClassColumn::Last),
                    other => Err(E::unknown_variant(other, &["first", "last", "index"])),
                }
            }

            fn visit_map<M>(self, mut map: M) -> std::result::Result<ClassColumn, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut index = None;
                while let Some(key) = map.next_key::<String>()? {
                    if key != "index" {
                        return Err(de::Error::unknown_field(&key, &["index"]));
                    }
                    if index.is_some() {
                        return Err(de::Error::duplicate_field("index"));
                    }
                    index = Some(map.next_value()?);
                }
                index
                    .map(ClassColumn::Index)
                    .ok_or_else(|| de::Error::missing_field("index"))
            }
        }

        deserializer.deserialize_any(ClassColumnVisitor)
    }
}

impl ClassColumn {
    /// Resolve to a concrete column index
    pub fn resolve(self, num_columns: usize) -> Result<usize> {
        if num_columns == 0 {
            return Err(Error::Config("dataset has no columns".to_string()));
        }
        let index = match self {
            ClassColumn::First => 0,
            ClassColumn::Last => num_columns - 1,
            ClassColumn::Index(index) => index,
        };
        if index >= num_columns {
            return Err(Error::Config(format!(
                "class column index {} out of range for {} columns",
                index, num_columns
            )));
        }
        Ok(index)
    }
}

/// Full configuration for a mining run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MinerConfig {
    /// Target number of ranked rules; `None` keeps every qualifying rule
    #[serde(default)]
    pub num_rules: Option<usize>,

    /// Minimum metric value a rule must reach
    #[serde(default = "default_min_metric")]
    pub min_metric: f64,

    /// Ranking metric (only `confidence` can drive the search)
    #[serde(default)]
    pub metric_type: Metric,

    /// Amount the support threshold drops between cycles
    #[serde(default = "default_delta")]
    pub delta: f64,

    /// Floor for the adaptive minimum support
    #[serde(default = "default_lower_bound")]
    pub lower_bound_min_support: f64,

    /// Ceiling for support and starting point of the descent
    #[serde(default = "default_upper_bound")]
    pub upper_bound_min_support: f64,

    /// Drop feature columns consisting entirely of missing values
    #[serde(default)]
    pub remove_missing_columns: bool,

    /// Carry per-level itemset detail into the report
    #[serde(default)]
    pub output_item_sets: bool,

    /// Which column holds the class labels
    #[serde(default)]
    pub class_column: ClassColumn,
}

fn default_min_metric() -> f64 {
    0.5
}

fn default_delta() -> f64 {
    0.05
}

fn default_lower_bound() -> f64 {
    0.01
}

fn default_upper_bound() -> f64 {
    1.0
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            num_rules: None,
            min_metric: default_min_metric(),
            metric_type: Metric::Confidence,
            delta: default_delta(),
            lower_bound_min_support: default_lower_bound(),
            upper_bound_min_support: default_upper_bound(),
            remove_missing_columns: false,
            output_item_sets: false,
            class_column: ClassColumn::Last,
        }
    }
}

impl MinerConfig {
    /// Parse a config from YAML text
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: MinerConfig = serde_norway::from_str(text)?;
        Ok(config)
    }

    /// Parse a config from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        let config: MinerConfig = serde_json::from_str(text)?;
        Ok(config)
    }

    /// Render the config as YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_norway::to_string(self)?)
    }

    /// Load a config file, dispatching on the file extension
    ///
    /// `.json` parses as JSON, everything else as YAML.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&content),
            _ => Self::from_yaml(&content),
        }
    }

    /// Reject configurations the search loop cannot run on
    ///
    /// The comparisons are written so that a NaN in any bound fails
    /// rather than slipping past an inverted check.
    pub fn validate(&self) -> Result<()> {
        if !(self.delta > 0.0) {
            return Err(Error::Config(format!(
                "delta must be positive, got {}",
                self.delta
            )));
        }
        if !(self.lower_bound_min_support >= 0.0) {
            return Err(Error::Config(format!(
                "lower bound for minimum support must not be negative, got {}",
                self.lower_bound_min_support
            )));
        }
        if !(self.lower_bound_min_support <= self.upper_bound_min_support) {
            return Err(Error::Config(format!(
                "lower bound {} exceeds upper bound {}",
                self.lower_bound_min_support, self.upper_bound_min_support
            )));
        }
        if self.metric_type != Metric::Confidence {
            return Err(Error::Config(format!(
                "class association rule mining requires the confidence metric, got {}",
                self.metric_type
            )));
        }
        Ok(())
    }
}
