//! Tabular dataset model and class split views
//!
//! A [`Dataset`] is column-major: each column is either categorical
//! (a growable label domain plus value-index cells) or numeric.
//! Numeric columns exist so that misuse is detectable; the miner
//! itself only accepts categorical data. Missing cells are `None`,
//! written as `?` in the textual form.
//!
//! Mining never touches the dataset directly. It works through a
//! [`FeatureView`] / [`ClassView`] pair produced by
//! [`Dataset::class_split`], which fixes one column as the class and
//! re-indexes the remaining columns as features.

use crate::error::{Error, Result};
use crate::itemset::Item;
use serde::{Deserialize, Serialize};

/// Textual marker for a missing cell
pub const MISSING: &str = "?";

/// Column-major table of categorical records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    relation: String,
    columns: Vec<Column>,
    num_records: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Column {
    name: String,
    data: ColumnData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum ColumnData {
    Categorical {
        labels: Vec<String>,
        cells: Vec<Option<u32>>,
    },
    Numeric {
        cells: Vec<Option<f64>>,
    },
}

impl ColumnData {
    fn push_cell(&mut self, raw: &str) {
        match self {
            ColumnData::Categorical { labels, cells } => {
                if raw == MISSING {
                    cells.push(None);
                } else {
                    let index = match labels.iter().position(|label| label == raw) {
                        Some(index) => index,
                        None => {
                            labels.push(raw.to_string());
                            labels.len() - 1
                        }
                    };
                    cells.push(Some(index as u32));
                }
            }
            ColumnData::Numeric { cells } => {
                if raw == MISSING {
                    cells.push(None);
                } else {
                    cells.push(raw.parse().ok());
                }
            }
        }
    }

    fn all_missing(&self) -> bool {
        match self {
            ColumnData::Categorical { cells, .. } => cells.iter().all(Option::is_none),
            ColumnData::Numeric { cells } => cells.iter().all(Option::is_none),
        }
    }
}

impl Dataset {
    pub fn new(relation: &str) -> Self {
        Dataset {
            relation: relation.to_string(),
            columns: Vec::new(),
            num_records: 0,
        }
    }

    /// Add a categorical column; existing records get a missing cell
    pub fn add_column(&mut self, name: &str) {
        self.columns.push(Column {
            name: name.to_string(),
            data: ColumnData::Categorical {
                labels: Vec::new(),
                cells: vec![None; self.num_records],
            },
        });
    }

    /// Add a numeric column; existing records get a missing cell
    pub fn add_numeric_column(&mut self, name: &str) {
        self.columns.push(Column {
            name: name.to_string(),
            data: ColumnData::Numeric {
                cells: vec![None; self.num_records],
            },
        });
    }

    /// Append one record; `?` marks a missing value
    pub fn push(&mut self, values: &[&str]) -> Result<()> {
        if values.len() != self.columns.len() {
            return Err(Error::Dataset(format!(
                "record has {} values but the dataset has {} columns",
                values.len(),
                self.columns.len()
            )));
        }
        // parse numeric cells up front so a bad record leaves the dataset untouched
        for (column, raw) in self.columns.iter().zip(values) {
            if let ColumnData::Numeric { .. } = column.data {
                if *raw != MISSING && raw.parse::<f64>().is_err() {
                    return Err(Error::Dataset(format!(
                        "can't parse '{}' as a number for column '{}'",
                        raw, column.name
                    )));
                }
            }
        }
        for (column, raw) in self.columns.iter_mut().zip(values) {
            column.data.push_cell(raw);
        }
        self.num_records += 1;
        Ok(())
    }

    pub fn relation(&self) -> &str {
        &self.relation
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn num_records(&self) -> usize {
        self.num_records
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Content hash for change detection
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let content = serde_json::to_string(self).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        format!("sha256:{}", hex::encode(&hasher.finalize()[..8]))
    }

    /// Drop every column whose cells are all missing
    ///
    /// Returns the reduced dataset, the dropped column names, and the
    /// class index remapped across the removal. Removing the class
    /// itself is a configuration error; a dataset without records is
    /// returned unchanged.
    pub fn remove_all_missing_columns(
        &self,
        class_index: usize,
    ) -> Result<(Dataset, Vec<String>, usize)> {
        if self.num_records == 0 {
            return Ok((self.clone(), Vec::new(), class_index));
        }
        let mut removed = Vec::new();
        let mut kept = Vec::new();
        let mut new_class_index = class_index;
        for (index, column) in self.columns.iter().enumerate() {
            if column.data.all_missing() {
                if index == class_index {
                    return Err(Error::Config(format!(
                        "class column '{}' has no values",
                        column.name
                    )));
                }
                removed.push(column.name.clone());
                if index < class_index {
                    new_class_index -= 1;
                }
            } else {
                kept.push(column.clone());
            }
        }
        let reduced = Dataset {
            relation: self.relation.clone(),
            columns: kept,
            num_records: self.num_records,
        };
        Ok((reduced, removed, new_class_index))
    }

    /// Split into a feature-only view and a class-only view
    ///
    /// Fails with a data type error if any involved column is numeric;
    /// itemset counting is undefined for continuous domains.
    pub fn class_split(&self, class_index: usize) -> Result<(FeatureView<'_>, ClassView<'_>)> {
        let class_column = self.columns.get(class_index).ok_or_else(|| {
            Error::Config(format!(
                "class column index {} out of range for {} columns",
                class_index,
                self.columns.len()
            ))
        })?;
        let class = match &class_column.data {
            ColumnData::Categorical { labels, cells } => ClassView {
                name: &class_column.name,
                labels,
                cells,
            },
            ColumnData::Numeric { .. } => {
                return Err(Error::DataType(format!(
                    "class column '{}' is numeric; a categorical class is required",
                    class_column.name
                )))
            }
        };
        let mut features = Vec::with_capacity(self.columns.len().saturating_sub(1));
        for (index, column) in self.columns.iter().enumerate() {
            if index == class_index {
                continue;
            }
            match &column.data {
                ColumnData::Categorical { labels, cells } => features.push(FeatureColumn {
                    name: &column.name,
                    labels,
                    cells,
                }),
                ColumnData::Numeric { .. } => {
                    return Err(Error::DataType(format!(
                        "can't handle numeric column '{}'",
                        column.name
                    )))
                }
            }
        }
        Ok((
            FeatureView {
                columns: features,
                num_records: self.num_records,
            },
            class,
        ))
    }
}

struct FeatureColumn<'a> {
    name: &'a str,
    labels: &'a [String],
    cells: &'a [Option<u32>],
}

/// Read-only view of the feature columns, class excluded
///
/// Item column indices refer to positions in this view, not to the
/// originating dataset.
pub struct FeatureView<'a> {
    columns: Vec<FeatureColumn<'a>>,
    num_records: usize,
}

impl FeatureView<'_> {
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn num_records(&self) -> usize {
        self.num_records
    }

    pub fn num_values(&self, column: usize) -> usize {
        self.columns[column].labels.len()
    }

    pub fn column_name(&self, column: usize) -> &str {
        self.columns[column].name
    }

    pub fn value_labels(&self, column: usize) -> &[String] {
        self.columns[column].labels
    }

    pub fn value(&self, column: usize, row: usize) -> Option<u32> {
        self.columns[column].cells[row]
    }

    /// Whether the record at `row` matches every item; a missing cell
    /// matches nothing
    pub fn matches(&self, row: usize, items: &[Item]) -> bool {
        items
            .iter()
            .all(|item| self.columns[item.column].cells[row] == Some(item.value))
    }
}

/// Read-only view of the class column
pub struct ClassView<'a> {
    name: &'a str,
    labels: &'a [String],
    cells: &'a [Option<u32>],
}

impl ClassView<'_> {
    pub fn name(&self) -> &str {
        self.name
    }

    pub fn labels(&self) -> &[String] {
        self.labels
    }

    pub fn num_labels(&self) -> usize {
        self.labels.len()
    }

    pub fn num_records(&self) -> usize {
        self.cells.len()
    }

    pub fn label_at(&self, row: usize) -> Option<u32> {
        self.cells[row]
    }

    /// How often each label occurs; missing cells count for no label
    pub fn label_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.labels.len()];
        for cell in self.cells {
            if let Some(value) = cell {
                counts[*value as usize] += 1;
            }
        }
        counts
    }
}
