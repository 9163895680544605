//! Item and itemset value types
//!
//! An item is one (feature column, value) pair. Itemsets keep their
//! items sorted by (column, value), so the level-wise join can compare
//! lexicographic prefixes directly instead of walking wildcard arrays.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One (feature column, value) pair
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub struct Item {
    /// Feature column index (class column excluded)
    pub column: usize,
    /// Value index within the column's categorical domain
    pub value: u32,
}

impl Item {
    pub fn new(column: usize, value: u32) -> Self {
        Item { column, value }
    }
}

/// An ordered, deduplicated set of items plus its match count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ItemSet {
    /// Sorted by (column, value); at most one item per column
    items: Vec<Item>,
    /// Records matching every item
    pub support: usize,
}

impl ItemSet {
    /// Build a set from arbitrary items, establishing the sort order
    pub fn new(mut items: Vec<Item>) -> Self {
        items.sort();
        items.dedup();
        ItemSet { items, support: 0 }
    }

    pub fn singleton(item: Item) -> Self {
        ItemSet {
            items: vec![item],
            support: 0,
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, item: Item) -> bool {
        self.items.binary_search(&item).is_ok()
    }

    pub fn is_subset_of(&self, other: &ItemSet) -> bool {
        self.items.iter().all(|&item| other.contains(item))
    }

    /// The items with the entry at `index` left out
    pub fn without(&self, index: usize) -> Vec<Item> {
        let mut items = self.items.clone();
        items.remove(index);
        items
    }
}

/// An itemset tied to one class label
///
/// The label is a value index into the class column's domain rather
/// than a full [`Item`]: the class column is fixed for a whole run, so
/// only the value varies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LabeledItemSet {
    /// Antecedent pattern carrying its own support count
    pub antecedent: ItemSet,
    /// Class value index
    pub label: u32,
    /// Records matching the antecedent and carrying `label`
    pub class_support: usize,
}

impl LabeledItemSet {
    pub fn new(antecedent: ItemSet, label: u32) -> Self {
        LabeledItemSet {
            antecedent,
            label,
            class_support: 0,
        }
    }
}

/// All frequent labeled itemsets of one antecedent size
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Level {
    /// Antecedent size shared by every set in this level
    pub size: usize,
    pub sets: Vec<LabeledItemSet>,
}

impl Level {
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
