//! In-memory dataset containers for binary-attribute classification.
//!
//! These types are the contract surface between the (external) dataset
//! loader and the algorithmic core: named binary attribute columns, the
//! class-label sequence, the column-position map used during prediction,
//! and the raw instance rows.

use serde::{Deserialize, Serialize};

use crate::error::{PodarError, Result};

/// An ordered table of named binary attribute columns.
///
/// This is a thin wrapper around `Vec<(String, Vec<u8>)>` that preserves
/// insertion order. Column order is semantically significant: the tree
/// builder scans attributes in this order and breaks information-gain
/// ties in favor of the first attribute seen.
///
/// All values must be 0 or 1, and every column must have the same length
/// (one value per instance, index-aligned with the label sequence).
///
/// # Examples
///
/// ```
/// use podar::dataset::BinaryTable;
///
/// let table = BinaryTable::new(vec![
///     ("outlook".to_string(), vec![0, 1, 0, 1]),
///     ("windy".to_string(), vec![0, 0, 1, 1]),
/// ]).expect("columns are aligned and binary");
/// assert_eq!(table.n_attributes(), 2);
/// assert_eq!(table.n_instances(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryTable {
    columns: Vec<(String, Vec<u8>)>,
    n_instances: usize,
}

impl BinaryTable {
    /// Creates a new table from named binary columns.
    ///
    /// # Errors
    ///
    /// Returns an error if columns have different lengths, a name is
    /// empty or duplicated, or any value is not 0 or 1.
    pub fn new(columns: Vec<(String, Vec<u8>)>) -> Result<Self> {
        let n_instances = columns.first().map_or(0, |(_, values)| values.len());

        for (name, values) in &columns {
            if name.is_empty() {
                return Err("Attribute names cannot be empty".into());
            }
            if values.len() != n_instances {
                return Err(PodarError::dimension_mismatch(
                    "column length",
                    n_instances,
                    values.len(),
                ));
            }
            if values.iter().any(|&v| v > 1) {
                return Err(PodarError::Other(format!(
                    "attribute '{name}' contains a non-binary value"
                )));
            }
        }

        let mut names: Vec<&str> = columns.iter().map(|(n, _)| n.as_str()).collect();
        names.sort_unstable();
        for i in 1..names.len() {
            if names[i] == names[i - 1] {
                return Err("Duplicate attribute names not allowed".into());
            }
        }

        Ok(Self {
            columns,
            n_instances,
        })
    }

    /// Returns an empty table with zero attributes and zero instances.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            n_instances: 0,
        }
    }

    /// Returns the number of attributes (columns).
    #[must_use]
    pub fn n_attributes(&self) -> usize {
        self.columns.len()
    }

    /// Returns the number of instances (rows).
    #[must_use]
    pub fn n_instances(&self) -> usize {
        self.n_instances
    }

    /// Returns true if the table has no attributes left.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns the attribute names in column order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Returns the value sequence for an attribute, if present.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[u8]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
    }

    /// Iterates over `(name, values)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.columns
            .iter()
            .map(|(n, values)| (n.as_str(), values.as_slice()))
    }

    /// Returns a new table with one attribute removed.
    ///
    /// The source table is untouched; a split attribute is removed from
    /// both branch tables this way, which makes the no-reuse-along-a-path
    /// invariant explicit instead of relying on in-place mutation.
    #[must_use]
    pub fn without(&self, name: &str) -> Self {
        let columns: Vec<(String, Vec<u8>)> = self
            .columns
            .iter()
            .filter(|(n, _)| n != name)
            .cloned()
            .collect();
        let n_instances = if columns.is_empty() {
            0
        } else {
            self.n_instances
        };
        Self {
            columns,
            n_instances,
        }
    }

    /// Returns a new table keeping only the given instance rows, in order.
    ///
    /// Used to narrow every remaining attribute column to one branch's
    /// partition while keeping all columns index-aligned.
    #[must_use]
    pub fn take_rows(&self, indices: &[usize]) -> Self {
        let columns: Vec<(String, Vec<u8>)> = self
            .columns
            .iter()
            .map(|(name, values)| {
                let narrowed: Vec<u8> = indices.iter().map(|&i| values[i]).collect();
                (name.clone(), narrowed)
            })
            .collect();
        Self {
            columns,
            n_instances: indices.len(),
        }
    }
}

/// Mapping from column position to attribute name, as handed over by the
/// dataset loader.
///
/// Prediction resolves a split-attribute name back to its column position
/// through [`ColumnMap::position_of`]. A failed lookup is not an error:
/// the prediction for that instance is counted as incorrect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMap {
    names: Vec<(usize, String)>,
}

impl ColumnMap {
    /// Creates a map from `(position, name)` pairs.
    #[must_use]
    pub fn new(names: Vec<(usize, String)>) -> Self {
        Self { names }
    }

    /// Creates a map assigning positions 0.. to the given names in order.
    #[must_use]
    pub fn from_names(names: &[&str]) -> Self {
        Self {
            names: names
                .iter()
                .enumerate()
                .map(|(i, n)| (i, (*n).to_string()))
                .collect(),
        }
    }

    /// Returns the number of mapped attribute columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if no columns are mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Resolves an attribute name to its column position.
    #[must_use]
    pub fn position_of(&self, attribute: &str) -> Option<usize> {
        self.names
            .iter()
            .find(|(_, name)| name == attribute)
            .map(|(pos, _)| *pos)
    }
}

/// Raw instance rows, each ending in the true class label.
///
/// Rows keep whatever field values the loader produced; prediction routes
/// on value 0 versus anything else, and only the final element is
/// interpreted as the class label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceSet {
    rows: Vec<Vec<u8>>,
}

impl InstanceSet {
    /// Creates an instance set from raw rows.
    ///
    /// # Errors
    ///
    /// Returns an error if any row is empty or rows have unequal widths.
    pub fn new(rows: Vec<Vec<u8>>) -> Result<Self> {
        if let Some(first) = rows.first() {
            if first.is_empty() {
                return Err(PodarError::empty_input("instance row"));
            }
            let width = first.len();
            for row in &rows {
                if row.len() != width {
                    return Err(PodarError::dimension_mismatch(
                        "instance width",
                        width,
                        row.len(),
                    ));
                }
            }
        }
        Ok(Self { rows })
    }

    /// Returns the number of instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the set holds no instances.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the raw rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<u8>] {
        &self.rows
    }

    /// Iterates over the raw rows.
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.rows.iter().map(Vec::as_slice)
    }
}

/// One fully loaded dataset split: attribute table, label sequence,
/// raw instances, and the column-position map.
///
/// Training, validation, and test data are three independently loaded
/// `SplitData` values; nothing is shared by reference between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitData {
    /// Named binary attribute columns.
    pub table: BinaryTable,
    /// Class labels, index-aligned with every attribute column.
    pub labels: Vec<u8>,
    /// Raw instance rows, each ending in the true class label.
    pub instances: InstanceSet,
    /// Column position to attribute name mapping.
    pub columns: ColumnMap,
}

impl SplitData {
    /// Bundles one split's loader outputs, checking cross-alignment.
    ///
    /// # Errors
    ///
    /// Returns an error if the label sequence, attribute columns, and
    /// instance rows do not all describe the same number of instances,
    /// or if any label is not 0 or 1.
    pub fn new(
        table: BinaryTable,
        labels: Vec<u8>,
        instances: InstanceSet,
        columns: ColumnMap,
    ) -> Result<Self> {
        if labels.len() != table.n_instances() {
            return Err(PodarError::dimension_mismatch(
                "labels",
                table.n_instances(),
                labels.len(),
            ));
        }
        if instances.len() != labels.len() {
            return Err(PodarError::dimension_mismatch(
                "instances",
                labels.len(),
                instances.len(),
            ));
        }
        if labels.iter().any(|&l| l > 1) {
            return Err("Class labels must be 0 or 1".into());
        }
        Ok(Self {
            table,
            labels,
            instances,
            columns,
        })
    }

    /// Returns the number of instances in this split.
    #[must_use]
    pub fn n_instances(&self) -> usize {
        self.labels.len()
    }
}
