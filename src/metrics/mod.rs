//! Evaluation metrics and report structures.
//!
//! Provides accuracy computation over tree predictions and the
//! structured counts/accuracy bundle handed to reporting collaborators.

use serde::{Deserialize, Serialize};

use crate::dataset::{ColumnMap, InstanceSet, SplitData};
use crate::tree::{NodeCount, TreeNode};

/// Compute classification accuracy over possibly-failed predictions.
///
/// accuracy = `correct_predictions` / `total_predictions`
///
/// A prediction of `None` (unresolvable attribute or missing subtree)
/// never matches and is counted as incorrect.
///
/// # Arguments
///
/// * `y_pred` - Predicted class labels, `None` where prediction failed
/// * `y_true` - True class labels
///
/// # Returns
///
/// Accuracy score between 0.0 and 1.0
///
/// # Panics
///
/// Panics if the slices have different lengths or are empty.
///
/// # Examples
///
/// ```
/// use podar::metrics::accuracy;
///
/// let y_pred = vec![Some(0), Some(1), None, Some(0)];
/// let y_true = vec![0, 1, 1, 1];
/// assert!((accuracy(&y_pred, &y_true) - 0.5).abs() < 1e-6);
/// ```
#[must_use]
pub fn accuracy(y_pred: &[Option<u8>], y_true: &[u8]) -> f32 {
    assert_eq!(y_pred.len(), y_true.len(), "Vectors must have same length");
    assert!(!y_true.is_empty(), "Vectors cannot be empty");

    let correct = y_pred
        .iter()
        .zip(y_true.iter())
        .filter(|(p, t)| **p == Some(**t))
        .count();

    correct as f32 / y_true.len() as f32
}

/// Number of instances a tree classifies correctly.
///
/// Each row's final element is the true class label; the remaining
/// elements are attribute values addressed through `columns`.
#[must_use]
pub fn correct_count(instances: &InstanceSet, root: &TreeNode, columns: &ColumnMap) -> usize {
    instances
        .iter()
        .filter(|row| {
            let truth = row.last().copied();
            root.predict(row, columns) == truth
        })
        .count()
}

/// Accuracy of a tree over an instance set.
///
/// # Panics
///
/// Panics on an empty instance set (an accuracy over zero instances is
/// undefined; callers guard).
#[must_use]
pub fn tree_accuracy(instances: &InstanceSet, root: &TreeNode, columns: &ColumnMap) -> f32 {
    assert!(!instances.is_empty(), "Instance set cannot be empty");
    correct_count(instances, root, columns) as f32 / instances.len() as f32
}

/// Accuracy and size facts for one dataset split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitEvaluation {
    /// Number of instances in the split.
    pub n_instances: usize,
    /// Number of attribute columns in the split.
    pub n_attributes: usize,
    /// Accuracy of the evaluated tree on the split.
    pub accuracy: f32,
}

/// Evaluates one tree against one split.
///
/// # Panics
///
/// Panics on an empty split.
#[must_use]
pub fn evaluate_split(root: &TreeNode, split: &SplitData) -> SplitEvaluation {
    SplitEvaluation {
        n_instances: split.instances.len(),
        n_attributes: split.columns.len(),
        accuracy: tree_accuracy(&split.instances, root, &split.columns),
    }
}

/// The full counts-and-accuracies bundle for one tree, ready for a
/// reporting collaborator.
///
/// Computed once for the unpruned tree and again for a pruned tree to
/// produce pre-/post-pruning report blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeReport {
    /// Node totals of the evaluated tree.
    pub nodes: NodeCount,
    /// Evaluation on the training split.
    pub train: SplitEvaluation,
    /// Evaluation on the validation split.
    pub validation: SplitEvaluation,
    /// Evaluation on the test split.
    pub test: SplitEvaluation,
}

impl TreeReport {
    /// Evaluates a tree against all three splits.
    ///
    /// # Panics
    ///
    /// Panics if any split is empty.
    #[must_use]
    pub fn new(root: &TreeNode, train: &SplitData, validation: &SplitData, test: &SplitData) -> Self {
        Self {
            nodes: root.count_nodes(),
            train: evaluate_split(root, train),
            validation: evaluate_split(root, validation),
            test: evaluate_split(root, test),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::BinaryTable;
    use crate::tree::Id3Classifier;

    fn fitted() -> (Id3Classifier, ColumnMap) {
        let table = BinaryTable::new(vec![
            ("a".to_string(), vec![0, 0, 1, 1]),
            ("b".to_string(), vec![0, 1, 1, 0]),
        ])
        .expect("valid table");
        let mut model = Id3Classifier::new();
        model.fit(&table, &[0, 0, 1, 1]).expect("fit should succeed");
        (model, ColumnMap::from_names(&["a", "b"]))
    }

    #[test]
    fn test_accuracy_counts_failed_predictions_as_wrong() {
        let y_pred = vec![Some(1), None, Some(0), None];
        let y_true = vec![1, 0, 0, 1];
        assert!((accuracy(&y_pred, &y_true) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_accuracy_bounds() {
        assert_eq!(accuracy(&[Some(0), Some(1)], &[0, 1]), 1.0);
        assert_eq!(accuracy(&[Some(1), Some(0)], &[0, 1]), 0.0);
    }

    #[test]
    #[should_panic(expected = "cannot be empty")]
    fn test_accuracy_empty_panics() {
        accuracy(&[], &[]);
    }

    #[test]
    fn test_tree_accuracy_perfect_model() {
        let (model, columns) = fitted();
        let instances = InstanceSet::new(vec![
            vec![0, 0, 0],
            vec![0, 1, 0],
            vec![1, 0, 1],
            vec![1, 1, 1],
        ])
        .expect("valid instances");
        let acc = tree_accuracy(&instances, model.root().expect("fitted"), &columns);
        assert!((acc - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_tree_accuracy_unknown_attribute_counts_wrong() {
        let (model, _) = fitted();
        let wrong_columns = ColumnMap::from_names(&["x", "y"]);
        let instances =
            InstanceSet::new(vec![vec![0, 0, 0], vec![1, 1, 1]]).expect("valid instances");
        let acc = tree_accuracy(&instances, model.root().expect("fitted"), &wrong_columns);
        assert_eq!(acc, 0.0);
    }

    #[test]
    fn test_correct_count_partial() {
        let (model, columns) = fitted();
        // Second row's label contradicts the model.
        let instances =
            InstanceSet::new(vec![vec![0, 0, 0], vec![1, 1, 0]]).expect("valid instances");
        assert_eq!(
            correct_count(&instances, model.root().expect("fitted"), &columns),
            1
        );
    }

    #[test]
    fn test_tree_report_bundles_all_splits() {
        let (model, columns) = fitted();
        let make_split = |rows: Vec<Vec<u8>>| {
            let labels: Vec<u8> = rows.iter().map(|r| *r.last().expect("row")).collect();
            let table = BinaryTable::new(vec![
                ("a".to_string(), rows.iter().map(|r| r[0]).collect()),
                ("b".to_string(), rows.iter().map(|r| r[1]).collect()),
            ])
            .expect("valid table");
            let instances = InstanceSet::new(rows).expect("valid instances");
            SplitData::new(table, labels, instances, columns.clone()).expect("valid split")
        };

        let train = make_split(vec![vec![0, 0, 0], vec![1, 1, 1]]);
        let validation = make_split(vec![vec![0, 1, 0], vec![1, 0, 1]]);
        let test = make_split(vec![vec![1, 1, 1]]);

        let report = TreeReport::new(model.root().expect("fitted"), &train, &validation, &test);
        assert_eq!(report.nodes.total, 3);
        assert_eq!(report.nodes.leaves, 2);
        assert_eq!(report.train.n_instances, 2);
        assert_eq!(report.train.n_attributes, 2);
        assert!((report.train.accuracy - 1.0).abs() < 1e-6);
        assert!((report.validation.accuracy - 1.0).abs() < 1e-6);
        assert_eq!(report.test.n_instances, 1);
        assert!((report.test.accuracy - 1.0).abs() < 1e-6);
    }
}
