//! Randomized post-hoc pruning.
//!
//! A single prune pass deep-copies a fitted tree and converts randomly
//! chosen decision nodes into majority-label leaves. [`PruneSearch`]
//! repeats whole-tree passes against the same original until a pruned
//! copy beats the baseline validation accuracy by a configured margin,
//! or an iteration cap is reached.

use std::collections::{HashSet, VecDeque};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::build::majority_label;
use super::{Id3Classifier, Leaf, TreeNode};
use crate::dataset::{ColumnMap, InstanceSet};
use crate::error::{PodarError, Result};
use crate::metrics;

/// Produces a pruned deep copy of `root`.
///
/// The target count is `floor(prune_factor * n_nodes)`, where `n_nodes`
/// is the id space assigned at construction time. For each conversion a
/// uniformly random id in `[0, n_nodes)` is drawn; ids already consumed
/// in this pass, ids addressing leaves, and ids no longer present in
/// the copy (their subtree was collapsed earlier) are rejected and
/// redrawn. The pass stops early once no unconsumed decision node
/// remains, so it terminates even when the target exceeds the number of
/// prunable nodes. The original tree is never mutated.
#[must_use]
pub fn prune_tree<R: Rng + ?Sized>(
    root: &TreeNode,
    prune_factor: f32,
    n_nodes: usize,
    rng: &mut R,
) -> TreeNode {
    let target = (prune_factor * n_nodes as f32) as usize;
    let mut pruned = root.clone();
    if n_nodes == 0 {
        return pruned;
    }

    let mut consumed: HashSet<usize> = HashSet::new();
    for _ in 0..target {
        if !has_prunable_node(&pruned, &consumed) {
            break;
        }
        loop {
            let id = rng.gen_range(0..n_nodes);
            if consumed.contains(&id) {
                continue;
            }
            let Some(node) = pruned.find_mut(id) else {
                continue;
            };
            if node.is_leaf() {
                continue;
            }
            collapse_to_leaf(node);
            consumed.insert(id);
            break;
        }
    }

    pruned
}

/// True if any decision node with an unconsumed id remains.
fn has_prunable_node(root: &TreeNode, consumed: &HashSet<usize>) -> bool {
    let mut queue = VecDeque::new();
    queue.push_back(root);
    while let Some(node) = queue.pop_front() {
        if let TreeNode::Decision(decision) = node {
            if !consumed.contains(&decision.id) {
                return true;
            }
            if let Some(left) = &decision.left {
                queue.push_back(left);
            }
            if let Some(right) = &decision.right {
                queue.push_back(right);
            }
        }
    }
    false
}

/// Converts a decision node into a leaf in place.
///
/// Drops both children and the split attribute; the class label comes
/// from the majority rule over the counts already stored at the node.
/// Id, height, and counts are retained.
fn collapse_to_leaf(node: &mut TreeNode) {
    let (id, height, zeros, ones) = match &*node {
        TreeNode::Decision(decision) => (
            decision.id,
            decision.height,
            decision.label_zero_count,
            decision.label_one_count,
        ),
        TreeNode::Leaf(_) => return,
    };
    *node = TreeNode::Leaf(Leaf {
        id,
        height,
        label_zero_count: zeros,
        label_one_count: ones,
        class_label: majority_label(zeros, ones),
    });
}

/// Why a pruning search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchOutcome {
    /// A pruned tree exceeded the baseline accuracy by the margin.
    MarginReached,
    /// The iteration cap was hit; the best tree still beats the baseline.
    ImprovedAtCap,
    /// The iteration cap was hit without beating the baseline.
    Exhausted,
}

/// Result of a pruning search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PruneSearchReport {
    /// The accepted pruned tree (the best one found).
    pub tree: TreeNode,
    /// Validation accuracy of the accepted tree.
    pub accuracy: f32,
    /// Validation accuracy of the unpruned tree.
    pub baseline: f32,
    /// Number of prune passes performed.
    pub iterations: usize,
    /// Termination policy that ended the search.
    pub outcome: SearchOutcome,
}

/// Randomized search for a pruned tree that improves validation
/// accuracy.
///
/// Each iteration prunes a fresh copy of the *same* fitted tree and
/// evaluates it on the validation instances. The search accepts the
/// first copy whose accuracy exceeds the baseline by at least `margin`
/// (default 0.02). If no copy clears the margin within
/// `max_iterations` (default 10 000), the best copy found is returned,
/// tagged [`SearchOutcome::ImprovedAtCap`] when it still beats the
/// baseline and [`SearchOutcome::Exhausted`] otherwise. There is no
/// convergence guarantee below the cap; the cap is what guarantees
/// termination.
///
/// # Examples
///
/// ```
/// use podar::dataset::{BinaryTable, ColumnMap, InstanceSet};
/// use podar::tree::{Id3Classifier, PruneSearch};
///
/// let table = BinaryTable::new(vec![
///     ("a".to_string(), vec![0, 0, 1, 1]),
///     ("b".to_string(), vec![0, 1, 1, 0]),
/// ]).expect("valid table");
/// let mut model = Id3Classifier::new();
/// model.fit(&table, &[0, 0, 1, 1]).expect("fit should succeed");
///
/// let validation = InstanceSet::new(vec![vec![0, 0, 0], vec![1, 1, 1]]).expect("valid");
/// let columns = ColumnMap::from_names(&["a", "b"]);
///
/// let report = PruneSearch::new(0.5)
///     .with_max_iterations(50)
///     .with_random_state(42)
///     .run(&model, &validation, &columns)
///     .expect("search should run");
/// assert!(report.accuracy >= 0.0 && report.accuracy <= 1.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PruneSearch {
    prune_factor: f32,
    margin: f32,
    max_iterations: usize,
    random_state: Option<u64>,
}

impl PruneSearch {
    /// Creates a search with the given pruning factor, a 0.02 accuracy
    /// margin, and a 10 000-iteration cap.
    #[must_use]
    pub fn new(prune_factor: f32) -> Self {
        Self {
            prune_factor,
            margin: 0.02,
            max_iterations: 10_000,
            random_state: None,
        }
    }

    /// Sets the required accuracy improvement over the baseline.
    #[must_use]
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    /// Sets the iteration cap.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the random state for reproducible searches.
    #[must_use]
    pub fn with_random_state(mut self, random_state: u64) -> Self {
        self.random_state = Some(random_state);
        self
    }

    /// Runs the search against a fitted classifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the classifier is unfitted, the validation
    /// set is empty, or a hyperparameter is out of range.
    pub fn run(
        &self,
        model: &Id3Classifier,
        validation: &InstanceSet,
        columns: &ColumnMap,
    ) -> Result<PruneSearchReport> {
        if !(0.0..=1.0).contains(&self.prune_factor) {
            return Err(PodarError::InvalidHyperparameter {
                param: "prune_factor".to_string(),
                value: self.prune_factor.to_string(),
                constraint: "within [0, 1]".to_string(),
            });
        }
        if self.margin < 0.0 {
            return Err(PodarError::InvalidHyperparameter {
                param: "margin".to_string(),
                value: self.margin.to_string(),
                constraint: ">= 0".to_string(),
            });
        }
        if self.max_iterations == 0 {
            return Err(PodarError::InvalidHyperparameter {
                param: "max_iterations".to_string(),
                value: "0".to_string(),
                constraint: ">= 1".to_string(),
            });
        }
        let root = model.root().ok_or_else(|| PodarError::NotFitted {
            model: "Id3Classifier".to_string(),
        })?;
        if validation.is_empty() {
            return Err(PodarError::empty_input("validation instances"));
        }

        let baseline = metrics::tree_accuracy(validation, root, columns);
        match self.random_state {
            Some(seed) => self.search(
                root,
                model.n_nodes(),
                validation,
                columns,
                baseline,
                &mut StdRng::seed_from_u64(seed),
            ),
            None => self.search(
                root,
                model.n_nodes(),
                validation,
                columns,
                baseline,
                &mut rand::thread_rng(),
            ),
        }
    }

    fn search<R: Rng>(
        &self,
        root: &TreeNode,
        n_nodes: usize,
        validation: &InstanceSet,
        columns: &ColumnMap,
        baseline: f32,
        rng: &mut R,
    ) -> Result<PruneSearchReport> {
        let mut best: Option<(TreeNode, f32)> = None;

        for iteration in 1..=self.max_iterations {
            let pruned = prune_tree(root, self.prune_factor, n_nodes, rng);
            let accuracy = metrics::tree_accuracy(validation, &pruned, columns);

            if accuracy > baseline + self.margin {
                return Ok(PruneSearchReport {
                    tree: pruned,
                    accuracy,
                    baseline,
                    iterations: iteration,
                    outcome: SearchOutcome::MarginReached,
                });
            }
            if best.as_ref().map_or(true, |(_, acc)| accuracy > *acc) {
                best = Some((pruned, accuracy));
            }
        }

        let Some((tree, accuracy)) = best else {
            return Err("prune search completed zero iterations".into());
        };
        let outcome = if accuracy > baseline {
            SearchOutcome::ImprovedAtCap
        } else {
            SearchOutcome::Exhausted
        };
        Ok(PruneSearchReport {
            tree,
            accuracy,
            baseline,
            iterations: self.max_iterations,
            outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::BinaryTable;

    fn fitted_model() -> Id3Classifier {
        let table = BinaryTable::new(vec![
            ("a".to_string(), vec![0, 0, 0, 1, 1, 1]),
            ("b".to_string(), vec![1, 1, 1, 0, 0, 1]),
            ("c".to_string(), vec![1, 1, 0, 1, 0, 1]),
        ])
        .expect("valid table");
        let mut model = Id3Classifier::new();
        model
            .fit(&table, &[0, 0, 0, 0, 0, 1])
            .expect("fit should succeed");
        model
    }

    #[test]
    fn test_prune_never_mutates_original() {
        let model = fitted_model();
        let original = model.root().expect("fitted").clone();

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10 {
            let _ = model.prune(1.0, &mut rng).expect("prune should succeed");
        }
        assert_eq!(model.root().expect("fitted"), &original);
    }

    #[test]
    fn test_prune_factor_zero_is_identity_copy() {
        let model = fitted_model();
        let mut rng = StdRng::seed_from_u64(7);
        let pruned = model.prune(0.0, &mut rng).expect("prune should succeed");
        assert_eq!(&pruned, model.root().expect("fitted"));
    }

    #[test]
    fn test_full_prune_collapses_to_single_leaf() {
        // Factor 1.0 targets every node; the pass exhausts the two
        // decision nodes (root collapse removes the inner one from the
        // copy) and stops. The result is the root as a majority leaf.
        let model = fitted_model();
        let mut rng = StdRng::seed_from_u64(3);
        let pruned = model.prune(1.0, &mut rng).expect("prune should succeed");

        // The root may collapse first (one conversion) or after the
        // inner node; either way no decision node survives a factor-1.0
        // pass of this two-decision tree.
        let count = pruned.count_nodes();
        assert_eq!(count.total, count.leaves + count_decisions(&pruned));
        assert_eq!(count_decisions(&pruned), 0);

        // Collapsed root keeps id, height, counts; majority label 0.
        assert_eq!(pruned.id(), 0);
        assert_eq!(pruned.height(), 0);
        assert_eq!(pruned.label_counts(), (5, 1));
    }

    fn count_decisions(root: &TreeNode) -> usize {
        let count = root.count_nodes();
        count.total - count.leaves
    }

    #[test]
    fn test_pruned_node_keeps_identity_and_counts() {
        let model = fitted_model();
        let mut rng = StdRng::seed_from_u64(11);
        let pruned = model.prune(1.0, &mut rng).expect("prune should succeed");

        // Whatever collapsed, every surviving node's id must exist in
        // the original with identical height and counts.
        let original = model.root().expect("fitted");
        let mut queue = std::collections::VecDeque::new();
        queue.push_back(&pruned);
        while let Some(node) = queue.pop_front() {
            let source = original.find(node.id()).expect("id from original");
            assert_eq!(node.height(), source.height());
            assert_eq!(node.label_counts(), source.label_counts());
            if let TreeNode::Decision(decision) = node {
                if let Some(left) = &decision.left {
                    queue.push_back(left);
                }
                if let Some(right) = &decision.right {
                    queue.push_back(right);
                }
            }
        }
    }

    #[test]
    fn test_seeded_search_is_deterministic() {
        let model = fitted_model();
        let validation = InstanceSet::new(vec![
            vec![0, 1, 1, 0],
            vec![1, 0, 1, 0],
            vec![1, 1, 1, 1],
        ])
        .expect("valid instances");
        let columns = ColumnMap::from_names(&["a", "b", "c"]);

        let search = PruneSearch::new(0.5)
            .with_max_iterations(25)
            .with_random_state(42);
        let first = search.run(&model, &validation, &columns).expect("run");
        let second = search.run(&model, &validation, &columns).expect("run");
        assert_eq!(first, second);
    }

    #[test]
    fn test_search_reports_structured_outcome() {
        let model = fitted_model();
        // The unpruned tree classifies this validation set perfectly, so
        // no pruned copy can clear the margin: the cap must be reached
        // and flagged as exhausted.
        let validation = InstanceSet::new(vec![vec![0, 1, 1, 0], vec![1, 1, 1, 1]])
            .expect("valid instances");
        let columns = ColumnMap::from_names(&["a", "b", "c"]);

        let report = PruneSearch::new(0.4)
            .with_max_iterations(10)
            .with_random_state(1)
            .run(&model, &validation, &columns)
            .expect("run");
        assert!((report.baseline - 1.0).abs() < 1e-6);
        assert_eq!(report.iterations, 10);
        assert_eq!(report.outcome, SearchOutcome::Exhausted);
        assert!(report.accuracy <= report.baseline);
    }

    #[test]
    fn test_search_validates_hyperparameters() {
        let model = fitted_model();
        let validation = InstanceSet::new(vec![vec![0, 1, 1, 0]]).expect("valid instances");
        let columns = ColumnMap::from_names(&["a", "b", "c"]);

        assert!(PruneSearch::new(1.5).run(&model, &validation, &columns).is_err());
        assert!(PruneSearch::new(0.5)
            .with_margin(-0.1)
            .run(&model, &validation, &columns)
            .is_err());
        assert!(PruneSearch::new(0.5)
            .with_max_iterations(0)
            .run(&model, &validation, &columns)
            .is_err());
    }

    #[test]
    fn test_search_requires_fitted_model() {
        let model = Id3Classifier::new();
        let validation = InstanceSet::new(vec![vec![0, 0]]).expect("valid instances");
        let columns = ColumnMap::from_names(&["a"]);
        let result = PruneSearch::new(0.5).run(&model, &validation, &columns);
        assert!(matches!(result, Err(PodarError::NotFitted { .. })));
    }
}
