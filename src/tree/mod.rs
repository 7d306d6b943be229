//! ID3 decision trees over binary attributes.
//!
//! This module implements:
//! - Shannon-entropy / information-gain splitting ([`entropy`])
//! - Recursive ID3 tree construction ([`Id3Classifier::fit`])
//! - Randomized post-hoc pruning with an accuracy-target search
//!   ([`PruneSearch`])
//! - Per-instance prediction and tree rendering
//!
//! # Example
//!
//! ```
//! use podar::dataset::{BinaryTable, ColumnMap};
//! use podar::tree::Id3Classifier;
//!
//! // XOR-free toy data: label follows "humid" exactly.
//! let table = BinaryTable::new(vec![
//!     ("humid".to_string(), vec![0, 0, 1, 1]),
//!     ("windy".to_string(), vec![0, 1, 0, 1]),
//! ]).expect("valid table");
//! let labels = vec![0, 0, 1, 1];
//!
//! let mut model = Id3Classifier::new();
//! model.fit(&table, &labels).expect("fit should succeed");
//!
//! let columns = ColumnMap::from_names(&["humid", "windy"]);
//! assert_eq!(model.predict(&[1, 0, 1], &columns), Some(1));
//! ```

mod build;
pub mod entropy;
mod prune;

pub use entropy::{dataset_entropy, information_gain, split_entropy};
pub use prune::{prune_tree, PruneSearch, PruneSearchReport, SearchOutcome};

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dataset::{BinaryTable, ColumnMap, InstanceSet};
use crate::error::{PodarError, Result};
use crate::metrics;

/// Internal node in an ID3 tree.
///
/// Holds the split attribute and the two value subtrees. A child may be
/// absent when its partition ran out of attributes while still impure;
/// prediction through an absent child counts as a misclassification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// Unique node id, assigned in construction order.
    pub id: usize,
    /// Depth from the root (root = 0).
    pub height: usize,
    /// Attribute this node splits on.
    pub attribute: String,
    /// Number of label-0 training instances that reached this node.
    pub label_zero_count: usize,
    /// Number of label-1 training instances that reached this node.
    pub label_one_count: usize,
    /// Subtree for attribute value 0.
    pub left: Option<Box<TreeNode>>,
    /// Subtree for attribute value 1.
    pub right: Option<Box<TreeNode>>,
}

/// Leaf node in an ID3 tree.
///
/// Holds the decided class label (majority label of the instances that
/// reached it, ties broken toward 0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaf {
    /// Unique node id, assigned in construction order.
    pub id: usize,
    /// Depth from the root (root = 0).
    pub height: usize,
    /// Number of label-0 training instances that reached this node.
    pub label_zero_count: usize,
    /// Number of label-1 training instances that reached this node.
    pub label_one_count: usize,
    /// Decided class label.
    pub class_label: u8,
}

/// A node in an ID3 tree (either decision node or leaf).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TreeNode {
    /// Internal decision node with a split attribute and two children.
    Decision(Decision),
    /// Leaf node with a decided class label.
    Leaf(Leaf),
}

/// Node totals produced by a breadth-first sweep of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeCount {
    /// Number of nodes of any kind.
    pub total: usize,
    /// Number of leaf nodes.
    pub leaves: usize,
}

impl TreeNode {
    /// Returns this node's unique id.
    #[must_use]
    pub fn id(&self) -> usize {
        match self {
            TreeNode::Decision(node) => node.id,
            TreeNode::Leaf(leaf) => leaf.id,
        }
    }

    /// Returns this node's height (depth from the root).
    #[must_use]
    pub fn height(&self) -> usize {
        match self {
            TreeNode::Decision(node) => node.height,
            TreeNode::Leaf(leaf) => leaf.height,
        }
    }

    /// Returns true for leaf nodes.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf(_))
    }

    /// Returns the `(label_zero, label_one)` instance counts recorded at
    /// this node during construction.
    #[must_use]
    pub fn label_counts(&self) -> (usize, usize) {
        match self {
            TreeNode::Decision(node) => (node.label_zero_count, node.label_one_count),
            TreeNode::Leaf(leaf) => (leaf.label_zero_count, leaf.label_one_count),
        }
    }

    /// Returns the depth of the subtree rooted at this node.
    ///
    /// Leaf nodes have depth 0; an absent child contributes 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf(_) => 0,
            TreeNode::Decision(node) => {
                let left = node.left.as_ref().map_or(0, |n| n.depth());
                let right = node.right.as_ref().map_or(0, |n| n.depth());
                1 + left.max(right)
            }
        }
    }

    /// Counts all nodes and leaf nodes reachable from this node.
    #[must_use]
    pub fn count_nodes(&self) -> NodeCount {
        let mut total = 0;
        let mut leaves = 0;
        let mut queue = VecDeque::new();
        queue.push_back(self);
        while let Some(node) = queue.pop_front() {
            total += 1;
            match node {
                TreeNode::Leaf(_) => leaves += 1,
                TreeNode::Decision(decision) => {
                    if let Some(left) = &decision.left {
                        queue.push_back(left);
                    }
                    if let Some(right) = &decision.right {
                        queue.push_back(right);
                    }
                }
            }
        }
        NodeCount { total, leaves }
    }

    /// Locates a node by id via breadth-first search.
    #[must_use]
    pub fn find(&self, id: usize) -> Option<&TreeNode> {
        let mut queue = VecDeque::new();
        queue.push_back(self);
        while let Some(node) = queue.pop_front() {
            if node.id() == id {
                return Some(node);
            }
            if let TreeNode::Decision(decision) = node {
                if let Some(left) = &decision.left {
                    queue.push_back(left);
                }
                if let Some(right) = &decision.right {
                    queue.push_back(right);
                }
            }
        }
        None
    }

    /// Mutable breadth-first lookup by id, used by the pruner.
    pub(crate) fn find_mut(&mut self, id: usize) -> Option<&mut TreeNode> {
        let mut queue: VecDeque<&mut TreeNode> = VecDeque::new();
        queue.push_back(self);
        while let Some(node) = queue.pop_front() {
            if node.id() == id {
                return Some(node);
            }
            if let TreeNode::Decision(decision) = node {
                if let Some(left) = decision.left.as_deref_mut() {
                    queue.push_back(left);
                }
                if let Some(right) = decision.right.as_deref_mut() {
                    queue.push_back(right);
                }
            }
        }
        None
    }

    /// Predicts the class label for one raw instance row.
    ///
    /// A leaf returns its decided label. A decision node resolves its
    /// attribute name to a column position through `columns`, routes
    /// value 0 to the left child and anything else to the right child,
    /// and recurses. Returns `None` when the attribute name cannot be
    /// resolved or the chosen child is absent; callers count `None` as a
    /// misclassification.
    #[must_use]
    pub fn predict(&self, instance: &[u8], columns: &ColumnMap) -> Option<u8> {
        match self {
            TreeNode::Leaf(leaf) => Some(leaf.class_label),
            TreeNode::Decision(decision) => {
                let position = columns.position_of(&decision.attribute)?;
                let value = instance.get(position)?;
                let child = if *value == 0 {
                    decision.left.as_deref()
                } else {
                    decision.right.as_deref()
                };
                child?.predict(instance, columns)
            }
        }
    }

    /// Renders the tree in the pipe-indented text format.
    ///
    /// Each decision node emits a newline followed by, for each present
    /// child, `height` repetitions of `"| "`, then `attribute=0:` or
    /// `attribute=1:` and the child's rendering. Each leaf emits its
    /// class label on its own line.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    fn render_into(&self, out: &mut String) {
        match self {
            TreeNode::Leaf(leaf) => {
                out.push_str(&leaf.class_label.to_string());
                out.push('\n');
            }
            TreeNode::Decision(decision) => {
                out.push('\n');
                if let Some(left) = &decision.left {
                    for _ in 0..decision.height {
                        out.push_str("| ");
                    }
                    out.push_str(&decision.attribute);
                    out.push_str("=0:");
                    left.render_into(out);
                }
                if let Some(right) = &decision.right {
                    for _ in 0..decision.height {
                        out.push_str("| ");
                    }
                    out.push_str(&decision.attribute);
                    out.push_str("=1:");
                    right.render_into(out);
                }
            }
        }
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// ID3 decision tree classifier for binary attributes and binary labels.
///
/// Builds a tree by recursively selecting the attribute with the
/// strictly greatest information gain; an attribute split once is never
/// reused within its own subtree. Stops on pure labels or when no
/// attribute has positive gain, emitting a majority-label leaf (ties
/// toward 0).
///
/// # Examples
///
/// ```
/// use podar::dataset::{BinaryTable, ColumnMap, InstanceSet};
/// use podar::tree::Id3Classifier;
///
/// let table = BinaryTable::new(vec![
///     ("a".to_string(), vec![0, 0, 1, 1]),
///     ("b".to_string(), vec![0, 1, 1, 0]),
/// ]).expect("valid table");
/// let labels = vec![0, 0, 1, 1];
///
/// let mut model = Id3Classifier::new();
/// model.fit(&table, &labels).expect("fit should succeed");
/// assert_eq!(model.n_nodes(), 3);
/// assert_eq!(model.n_leaves(), 2);
///
/// let columns = ColumnMap::from_names(&["a", "b"]);
/// let instances = InstanceSet::new(vec![vec![0, 0, 0], vec![1, 1, 1]]).expect("valid");
/// assert!((model.score(&instances, &columns) - 1.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Id3Classifier {
    root: Option<TreeNode>,
    n_nodes: usize,
    n_leaves: usize,
}

impl Id3Classifier {
    /// Creates a new, unfitted classifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fits the tree to a training attribute table and label sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if the table or labels are empty, misaligned,
    /// or contain non-binary labels.
    pub fn fit(&mut self, table: &BinaryTable, labels: &[u8]) -> Result<()> {
        if labels.is_empty() {
            return Err(PodarError::empty_input("training labels"));
        }
        if table.is_empty() {
            return Err(PodarError::empty_input("attribute table"));
        }
        if labels.len() != table.n_instances() {
            return Err(PodarError::dimension_mismatch(
                "labels",
                table.n_instances(),
                labels.len(),
            ));
        }
        if labels.iter().any(|&l| l > 1) {
            return Err("Class labels must be 0 or 1".into());
        }

        let mut ctx = build::BuildContext::new();
        self.root = build::build_node(table, labels, 0, &mut ctx);
        self.n_nodes = ctx.n_nodes();
        self.n_leaves = ctx.n_leaves();
        Ok(())
    }

    /// Returns the root node, if fitted.
    #[must_use]
    pub fn root(&self) -> Option<&TreeNode> {
        self.root.as_ref()
    }

    /// Total number of nodes assigned at construction time.
    ///
    /// This is also the id space `[0, n_nodes)` used to address nodes
    /// during pruning.
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.n_nodes
    }

    /// Number of leaf nodes created at construction time.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        self.n_leaves
    }

    /// Predicts the class label for one raw instance row.
    ///
    /// Returns `None` for predictions that cannot be completed (unknown
    /// attribute name or absent child); these count as misclassified.
    ///
    /// # Panics
    ///
    /// Panics if called before `fit()`.
    #[must_use]
    pub fn predict(&self, instance: &[u8], columns: &ColumnMap) -> Option<u8> {
        let root = self.root.as_ref().expect("Model not fitted");
        root.predict(instance, columns)
    }

    /// Computes accuracy over an instance set.
    ///
    /// Each row's final element is the true class label.
    ///
    /// # Panics
    ///
    /// Panics if called before `fit()` or on an empty instance set.
    #[must_use]
    pub fn score(&self, instances: &InstanceSet, columns: &ColumnMap) -> f32 {
        let root = self.root.as_ref().expect("Model not fitted");
        metrics::tree_accuracy(instances, root, columns)
    }

    /// Produces one randomly pruned copy of the fitted tree.
    ///
    /// Converts `floor(prune_factor * n_nodes)` randomly chosen decision
    /// nodes into majority-label leaves. The fitted tree is never
    /// mutated, so repeated calls always prune from the original.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is unfitted or `prune_factor` is
    /// outside `[0, 1]`.
    pub fn prune<R: rand::Rng + ?Sized>(
        &self,
        prune_factor: f32,
        rng: &mut R,
    ) -> Result<TreeNode> {
        if !(0.0..=1.0).contains(&prune_factor) {
            return Err(PodarError::InvalidHyperparameter {
                param: "prune_factor".to_string(),
                value: prune_factor.to_string(),
                constraint: "within [0, 1]".to_string(),
            });
        }
        let root = self.root.as_ref().ok_or_else(|| PodarError::NotFitted {
            model: "Id3Classifier".to_string(),
        })?;
        Ok(prune_tree(root, prune_factor, self.n_nodes, rng))
    }
}
