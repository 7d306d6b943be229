//! Recursive ID3 tree construction.
//!
//! The builder threads an explicit [`BuildContext`] through the
//! recursion instead of keeping counters in shared mutable state, so
//! independently built trees can never interfere with each other.

use crate::dataset::BinaryTable;

use super::entropy::{dataset_entropy, information_gain};
use super::{Decision, Leaf, TreeNode};

/// Per-construction state: the id allocator and the leaf tally.
///
/// Ids are handed out in construction order starting at 0, parent
/// before children, and are unique for the lifetime of the tree.
#[derive(Debug, Default)]
pub(super) struct BuildContext {
    next_id: usize,
    leaf_count: usize,
}

impl BuildContext {
    pub(super) fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Total number of nodes allocated so far (the id space).
    pub(super) fn n_nodes(&self) -> usize {
        self.next_id
    }

    /// Number of leaves created so far.
    pub(super) fn n_leaves(&self) -> usize {
        self.leaf_count
    }
}

/// Majority class label for `(zeros, ones)` counts; ties go to 0.
pub(crate) fn majority_label(zeros: usize, ones: usize) -> u8 {
    if zeros >= ones {
        0
    } else {
        1
    }
}

fn label_counts(labels: &[u8]) -> (usize, usize) {
    let zeros = labels.iter().filter(|&&l| l == 0).count();
    (zeros, labels.len() - zeros)
}

fn make_leaf(ctx: &mut BuildContext, height: usize, zeros: usize, ones: usize) -> TreeNode {
    ctx.leaf_count += 1;
    TreeNode::Leaf(Leaf {
        id: ctx.allocate_id(),
        height,
        label_zero_count: zeros,
        label_one_count: ones,
        class_label: majority_label(zeros, ones),
    })
}

/// Selects the attribute with the strictly greatest information gain.
///
/// The running maximum starts at 0.0 and only a strictly greater gain
/// replaces it, so the first attribute (in column order) wins exact
/// ties, and an attribute with zero or negative gain is never selected.
fn select_split<'t>(
    table: &'t BinaryTable,
    labels: &[u8],
    parent_entropy: f32,
) -> Option<(&'t str, &'t [u8])> {
    let mut best: Option<(&str, &[u8])> = None;
    let mut max_gain = 0.0_f32;
    for (name, values) in table.iter() {
        let gain = information_gain(parent_entropy, values, labels);
        if gain > max_gain {
            max_gain = gain;
            best = Some((name, values));
        }
    }
    best
}

/// Splits instance indices by the chosen attribute's value:
/// 0 goes left, anything else goes right.
fn partition_rows(values: &[u8]) -> (Vec<usize>, Vec<usize>) {
    let mut left = Vec::new();
    let mut right = Vec::new();
    for (index, &value) in values.iter().enumerate() {
        if value == 0 {
            left.push(index);
        } else {
            right.push(index);
        }
    }
    (left, right)
}

/// Builds the subtree for one `(table, labels, height)` triple.
///
/// Returns `None` when the labels or the attribute table are empty; the
/// caller records the absent subtree as a missing child. Pure labels,
/// or the absence of any positive-gain attribute, terminate the branch
/// with a majority-label leaf. Otherwise the selected attribute is
/// removed from both branch tables and the builder recurses into each
/// value partition with `height + 1`.
pub(super) fn build_node(
    table: &BinaryTable,
    labels: &[u8],
    height: usize,
    ctx: &mut BuildContext,
) -> Option<TreeNode> {
    if labels.is_empty() || table.is_empty() {
        return None;
    }

    let parent_entropy = dataset_entropy(labels);
    let (zeros, ones) = label_counts(labels);
    if parent_entropy == 0.0 {
        return Some(make_leaf(ctx, height, zeros, ones));
    }

    let Some((attribute, values)) = select_split(table, labels, parent_entropy) else {
        return Some(make_leaf(ctx, height, zeros, ones));
    };

    let id = ctx.allocate_id();
    let (left_rows, right_rows) = partition_rows(values);
    let narrowed = table.without(attribute);

    let left_labels: Vec<u8> = left_rows.iter().map(|&i| labels[i]).collect();
    let right_labels: Vec<u8> = right_rows.iter().map(|&i| labels[i]).collect();
    let attribute = attribute.to_string();

    let left = build_node(&narrowed.take_rows(&left_rows), &left_labels, height + 1, ctx)
        .map(Box::new);
    let right = build_node(&narrowed.take_rows(&right_rows), &right_labels, height + 1, ctx)
        .map(Box::new);

    Some(TreeNode::Decision(Decision {
        id,
        height,
        attribute,
        label_zero_count: zeros,
        label_one_count: ones,
        left,
        right,
    }))
}
