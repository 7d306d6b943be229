//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use podar::prelude::*;
//! ```

pub use crate::dataset::{BinaryTable, ColumnMap, InstanceSet, SplitData};
pub use crate::linear_model::GradientDescent;
pub use crate::metrics::{accuracy, tree_accuracy, SplitEvaluation, TreeReport};
pub use crate::tree::{
    dataset_entropy, information_gain, split_entropy, Id3Classifier, PruneSearch,
    PruneSearchReport, SearchOutcome, TreeNode,
};
