//! Podar: binary-attribute ID3 decision trees with randomized
//! post-pruning, plus a univariate gradient-descent solver.
//!
//! Podar builds ID3 trees over binary attributes and binary class
//! labels, prunes them with a randomized accuracy-target search over
//! train/validation/test splits, and ships a small gradient-descent
//! solver for one-dimensional linear regression.
//!
//! # Quick Start
//!
//! ```
//! use podar::prelude::*;
//!
//! // Training data: the label follows attribute "a" exactly.
//! let table = BinaryTable::new(vec![
//!     ("a".to_string(), vec![0, 0, 1, 1]),
//!     ("b".to_string(), vec![0, 1, 1, 0]),
//! ]).expect("valid table");
//! let labels = vec![0, 0, 1, 1];
//!
//! let mut model = Id3Classifier::new();
//! model.fit(&table, &labels).expect("fit should succeed");
//!
//! // Evaluate on held-out instances (last element = true label).
//! let columns = ColumnMap::from_names(&["a", "b"]);
//! let instances = InstanceSet::new(vec![
//!     vec![0, 1, 0],
//!     vec![1, 0, 1],
//! ]).expect("valid instances");
//! assert!((model.score(&instances, &columns) - 1.0).abs() < 1e-6);
//! ```
//!
//! # Modules
//!
//! - [`dataset`]: Attribute tables, instance sets, and split bundles
//! - [`tree`]: ID3 construction, entropy engine, pruning, rendering
//! - [`metrics`]: Accuracy and train/validation/test report structures
//! - [`linear_model`]: Gradient-descent linear regression
//! - [`error`]: Error types

pub mod dataset;
pub mod error;
pub mod linear_model;
pub mod metrics;
pub mod prelude;
pub mod tree;

pub use error::{PodarError, Result};
