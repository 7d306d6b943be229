//! Shannon entropy and information gain for binary labels.
//!
//! These are the pure splitting-criterion kernels used by the ID3
//! builder. All functions use the `log2(0) := 0` convention, so empty
//! and label-pure inputs yield entropy 0 rather than NaN.

/// Contribution of one empirical probability to an entropy sum.
///
/// Returns `p * log2(p)`, with 0 for `p == 0`.
fn p_log2_p(p: f32) -> f32 {
    if p == 0.0 {
        0.0
    } else {
        p * p.log2()
    }
}

/// Shannon entropy (in bits) of a binary label sequence.
///
/// Formula: `-p0*log2(p0) - p1*log2(p1)` where `p0`, `p1` are the
/// empirical class frequencies. An empty sequence yields 0.0.
///
/// # Examples
///
/// ```
/// use podar::tree::dataset_entropy;
///
/// assert_eq!(dataset_entropy(&[0, 0, 0]), 0.0);
/// assert!((dataset_entropy(&[0, 0, 1, 1]) - 1.0).abs() < 1e-6);
/// ```
#[must_use]
pub fn dataset_entropy(labels: &[u8]) -> f32 {
    if labels.is_empty() {
        return 0.0;
    }

    let n = labels.len() as f32;
    let zeros = labels.iter().filter(|&&l| l == 0).count() as f32;
    let p0 = zeros / n;
    let p1 = (n - zeros) / n;

    -p_log2_p(p0) - p_log2_p(p1)
}

/// Weighted conditional entropy of the labels after splitting on one
/// binary attribute.
///
/// Returns `P(attr=0) * H(labels | attr=0) + P(attr=1) * H(labels | attr=1)`.
/// An empty branch contributes nothing (weight 0, inner entropy 0), and
/// an empty attribute sequence yields 0.0.
///
/// # Panics
///
/// Panics if `attr_values` and `labels` have different lengths.
#[must_use]
pub fn split_entropy(attr_values: &[u8], labels: &[u8]) -> f32 {
    assert_eq!(
        attr_values.len(),
        labels.len(),
        "Attribute values and labels must have same length"
    );

    if attr_values.is_empty() {
        return 0.0;
    }

    // Branch sizes and per-branch label-0 counts in one pass.
    let mut n_left = 0usize;
    let mut left_zeros = 0usize;
    let mut right_zeros = 0usize;
    for (&value, &label) in attr_values.iter().zip(labels.iter()) {
        if value == 0 {
            n_left += 1;
            if label == 0 {
                left_zeros += 1;
            }
        } else if label == 0 {
            right_zeros += 1;
        }
    }
    let n = attr_values.len();
    let n_right = n - n_left;

    let branch_entropy = |size: usize, zeros: usize| -> f32 {
        if size == 0 {
            return 0.0;
        }
        let p0 = zeros as f32 / size as f32;
        let p1 = (size - zeros) as f32 / size as f32;
        -p_log2_p(p0) - p_log2_p(p1)
    };

    let w_left = n_left as f32 / n as f32;
    let w_right = n_right as f32 / n as f32;

    w_left * branch_entropy(n_left, left_zeros) + w_right * branch_entropy(n_right, right_zeros)
}

/// Reduction in entropy achieved by partitioning on an attribute.
///
/// `information_gain(parent, attr, labels) = parent - split_entropy(attr, labels)`.
#[must_use]
pub fn information_gain(parent_entropy: f32, attr_values: &[u8], labels: &[u8]) -> f32 {
    parent_entropy - split_entropy(attr_values, labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entropy_of_empty_is_zero() {
        assert_eq!(dataset_entropy(&[]), 0.0);
    }

    #[test]
    fn test_entropy_of_pure_sets_is_zero() {
        assert_eq!(dataset_entropy(&[0, 0, 0, 0]), 0.0);
        assert_eq!(dataset_entropy(&[1, 1]), 0.0);
    }

    #[test]
    fn test_entropy_of_balanced_set_is_one() {
        assert!((dataset_entropy(&[0, 1]) - 1.0).abs() < 1e-6);
        assert!((dataset_entropy(&[0, 0, 1, 1]) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_entropy_of_skewed_set() {
        // H(1/4) = -(0.25 log2 0.25 + 0.75 log2 0.75) ≈ 0.811278
        let h = dataset_entropy(&[1, 0, 0, 0]);
        assert!((h - 0.811_278).abs() < 1e-5);
    }

    #[test]
    fn test_split_entropy_empty_is_zero() {
        assert_eq!(split_entropy(&[], &[]), 0.0);
    }

    #[test]
    fn test_split_entropy_perfect_split_is_zero() {
        // attr == label: both branches pure
        let attr = [0, 0, 1, 1];
        let labels = [0, 0, 1, 1];
        assert_eq!(split_entropy(&attr, &labels), 0.0);
    }

    #[test]
    fn test_split_entropy_uninformative_attribute() {
        // Each branch stays perfectly mixed: conditional entropy is 1.
        let attr = [0, 1, 0, 1];
        let labels = [0, 0, 1, 1];
        assert!((split_entropy(&attr, &labels) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_split_entropy_one_empty_branch() {
        // Every instance routes right; the left branch contributes 0.
        let attr = [1, 1, 1, 1];
        let labels = [0, 0, 1, 1];
        assert!((split_entropy(&attr, &labels) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_information_gain_for_perfect_split() {
        let labels = [0, 0, 1, 1];
        let attr = [0, 0, 1, 1];
        let parent = dataset_entropy(&labels);
        assert!((information_gain(parent, &attr, &labels) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_information_gain_zero_for_uninformative_split() {
        let labels = [0, 0, 1, 1];
        let attr = [0, 1, 0, 1];
        let parent = dataset_entropy(&labels);
        assert!(information_gain(parent, &attr, &labels).abs() < 1e-6);
    }

    #[test]
    fn test_information_gain_nonnegative_on_true_partitions() {
        // Direct computation over several constructed partitions.
        let cases: [(&[u8], &[u8]); 3] = [
            (&[0, 0, 1, 1, 1], &[0, 1, 0, 1, 1]),
            (&[0, 1, 1, 0, 0, 1], &[1, 1, 0, 0, 1, 0]),
            (&[1, 0, 1, 0], &[1, 1, 0, 0]),
        ];
        for (attr, labels) in cases {
            let parent = dataset_entropy(labels);
            assert!(information_gain(parent, attr, labels) >= -1e-6);
        }
    }

    #[test]
    #[should_panic(expected = "same length")]
    fn test_split_entropy_misaligned_inputs_panic() {
        split_entropy(&[0, 1], &[0]);
    }
}
