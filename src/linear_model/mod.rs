//! Linear models trained by gradient descent.
//!
//! Includes a univariate linear-regression solver driven by explicit,
//! caller-controlled gradient steps.

use serde::{Deserialize, Serialize};

use crate::error::{PodarError, Result};

/// Univariate linear-regression gradient-descent solver.
///
/// Fits the model `h(x) = θ0 + θ1·x`, where an implicit bias feature
/// fixed at 1 accompanies every sample. The solver owns the paired
/// samples and the current parameters; each [`update`](Self::update)
/// call performs exactly one gradient step, and the caller decides how
/// many steps to take (there is no internal convergence check).
///
/// # Update Rule
///
/// With hypotheses `hᵢ = θ0 + θ1·xᵢ` taken as one snapshot:
///
/// ```text
/// θ0 = θ0 - step · mean((hᵢ - yᵢ) · 1)
/// θ1 = θ1 - step · mean((hᵢ - yᵢ) · xᵢ)
/// ```
///
/// Both parameters update from the *same* snapshot; neither sees the
/// other's new value mid-step.
///
/// # Examples
///
/// ```
/// use podar::linear_model::GradientDescent;
///
/// let mut solver = GradientDescent::new(
///     vec![3.0, 1.0, 0.0, 4.0],
///     vec![2.0, 2.0, 1.0, 3.0],
///     0.0,
///     1.0,
///     0.1,
/// ).expect("valid samples");
///
/// assert!((solver.mean_squared_error() - 0.5).abs() < 1e-6);
///
/// solver.update();
/// assert!((solver.theta0() - 0.0).abs() < 1e-6);
/// assert!((solver.theta1() - 0.85).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientDescent {
    x: Vec<f32>,
    y: Vec<f32>,
    theta0: f32,
    theta1: f32,
    step: f32,
}

impl GradientDescent {
    /// Creates a solver over paired samples with initial parameters and
    /// a fixed learning-rate step.
    ///
    /// # Errors
    ///
    /// Returns an error if `x` and `y` have different lengths, the
    /// samples are empty, or `step` is not positive.
    pub fn new(x: Vec<f32>, y: Vec<f32>, theta0: f32, theta1: f32, step: f32) -> Result<Self> {
        if x.len() != y.len() {
            return Err(PodarError::dimension_mismatch("samples", x.len(), y.len()));
        }
        if x.is_empty() {
            return Err(PodarError::empty_input("samples"));
        }
        if step <= 0.0 {
            return Err(PodarError::InvalidHyperparameter {
                param: "step".to_string(),
                value: step.to_string(),
                constraint: "> 0".to_string(),
            });
        }
        Ok(Self {
            x,
            y,
            theta0,
            theta1,
            step,
        })
    }

    /// Returns the current θ0 (intercept) value.
    #[must_use]
    pub fn theta0(&self) -> f32 {
        self.theta0
    }

    /// Returns the current θ1 (slope) value.
    #[must_use]
    pub fn theta1(&self) -> f32 {
        self.theta1
    }

    /// Returns the learning-rate step.
    #[must_use]
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Hypotheses for the current parameters, one per sample.
    fn hypotheses(&self) -> Vec<f32> {
        self.x
            .iter()
            .map(|&x| self.theta0 + self.theta1 * x)
            .collect()
    }

    /// Mean squared error of the current parameters.
    ///
    /// `(1 / 2n) · Σ (hᵢ - yᵢ)²`
    #[must_use]
    pub fn mean_squared_error(&self) -> f32 {
        let hypotheses = self.hypotheses();
        let sum: f32 = hypotheses
            .iter()
            .zip(self.y.iter())
            .map(|(&h, &y)| (h - y) * (h - y))
            .sum();
        sum / (2.0 * self.x.len() as f32)
    }

    /// Performs exactly one simultaneous gradient step.
    pub fn update(&mut self) {
        let hypotheses = self.hypotheses();
        let n = self.x.len() as f32;

        let residual_mean: f32 = hypotheses
            .iter()
            .zip(self.y.iter())
            .map(|(&h, &y)| h - y)
            .sum::<f32>()
            / n;
        let weighted_mean: f32 = hypotheses
            .iter()
            .zip(self.y.iter())
            .zip(self.x.iter())
            .map(|((&h, &y), &x)| (h - y) * x)
            .sum::<f32>()
            / n;

        self.theta0 -= self.step * residual_mean;
        self.theta1 -= self.step * weighted_mean;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_solver() -> GradientDescent {
        GradientDescent::new(
            vec![3.0, 1.0, 0.0, 4.0],
            vec![2.0, 2.0, 1.0, 3.0],
            0.0,
            1.0,
            0.1,
        )
        .expect("valid samples")
    }

    #[test]
    fn test_new_rejects_bad_input() {
        assert!(GradientDescent::new(vec![1.0], vec![1.0, 2.0], 0.0, 0.0, 0.1).is_err());
        assert!(GradientDescent::new(vec![], vec![], 0.0, 0.0, 0.1).is_err());
        assert!(GradientDescent::new(vec![1.0], vec![1.0], 0.0, 0.0, 0.0).is_err());
        assert!(GradientDescent::new(vec![1.0], vec![1.0], 0.0, 0.0, -0.5).is_err());
    }

    #[test]
    fn test_initial_error_matches_reference() {
        // hypotheses = x, residuals = [1, -1, -1, 1], error = 4 / 8.
        let solver = reference_solver();
        assert!((solver.mean_squared_error() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_single_update_matches_closed_form() {
        // residual mean = (1 - 1 - 1 + 1) / 4 = 0
        // weighted mean = (3 - 1 - 0 + 4) / 4 = 1.5
        let mut solver = reference_solver();
        solver.update();
        assert!((solver.theta0() - 0.0).abs() < 1e-6);
        assert!((solver.theta1() - 0.85).abs() < 1e-6);
    }

    #[test]
    fn test_update_uses_one_snapshot() {
        // With y = x both parameters start at the optimum except for an
        // intercept offset; a simultaneous step must not let theta0's
        // new value leak into theta1's gradient within the same call.
        let mut solver =
            GradientDescent::new(vec![1.0, 2.0], vec![2.0, 3.0], 0.0, 1.0, 0.5).expect("valid");
        // residuals = [-1, -1]; residual mean = -1; weighted mean = -1.5
        solver.update();
        assert!((solver.theta0() - 0.5).abs() < 1e-6);
        assert!((solver.theta1() - 1.75).abs() < 1e-6);
    }

    #[test]
    fn test_error_decreases_over_iterations() {
        let mut solver = reference_solver();
        let mut previous = solver.mean_squared_error();
        for _ in 0..5 {
            solver.update();
            let current = solver.mean_squared_error();
            assert!(current <= previous + 1e-6);
            previous = current;
        }
    }

    #[test]
    fn test_perfect_fit_is_stationary() {
        // y = 2x + 1 with theta = (1, 2): residuals are zero, so an
        // update must not move the parameters.
        let mut solver = GradientDescent::new(
            vec![1.0, 2.0, 3.0],
            vec![3.0, 5.0, 7.0],
            1.0,
            2.0,
            0.1,
        )
        .expect("valid");
        assert!(solver.mean_squared_error().abs() < 1e-12);
        solver.update();
        assert!((solver.theta0() - 1.0).abs() < 1e-6);
        assert!((solver.theta1() - 2.0).abs() < 1e-6);
    }
}
