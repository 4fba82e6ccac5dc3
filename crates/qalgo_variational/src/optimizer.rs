//! Variational optimizer
//!
//! Outer loop: θ ↦ ansatz circuit ↦ ⟨O⟩ ↦ minimizer. The loop is
//! sequential and every evaluation is checked for a finite result.

use crate::ansatz::{Ansatz, QaoaAnsatz};
use crate::config::OptimizerConfig;
use crate::expectation::{ExpectationEstimator, StatevectorEstimator};
use crate::minimizer::{self, IterationRecord, Minimizer, StoppingCriteria};
use qalgo_backend::Simulator;
use qalgo_core::constants::{optimizer, DEFAULT_MAX_QUBITS, EPSILON};
use qalgo_core::{Observable, QalgoError, QalgoResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Final state of an optimization run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OptimizationStatus {
    /// Convergence test passed
    Converged,

    /// Iteration cap hit before convergence
    MaxIterationsReached,

    /// Result rejected after the run
    Failed {
        /// Why the result was rejected
        reason: String,
    },
}

impl OptimizationStatus {
    /// True for `Converged`
    pub fn is_converged(&self) -> bool {
        matches!(self, OptimizationStatus::Converged)
    }
}

impl fmt::Display for OptimizationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimizationStatus::Converged => write!(f, "converged"),
            OptimizationStatus::MaxIterationsReached => write!(f, "max iterations reached"),
            OptimizationStatus::Failed { reason } => write!(f, "failed: {}", reason),
        }
    }
}

/// Variational optimization result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Lowest expectation found
    pub value: f64,

    /// Parameters achieving `value`
    pub params: Vec<f64>,

    /// Outcome
    pub status: OptimizationStatus,

    /// Outer iterations
    pub iterations: usize,

    /// Objective evaluations
    pub evaluations: usize,

    /// Minimizer used
    pub minimizer: String,

    /// Σ|c_k| of the observable
    pub spectral_bound: f64,

    /// Per-iteration trace
    pub history: Vec<IterationRecord>,
}

impl OptimizationResult {
    /// True if the run converged
    pub fn converged(&self) -> bool {
        self.status.is_converged()
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> QalgoResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for OptimizationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OptimizationResult(value={:.6}, status={}, iterations={}, evaluations={}, minimizer={})",
            self.value, self.status, self.iterations, self.evaluations, self.minimizer
        )
    }
}

// ============================================================================
// VariationalOptimizer
// ============================================================================

/// Minimizes ⟨O⟩ over an ansatz
pub struct VariationalOptimizer<X: ExpectationEstimator> {
    config: OptimizerConfig,
    estimator: X,
}

impl VariationalOptimizer<StatevectorEstimator<Simulator>> {
    /// Exact optimizer on a fresh simulator
    pub fn statevector(config: OptimizerConfig) -> QalgoResult<Self> {
        Self::new(config, StatevectorEstimator::new(Simulator::new()))
    }
}

impl<X: ExpectationEstimator> VariationalOptimizer<X> {
    // ========================================================================
    // Constructor
    // ========================================================================

    /// Create an optimizer; the configuration is validated
    pub fn new(config: OptimizerConfig, estimator: X) -> QalgoResult<Self> {
        config.validate()?;
        Ok(Self { config, estimator })
    }

    // ========================================================================
    // Main Optimization
    // ========================================================================

    /// Minimize with the configured minimizer
    pub fn minimize(
        &mut self,
        ansatz: &dyn Ansatz,
        observable: &Observable,
        initial_params: &[f64],
    ) -> QalgoResult<OptimizationResult> {
        let mut strategy = minimizer::from_config(&self.config);
        self.minimize_with(strategy.as_mut(), ansatz, observable, initial_params)
    }

    /// Minimize with an explicit minimizer
    pub fn minimize_with(
        &mut self,
        strategy: &mut dyn Minimizer,
        ansatz: &dyn Ansatz,
        observable: &Observable,
        initial_params: &[f64],
    ) -> QalgoResult<OptimizationResult> {
        observable.validate(ansatz.num_qubits())?;
        if initial_params.len() != ansatz.num_parameters() {
            return Err(QalgoError::ParameterCountMismatch {
                expected: ansatz.num_parameters(),
                got: initial_params.len(),
            });
        }

        let bound = observable.spectral_bound();
        let mut evaluations = 0usize;
        let estimator = &mut self.estimator;
        let mut objective = |params: &[f64]| -> QalgoResult<f64> {
            evaluations += 1;
            let circuit = ansatz.circuit(params)?;
            let value = estimator.estimate(&circuit, observable)?;
            if !value.is_finite() {
                return Err(QalgoError::NonFiniteExpectation {
                    evaluation: evaluations,
                    value,
                });
            }
            Ok(value)
        };

        // Nothing to search: a single evaluation is exact
        if observable.is_constant() || ansatz.num_parameters() == 0 {
            let value = objective(initial_params)?;
            log::info!(
                "{}: single evaluation, value {:.9}",
                ansatz.name(),
                value
            );
            return Ok(self.finish(OptimizationResult {
                value,
                params: initial_params.to_vec(),
                status: OptimizationStatus::Converged,
                iterations: 0,
                evaluations: 1,
                minimizer: "none".to_string(),
                spectral_bound: bound,
                history: Vec::new(),
            }));
        }

        let criteria = StoppingCriteria::from_config(&self.config);
        log::debug!(
            "{}: minimizing over {} parameters with {} ({} terms, bound {:.4})",
            ansatz.name(),
            initial_params.len(),
            strategy.name(),
            observable.len(),
            bound
        );
        let outcome = strategy.minimize(&mut objective, initial_params, &criteria)?;

        let status = if outcome.converged {
            OptimizationStatus::Converged
        } else {
            OptimizationStatus::MaxIterationsReached
        };
        let result = OptimizationResult {
            value: outcome.value,
            params: outcome.params,
            status,
            iterations: outcome.iterations,
            evaluations,
            minimizer: strategy.name().to_string(),
            spectral_bound: bound,
            history: outcome.history,
        };
        Ok(self.finish(result))
    }

    /// Bound check and final log line
    fn finish(&self, mut result: OptimizationResult) -> OptimizationResult {
        let slack = EPSILON * result.spectral_bound.max(1.0);
        if result.value.abs() > result.spectral_bound + slack {
            let reason = format!(
                "expectation {} outside spectral bound ±{}",
                result.value, result.spectral_bound
            );
            log::warn!("optimizer status downgraded: {}", reason);
            result.status = OptimizationStatus::Failed { reason };
        }
        log::info!(
            "optimizer finished: value {:.9}, {} after {} iterations ({} evaluations)",
            result.value,
            result.status,
            result.iterations,
            result.evaluations
        );
        result
    }

    /// QAOA search for the lowest eigenvalue of `observable`
    pub fn minimum_eigenvalue(
        &mut self,
        observable: &Observable,
        layers: usize,
    ) -> QalgoResult<OptimizationResult> {
        let ansatz = QaoaAnsatz::new(observable.clone(), layers)?;
        let initial = self.config.initial_parameters(ansatz.num_parameters());
        self.minimize(&ansatz, observable, &initial)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Configuration
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Estimator
    pub fn estimator(&self) -> &X {
        &self.estimator
    }
}

// ============================================================================
// Convenience Entry Points
// ============================================================================

/// Lowest eigenvalue estimate via QAOA on the exact simulator
pub fn minimum_eigenvalue(observable: &Observable, layers: usize) -> QalgoResult<OptimizationResult> {
    VariationalOptimizer::statevector(OptimizerConfig::default())?
        .minimum_eigenvalue(observable, layers)
}

/// Same as [`minimum_eigenvalue`] with the default layer count
pub fn compute_minimum_eigenvalue(observable: &Observable) -> QalgoResult<OptimizationResult> {
    minimum_eigenvalue(observable, optimizer::DEFAULT_QAOA_LAYERS)
}

/// Exact diagonal minimum for Z-only observables
///
/// Returns `None` if any term has an X or Y factor or the register is
/// larger than the default simulator limit.
pub fn exact_minimum_eigenvalue(observable: &Observable) -> Option<f64> {
    let n = observable.min_qubits();
    if !observable.is_diagonal() || n > DEFAULT_MAX_QUBITS {
        return None;
    }
    (0..1u64 << n)
        .filter_map(|i| observable.diagonal_value(i))
        .reduce(f64::min)
}

// ============================================================================
// Tests
// ============================================================================
