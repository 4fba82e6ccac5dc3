//! # QALGO Variational
//!
//! Parameterized circuits, observable expectation and a classical outer
//! loop that minimizes ⟨ψ(θ)|O|ψ(θ)⟩.
//!
//! ## Quick Start
//!
//! ```rust
//! use qalgo_variational::prelude::*;
//! use qalgo_core::{Observable, PauliTerm};
//!
//! // Z⊗Z on qubits 2 and 3
//! let obs = Observable::from_label("ZZII", 1.0).unwrap();
//! let result = minimum_eigenvalue(&obs, 2).unwrap();
//! assert!(result.value < 1.0);
//!
//! // Custom ansatz and minimizer
//! let config = OptimizerConfig::new().with_method(MinimizerMethod::NelderMead);
//! let mut optimizer = VariationalOptimizer::statevector(config).unwrap();
//! let ansatz = HardwareEfficientAnsatz::new(1, 1).unwrap();
//! let z = Observable::new().with_term(PauliTerm::z(0, 1.0));
//! let result = optimizer.minimize(&ansatz, &z, &[0.1, 0.1, 0.1]).unwrap();
//! assert!(result.value < -0.99);
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Optimizer configuration
pub mod config;

/// Convergence detection
pub mod convergence;

/// Parameterized circuit templates
pub mod ansatz;

/// Expectation estimators
pub mod expectation;

/// Classical minimizers
pub mod minimizer;

/// Outer optimization loop
pub mod optimizer;

// ============================================================================
// Re-exports
// ============================================================================

pub use ansatz::{Ansatz, FnAnsatz, HardwareEfficientAnsatz, QaoaAnsatz};
pub use config::{GradientRule, MinimizerMethod, OptimizerConfig};
pub use convergence::{Convergence, StepSchedule};
pub use expectation::{
    expectation_from_state, ExpectationEstimator, SampledEstimator, StatevectorEstimator,
};
pub use minimizer::{
    CoordinateDescent, GradientDescent, IterationRecord, Minimizer, MinimizerOutcome,
    NelderMead, StoppingCriteria,
};
pub use optimizer::{
    compute_minimum_eigenvalue, exact_minimum_eigenvalue, minimum_eigenvalue,
    OptimizationResult, OptimizationStatus, VariationalOptimizer,
};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Prelude module for convenient imports

    pub use crate::ansatz::{Ansatz, FnAnsatz, HardwareEfficientAnsatz, QaoaAnsatz};
    pub use crate::config::{GradientRule, MinimizerMethod, OptimizerConfig};
    pub use crate::expectation::{ExpectationEstimator, SampledEstimator, StatevectorEstimator};
    pub use crate::minimizer::Minimizer;
    pub use crate::optimizer::{
        exact_minimum_eigenvalue, minimum_eigenvalue, OptimizationResult, OptimizationStatus,
        VariationalOptimizer,
    };
}

// ============================================================================
// Version Information
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use qalgo_backend::Simulator;
    use qalgo_core::{Observable, PauliTerm};

    #[test]
    fn test_sampled_optimizer_near_exact() {
        let obs = Observable::new().with_term(PauliTerm::z(0, 1.0));
        let estimator = SampledEstimator::new(Simulator::new(), 4096, 11).unwrap();
        let config = OptimizerConfig::new()
            .with_method(MinimizerMethod::NelderMead)
            .with_tolerance(1e-3)
            .with_max_iterations(150);
        let mut opt = VariationalOptimizer::new(config, estimator).unwrap();
        let result = opt
            .minimize(&HardwareEfficientAnsatz::new(1, 1).unwrap(), &obs, &[0.5, 0.1, 0.5])
            .unwrap();
        // Shot noise keeps the estimate inside the spectral bound
        assert!(result.value < -0.9, "{}", result);
        assert!(result.value >= -1.0);
    }

    #[test]
    fn test_transverse_field_ground_state() {
        // H = -Z0Z1 - 0.5 (X0 + X1): ground energy -√2, best product state -1.25
        let obs = Observable::new()
            .with_term(PauliTerm::zz(0, 1, -1.0))
            .with_term(PauliTerm::x(0, -0.5))
            .with_term(PauliTerm::x(1, -0.5));
        let config = OptimizerConfig::new().with_method(MinimizerMethod::NelderMead);
        let mut opt = VariationalOptimizer::statevector(config).unwrap();
        let ansatz = HardwareEfficientAnsatz::new(2, 2).unwrap();
        let initial = vec![0.2; ansatz.num_parameters()];
        let result = opt.minimize(&ansatz, &obs, &initial).unwrap();
        assert!(result.value < -1.0, "{}", result);
        assert!(result.value >= -obs.spectral_bound());
    }

    #[test]
    fn test_same_seed_same_start() {
        let config = OptimizerConfig::new().with_seed(21);
        let a = config.initial_parameters(4);
        let b = config.clone().initial_parameters(4);
        assert_eq!(a, b);
    }
}
