//! Constants for QALGO
//!
//! Simulation limits, numerical tolerances and optimizer defaults.

/// Tolerance for normalization and unitary-application checks
pub const EPSILON: f64 = 1e-9;

/// Default maximum qubit count for a simulator instance
pub const DEFAULT_MAX_QUBITS: usize = 24;

/// Hard upper bound on qubits (2^30 amplitudes = 16 GiB)
pub const HARD_MAX_QUBITS: usize = 30;

/// Default number of measurement shots
pub const DEFAULT_SHOTS: u64 = 1024;

/// Upper bound on shots per sampling run
pub const MAX_SHOTS: u64 = 100_000_000;

// ============================================================================
// Optimizer Defaults
// ============================================================================

pub mod optimizer {
    //! Defaults for the variational outer loop

    /// Convergence tolerance on |Δ expectation|
    pub const DEFAULT_TOLERANCE: f64 = 1e-6;

    /// Maximum outer iterations
    pub const DEFAULT_MAX_ITERATIONS: usize = 200;

    /// Number of consecutive small improvements required to converge
    pub const DEFAULT_WINDOW: usize = 2;

    /// Initial probe step for coordinate descent / simplex size
    pub const DEFAULT_INITIAL_STEP: f64 = 0.5;

    /// Step shrink factor after a coordinate sweep without improvement
    pub const STEP_DECAY: f64 = 0.5;

    /// Floor below which a step is considered exhausted
    pub const MIN_STEP: f64 = 1e-8;

    /// Learning rate for gradient descent
    pub const DEFAULT_LEARNING_RATE: f64 = 0.2;

    /// Shift for parameter-shift gradients
    pub const PARAMETER_SHIFT: f64 = std::f64::consts::FRAC_PI_2;

    /// Step for central finite differences
    pub const FINITE_DIFF_STEP: f64 = 1e-4;

    /// QAOA layers used by the convenience entry point
    pub const DEFAULT_QAOA_LAYERS: usize = 2;
}

// ============================================================================
// Grover Defaults
// ============================================================================

pub mod grover {
    //! Grover search constants

    /// Database size of the reference search (2^4)
    pub const REFERENCE_QUBITS: usize = 4;

    /// Target index of the reference search
    pub const REFERENCE_TARGET: u64 = 5;

    /// Analytically optimal iteration count for `n` qubits: floor(π/4·√(2^n))
    pub fn optimal_iterations(n: usize) -> usize {
        // √(2^n) = 2^(n/2)
        let sqrt_size = 2f64.powf(n as f64 / 2.0);
        (std::f64::consts::FRAC_PI_4 * sqrt_size).floor() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits() {
        assert!(DEFAULT_MAX_QUBITS <= HARD_MAX_QUBITS);
        assert_eq!(DEFAULT_SHOTS, 1024);
    }

    #[test]
    fn test_optimal_iterations() {
        assert_eq!(grover::optimal_iterations(1), 1);
        assert_eq!(grover::optimal_iterations(2), 1);
        assert_eq!(grover::optimal_iterations(4), 3);
        assert_eq!(grover::optimal_iterations(6), 6);
        assert_eq!(grover::optimal_iterations(10), 25);
    }
}
