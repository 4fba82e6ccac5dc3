//! # QALGO Backend
//!
//! Statevector simulation and circuit execution for QALGO.
//!
//! ## Quick Start
//!
//! ```rust
//! use qalgo_backend::prelude::*;
//! use qalgo_core::CircuitBuilder;
//!
//! let sim = Simulator::new();
//!
//! let circuit = CircuitBuilder::new(3)
//!     .h(0)
//!     .cnot(0, 1)
//!     .cnot(1, 2)
//!     .measure_all()
//!     .build()
//!     .unwrap();
//!
//! // Exact amplitudes
//! let state = sim.run(&circuit).unwrap();
//! assert!(state.is_normalized());
//!
//! // Reproducible sampling
//! let result = sim.sample_seeded(&circuit, 1000, 42).unwrap();
//! assert_eq!(result.total_counts(), 1000);
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Statevector storage
pub mod state;

/// Gate application
pub mod apply;

/// Execution types and executor trait
pub mod execution;

/// Statevector simulator
pub mod simulator;

// ============================================================================
// Re-exports
// ============================================================================

pub use apply::{apply_gate, apply_gates, single_qubit_matrix};
pub use execution::{ExecutionMetadata, Executor, MeasurementResult};
pub use num_complex::Complex64;
pub use simulator::{sample_counts, Simulator};
pub use state::StateVector;

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use qalgo_backend::prelude::*;
    //! ```

    pub use crate::apply::apply_gate;
    pub use crate::execution::{ExecutionMetadata, Executor, MeasurementResult};
    pub use crate::simulator::Simulator;
    pub use crate::state::StateVector;
    pub use num_complex::Complex64;
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
    use approx::assert_abs_diff_eq;
    use qalgo_core::{CircuitBuilder, Gate, SingleQubitGate};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_ghz_parity() {
        let sim = Simulator::new();
        let circuit = CircuitBuilder::new(4)
            .h(0)
            .cx_chain()
            .measure_all()
            .build()
            .unwrap();

        let result = sim.sample_seeded(&circuit, 1000, 42).unwrap();
        assert_eq!(result.count("0000") + result.count("1111"), 1000);
    }

    #[test]
    fn test_generic_rng_and_executor_agree() {
        let sim = Simulator::new();
        let circuit = CircuitBuilder::new(2).hadamard_all().build().unwrap();

        let mut a = ChaCha8Rng::seed_from_u64(5);
        let mut b = ChaCha8Rng::seed_from_u64(5);
        let direct = sim.sample(&circuit, 200, &mut a).unwrap();
        let via_trait = Executor::sample(&sim, &circuit, 200, &mut b).unwrap();
        assert_eq!(direct.counts, via_trait.counts);
    }

    #[test]
    fn test_matrix_unitarity() {
        for g in [
            SingleQubitGate::H,
            SingleQubitGate::Y,
            SingleQubitGate::T,
            SingleQubitGate::Rx(0.7),
            SingleQubitGate::Ry(-1.1),
            SingleQubitGate::Phase(2.0),
        ] {
            let m = crate::single_qubit_matrix(g);
            // Columns orthonormal
            let c00 = m[0][0].norm_sqr() + m[1][0].norm_sqr();
            let c11 = m[0][1].norm_sqr() + m[1][1].norm_sqr();
            let c01 = m[0][0].conj() * m[0][1] + m[1][0].conj() * m[1][1];
            assert_abs_diff_eq!(c00, 1.0, epsilon = 1e-12);
            assert_abs_diff_eq!(c11, 1.0, epsilon = 1e-12);
            assert_abs_diff_eq!(c01.norm(), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_broadcast_matches_individual() {
        let sim = Simulator::new();
        let a = CircuitBuilder::new(3)
            .gate(Gate::Broadcast(SingleQubitGate::Ry(0.4), vec![0, 2]))
            .build()
            .unwrap();
        let b = CircuitBuilder::new(3).ry(0, 0.4).ry(2, 0.4).build().unwrap();
        assert!(sim.run(&a).unwrap().approx_eq(&sim.run(&b).unwrap(), 1e-12));
    }
}
