//! # QALGO Core
//!
//! Core types, gates, circuits and observables for the QALGO
//! quantum-algorithm toolkit.
//!
//! ## Quick Start
//!
//! ```rust
//! use qalgo_core::prelude::*;
//!
//! // Build a simple circuit
//! let circuit = CircuitBuilder::new(3)
//!     .h(0)
//!     .cnot(0, 1)
//!     .cnot(1, 2)
//!     .measure_all()
//!     .build()
//!     .unwrap();
//!
//! println!("{}", circuit);
//! ```
//!
//! ## Construction-Time Validation
//!
//! ```rust
//! use qalgo_core::prelude::*;
//!
//! let err = CircuitBuilder::new(2)
//!     .h(0)
//!     .measure_all()
//!     .x(1)
//!     .build()
//!     .unwrap_err();
//! assert!(err.is_circuit_error());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Core types
pub mod types;

/// Constants
pub mod constants;

/// Error types
pub mod error;

/// Quantum gates
pub mod gate;

/// Circuit structure
pub mod circuit;

/// Circuit builder
pub mod builder;

/// Pauli-sum observables
pub mod observable;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::CircuitBuilder;
pub use circuit::Circuit;
pub use error::{ErrorKind, QalgoError, QalgoResult};
pub use gate::{Gate, SingleQubitGate};
pub use observable::{Observable, PauliTerm};
pub use types::{index_to_bitstring, Angle, Bitstring, Counts, ParamVec, Pauli, QubitId};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases
    //!
    //! ```rust
    //! use qalgo_core::prelude::*;
    //! ```

    pub use crate::builder::CircuitBuilder;
    pub use crate::circuit::Circuit;
    pub use crate::constants;
    pub use crate::error::{ErrorKind, QalgoError, QalgoResult};
    pub use crate::gate::{Gate, SingleQubitGate};
    pub use crate::observable::{Observable, PauliTerm};
    pub use crate::types::{
        index_to_bitstring, Angle, Bitstring, Counts, ParamVec, Pauli, QubitId,
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
