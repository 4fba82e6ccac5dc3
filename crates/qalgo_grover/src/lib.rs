//! # QALGO Grover
//!
//! Amplitude-amplification search over `2^N` basis states.
//!
//! ## Quick Start
//!
//! ```rust
//! use qalgo_grover::prelude::*;
//! use qalgo_backend::Simulator;
//!
//! // 16-entry database, marked index 5
//! let config = GroverConfig::new(4, 5).with_seed(42);
//! let mut engine = GroverEngine::new(config, Simulator::new()).unwrap();
//!
//! let result = engine.run().unwrap();
//! assert_eq!(result.iterations, 3);
//! assert!(result.target_dominates());
//! println!("{}", result);
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Search configuration
pub mod config;

/// Oracle and diffusion fragments
pub mod oracle;

/// Search engine
pub mod engine;

/// Search result
pub mod result;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::GroverConfig;
pub use engine::{search, GroverEngine, GroverStage};
pub use oracle::{
    diffusion, grover_iteration, optimal_iterations, oracle, search_circuit,
    theoretical_success_probability,
};
pub use result::GroverResult;

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Prelude module for convenient imports

    pub use crate::config::GroverConfig;
    pub use crate::engine::{search, GroverEngine, GroverStage};
    pub use crate::oracle::{optimal_iterations, theoretical_success_probability};
    pub use crate::result::GroverResult;
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
