//! # QALGO Bench
//!
//! Count histograms, result reports and Grover benchmark sweeps.
//!
//! ## Quick Start
//!
//! ```rust
//! use qalgo_bench::prelude::*;
//!
//! let mut suite = BenchSuite::with_seed(42).with_shots(256);
//! let results = suite.run_quick().unwrap();
//!
//! let report = Reporter::benchmarks(&results, ReportFormat::Markdown).unwrap();
//! println!("{}", report);
//! ```
//!
//! ## Histograms
//!
//! ```rust
//! use qalgo_bench::Histogram;
//! use qalgo_backend::Simulator;
//! use qalgo_grover::{search, GroverConfig};
//!
//! let result = search(GroverConfig::reference(), Simulator::new()).unwrap();
//! print!("{}", Histogram::from_counts(&result.counts.counts, 40).top(4));
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Count histograms
pub mod histogram;

/// Benchmark suite
pub mod suite;

/// Reporting
pub mod reporter;

// ============================================================================
// Re-exports
// ============================================================================

pub use histogram::Histogram;
pub use reporter::{ReportFormat, Reporter};
pub use suite::{BenchSuite, BenchmarkResult, BenchmarkStatistics};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Prelude module for convenient imports

    pub use crate::histogram::Histogram;
    pub use crate::reporter::{ReportFormat, Reporter};
    pub use crate::suite::{BenchSuite, BenchmarkResult, BenchmarkStatistics};
}

// ============================================================================
// Version Information
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
