//! # QALGO Cluster
//!
//! Classical k-means clustering with an entangling register readout.
//!
//! ## Quick Start
//!
//! ```rust
//! use qalgo_cluster::prelude::*;
//! use qalgo_backend::Simulator;
//!
//! let points = uniform_points(100, 0);
//! let pipeline = ClusteringPipeline::new(KMeans::new(2), Simulator::new());
//! let result = pipeline.run(&points).unwrap();
//!
//! assert_eq!(result.model.labels.len(), 100);
//! println!("{}", result);
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Synthetic point sets
pub mod data;

/// k-means
pub mod kmeans;

/// Clustering pipeline
pub mod pipeline;

// ============================================================================
// Re-exports
// ============================================================================

pub use data::{gaussian_blobs, uniform_points, Point};
pub use kmeans::{KMeans, KMeansModel};
pub use pipeline::{register_circuit, register_qubits, ClusteringPipeline, ClusteringResult};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Prelude module for convenient imports

    pub use crate::data::{gaussian_blobs, uniform_points, Point};
    pub use crate::kmeans::{KMeans, KMeansModel};
    pub use crate::pipeline::{ClusteringPipeline, ClusteringResult};
}

// ============================================================================
// Version Information
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
