//! Clustering pipeline
//!
//! Classical k-means on 2-D points, followed by an entangling register
//! circuit (H on qubit 0, CX chain) sized to hold the cluster index.
//! Labels and centroids are passed through to the caller untouched.

use crate::data::Point;
use crate::kmeans::{KMeans, KMeansModel};
use qalgo_backend::{Executor, MeasurementResult};
use qalgo_core::constants::DEFAULT_SHOTS;
use qalgo_core::{Circuit, CircuitBuilder, QalgoError, QalgoResult};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Register size for `k` clusters: max(2, ⌈log₂ k⌉)
pub fn register_qubits(k: usize) -> usize {
    let bits = if k <= 1 {
        0
    } else {
        (usize::BITS - (k - 1).leading_zeros()) as usize
    };
    bits.max(2)
}

/// H on qubit 0 followed by a CX chain, measured
pub fn register_circuit(num_qubits: usize) -> QalgoResult<Circuit> {
    CircuitBuilder::with_name(num_qubits, "cluster_register")
        .h(0)
        .cx_chain()
        .measure_all()
        .build()
}

/// Pipeline output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteringResult {
    /// Fitted model (labels, centroids)
    pub model: KMeansModel,

    /// Register size used
    pub register_qubits: usize,

    /// Register measurement counts
    pub measurement: MeasurementResult,
}

impl ClusteringResult {
    /// Serialize to JSON
    pub fn to_json(&self) -> QalgoResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for ClusteringResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ClusteringResult({}, register={}Q, outcomes={})",
            self.model,
            self.register_qubits,
            self.measurement.counts.len()
        )
    }
}

/// k-means followed by a register readout on an executor
pub struct ClusteringPipeline<E: Executor> {
    kmeans: KMeans,
    executor: E,
    shots: u64,
    seed: u64,
}

impl<E: Executor> ClusteringPipeline<E> {
    /// Create a pipeline
    pub fn new(kmeans: KMeans, executor: E) -> Self {
        let seed = kmeans.seed;
        Self {
            kmeans,
            executor,
            shots: DEFAULT_SHOTS,
            seed,
        }
    }

    /// Set register shots
    pub fn with_shots(mut self, shots: u64) -> Self {
        self.shots = shots;
        self
    }

    /// Set sampling seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// k-means configuration
    pub fn kmeans(&self) -> &KMeans {
        &self.kmeans
    }

    /// Run on 2-D points
    pub fn run(&self, points: &[Point]) -> QalgoResult<ClusteringResult> {
        if let Some((i, p)) = points.iter().enumerate().find(|(_, p)| p.len() != 2) {
            return Err(QalgoError::InvalidConfig(format!(
                "point {} has {} coordinates, expected 2",
                i,
                p.len()
            )));
        }

        let model = self.kmeans.fit(points)?;

        let n = register_qubits(self.kmeans.k);
        let circuit = register_circuit(n)?;
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let measurement = self
            .executor
            .sample(&circuit, self.shots, &mut rng)?
            .with_seed(self.seed);

        log::info!(
            "clustering: {} points into {} clusters, register {}Q on {}",
            points.len(),
            model.k(),
            n,
            self.executor.name()
        );

        Ok(ClusteringResult {
            model,
            register_qubits: n,
            measurement,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{gaussian_blobs, uniform_points};
    use qalgo_backend::Simulator;

    #[test]
    fn test_register_qubits() {
        assert_eq!(register_qubits(1), 2);
        assert_eq!(register_qubits(2), 2);
        assert_eq!(register_qubits(4), 2);
        assert_eq!(register_qubits(5), 3);
        assert_eq!(register_qubits(8), 3);
        assert_eq!(register_qubits(9), 4);
    }

    #[test]
    fn test_register_is_ghz() {
        let pipeline = ClusteringPipeline::new(KMeans::new(5), Simulator::new()).with_shots(2000);
        let result = pipeline.run(&uniform_points(30, 1)).unwrap();
        assert_eq!(result.register_qubits, 3);
        assert_eq!(result.measurement.total_counts(), 2000);
        // Only |000⟩ and |111⟩ occur
        for bs in result.measurement.counts.keys() {
            assert!(bs == "000" || bs == "111", "unexpected {}", bs);
        }
    }

    #[test]
    fn test_two_clusters_like_reference_run() {
        let pts = gaussian_blobs(&[[0.2, 0.2], [0.8, 0.8]], 50, 0.05, 0);
        let result = ClusteringPipeline::new(KMeans::new(2), Simulator::new())
            .run(&pts)
            .unwrap();
        assert_eq!(result.model.labels.len(), 100);
        assert_eq!(result.model.centroids.len(), 2);
        assert_eq!(result.register_qubits, 2);
        assert_eq!(result.measurement.metadata.seed, Some(0));
    }

    #[test]
    fn test_rejects_non_planar_points() {
        let pts = vec![vec![0.0, 0.0, 1.0], vec![1.0, 1.0, 1.0]];
        let err = ClusteringPipeline::new(KMeans::new(1), Simulator::new())
            .run(&pts)
            .unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_reproducible() {
        let pts = uniform_points(60, 4);
        let pipeline = ClusteringPipeline::new(KMeans::new(3).with_seed(2), Simulator::new());
        let a = pipeline.run(&pts).unwrap();
        let b = pipeline.run(&pts).unwrap();
        assert_eq!(a.model, b.model);
        assert_eq!(a.measurement.counts, b.measurement.counts);
    }
}
