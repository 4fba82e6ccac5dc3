//! Circuit execution types and traits
//!
//! Defines the abstract executor capability the algorithm engines consume,
//! and the measurement result it produces.

use crate::state::StateVector;
use qalgo_core::{index_to_bitstring, Circuit, Counts, QalgoResult};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of sampling a circuit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementResult {
    /// Measurement counts (bitstring -> count), MSB-first bitstrings
    pub counts: Counts,

    /// Number of shots drawn
    pub shots: u64,

    /// Execution metadata
    pub metadata: ExecutionMetadata,
}

/// Execution metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionMetadata {
    /// Executor name
    pub executor: String,

    /// Register size
    pub num_qubits: usize,

    /// Seed, when sampling was seeded
    pub seed: Option<u64>,
}

impl MeasurementResult {
    /// Create a new measurement result
    pub fn new(counts: Counts, shots: u64, num_qubits: usize, executor: &str) -> Self {
        Self {
            counts,
            shots,
            metadata: ExecutionMetadata {
                executor: executor.to_string(),
                num_qubits,
                seed: None,
            },
        }
    }

    /// Record the seed used
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.metadata.seed = Some(seed);
        self
    }

    /// Sum of all counts (equals shots)
    pub fn total_counts(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Empirical probability of a bitstring
    pub fn probability(&self, bitstring: &str) -> f64 {
        if self.shots == 0 {
            return 0.0;
        }
        self.count(bitstring) as f64 / self.shots as f64
    }

    /// Count for a bitstring (0 if never observed)
    pub fn count(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Count for a basis index
    pub fn count_of_index(&self, index: u64) -> u64 {
        self.count(&index_to_bitstring(index, self.metadata.num_qubits))
    }

    /// Most frequent bitstring (smallest bitstring on ties)
    pub fn most_frequent(&self) -> Option<(&str, u64)> {
        self.counts
            .iter()
            .fold(None, |best: Option<(&String, u64)>, (bs, &c)| match best {
                Some((_, bc)) if bc >= c => best,
                _ => Some((bs, c)),
            })
            .map(|(bs, c)| (bs.as_str(), c))
    }

    /// True if `bitstring` was observed strictly more often than any other
    pub fn dominates(&self, bitstring: &str) -> bool {
        let own = self.count(bitstring);
        own > 0
            && self
                .counts
                .iter()
                .filter(|(bs, _)| bs.as_str() != bitstring)
                .all(|(_, &c)| c < own)
    }

    /// Outcomes sorted by descending count
    pub fn sorted_by_count(&self) -> Vec<(&str, u64)> {
        let mut v: Vec<(&str, u64)> = self.counts.iter().map(|(b, &c)| (b.as_str(), c)).collect();
        v.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        v
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> QalgoResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for MeasurementResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MeasurementResult(shots={}, unique={}",
            self.shots,
            self.counts.len()
        )?;
        if let Some((bs, c)) = self.most_frequent() {
            write!(f, ", top={}:{}", bs, c)?;
        }
        write!(f, ")")
    }
}

/// Abstract circuit executor
///
/// Engines take any `Executor`; the statevector [`Simulator`](crate::Simulator)
/// is the one implementation shipped.
pub trait Executor: Send + Sync {
    /// Executor name
    fn name(&self) -> &str;

    /// Largest register this executor accepts
    fn max_qubits(&self) -> usize;

    /// Final statevector of `circuit` from |0…0⟩
    fn statevector(&self, circuit: &Circuit) -> QalgoResult<StateVector>;

    /// Sample `shots` measurements of `circuit` using `rng`
    fn sample(
        &self,
        circuit: &Circuit,
        shots: u64,
        rng: &mut dyn RngCore,
    ) -> QalgoResult<MeasurementResult>;

    /// Sample several circuits with one random stream
    fn sample_batch(
        &self,
        circuits: &[Circuit],
        shots: u64,
        rng: &mut dyn RngCore,
    ) -> QalgoResult<Vec<MeasurementResult>> {
        circuits
            .iter()
            .map(|c| self.sample(c, shots, &mut *rng))
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
