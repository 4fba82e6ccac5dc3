//! Grover benchmark sweeps
//!
//! For each register size the suite draws random targets, runs one seeded
//! search per seed and records how often the target was sampled and how
//! often it dominated the histogram.

use qalgo_backend::Simulator;
use qalgo_core::constants::DEFAULT_SHOTS;
use qalgo_core::QalgoResult;
use qalgo_grover::{search, theoretical_success_probability, GroverConfig};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Aggregate over all seeds at one register size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Benchmark name
    pub name: String,

    /// Number of qubits
    pub qubits: usize,

    /// Iterations per search
    pub iterations: usize,

    /// Searches run
    pub runs: usize,

    /// Shots per search
    pub shots: u64,

    /// sin²((2k+1)θ)
    pub theoretical_success: f64,

    /// Mean fraction of shots on the target
    pub empirical_success: f64,

    /// Fraction of runs where the target strictly dominated
    pub dominance_rate: f64,

    /// Wall time (milliseconds)
    pub time_ms: u64,
}

/// Summary over several benchmark results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkStatistics {
    /// Number of results
    pub count: usize,

    /// Mean empirical success
    pub mean_success: f64,

    /// Lowest empirical success
    pub min_success: f64,

    /// Mean dominance rate
    pub mean_dominance: f64,

    /// Total wall time (milliseconds)
    pub total_time_ms: u64,
}

impl BenchmarkStatistics {
    /// Summarize `results`
    pub fn from_results(results: &[BenchmarkResult]) -> Self {
        if results.is_empty() {
            return Self::default();
        }
        let n = results.len() as f64;
        Self {
            count: results.len(),
            mean_success: results.iter().map(|r| r.empirical_success).sum::<f64>() / n,
            min_success: results
                .iter()
                .map(|r| r.empirical_success)
                .fold(f64::INFINITY, f64::min),
            mean_dominance: results.iter().map(|r| r.dominance_rate).sum::<f64>() / n,
            total_time_ms: results.iter().map(|r| r.time_ms).sum(),
        }
    }
}

/// Benchmark suite
pub struct BenchSuite {
    seed: u64,
    shots: u64,
    results: Vec<BenchmarkResult>,
}

impl BenchSuite {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create with base seed 42
    pub fn new() -> Self {
        Self::with_seed(42)
    }

    /// Create with base seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            shots: DEFAULT_SHOTS,
            results: Vec::new(),
        }
    }

    /// Set shots per search
    pub fn with_shots(mut self, shots: u64) -> Self {
        self.shots = shots;
        self
    }

    // ========================================================================
    // Benchmarks
    // ========================================================================

    /// `seeds` searches on `qubits` qubits with random targets
    pub fn bench_grover(&mut self, qubits: usize, seeds: usize) -> QalgoResult<BenchmarkResult> {
        let mut target_rng = ChaCha8Rng::seed_from_u64(self.seed ^ qubits as u64);
        let size = 1u64 << qubits.min(63);

        let start = Instant::now();
        let mut success_sum = 0.0;
        let mut dominated = 0usize;
        let mut iterations = 0;
        for s in 0..seeds {
            let target = target_rng.gen_range(0..size);
            let config = GroverConfig::new(qubits, target)
                .with_shots(self.shots)
                .with_seed(self.seed.wrapping_add(s as u64));
            let result = search(config, Simulator::new())?;
            iterations = result.iterations;
            success_sum += result.empirical_success_rate();
            if result.target_dominates() {
                dominated += 1;
            }
        }
        let time_ms = start.elapsed().as_millis() as u64;

        let runs = seeds.max(1) as f64;
        let bench = BenchmarkResult {
            name: format!("grover_{}q", qubits),
            qubits,
            iterations,
            runs: seeds,
            shots: self.shots,
            theoretical_success: theoretical_success_probability(
                qubits,
                qalgo_grover::optimal_iterations(qubits),
            ),
            empirical_success: success_sum / runs,
            dominance_rate: dominated as f64 / runs,
            time_ms,
        };
        log::info!(
            "bench {}: success {:.4} (theory {:.4}), dominance {:.2}",
            bench.name,
            bench.empirical_success,
            bench.theoretical_success,
            bench.dominance_rate
        );
        self.results.push(bench.clone());
        Ok(bench)
    }

    /// Sweep register sizes 1..=max_qubits
    pub fn run_qubit_sweep(
        &mut self,
        max_qubits: usize,
        seeds: usize,
    ) -> QalgoResult<Vec<BenchmarkResult>> {
        (1..=max_qubits)
            .map(|n| self.bench_grover(n, seeds))
            .collect()
    }

    /// Small sweep for smoke testing
    pub fn run_quick(&mut self) -> QalgoResult<Vec<BenchmarkResult>> {
        self.run_qubit_sweep(4, 3)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// All results recorded so far
    pub fn results(&self) -> &[BenchmarkResult] {
        &self.results
    }

    /// Summary of recorded results
    pub fn statistics(&self) -> BenchmarkStatistics {
        BenchmarkStatistics::from_results(&self.results)
    }

    /// Forget recorded results
    pub fn clear(&mut self) {
        self.results.clear();
    }
}

impl Default for BenchSuite {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_bench_reference_size() {
        let mut suite = BenchSuite::with_seed(1);
        let r = suite.bench_grover(4, 5).unwrap();
        assert_eq!(r.qubits, 4);
        assert_eq!(r.iterations, 3);
        assert_eq!(r.runs, 5);
        assert_eq!(r.dominance_rate, 1.0);
        assert_abs_diff_eq!(r.empirical_success, r.theoretical_success, epsilon = 0.05);
    }

    #[test]
    fn test_sweep_and_statistics() {
        let mut suite = BenchSuite::with_seed(3).with_shots(256);
        let results = suite.run_qubit_sweep(3, 2).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].qubits, 1);

        let stats = suite.statistics();
        assert_eq!(stats.count, 3);
        assert!(stats.min_success <= stats.mean_success);

        suite.clear();
        assert!(suite.results().is_empty());
    }

    #[test]
    fn test_empty_statistics() {
        let stats = BenchmarkStatistics::from_results(&[]);
        assert_eq!(stats.count, 0);
    }
}
