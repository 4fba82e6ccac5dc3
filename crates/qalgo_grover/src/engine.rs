//! Grover search engine
//!
//! Drives the stages Initialize → Iterate(k) → Measure → Done against any
//! [`Executor`]. The exact success probability is read from the final
//! statevector; the reported counts come from the sampling stage.

use crate::config::GroverConfig;
use crate::oracle::{grover_iteration, search_circuit, theoretical_success_probability};
use crate::result::GroverResult;
use qalgo_backend::Executor;
use qalgo_core::{Circuit, CircuitBuilder, Gate, QalgoResult};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Engine stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroverStage {
    /// Uniform superposition not yet prepared
    Initialize,
    /// `k` oracle+diffusion steps applied so far
    Iterate(usize),
    /// Ready to sample
    Measure,
    /// Result produced
    Done,
}

impl fmt::Display for GroverStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroverStage::Initialize => write!(f, "initialize"),
            GroverStage::Iterate(k) => write!(f, "iterate({})", k),
            GroverStage::Measure => write!(f, "measure"),
            GroverStage::Done => write!(f, "done"),
        }
    }
}

/// Grover search engine
pub struct GroverEngine<E: Executor> {
    config: GroverConfig,
    executor: E,
    stage: GroverStage,
}

impl<E: Executor> GroverEngine<E> {
    // ========================================================================
    // Constructor
    // ========================================================================

    /// Create an engine; the configuration is validated before any simulation
    pub fn new(config: GroverConfig, executor: E) -> QalgoResult<Self> {
        config.validate(executor.max_qubits())?;
        Ok(Self {
            config,
            executor,
            stage: GroverStage::Initialize,
        })
    }

    // ========================================================================
    // Circuit Construction
    // ========================================================================

    /// Search circuit with `iterations` steps, without measurement
    pub fn circuit(&self, iterations: usize) -> QalgoResult<Circuit> {
        search_circuit(self.config.qubits, self.config.target, iterations)
    }

    // ========================================================================
    // Main Search
    // ========================================================================

    /// Run the search to completion
    pub fn run(&mut self) -> QalgoResult<GroverResult> {
        let n = self.config.qubits;
        let iterations = self.config.effective_iterations();

        self.stage = GroverStage::Initialize;
        let mut circuit = CircuitBuilder::with_name(n, "grover")
            .hadamard_all()
            .build()?;

        let step = grover_iteration(n, self.config.target)?;
        for k in 0..iterations {
            self.stage = GroverStage::Iterate(k);
            circuit.append(&step)?;
        }
        self.stage = GroverStage::Iterate(iterations);

        log::debug!(
            "grover: {} qubits, target {}, {} iterations, {} gates",
            n,
            self.config.target,
            iterations,
            circuit.gate_count()
        );

        let state = self.executor.statevector(&circuit)?;
        let success_probability = state.probability(self.config.target as usize);

        self.stage = GroverStage::Measure;
        circuit.add_gate(Gate::MeasureAll)?;
        let mut rng = match self.config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let mut measurement = self
            .executor
            .sample(&circuit, self.config.shots, &mut rng)?;
        if let Some(seed) = self.config.seed {
            measurement = measurement.with_seed(seed);
        }

        self.stage = GroverStage::Done;

        let result = GroverResult::new(
            measurement,
            iterations,
            self.config.target,
            n,
            success_probability,
        );
        log::info!(
            "grover: target {} found={} (p={:.4}, top={:?})",
            result.target_bitstring,
            result.found,
            success_probability,
            result.counts.most_frequent()
        );
        Ok(result)
    }

    /// Exact success probability after k = 0..=max_k iterations
    pub fn success_curve(&self, max_k: usize) -> QalgoResult<Vec<f64>> {
        (0..=max_k)
            .map(|k| {
                let state = self.executor.statevector(&self.circuit(k)?)?;
                Ok(state.probability(self.config.target as usize))
            })
            .collect()
    }

    /// Closed-form success probability for the configured iterations
    pub fn theoretical_success_probability(&self) -> f64 {
        theoretical_success_probability(self.config.qubits, self.config.effective_iterations())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Current stage
    pub fn stage(&self) -> GroverStage {
        self.stage
    }

    /// Configuration
    pub fn config(&self) -> &GroverConfig {
        &self.config
    }

    /// Executor
    pub fn executor(&self) -> &E {
        &self.executor
    }
}

/// Search with a fresh engine
pub fn search<E: Executor>(config: GroverConfig, executor: E) -> QalgoResult<GroverResult> {
    GroverEngine::new(config, executor)?.run()
}

// ============================================================================
// Tests
// ============================================================================
