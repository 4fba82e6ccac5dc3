//! Statevector simulator
//!
//! Exact simulation of a circuit from |0…0⟩ (or a supplied state), with an
//! optional sampling stage. Randomness always comes from the caller; the
//! simulator itself holds no mutable state between runs.

use crate::apply::apply_gate;
use crate::execution::{Executor, MeasurementResult};
use crate::state::{check_qubit_count, StateVector};
use qalgo_core::constants::{DEFAULT_MAX_QUBITS, HARD_MAX_QUBITS, MAX_SHOTS};
use qalgo_core::{index_to_bitstring, Circuit, Counts, Gate, QalgoError, QalgoResult};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Statevector simulator
#[derive(Debug, Clone)]
pub struct Simulator {
    name: String,
    max_qubits: usize,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulator {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Simulator with the default qubit limit
    pub fn new() -> Self {
        Self {
            name: "statevector".to_string(),
            max_qubits: DEFAULT_MAX_QUBITS,
        }
    }

    /// Set the qubit limit (clamped to the hard cap)
    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        if max_qubits > HARD_MAX_QUBITS {
            log::warn!(
                "max_qubits {} exceeds hard cap, clamping to {}",
                max_qubits,
                HARD_MAX_QUBITS
            );
        }
        self.max_qubits = max_qubits.min(HARD_MAX_QUBITS);
        self
    }

    /// Set simulator name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// |0…0⟩ on `num_qubits` qubits, within this simulator's limit
    pub fn initial_state(&self, num_qubits: usize) -> QalgoResult<StateVector> {
        StateVector::new(num_qubits, self.max_qubits)
    }

    // ========================================================================
    // Statevector Mode
    // ========================================================================

    /// Run `circuit` from |0…0⟩
    pub fn run(&self, circuit: &Circuit) -> QalgoResult<StateVector> {
        let state = self.initial_state(circuit.num_qubits())?;
        self.run_from(circuit, state)
    }

    /// Run `circuit` from a supplied state
    pub fn run_from(&self, circuit: &Circuit, mut state: StateVector) -> QalgoResult<StateVector> {
        check_qubit_count(circuit.num_qubits(), self.max_qubits)?;
        if circuit.num_qubits() != state.num_qubits() {
            return Err(QalgoError::DimensionMismatch {
                circuit_qubits: circuit.num_qubits(),
                state_qubits: state.num_qubits(),
            });
        }

        for gate in circuit.gates() {
            if matches!(gate, Gate::MeasureAll) {
                break;
            }
            apply_gate(&mut state, gate)?;
        }

        log::debug!(
            "{}: ran {} gates on {} qubits",
            self.name,
            circuit.gate_count(),
            circuit.num_qubits()
        );
        Ok(state)
    }

    // ========================================================================
    // Sampling Mode
    // ========================================================================

    /// Sample `shots` measurements using `rng`
    pub fn sample<R: Rng + ?Sized>(
        &self,
        circuit: &Circuit,
        shots: u64,
        rng: &mut R,
    ) -> QalgoResult<MeasurementResult> {
        check_shots(shots)?;
        let state = self.run(circuit)?;
        let counts = sample_counts(&state, shots, rng);

        log::debug!(
            "{}: sampled {} shots, {} distinct outcomes",
            self.name,
            shots,
            counts.len()
        );
        Ok(MeasurementResult::new(
            counts,
            shots,
            circuit.num_qubits(),
            &self.name,
        ))
    }

    /// Sample with a fresh `ChaCha8Rng` seeded from `seed`
    pub fn sample_seeded(
        &self,
        circuit: &Circuit,
        shots: u64,
        seed: u64,
    ) -> QalgoResult<MeasurementResult> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Ok(self.sample(circuit, shots, &mut rng)?.with_seed(seed))
    }
}

impl Executor for Simulator {
    fn name(&self) -> &str {
        &self.name
    }

    fn max_qubits(&self) -> usize {
        self.max_qubits
    }

    fn statevector(&self, circuit: &Circuit) -> QalgoResult<StateVector> {
        self.run(circuit)
    }

    fn sample(
        &self,
        circuit: &Circuit,
        shots: u64,
        rng: &mut dyn RngCore,
    ) -> QalgoResult<MeasurementResult> {
        Simulator::sample(self, circuit, shots, rng)
    }
}

// ============================================================================
// Sampling Helpers
// ============================================================================

fn check_shots(shots: u64) -> QalgoResult<()> {
    if shots == 0 || shots > MAX_SHOTS {
        return Err(QalgoError::InvalidShots {
            shots,
            max: MAX_SHOTS,
        });
    }
    Ok(())
}

/// Draw `shots` basis outcomes from the Born distribution of `state`
///
/// Builds the cumulative distribution once and locates each draw by binary
/// search.
pub fn sample_counts<R: Rng + ?Sized>(state: &StateVector, shots: u64, rng: &mut R) -> Counts {
    let mut cdf = Vec::with_capacity(state.dim());
    let mut acc = 0.0;
    for p in state.probabilities() {
        acc += p;
        cdf.push(acc);
    }
    let total = acc;
    let last = cdf.len() - 1;

    let mut hits = vec![0u64; cdf.len()];
    for _ in 0..shots {
        let r = rng.gen::<f64>() * total;
        let idx = cdf.partition_point(|&c| c <= r).min(last);
        hits[idx] += 1;
    }

    hits.into_iter()
        .enumerate()
        .filter(|(_, c)| *c > 0)
        .map(|(i, c)| (index_to_bitstring(i as u64, state.num_qubits()), c))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
