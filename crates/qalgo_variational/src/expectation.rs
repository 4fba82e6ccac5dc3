//! Observable expectation estimators
//!
//! ⟨ψ|O|ψ⟩ = Σ_k c_k ⟨ψ|P_k|ψ⟩. Each Pauli string is rotated onto Z
//! (X: H, Y: S†·H) and then read off as a parity over its support:
//!
//!   ⟨P⟩ = Σ_i p_i · (−1)^{popcount(i & mask)}

use qalgo_backend::{apply_gates, Executor, MeasurementResult, StateVector};
use qalgo_core::constants::{DEFAULT_SHOTS, MAX_SHOTS};
use qalgo_core::{Circuit, Gate, Observable, PauliTerm, QalgoError, QalgoResult};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Estimates ⟨O⟩ for the state a circuit prepares
pub trait ExpectationEstimator {
    /// Estimator name
    fn name(&self) -> &str;

    /// Expectation of `observable` after running `circuit` from |0…0⟩
    fn estimate(&mut self, circuit: &Circuit, observable: &Observable) -> QalgoResult<f64>;
}

/// Gates rotating every factor of `term` onto Z
fn basis_change(term: &PauliTerm) -> Vec<Gate> {
    term.factors()
        .flat_map(|(q, p)| Gate::basis_transform(q, p))
        .collect()
}

/// Σ_i p_i · sign_i for an already basis-changed state
fn parity_expectation(state: &StateVector, term: &PauliTerm) -> f64 {
    state
        .probabilities()
        .iter()
        .enumerate()
        .map(|(i, p)| p * term.parity_sign(i as u64))
        .sum()
}

/// Exact ⟨O⟩ for a statevector
pub fn expectation_from_state(state: &StateVector, observable: &Observable) -> QalgoResult<f64> {
    observable.validate(state.num_qubits())?;

    let mut total = 0.0;
    for term in observable.terms() {
        let value = if term.is_identity() {
            1.0
        } else if term.is_diagonal() {
            parity_expectation(state, term)
        } else {
            let mut rotated = state.clone();
            apply_gates(&mut rotated, &basis_change(term))?;
            parity_expectation(&rotated, term)
        };
        total += term.coeff() * value;
    }
    Ok(total)
}

/// ⟨P⟩ estimated from counts taken after the basis change
pub fn parity_from_counts(measurement: &MeasurementResult, term: &PauliTerm) -> f64 {
    let shots = measurement.total_counts();
    if shots == 0 {
        return 0.0;
    }
    let signed: f64 = measurement
        .counts
        .iter()
        .filter_map(|(bs, &n)| u64::from_str_radix(bs, 2).ok().map(|i| (i, n)))
        .map(|(i, n)| term.parity_sign(i) * n as f64)
        .sum();
    signed / shots as f64
}

// ============================================================================
// StatevectorEstimator
// ============================================================================

/// Exact estimator: one statevector run per evaluation
#[derive(Debug, Clone)]
pub struct StatevectorEstimator<E: Executor> {
    executor: E,
}

impl<E: Executor> StatevectorEstimator<E> {
    /// Create an estimator over `executor`
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Underlying executor
    pub fn executor(&self) -> &E {
        &self.executor
    }
}

impl<E: Executor> ExpectationEstimator for StatevectorEstimator<E> {
    fn name(&self) -> &str {
        "statevector"
    }

    fn estimate(&mut self, circuit: &Circuit, observable: &Observable) -> QalgoResult<f64> {
        observable.validate(circuit.num_qubits())?;
        if observable.is_constant() {
            return Ok(observable.constant_part());
        }
        let state = self.executor.statevector(circuit)?;
        expectation_from_state(&state, observable)
    }
}

// ============================================================================
// SampledEstimator
// ============================================================================

/// Shot-noise estimator: each non-identity term is measured separately
#[derive(Debug, Clone)]
pub struct SampledEstimator<E: Executor> {
    executor: E,
    shots: u64,
    rng: ChaCha8Rng,
}

impl<E: Executor> SampledEstimator<E> {
    /// Create an estimator with `shots` per term and a fixed seed
    pub fn new(executor: E, shots: u64, seed: u64) -> QalgoResult<Self> {
        if shots == 0 || shots > MAX_SHOTS {
            return Err(QalgoError::InvalidShots {
                shots,
                max: MAX_SHOTS,
            });
        }
        Ok(Self {
            executor,
            shots,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    /// Estimator with the default shot budget
    pub fn with_default_shots(executor: E, seed: u64) -> QalgoResult<Self> {
        Self::new(executor, DEFAULT_SHOTS, seed)
    }

    /// Shots per term
    pub fn shots(&self) -> u64 {
        self.shots
    }

    fn measure_term(&mut self, prepared: &Circuit, term: &PauliTerm) -> QalgoResult<f64> {
        let mut circuit = prepared.clone();
        circuit.add_gates(basis_change(term))?;
        circuit.add_gate(Gate::MeasureAll)?;
        let measurement = self.executor.sample(&circuit, self.shots, &mut self.rng)?;
        Ok(parity_from_counts(&measurement, term))
    }
}

impl<E: Executor> ExpectationEstimator for SampledEstimator<E> {
    fn name(&self) -> &str {
        "sampled"
    }

    fn estimate(&mut self, circuit: &Circuit, observable: &Observable) -> QalgoResult<f64> {
        observable.validate(circuit.num_qubits())?;

        // Drop a terminal measurement so basis changes can follow
        let prepared = Circuit::from_gates(
            circuit.num_qubits(),
            circuit
                .gates()
                .iter()
                .filter(|g| !g.is_measurement())
                .cloned()
                .collect(),
        )?;

        let mut total = 0.0;
        for term in observable.terms() {
            if term.is_identity() {
                total += term.coeff();
            } else {
                total += term.coeff() * self.measure_term(&prepared, term)?;
            }
        }
        Ok(total)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use qalgo_backend::Simulator;
    use qalgo_core::{CircuitBuilder, Pauli};
    use std::f64::consts::FRAC_PI_2;

    fn obs(term: PauliTerm) -> Observable {
        Observable::new().with_term(term)
    }

    #[test]
    fn test_identity_is_scalar() {
        let mut est = StatevectorEstimator::new(Simulator::new());
        let c = CircuitBuilder::new(2).h(0).build().unwrap();
        let v = est.estimate(&c, &Observable::identity(-2.5)).unwrap();
        assert_abs_diff_eq!(v, -2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_z_on_basis_states() {
        let mut est = StatevectorEstimator::new(Simulator::new());
        let zero = Circuit::new(1);
        let one = CircuitBuilder::new(1).x(0).build().unwrap();
        assert_abs_diff_eq!(est.estimate(&zero, &obs(PauliTerm::z(0, 1.0))).unwrap(), 1.0);
        assert_abs_diff_eq!(est.estimate(&one, &obs(PauliTerm::z(0, 1.0))).unwrap(), -1.0);
    }

    #[test]
    fn test_x_and_y_basis_change() {
        let mut est = StatevectorEstimator::new(Simulator::new());
        let plus = CircuitBuilder::new(1).h(0).build().unwrap();
        // S·H|0⟩ = |+i⟩
        let plus_i = CircuitBuilder::new(1).h(0).s(0).build().unwrap();
        let y = obs(PauliTerm::new(1.0).with_factor(0, Pauli::Y));

        assert_abs_diff_eq!(est.estimate(&plus, &obs(PauliTerm::x(0, 1.0))).unwrap(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(est.estimate(&plus, &obs(PauliTerm::z(0, 1.0))).unwrap(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(est.estimate(&plus_i, &y).unwrap(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(est.estimate(&plus, &y).unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_bell_correlations() {
        let mut est = StatevectorEstimator::new(Simulator::new());
        let bell = CircuitBuilder::new(2).h(0).cnot(0, 1).build().unwrap();
        let zz = Observable::from_label("ZZ", 1.0).unwrap();
        let xx = Observable::from_label("XX", 1.0).unwrap();
        let yy = Observable::from_label("YY", 1.0).unwrap();
        assert_abs_diff_eq!(est.estimate(&bell, &zz).unwrap(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(est.estimate(&bell, &xx).unwrap(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(est.estimate(&bell, &yy).unwrap(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ry_cosine() {
        let mut est = StatevectorEstimator::new(Simulator::new());
        for &theta in &[0.0, 0.3, FRAC_PI_2, 2.0, 3.0] {
            let c = CircuitBuilder::new(1).ry(0, theta).build().unwrap();
            let v = est.estimate(&c, &obs(PauliTerm::z(0, 1.0))).unwrap();
            assert_abs_diff_eq!(v, theta.cos(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_observable_out_of_range() {
        let mut est = StatevectorEstimator::new(Simulator::new());
        let err = est
            .estimate(&Circuit::new(2), &obs(PauliTerm::z(2, 1.0)))
            .unwrap_err();
        assert!(err.is_observable_error());
    }

    #[test]
    fn test_sampled_exact_cases() {
        let mut est = SampledEstimator::new(Simulator::new(), 256, 1).unwrap();
        let plus = CircuitBuilder::new(1).h(0).build().unwrap();
        let one = CircuitBuilder::new(1).x(0).build().unwrap();
        assert_abs_diff_eq!(est.estimate(&plus, &obs(PauliTerm::x(0, 2.0))).unwrap(), 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(est.estimate(&one, &obs(PauliTerm::z(0, 1.0))).unwrap(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sampled_close_to_exact() {
        let c = CircuitBuilder::new(2).ry(0, 1.0).ry(1, 0.4).cnot(0, 1).build().unwrap();
        let o = Observable::new()
            .with_term(PauliTerm::zz(0, 1, 0.7))
            .with_term(PauliTerm::x(1, -0.3))
            .with_term(PauliTerm::identity(0.5));

        let exact = StatevectorEstimator::new(Simulator::new()).estimate(&c, &o).unwrap();
        let sampled = SampledEstimator::new(Simulator::new(), 20_000, 9)
            .unwrap()
            .estimate(&c, &o)
            .unwrap();
        assert!((exact - sampled).abs() < 0.05, "exact {} sampled {}", exact, sampled);
    }

    #[test]
    fn test_sampled_reproducible() {
        let c = CircuitBuilder::new(1).ry(0, 1.2).measure_all().build().unwrap();
        let o = obs(PauliTerm::z(0, 1.0));
        let a = SampledEstimator::new(Simulator::new(), 500, 4).unwrap().estimate(&c, &o).unwrap();
        let b = SampledEstimator::new(Simulator::new(), 500, 4).unwrap().estimate(&c, &o).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_sampled_rejects_zero_shots() {
        assert!(SampledEstimator::new(Simulator::new(), 0, 0)
            .unwrap_err()
            .is_configuration_error());
    }
}
