//! Statevector storage
//!
//! `2^N` complex amplitudes indexed by basis state, qubit `q` being bit `q`
//! of the index. Memory and time per gate grow as `O(2^N)`, which is why the
//! qubit count is capped.

use num_complex::Complex64;
use qalgo_core::constants::{DEFAULT_MAX_QUBITS, EPSILON, HARD_MAX_QUBITS};
use qalgo_core::{index_to_bitstring, QalgoError, QalgoResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pure state of an N-qubit register
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateVector {
    num_qubits: usize,
    amplitudes: Vec<Complex64>,
}

impl StateVector {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// |0…0⟩ on `num_qubits` qubits, rejecting counts outside `[1, max_qubits]`
    pub fn new(num_qubits: usize, max_qubits: usize) -> QalgoResult<Self> {
        Self::basis_state_bounded(num_qubits, 0, max_qubits)
    }

    /// |0…0⟩ with the default qubit limit
    pub fn zero(num_qubits: usize) -> QalgoResult<Self> {
        Self::new(num_qubits, DEFAULT_MAX_QUBITS)
    }

    /// Computational basis state |index⟩ with the default qubit limit
    pub fn basis_state(num_qubits: usize, index: u64) -> QalgoResult<Self> {
        Self::basis_state_bounded(num_qubits, index, DEFAULT_MAX_QUBITS)
    }

    fn basis_state_bounded(num_qubits: usize, index: u64, max_qubits: usize) -> QalgoResult<Self> {
        check_qubit_count(num_qubits, max_qubits)?;
        let dim = 1usize << num_qubits;
        if index >= dim as u64 {
            return Err(QalgoError::TargetOutOfRange {
                target: index,
                qubits: num_qubits,
                size: dim as u64,
            });
        }
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); dim];
        amplitudes[index as usize] = Complex64::new(1.0, 0.0);
        Ok(Self {
            num_qubits,
            amplitudes,
        })
    }

    /// Wrap an explicit amplitude vector
    ///
    /// Length must be a power of two ≥ 2 and the vector must be normalized.
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> QalgoResult<Self> {
        let len = amplitudes.len();
        if len < 2 || !len.is_power_of_two() {
            return Err(QalgoError::InvalidStateLength(len));
        }
        let num_qubits = len.trailing_zeros() as usize;
        check_qubit_count(num_qubits, HARD_MAX_QUBITS)?;

        let state = Self {
            num_qubits,
            amplitudes,
        };
        let norm = state.norm_squared();
        if (norm - 1.0).abs() > EPSILON {
            return Err(QalgoError::NotNormalized { norm });
        }
        Ok(state)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Number of qubits
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Hilbert-space dimension (2^N)
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    /// All amplitudes
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    pub(crate) fn amplitudes_mut(&mut self) -> &mut [Complex64] {
        &mut self.amplitudes
    }

    /// Amplitude of basis state `index`
    pub fn amplitude(&self, index: usize) -> Option<Complex64> {
        self.amplitudes.get(index).copied()
    }

    /// Born probability of basis state `index` (0 when out of range)
    pub fn probability(&self, index: usize) -> f64 {
        self.amplitudes
            .get(index)
            .map(|a| a.norm_sqr())
            .unwrap_or(0.0)
    }

    /// Born probabilities of every basis state
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Σ|a_i|²
    pub fn norm_squared(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sqr()).sum()
    }

    /// Check Σ|a_i|² = 1 within ε
    pub fn is_normalized(&self) -> bool {
        (self.norm_squared() - 1.0).abs() < EPSILON
    }

    /// ⟨self|other⟩
    pub fn inner_product(&self, other: &StateVector) -> QalgoResult<Complex64> {
        if self.num_qubits != other.num_qubits {
            return Err(QalgoError::DimensionMismatch {
                circuit_qubits: other.num_qubits,
                state_qubits: self.num_qubits,
            });
        }
        Ok(self
            .amplitudes
            .iter()
            .zip(&other.amplitudes)
            .map(|(a, b)| a.conj() * b)
            .sum())
    }

    /// |⟨self|other⟩|²
    pub fn fidelity(&self, other: &StateVector) -> QalgoResult<f64> {
        Ok(self.inner_product(other)?.norm_sqr())
    }

    /// Amplitude-wise comparison within `tol`
    pub fn approx_eq(&self, other: &StateVector, tol: f64) -> bool {
        self.num_qubits == other.num_qubits
            && self
                .amplitudes
                .iter()
                .zip(&other.amplitudes)
                .all(|(a, b)| (a - b).norm() <= tol)
    }

    /// Basis index with the highest probability
    pub fn most_probable(&self) -> usize {
        self.amplitudes
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.norm_sqr().total_cmp(&b.norm_sqr()))
            .map(|(i, _)| i)
            .unwrap_or(0)
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "StateVector({} qubits)", self.num_qubits)?;
        for (i, a) in self.amplitudes.iter().enumerate() {
            if a.norm_sqr() > EPSILON {
                writeln!(
                    f,
                    "  |{}⟩: {:+.6}{:+.6}i",
                    index_to_bitstring(i as u64, self.num_qubits),
                    a.re,
                    a.im
                )?;
            }
        }
        Ok(())
    }
}

/// Reject qubit counts outside `[1, min(max_qubits, HARD_MAX_QUBITS)]`
pub fn check_qubit_count(num_qubits: usize, max_qubits: usize) -> QalgoResult<()> {
    let max = max_qubits.min(HARD_MAX_QUBITS);
    if num_qubits == 0 || num_qubits > max {
        return Err(QalgoError::InvalidQubitCount {
            qubits: num_qubits,
            max,
        });
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_1_SQRT_2;

    #[test]
    fn test_zero_state() {
        let s = StateVector::zero(3).unwrap();
        assert_eq!(s.dim(), 8);
        assert_eq!(s.probability(0), 1.0);
        assert!(s.is_normalized());
    }

    #[test]
    fn test_qubit_count_limits() {
        assert_eq!(
            StateVector::zero(0).unwrap_err(),
            QalgoError::InvalidQubitCount {
                qubits: 0,
                max: DEFAULT_MAX_QUBITS
            }
        );
        assert!(StateVector::new(5, 4).unwrap_err().is_dimension_error());
        assert!(StateVector::new(31, 64).unwrap_err().is_dimension_error());
    }

    #[test]
    fn test_basis_state() {
        let s = StateVector::basis_state(4, 5).unwrap();
        assert_eq!(s.probability(5), 1.0);
        assert_eq!(s.most_probable(), 5);
        assert!(StateVector::basis_state(2, 4).is_err());
    }

    #[test]
    fn test_from_amplitudes() {
        let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
        let s = StateVector::from_amplitudes(vec![h, h]).unwrap();
        assert_eq!(s.num_qubits(), 1);

        assert_eq!(
            StateVector::from_amplitudes(vec![Complex64::new(1.0, 0.0); 3]).unwrap_err(),
            QalgoError::InvalidStateLength(3)
        );
        assert!(matches!(
            StateVector::from_amplitudes(vec![Complex64::new(1.0, 0.0); 2]),
            Err(QalgoError::NotNormalized { .. })
        ));
    }

    #[test]
    fn test_fidelity() {
        let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
        let plus = StateVector::from_amplitudes(vec![h, h]).unwrap();
        let zero = StateVector::zero(1).unwrap();
        assert_abs_diff_eq!(plus.fidelity(&zero).unwrap(), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(plus.fidelity(&plus).unwrap(), 1.0, epsilon = 1e-12);
        assert!(plus.fidelity(&StateVector::zero(2).unwrap()).is_err());
    }

    #[test]
    fn test_approx_eq() {
        let a = StateVector::zero(2).unwrap();
        let b = StateVector::basis_state(2, 0).unwrap();
        assert!(a.approx_eq(&b, 1e-12));
        assert!(!a.approx_eq(&StateVector::basis_state(2, 1).unwrap(), 1e-12));
    }

    #[test]
    fn test_display_lists_nonzero() {
        let s = StateVector::basis_state(4, 5).unwrap();
        assert!(s.to_string().contains("|0101⟩"));
    }
}
