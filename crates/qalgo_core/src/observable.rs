//! Pauli-sum observables
//!
//! An observable is an explicit list of weighted Pauli strings,
//!
//!   O = Σ_k  c_k · P_k,   c_k ∈ ℝ
//!
//! built with plain constructor calls. Identity factors are never stored:
//! a term with no factors is the scalar `c_k · I`.
//!
//! # Example
//!
//! ```rust
//! use qalgo_core::observable::{Observable, PauliTerm};
//!
//! // Z⊗Z⊗I⊗I: labels are read right-to-left, so this acts on qubits 2 and 3
//! let obs = Observable::new().with_term(PauliTerm::from_label("ZZII", 1.0).unwrap());
//! assert_eq!(obs.max_qubit(), Some(3));
//! ```

use crate::error::{QalgoError, QalgoResult};
use crate::types::{Pauli, QubitId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// PauliTerm
// ============================================================================

/// Weighted Pauli string `coeff · P`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PauliTerm {
    coeff: f64,
    paulis: BTreeMap<QubitId, Pauli>,
}

impl PauliTerm {
    /// Scalar term `coeff · I`
    pub fn new(coeff: f64) -> Self {
        Self {
            coeff,
            paulis: BTreeMap::new(),
        }
    }

    /// Alias for [`PauliTerm::new`]
    pub fn identity(coeff: f64) -> Self {
        Self::new(coeff)
    }

    /// Set the factor on `qubit` (replaces an existing one)
    pub fn with_factor(mut self, qubit: QubitId, pauli: Pauli) -> Self {
        self.paulis.insert(qubit, pauli);
        self
    }

    /// Parse a label such as `"ZZII"`; the rightmost character is qubit 0
    pub fn from_label(label: &str, coeff: f64) -> QalgoResult<Self> {
        let mut term = Self::new(coeff);
        for (q, c) in label.chars().rev().enumerate() {
            if let Some(p) = Pauli::from_char(c)? {
                term.paulis.insert(q, p);
            }
        }
        Ok(term)
    }

    /// Single-qubit Z term
    pub fn z(qubit: QubitId, coeff: f64) -> Self {
        Self::new(coeff).with_factor(qubit, Pauli::Z)
    }

    /// ZZ coupling term
    pub fn zz(a: QubitId, b: QubitId, coeff: f64) -> Self {
        Self::new(coeff)
            .with_factor(a, Pauli::Z)
            .with_factor(b, Pauli::Z)
    }

    /// Single-qubit X term
    pub fn x(qubit: QubitId, coeff: f64) -> Self {
        Self::new(coeff).with_factor(qubit, Pauli::X)
    }

    /// Coefficient
    pub fn coeff(&self) -> f64 {
        self.coeff
    }

    /// Non-identity factors, ascending by qubit
    pub fn factors(&self) -> impl Iterator<Item = (QubitId, Pauli)> + '_ {
        self.paulis.iter().map(|(&q, &p)| (q, p))
    }

    /// Factor on `qubit`, if not identity
    pub fn pauli_at(&self, qubit: QubitId) -> Option<Pauli> {
        self.paulis.get(&qubit).copied()
    }

    /// Number of non-identity factors
    pub fn weight(&self) -> usize {
        self.paulis.len()
    }

    /// True if the term is a scalar
    pub fn is_identity(&self) -> bool {
        self.paulis.is_empty()
    }

    /// True if every factor is Z (diagonal in the computational basis)
    pub fn is_diagonal(&self) -> bool {
        self.paulis.values().all(|&p| p == Pauli::Z)
    }

    /// Highest qubit referenced
    pub fn max_qubit(&self) -> Option<QubitId> {
        self.paulis.keys().next_back().copied()
    }

    /// Bit mask of all non-identity qubits
    ///
    /// Qubits at 64 and above never appear in a `u64` basis index and are
    /// left out of the mask.
    pub fn support_mask(&self) -> u64 {
        self.paulis.keys().fold(0u64, |m, &q| {
            let bit = u32::try_from(q)
                .ok()
                .and_then(|shift| 1u64.checked_shl(shift))
                .unwrap_or(0);
            m | bit
        })
    }

    /// Eigenvalue of the measured parity on basis state `index` (±1)
    ///
    /// Valid after the basis change that maps every factor onto Z.
    #[inline]
    pub fn parity_sign(&self, index: u64) -> f64 {
        if (index & self.support_mask()).count_ones() % 2 == 0 {
            1.0
        } else {
            -1.0
        }
    }

    /// Label over `num_qubits` qubits, qubit 0 rightmost
    pub fn label(&self, num_qubits: usize) -> String {
        (0..num_qubits)
            .rev()
            .map(|q| self.pauli_at(q).map(|p| p.to_char()).unwrap_or('I'))
            .collect()
    }
}

impl fmt::Display for PauliTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.paulis.is_empty() {
            return write!(f, "{}·I", self.coeff);
        }
        write!(f, "{}·", self.coeff)?;
        for (q, p) in &self.paulis {
            write!(f, "{}{}", p, q)?;
        }
        Ok(())
    }
}

// ============================================================================
// Observable
// ============================================================================

/// Sum of weighted Pauli strings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Observable {
    terms: Vec<PauliTerm>,
}

impl Observable {
    /// Empty observable
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Observable from a term list
    pub fn from_terms(terms: Vec<PauliTerm>) -> Self {
        Self { terms }
    }

    /// Scalar observable `c · I`
    pub fn identity(coeff: f64) -> Self {
        Self::new().with_term(PauliTerm::identity(coeff))
    }

    /// Parse a single label into a one-term observable
    pub fn from_label(label: &str, coeff: f64) -> QalgoResult<Self> {
        Ok(Self::new().with_term(PauliTerm::from_label(label, coeff)?))
    }

    /// Append a term
    pub fn with_term(mut self, term: PauliTerm) -> Self {
        self.terms.push(term);
        self
    }

    /// Append a term in place
    pub fn add_term(&mut self, term: PauliTerm) {
        self.terms.push(term);
    }

    /// All terms
    pub fn terms(&self) -> &[PauliTerm] {
        &self.terms
    }

    /// Number of terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Check if there are no terms
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Highest qubit referenced by any term
    pub fn max_qubit(&self) -> Option<QubitId> {
        self.terms.iter().filter_map(PauliTerm::max_qubit).max()
    }

    /// Minimum register size the observable needs
    pub fn min_qubits(&self) -> usize {
        self.max_qubit().map(|q| q + 1).unwrap_or(0)
    }

    /// True if every term is a scalar
    pub fn is_constant(&self) -> bool {
        self.terms.iter().all(PauliTerm::is_identity)
    }

    /// True if every term is diagonal in the computational basis
    pub fn is_diagonal(&self) -> bool {
        self.terms.iter().all(PauliTerm::is_diagonal)
    }

    /// Sum of the scalar terms
    pub fn constant_part(&self) -> f64 {
        self.terms
            .iter()
            .filter(|t| t.is_identity())
            .map(PauliTerm::coeff)
            .sum()
    }

    /// Σ|c_k|: every eigenvalue lies in [-bound, bound]
    pub fn spectral_bound(&self) -> f64 {
        self.terms.iter().map(|t| t.coeff.abs()).sum()
    }

    /// Value of a diagonal observable on basis state `index`
    ///
    /// Returns `None` if any term has an X or Y factor.
    pub fn diagonal_value(&self, index: u64) -> Option<f64> {
        if !self.is_diagonal() {
            return None;
        }
        Some(
            self.terms
                .iter()
                .map(|t| t.coeff * t.parity_sign(index))
                .sum(),
        )
    }

    /// Check the observable against a register of `num_qubits` qubits
    pub fn validate(&self, num_qubits: usize) -> QalgoResult<()> {
        if self.terms.is_empty() {
            return Err(QalgoError::EmptyObservable);
        }
        for term in &self.terms {
            if !term.coeff.is_finite() {
                return Err(QalgoError::InvalidCoefficient(term.coeff));
            }
            if let Some(q) = term.max_qubit() {
                if q >= num_qubits {
                    return Err(QalgoError::ObservableQubitOutOfRange {
                        qubit: q,
                        num_qubits,
                    });
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Observable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.terms.iter().map(|t| t.to_string()).collect();
        write!(f, "{}", parts.join(" + "))
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
    fn test_label_right_to_left() {
        let t = PauliTerm::from_label("ZZII", 1.0).unwrap();
        assert_eq!(t.pauli_at(0), None);
        assert_eq!(t.pauli_at(2), Some(Pauli::Z));
        assert_eq!(t.pauli_at(3), Some(Pauli::Z));
        assert_eq!(t.label(4), "ZZII");
        assert_eq!(t.support_mask(), 0b1100);
    }

    #[test]
    fn test_invalid_label() {
        assert_eq!(
            PauliTerm::from_label("ZA", 1.0).unwrap_err(),
            QalgoError::InvalidPauli("A".into())
        );
    }

    #[test]
    fn test_identity_term() {
        let t = PauliTerm::from_label("III", 2.5).unwrap();
        assert!(t.is_identity());
        assert!(Observable::identity(2.5).is_constant());
        assert_eq!(Observable::identity(2.5).constant_part(), 2.5);
    }

    #[test]
    fn test_validate() {
        let obs = Observable::from_label("ZZII", 1.0).unwrap();
        assert!(obs.validate(4).is_ok());
        assert_eq!(
            obs.validate(3).unwrap_err(),
            QalgoError::ObservableQubitOutOfRange {
                qubit: 3,
                num_qubits: 3
            }
        );
        assert_eq!(
            Observable::new().validate(2).unwrap_err(),
            QalgoError::EmptyObservable
        );
        assert!(Observable::identity(f64::NAN)
            .validate(1)
            .unwrap_err()
            .is_observable_error());
    }

    #[test]
    fn test_spectral_bound() {
        let obs = Observable::new()
            .with_term(PauliTerm::zz(0, 1, -1.0))
            .with_term(PauliTerm::x(0, 0.5));
        assert_abs_diff_eq!(obs.spectral_bound(), 1.5, epsilon = 1e-15);
        assert!(!obs.is_diagonal());
        assert_eq!(obs.diagonal_value(0), None);
    }

    #[test]
    fn test_diagonal_value() {
        let obs = Observable::new()
            .with_term(PauliTerm::zz(0, 1, 1.0))
            .with_term(PauliTerm::identity(0.25));
        // |01>: bits differ, ZZ = -1
        assert_eq!(obs.diagonal_value(0b01), Some(-0.75));
        assert_eq!(obs.diagonal_value(0b11), Some(1.25));
    }

    #[test]
    fn test_support_mask_beyond_index_width() {
        let wide = PauliTerm::z(70, 1.0);
        assert_eq!(wide.support_mask(), 0);
        assert_eq!(wide.parity_sign(u64::MAX), 1.0);

        let mixed = PauliTerm::zz(0, 64, 1.0);
        assert_eq!(mixed.support_mask(), 1);
        assert_eq!(mixed.parity_sign(0b1), -1.0);

        let obs = Observable::new().with_term(PauliTerm::z(usize::MAX, 2.0));
        assert_eq!(obs.diagonal_value(7), Some(2.0));
    }
}
