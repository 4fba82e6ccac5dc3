//! Core types for QALGO
//!
//! Type aliases, basis-state bitstrings and the single-qubit Pauli label
//! shared by circuits and observables.

use crate::error::{QalgoError, QalgoResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// Qubit identifier (0-indexed, qubit `q` is bit `q` of a basis index)
pub type QubitId = usize;

/// Rotation angle in radians
pub type Angle = f64;

/// Measurement counts: bitstring -> count, ordered by bitstring
pub type Counts = BTreeMap<String, u64>;

/// Parameter vector for variational circuits
pub type ParamVec = Vec<f64>;

// ============================================================================
// Bitstring
// ============================================================================

/// Computational basis state label
///
/// Stored most-significant qubit first, matching how measurement counts are
/// keyed: on 4 qubits the basis index 5 is `"0101"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Bitstring {
    bits: Vec<bool>,
}

impl Bitstring {
    /// Create from bools, most-significant qubit first
    pub fn new(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// Parse from a string of '0'/'1' characters
    pub fn parse(s: &str) -> QalgoResult<Self> {
        let bits: Result<Vec<bool>, _> = s
            .chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                _ => Err(QalgoError::InvalidConfig(format!("invalid bitstring '{}'", s))),
            })
            .collect();
        Ok(Self { bits: bits? })
    }

    /// Encode a basis index on `num_qubits` qubits
    pub fn from_index(index: u64, num_qubits: usize) -> Self {
        let bits = (0..num_qubits)
            .rev()
            .map(|q| (index >> q) & 1 == 1)
            .collect();
        Self { bits }
    }

    /// All-zero bitstring of given length
    pub fn zeros(n: usize) -> Self {
        Self {
            bits: vec![false; n],
        }
    }

    /// Number of bits
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Hamming weight
    pub fn popcount(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Parity (true if odd number of 1s)
    pub fn parity(&self) -> bool {
        self.popcount() % 2 == 1
    }

    /// Value of qubit `q` (qubit 0 is the rightmost character)
    pub fn qubit(&self, q: QubitId) -> Option<bool> {
        if q >= self.bits.len() {
            return None;
        }
        self.bits.get(self.bits.len() - 1 - q).copied()
    }

    /// Basis index this bitstring encodes
    pub fn to_index(&self) -> u64 {
        self.bits
            .iter()
            .rev()
            .enumerate()
            .filter(|(_, &b)| b)
            .map(|(i, _)| 1u64 << i)
            .sum()
    }
}

impl fmt::Display for Bitstring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.bits {
            write!(f, "{}", if b { '1' } else { '0' })?;
        }
        Ok(())
    }
}

/// Render a basis index as a bitstring, most-significant qubit first
#[inline]
pub fn index_to_bitstring(index: u64, num_qubits: usize) -> String {
    format!("{:0width$b}", index, width = num_qubits)
}

// ============================================================================
// Pauli
// ============================================================================

/// Non-identity single-qubit Pauli operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Pauli {
    /// Pauli X
    X,
    /// Pauli Y
    Y,
    /// Pauli Z
    Z,
}

impl Pauli {
    /// Parse from a label character. `I` yields `None`.
    pub fn from_char(c: char) -> QalgoResult<Option<Self>> {
        match c.to_ascii_uppercase() {
            'I' => Ok(None),
            'X' => Ok(Some(Pauli::X)),
            'Y' => Ok(Some(Pauli::Y)),
            'Z' => Ok(Some(Pauli::Z)),
            _ => Err(QalgoError::InvalidPauli(c.to_string())),
        }
    }

    /// Label character
    pub fn to_char(&self) -> char {
        match self {
            Pauli::X => 'X',
            Pauli::Y => 'Y',
            Pauli::Z => 'Z',
        }
    }
}

impl fmt::Display for Pauli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitstring_from_index_msb_first() {
        let bs = Bitstring::from_index(5, 4);
        assert_eq!(bs.to_string(), "0101");
        assert_eq!(bs.to_index(), 5);
        assert_eq!(index_to_bitstring(5, 4), "0101");
    }

    #[test]
    fn test_bitstring_qubit_order() {
        let bs = Bitstring::parse("0001").unwrap();
        assert_eq!(bs.qubit(0), Some(true));
        assert_eq!(bs.qubit(3), Some(false));
        assert_eq!(bs.qubit(4), None);
    }

    #[test]
    fn test_bitstring_parity() {
        assert!(!Bitstring::parse("0110").unwrap().parity());
        assert!(Bitstring::parse("0111").unwrap().parity());
        assert!(Bitstring::parse("01a1").is_err());
    }

    #[test]
    fn test_pauli_from_char() {
        assert_eq!(Pauli::from_char('x').unwrap(), Some(Pauli::X));
        assert_eq!(Pauli::from_char('I').unwrap(), None);
        assert!(matches!(
            Pauli::from_char('Q'),
            Err(QalgoError::InvalidPauli(_))
        ));
    }
}
