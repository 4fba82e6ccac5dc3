//! Quantum circuit structure for QALGO
//!
//! A circuit is an ordered gate sequence over a declared register. Every
//! append is validated, so a `Circuit` value always satisfies: qubit indices
//! in range, distinct qubits within a gate, finite angles, and nothing after
//! the terminal `MeasureAll`.

use crate::error::{QalgoError, QalgoResult};
use crate::gate::Gate;
use crate::types::QubitId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Quantum circuit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    num_qubits: usize,
    gates: Vec<Gate>,
    name: Option<String>,
}

impl Circuit {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a new empty circuit
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            gates: Vec::new(),
            name: None,
        }
    }

    /// Create an empty circuit with a name
    pub fn with_name(num_qubits: usize, name: impl Into<String>) -> Self {
        Self {
            num_qubits,
            gates: Vec::new(),
            name: Some(name.into()),
        }
    }

    /// Create from a gate list, validating every gate in order
    pub fn from_gates(num_qubits: usize, gates: Vec<Gate>) -> QalgoResult<Self> {
        let mut circuit = Self::new(num_qubits);
        circuit.add_gates(gates)?;
        Ok(circuit)
    }

    // ========================================================================
    // Basic Operations
    // ========================================================================

    /// Append a gate after validating it against the circuit
    pub fn add_gate(&mut self, gate: Gate) -> QalgoResult<()> {
        self.check_gate(&gate)?;
        self.gates.push(gate);
        Ok(())
    }

    /// Append multiple gates
    pub fn add_gates(&mut self, gates: impl IntoIterator<Item = Gate>) -> QalgoResult<()> {
        for gate in gates {
            self.add_gate(gate)?;
        }
        Ok(())
    }

    /// Append every gate of `other` (same register size required)
    pub fn append(&mut self, other: &Circuit) -> QalgoResult<()> {
        if other.num_qubits != self.num_qubits {
            return Err(QalgoError::DimensionMismatch {
                circuit_qubits: other.num_qubits,
                state_qubits: self.num_qubits,
            });
        }
        self.add_gates(other.gates.iter().cloned())
    }

    /// Number of qubits
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Gate sequence
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Circuit name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Set circuit name
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Check if circuit is empty
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Check if the circuit ends with the measurement marker
    pub fn is_measured(&self) -> bool {
        matches!(self.gates.last(), Some(Gate::MeasureAll))
    }

    // ========================================================================
    // Circuit Analysis
    // ========================================================================

    /// Circuit depth (longest path, broadcasts count one layer per target)
    pub fn depth(&self) -> usize {
        if self.gates.is_empty() {
            return 0;
        }

        let mut qubit_depths = vec![0usize; self.num_qubits];

        for gate in &self.gates {
            match gate {
                Gate::MeasureAll => {
                    let max_depth = qubit_depths.iter().copied().max().unwrap_or(0);
                    for d in &mut qubit_depths {
                        *d = max_depth + 1;
                    }
                }
                Gate::Broadcast(_, qs) => {
                    for &q in qs {
                        if let Some(d) = qubit_depths.get_mut(q) {
                            *d += 1;
                        }
                    }
                }
                _ => {
                    let qubits = gate.qubits();
                    let max_depth = qubits
                        .iter()
                        .filter_map(|&q| qubit_depths.get(q))
                        .max()
                        .copied()
                        .unwrap_or(0);
                    for &q in &qubits {
                        if let Some(d) = qubit_depths.get_mut(q) {
                            *d = max_depth + 1;
                        }
                    }
                }
            }
        }

        qubit_depths.into_iter().max().unwrap_or(0)
    }

    /// Total number of gate operations
    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }

    /// Count single-qubit applications (broadcasts expanded)
    pub fn count_1q(&self) -> usize {
        self.gates
            .iter()
            .filter(|g| matches!(g, Gate::Single(_, _) | Gate::Broadcast(_, _)))
            .map(Gate::expanded_len)
            .sum()
    }

    /// Count two-qubit gates
    pub fn count_2q(&self) -> usize {
        self.gates.iter().filter(|g| g.is_two_qubit()).count()
    }

    /// Count multi-controlled gates
    pub fn count_mcz(&self) -> usize {
        self.gates
            .iter()
            .filter(|g| matches!(g, Gate::Mcz(_)))
            .count()
    }

    /// Count parameterized single-qubit applications
    pub fn count_parameterized(&self) -> usize {
        self.gates
            .iter()
            .filter(|g| g.is_parameterized())
            .map(Gate::expanded_len)
            .sum()
    }

    /// Gate counts by name
    pub fn count_ops(&self) -> BTreeMap<&'static str, usize> {
        let mut ops = BTreeMap::new();
        for gate in &self.gates {
            *ops.entry(gate.name()).or_insert(0) += gate.expanded_len();
        }
        ops
    }

    /// Qubits touched by at least one gate
    pub fn used_qubits(&self) -> HashSet<QubitId> {
        self.gates.iter().flat_map(|g| g.qubits()).collect()
    }

    // ========================================================================
    // Validation
    // ========================================================================

    fn check_gate(&self, gate: &Gate) -> QalgoResult<()> {
        if self.is_measured() {
            return Err(QalgoError::GateAfterMeasure {
                gate: gate.name().to_string(),
            });
        }

        let qubits = gate.qubits();
        for &qubit in &qubits {
            if qubit >= self.num_qubits {
                return Err(QalgoError::QubitOutOfRange {
                    gate: gate.name().to_string(),
                    qubit,
                    num_qubits: self.num_qubits,
                });
            }
        }

        let mut seen = HashSet::with_capacity(qubits.len());
        for &qubit in &qubits {
            if !seen.insert(qubit) {
                return Err(QalgoError::DuplicateQubit {
                    gate: gate.name().to_string(),
                    qubit,
                });
            }
        }

        if let Gate::Mcz(qs) = gate {
            if qs.is_empty() {
                return Err(QalgoError::InvalidConfig(
                    "mcz requires at least one qubit".into(),
                ));
            }
        }

        if let Gate::Single(g, _) | Gate::Broadcast(g, _) = gate {
            if let Some(angle) = g.angle() {
                if !angle.is_finite() {
                    return Err(QalgoError::InvalidAngle(angle));
                }
            }
        }

        Ok(())
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Circuit{} ({} qubits, {} gates, depth {})",
            self.name
                .as_ref()
                .map(|n| format!(" '{}'", n))
                .unwrap_or_default(),
            self.num_qubits,
            self.gates.len(),
            self.depth()
        )?;
        for gate in &self.gates {
            writeln!(f, "  {}", gate)?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::SingleQubitGate;

    #[test]
    fn test_circuit_creation() {
        let c = Circuit::new(3);
        assert_eq!(c.num_qubits(), 3);
        assert!(c.is_empty());
        assert_eq!(c.depth(), 0);
    }

    #[test]
    fn test_add_gate_out_of_range() {
        let mut c = Circuit::new(2);
        assert!(c.add_gate(Gate::h(0)).is_ok());
        let err = c.add_gate(Gate::h(2)).unwrap_err();
        assert!(matches!(
            err,
            QalgoError::QubitOutOfRange {
                qubit: 2,
                num_qubits: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_duplicate_qubit() {
        let mut c = Circuit::new(2);
        let err = c.add_gate(Gate::Cnot(1, 1)).unwrap_err();
        assert!(matches!(err, QalgoError::DuplicateQubit { qubit: 1, .. }));
    }

    #[test]
    fn test_gate_after_measure() {
        let mut c = Circuit::new(1);
        c.add_gate(Gate::MeasureAll).unwrap();
        assert!(c.is_measured());
        assert!(c.add_gate(Gate::h(0)).unwrap_err().is_circuit_error());
    }

    #[test]
    fn test_non_finite_angle() {
        let mut c = Circuit::new(1);
        assert_eq!(
            c.add_gate(Gate::rz(0, f64::INFINITY)).unwrap_err(),
            QalgoError::InvalidAngle(f64::INFINITY)
        );
    }

    #[test]
    fn test_depth() {
        let c = Circuit::from_gates(
            3,
            vec![Gate::h(0), Gate::h(1), Gate::Cnot(0, 1), Gate::Cnot(1, 2)],
        )
        .unwrap();
        assert_eq!(c.depth(), 3);
    }

    #[test]
    fn test_counts_expand_broadcast() {
        let c = Circuit::from_gates(
            3,
            vec![
                Gate::Broadcast(SingleQubitGate::Ry(0.2), vec![0, 1, 2]),
                Gate::Cz(0, 2),
                Gate::Mcz(vec![0, 1, 2]),
            ],
        )
        .unwrap();
        assert_eq!(c.count_1q(), 3);
        assert_eq!(c.count_2q(), 1);
        assert_eq!(c.count_mcz(), 1);
        assert_eq!(c.count_parameterized(), 3);
        assert_eq!(c.count_ops().get("ry"), Some(&3));
    }

    #[test]
    fn test_append_mismatch() {
        let mut a = Circuit::new(2);
        let b = Circuit::new(3);
        assert!(matches!(
            a.append(&b),
            Err(QalgoError::DimensionMismatch { .. })
        ));
    }
}
