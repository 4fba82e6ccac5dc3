//! Quantum gate definitions for QALGO
//!
//! A gate is either a single-qubit unitary on one target, a controlled or
//! swap two-qubit gate, the multi-controlled phase flip used by amplitude
//! amplification, a broadcast of one single-qubit unitary over many
//! targets, or the terminal measurement marker.

use crate::types::{Angle, Pauli, QubitId};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Single-Qubit Gate Kinds
// ============================================================================

/// Single-qubit unitary, independent of the qubit it acts on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SingleQubitGate {
    /// Hadamard
    H,
    /// Pauli-X (NOT)
    X,
    /// Pauli-Y
    Y,
    /// Pauli-Z
    Z,
    /// S = sqrt(Z)
    S,
    /// S-dagger
    Sdg,
    /// T = fourth root of Z
    T,
    /// T-dagger
    Tdg,
    /// Phase gate diag(1, e^{iλ})
    Phase(Angle),
    /// Rotation around X-axis
    Rx(Angle),
    /// Rotation around Y-axis
    Ry(Angle),
    /// Rotation around Z-axis
    Rz(Angle),
}

impl SingleQubitGate {
    /// Gate name
    pub fn name(&self) -> &'static str {
        match self {
            SingleQubitGate::H => "h",
            SingleQubitGate::X => "x",
            SingleQubitGate::Y => "y",
            SingleQubitGate::Z => "z",
            SingleQubitGate::S => "s",
            SingleQubitGate::Sdg => "sdg",
            SingleQubitGate::T => "t",
            SingleQubitGate::Tdg => "tdg",
            SingleQubitGate::Phase(_) => "p",
            SingleQubitGate::Rx(_) => "rx",
            SingleQubitGate::Ry(_) => "ry",
            SingleQubitGate::Rz(_) => "rz",
        }
    }

    /// Rotation/phase angle, if any
    pub fn angle(&self) -> Option<Angle> {
        match self {
            SingleQubitGate::Phase(a)
            | SingleQubitGate::Rx(a)
            | SingleQubitGate::Ry(a)
            | SingleQubitGate::Rz(a) => Some(*a),
            _ => None,
        }
    }

    /// Check if gate carries an angle
    pub fn is_parameterized(&self) -> bool {
        self.angle().is_some()
    }

    /// Check if the matrix is diagonal in the computational basis
    pub fn is_diagonal(&self) -> bool {
        matches!(
            self,
            SingleQubitGate::Z
                | SingleQubitGate::S
                | SingleQubitGate::Sdg
                | SingleQubitGate::T
                | SingleQubitGate::Tdg
                | SingleQubitGate::Phase(_)
                | SingleQubitGate::Rz(_)
        )
    }

    /// Check if the gate is its own inverse
    pub fn is_self_inverse(&self) -> bool {
        matches!(
            self,
            SingleQubitGate::H | SingleQubitGate::X | SingleQubitGate::Y | SingleQubitGate::Z
        )
    }

    /// Inverse gate
    pub fn inverse(&self) -> Self {
        match *self {
            SingleQubitGate::S => SingleQubitGate::Sdg,
            SingleQubitGate::Sdg => SingleQubitGate::S,
            SingleQubitGate::T => SingleQubitGate::Tdg,
            SingleQubitGate::Tdg => SingleQubitGate::T,
            SingleQubitGate::Phase(a) => SingleQubitGate::Phase(-a),
            SingleQubitGate::Rx(a) => SingleQubitGate::Rx(-a),
            SingleQubitGate::Ry(a) => SingleQubitGate::Ry(-a),
            SingleQubitGate::Rz(a) => SingleQubitGate::Rz(-a),
            g => g,
        }
    }
}

impl fmt::Display for SingleQubitGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.angle() {
            Some(a) => write!(f, "{}({})", self.name(), a),
            None => write!(f, "{}", self.name()),
        }
    }
}

// ============================================================================
// Gate
// ============================================================================

/// Gate operation in a circuit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    /// Single-qubit unitary on one target
    Single(SingleQubitGate, QubitId),

    /// Controlled-NOT (control, target)
    Cnot(QubitId, QubitId),

    /// Controlled-Z (control, target)
    Cz(QubitId, QubitId),

    /// SWAP
    Swap(QubitId, QubitId),

    /// Multi-controlled Z: negates amplitudes whose listed bits are all 1
    Mcz(Vec<QubitId>),

    /// Same single-qubit unitary applied to each listed qubit in order
    Broadcast(SingleQubitGate, Vec<QubitId>),

    /// Terminal measurement marker
    MeasureAll,
}

impl Gate {
    // ========================================================================
    // Shorthand Constructors
    // ========================================================================

    /// Hadamard on `q`
    pub fn h(q: QubitId) -> Self {
        Gate::Single(SingleQubitGate::H, q)
    }

    /// Pauli-X on `q`
    pub fn x(q: QubitId) -> Self {
        Gate::Single(SingleQubitGate::X, q)
    }

    /// S-dagger on `q`
    pub fn sdg(q: QubitId) -> Self {
        Gate::Single(SingleQubitGate::Sdg, q)
    }

    /// Rz(θ) on `q`
    pub fn rz(q: QubitId, theta: Angle) -> Self {
        Gate::Single(SingleQubitGate::Rz(theta), q)
    }

    // ========================================================================
    // Gate Properties
    // ========================================================================

    /// Qubits involved in this gate (empty for `MeasureAll`)
    pub fn qubits(&self) -> Vec<QubitId> {
        match self {
            Gate::Single(_, q) => vec![*q],
            Gate::Cnot(c, t) | Gate::Cz(c, t) | Gate::Swap(c, t) => vec![*c, *t],
            Gate::Mcz(qs) | Gate::Broadcast(_, qs) => qs.clone(),
            Gate::MeasureAll => vec![],
        }
    }

    /// Control qubit, for controlled gates
    pub fn control(&self) -> Option<QubitId> {
        match self {
            Gate::Cnot(c, _) | Gate::Cz(c, _) => Some(*c),
            _ => None,
        }
    }

    /// Check if gate is single-qubit
    pub fn is_single_qubit(&self) -> bool {
        matches!(self, Gate::Single(_, _))
    }

    /// Check if gate is two-qubit
    pub fn is_two_qubit(&self) -> bool {
        matches!(self, Gate::Cnot(_, _) | Gate::Cz(_, _) | Gate::Swap(_, _))
    }

    /// Check if gate acts jointly on more than two qubits
    pub fn is_multi_qubit(&self) -> bool {
        matches!(self, Gate::Mcz(qs) if qs.len() > 2)
    }

    /// Check if gate is parameterized
    pub fn is_parameterized(&self) -> bool {
        match self {
            Gate::Single(g, _) | Gate::Broadcast(g, _) => g.is_parameterized(),
            _ => false,
        }
    }

    /// Check if gate is the measurement marker
    pub fn is_measurement(&self) -> bool {
        matches!(self, Gate::MeasureAll)
    }

    /// Gate name
    pub fn name(&self) -> &'static str {
        match self {
            Gate::Single(g, _) | Gate::Broadcast(g, _) => g.name(),
            Gate::Cnot(_, _) => "cx",
            Gate::Cz(_, _) => "cz",
            Gate::Swap(_, _) => "swap",
            Gate::Mcz(_) => "mcz",
            Gate::MeasureAll => "measure",
        }
    }

    /// Number of elementary gate applications this operation stands for
    pub fn expanded_len(&self) -> usize {
        match self {
            Gate::Broadcast(_, qs) => qs.len(),
            _ => 1,
        }
    }

    // ========================================================================
    // Basis Transformation Helpers
    // ========================================================================

    /// Gates rotating `pauli`'s eigenbasis onto the computational basis
    ///
    /// X: H, Y: Sdg then H, Z: none.
    pub fn basis_transform(qubit: QubitId, pauli: Pauli) -> Vec<Gate> {
        match pauli {
            Pauli::X => vec![Gate::h(qubit)],
            Pauli::Y => vec![Gate::sdg(qubit), Gate::h(qubit)],
            Pauli::Z => vec![],
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |qs: &[QubitId]| {
            qs.iter()
                .map(|q| format!("q[{}]", q))
                .collect::<Vec<_>>()
                .join(",")
        };
        match self {
            Gate::Single(g, q) => write!(f, "{} q[{}]", g, q),
            Gate::Cnot(c, t) => write!(f, "cx q[{}],q[{}]", c, t),
            Gate::Cz(c, t) => write!(f, "cz q[{}],q[{}]", c, t),
            Gate::Swap(a, b) => write!(f, "swap q[{}],q[{}]", a, b),
            Gate::Mcz(qs) => write!(f, "mcz {}", join(qs)),
            Gate::Broadcast(g, qs) => write!(f, "{} {}", g, join(qs)),
            Gate::MeasureAll => write!(f, "measure_all"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
