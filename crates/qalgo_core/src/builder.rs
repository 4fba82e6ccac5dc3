//! Circuit builder for QALGO
//!
//! Fluent, consuming builder. The first invalid append is recorded and every
//! later append is ignored; [`CircuitBuilder::build`] then reports that error,
//! so a malformed circuit never reaches a simulator.

use crate::circuit::Circuit;
use crate::error::{QalgoError, QalgoResult};
use crate::gate::{Gate, SingleQubitGate};
use crate::observable::PauliTerm;
use crate::types::{Angle, QubitId};

/// Fluent circuit builder (consuming self pattern)
#[derive(Debug, Clone)]
pub struct CircuitBuilder {
    circuit: Circuit,
    error: Option<QalgoError>,
}

impl CircuitBuilder {
    // ========================================================================
    // Constructor
    // ========================================================================

    /// Create a new circuit builder
    pub fn new(num_qubits: usize) -> Self {
        Self {
            circuit: Circuit::new(num_qubits),
            error: None,
        }
    }

    /// Create with circuit name
    pub fn with_name(num_qubits: usize, name: impl Into<String>) -> Self {
        Self {
            circuit: Circuit::with_name(num_qubits, name),
            error: None,
        }
    }

    // ========================================================================
    // Generic Append
    // ========================================================================

    /// Append an arbitrary gate
    pub fn gate(mut self, gate: Gate) -> Self {
        self.push(gate);
        self
    }

    /// Append every gate of another circuit
    pub fn append(mut self, other: &Circuit) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.circuit.append(other) {
                self.error = Some(e);
            }
        }
        self
    }

    fn push(&mut self, gate: Gate) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.circuit.add_gate(gate) {
            self.error = Some(e);
        }
    }

    fn single(mut self, gate: SingleQubitGate, qubit: QubitId) -> Self {
        self.push(Gate::Single(gate, qubit));
        self
    }

    // ========================================================================
    // Single-Qubit Gates (Non-Parameterized)
    // ========================================================================

    /// Add Hadamard gate
    pub fn hadamard(self, qubit: QubitId) -> Self {
        self.single(SingleQubitGate::H, qubit)
    }

    /// Alias for [`hadamard`](Self::hadamard)
    pub fn h(self, qubit: QubitId) -> Self {
        self.hadamard(qubit)
    }

    /// Add Pauli-X gate
    pub fn pauli_x(self, qubit: QubitId) -> Self {
        self.single(SingleQubitGate::X, qubit)
    }

    /// Alias for [`pauli_x`](Self::pauli_x)
    pub fn x(self, qubit: QubitId) -> Self {
        self.pauli_x(qubit)
    }

    /// Add Pauli-Y gate
    pub fn pauli_y(self, qubit: QubitId) -> Self {
        self.single(SingleQubitGate::Y, qubit)
    }

    /// Alias for [`pauli_y`](Self::pauli_y)
    pub fn y(self, qubit: QubitId) -> Self {
        self.pauli_y(qubit)
    }

    /// Add Pauli-Z gate
    pub fn pauli_z(self, qubit: QubitId) -> Self {
        self.single(SingleQubitGate::Z, qubit)
    }

    /// Alias for [`pauli_z`](Self::pauli_z)
    pub fn z(self, qubit: QubitId) -> Self {
        self.pauli_z(qubit)
    }

    /// Add S gate
    pub fn s(self, qubit: QubitId) -> Self {
        self.single(SingleQubitGate::S, qubit)
    }

    /// Add S-dagger gate
    pub fn sdg(self, qubit: QubitId) -> Self {
        self.single(SingleQubitGate::Sdg, qubit)
    }

    /// Add T gate
    pub fn t(self, qubit: QubitId) -> Self {
        self.single(SingleQubitGate::T, qubit)
    }

    /// Add T-dagger gate
    pub fn tdg(self, qubit: QubitId) -> Self {
        self.single(SingleQubitGate::Tdg, qubit)
    }

    // ========================================================================
    // Single-Qubit Parameterized Gates
    // ========================================================================

    /// Add phase gate diag(1, e^{iλ})
    pub fn phase(self, qubit: QubitId, lambda: Angle) -> Self {
        self.single(SingleQubitGate::Phase(lambda), qubit)
    }

    /// Add Rx rotation
    pub fn rx(self, qubit: QubitId, angle: Angle) -> Self {
        self.single(SingleQubitGate::Rx(angle), qubit)
    }

    /// Add Ry rotation
    pub fn ry(self, qubit: QubitId, angle: Angle) -> Self {
        self.single(SingleQubitGate::Ry(angle), qubit)
    }

    /// Add Rz rotation
    pub fn rz(self, qubit: QubitId, angle: Angle) -> Self {
        self.single(SingleQubitGate::Rz(angle), qubit)
    }

    // ========================================================================
    // Two-Qubit and Multi-Qubit Gates
    // ========================================================================

    /// Add CNOT gate
    pub fn controlled_not(mut self, control: QubitId, target: QubitId) -> Self {
        self.push(Gate::Cnot(control, target));
        self
    }

    /// Alias for [`controlled_not`](Self::controlled_not)
    pub fn cnot(self, control: QubitId, target: QubitId) -> Self {
        self.controlled_not(control, target)
    }

    /// Add CZ gate
    pub fn controlled_z(mut self, control: QubitId, target: QubitId) -> Self {
        self.push(Gate::Cz(control, target));
        self
    }

    /// Alias for [`controlled_z`](Self::controlled_z)
    pub fn cz(self, control: QubitId, target: QubitId) -> Self {
        self.controlled_z(control, target)
    }

    /// Add SWAP gate
    pub fn swap(mut self, a: QubitId, b: QubitId) -> Self {
        self.push(Gate::Swap(a, b));
        self
    }

    /// Add multi-controlled Z over `qubits`
    pub fn multi_controlled_z(mut self, qubits: &[QubitId]) -> Self {
        self.push(Gate::Mcz(qubits.to_vec()));
        self
    }

    /// Apply one single-qubit gate to each listed qubit
    pub fn broadcast(mut self, gate: SingleQubitGate, qubits: &[QubitId]) -> Self {
        self.push(Gate::Broadcast(gate, qubits.to_vec()));
        self
    }

    // ========================================================================
    // Layer Operations
    // ========================================================================

    fn all_qubits(&self) -> Vec<QubitId> {
        (0..self.circuit.num_qubits()).collect()
    }

    /// Hadamard on every qubit
    pub fn hadamard_all(self) -> Self {
        let qs = self.all_qubits();
        self.broadcast(SingleQubitGate::H, &qs)
    }

    /// Pauli-X on every qubit
    pub fn pauli_x_all(self) -> Self {
        let qs = self.all_qubits();
        self.broadcast(SingleQubitGate::X, &qs)
    }

    /// Ry rotation layer, one angle per qubit
    pub fn ry_layer(mut self, angles: &[Angle]) -> Self {
        if !self.check_layer_len(angles) {
            return self;
        }
        for (q, &a) in angles.iter().enumerate() {
            self.push(Gate::Single(SingleQubitGate::Ry(a), q));
        }
        self
    }

    /// Rz rotation layer, one angle per qubit
    pub fn rz_layer(mut self, angles: &[Angle]) -> Self {
        if !self.check_layer_len(angles) {
            return self;
        }
        for (q, &a) in angles.iter().enumerate() {
            self.push(Gate::Single(SingleQubitGate::Rz(a), q));
        }
        self
    }

    fn check_layer_len(&mut self, angles: &[Angle]) -> bool {
        let n = self.circuit.num_qubits();
        if angles.len() != n && self.error.is_none() {
            self.error = Some(QalgoError::ParameterCountMismatch {
                expected: n,
                got: angles.len(),
            });
        }
        self.error.is_none()
    }

    /// CNOT chain over neighbouring qubits (0→1, 1→2, ...)
    pub fn cx_chain(mut self) -> Self {
        let n = self.circuit.num_qubits();
        for i in 0..n.saturating_sub(1) {
            self.push(Gate::Cnot(i, i + 1));
        }
        self
    }

    /// exp(-iθ/2 · Z_a Z_b) as CNOT, Rz, CNOT
    pub fn rzz(self, a: QubitId, b: QubitId, theta: Angle) -> Self {
        self.cnot(a, b).rz(b, theta).cnot(a, b)
    }

    /// QAOA mixer: Rx(2β) on every qubit
    pub fn qaoa_mixer(self, beta: Angle) -> Self {
        let qs = self.all_qubits();
        self.broadcast(SingleQubitGate::Rx(2.0 * beta), &qs)
    }

    /// exp(-iθ/2 · P) for the Pauli string of `term` (coefficient ignored)
    ///
    /// Rotates each factor onto Z, folds the parity onto the highest qubit
    /// with a CNOT ladder, applies Rz(θ) there and uncomputes.
    pub fn pauli_evolution(mut self, term: &PauliTerm, theta: Angle) -> Self {
        let factors: Vec<_> = term.factors().collect();
        if factors.is_empty() {
            // Identity only contributes a global phase
            return self;
        }

        for &(q, p) in &factors {
            for g in Gate::basis_transform(q, p) {
                self.push(g);
            }
        }
        for pair in factors.windows(2) {
            self.push(Gate::Cnot(pair[0].0, pair[1].0));
        }
        let (last, _) = factors[factors.len() - 1];
        self.push(Gate::rz(last, theta));
        for pair in factors.windows(2).rev() {
            self.push(Gate::Cnot(pair[0].0, pair[1].0));
        }
        for &(q, p) in factors.iter().rev() {
            for g in Gate::basis_transform(q, p).into_iter().rev() {
                if let Gate::Single(sg, q) = g {
                    self.push(Gate::Single(sg.inverse(), q));
                }
            }
        }
        self
    }

    // ========================================================================
    // Measurement
    // ========================================================================

    /// Terminal measurement of every qubit
    pub fn measure_all(mut self) -> Self {
        self.push(Gate::MeasureAll);
        self
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Build the circuit, or return the first recorded error
    pub fn build(self) -> QalgoResult<Circuit> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.circuit),
        }
    }

    /// First recorded error, if any
    pub fn error(&self) -> Option<&QalgoError> {
        self.error.as_ref()
    }

    /// Reference to the circuit built so far
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Number of qubits
    pub fn num_qubits(&self) -> usize {
        self.circuit.num_qubits()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Pauli;

    #[test]
    fn test_builder_basic() {
        let circuit = CircuitBuilder::new(3)
            .h(0)
            .cnot(0, 1)
            .cnot(1, 2)
            .measure_all()
            .build()
            .unwrap();

        assert_eq!(circuit.num_qubits(), 3);
        assert_eq!(circuit.gate_count(), 4);
        assert!(circuit.is_measured());
    }

    #[test]
    fn test_builder_chain() {
        let circuit = CircuitBuilder::new(5)
            .h(0)
            .cx_chain()
            .measure_all()
            .build()
            .unwrap();

        // H + 4 CNOTs + MeasureAll
        assert_eq!(circuit.gate_count(), 6);
        assert_eq!(circuit.count_2q(), 4);
    }

    #[test]
    fn test_gate_after_measure_rejected() {
        let err = CircuitBuilder::new(2)
            .h(0)
            .measure_all()
            .x(1)
            .build()
            .unwrap_err();
        assert_eq!(err, QalgoError::GateAfterMeasure { gate: "x".into() });
    }

    #[test]
    fn test_first_error_wins() {
        let err = CircuitBuilder::new(2)
            .h(5)
            .cnot(0, 0)
            .build()
            .unwrap_err();
        assert!(matches!(err, QalgoError::QubitOutOfRange { qubit: 5, .. }));
    }

    #[test]
    fn test_control_equals_target() {
        let err = CircuitBuilder::new(2).cz(1, 1).build().unwrap_err();
        assert!(matches!(err, QalgoError::DuplicateQubit { qubit: 1, .. }));
    }

    #[test]
    fn test_nan_angle() {
        let err = CircuitBuilder::new(1).rx(0, f64::NAN).build().unwrap_err();
        assert!(err.is_circuit_error());
    }

    #[test]
    fn test_layers() {
        let circuit = CircuitBuilder::new(3)
            .hadamard_all()
            .ry_layer(&[0.1, 0.2, 0.3])
            .rz_layer(&[0.1, 0.2, 0.3])
            .qaoa_mixer(0.4)
            .build()
            .unwrap();
        assert_eq!(circuit.count_1q(), 12);
        assert_eq!(circuit.count_parameterized(), 9);
    }

    #[test]
    fn test_layer_length_mismatch() {
        let err = CircuitBuilder::new(3).ry_layer(&[0.1]).build().unwrap_err();
        assert_eq!(
            err,
            QalgoError::ParameterCountMismatch {
                expected: 3,
                got: 1
            }
        );
    }

    #[test]
    fn test_rzz_structure() {
        let circuit = CircuitBuilder::new(2).rzz(0, 1, 0.7).build().unwrap();
        assert_eq!(
            circuit.gates(),
            &[Gate::Cnot(0, 1), Gate::rz(1, 0.7), Gate::Cnot(0, 1)]
        );
    }

    #[test]
    fn test_pauli_evolution_structure() {
        let term = PauliTerm::from_label("XIZ", 1.0).unwrap();
        let circuit = CircuitBuilder::new(3)
            .pauli_evolution(&term, 0.3)
            .build()
            .unwrap();
        // H(2), CX(0,2), Rz(2), CX(0,2), H(2)
        assert_eq!(
            circuit.gates(),
            &[
                Gate::h(2),
                Gate::Cnot(0, 2),
                Gate::rz(2, 0.3),
                Gate::Cnot(0, 2),
                Gate::h(2),
            ]
        );
    }

    #[test]
    fn test_pauli_evolution_y_uncompute() {
        let term = PauliTerm::new(1.0).with_factor(0, Pauli::Y);
        let circuit = CircuitBuilder::new(1)
            .pauli_evolution(&term, 0.3)
            .build()
            .unwrap();
        assert_eq!(
            circuit.gates(),
            &[
                Gate::sdg(0),
                Gate::h(0),
                Gate::rz(0, 0.3),
                Gate::h(0),
                Gate::Single(SingleQubitGate::S, 0),
            ]
        );
    }
}
