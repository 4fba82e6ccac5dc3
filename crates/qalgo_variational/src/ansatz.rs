//! Parameterized circuit templates

use qalgo_core::constants::DEFAULT_MAX_QUBITS;
use qalgo_core::{Circuit, CircuitBuilder, Observable, QalgoError, QalgoResult};

/// A parameterized circuit family θ ↦ U(θ)|0…0⟩
pub trait Ansatz {
    /// Template name
    fn name(&self) -> &str {
        "ansatz"
    }

    /// Register size
    fn num_qubits(&self) -> usize;

    /// Number of free parameters
    fn num_parameters(&self) -> usize;

    /// Concrete circuit for `params`
    fn circuit(&self, params: &[f64]) -> QalgoResult<Circuit>;
}

/// Reject a parameter vector of the wrong length
pub fn check_parameters(expected: usize, params: &[f64]) -> QalgoResult<()> {
    if params.len() != expected {
        return Err(QalgoError::ParameterCountMismatch {
            expected,
            got: params.len(),
        });
    }
    Ok(())
}

// ============================================================================
// FnAnsatz
// ============================================================================

/// Ansatz backed by a closure
pub struct FnAnsatz<F>
where
    F: Fn(&[f64]) -> QalgoResult<Circuit>,
{
    name: String,
    num_qubits: usize,
    num_parameters: usize,
    build: F,
}

impl<F> FnAnsatz<F>
where
    F: Fn(&[f64]) -> QalgoResult<Circuit>,
{
    /// Wrap `build`, which receives exactly `num_parameters` values
    pub fn new(num_qubits: usize, num_parameters: usize, build: F) -> Self {
        Self {
            name: "fn".to_string(),
            num_qubits,
            num_parameters,
            build,
        }
    }

    /// Set name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl<F> Ansatz for FnAnsatz<F>
where
    F: Fn(&[f64]) -> QalgoResult<Circuit>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    fn num_parameters(&self) -> usize {
        self.num_parameters
    }

    fn circuit(&self, params: &[f64]) -> QalgoResult<Circuit> {
        check_parameters(self.num_parameters, params)?;
        let circuit = (self.build)(params)?;
        if circuit.num_qubits() != self.num_qubits {
            return Err(QalgoError::DimensionMismatch {
                circuit_qubits: circuit.num_qubits(),
                state_qubits: self.num_qubits,
            });
        }
        Ok(circuit)
    }
}

// ============================================================================
// QaoaAnsatz
// ============================================================================

/// Alternating cost/mixer layers
///
/// |ψ(γ, β)⟩ = Π_l  e^{−iβ_l ΣX} e^{−iγ_l C} |+…+⟩,
/// parameters laid out as `[γ_1..γ_p, β_1..β_p]`. Each cost term
/// c·P contributes e^{−iγcP}, i.e. a Pauli evolution by angle 2γc.
#[derive(Debug, Clone)]
pub struct QaoaAnsatz {
    cost: Observable,
    num_qubits: usize,
    layers: usize,
}

impl QaoaAnsatz {
    /// Ansatz on the smallest register that holds `cost`
    pub fn new(cost: Observable, layers: usize) -> QalgoResult<Self> {
        let num_qubits = cost.min_qubits().max(1);
        Self::with_qubits(cost, num_qubits, layers)
    }

    /// Ansatz on an explicit register size
    pub fn with_qubits(cost: Observable, num_qubits: usize, layers: usize) -> QalgoResult<Self> {
        cost.validate(num_qubits)?;
        if layers == 0 {
            return Err(QalgoError::InvalidConfig(
                "QAOA needs at least one layer".into(),
            ));
        }
        Ok(Self {
            cost,
            num_qubits,
            layers,
        })
    }

    /// Number of layers p
    pub fn layers(&self) -> usize {
        self.layers
    }

    /// Cost observable
    pub fn cost(&self) -> &Observable {
        &self.cost
    }
}

impl Ansatz for QaoaAnsatz {
    fn name(&self) -> &str {
        "qaoa"
    }

    fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    fn num_parameters(&self) -> usize {
        2 * self.layers
    }

    fn circuit(&self, params: &[f64]) -> QalgoResult<Circuit> {
        check_parameters(self.num_parameters(), params)?;
        let (gammas, betas) = params.split_at(self.layers);

        let mut builder = CircuitBuilder::with_name(self.num_qubits, "qaoa").hadamard_all();
        for (&gamma, &beta) in gammas.iter().zip(betas) {
            for term in self.cost.terms() {
                builder = builder.pauli_evolution(term, 2.0 * gamma * term.coeff());
            }
            builder = builder.qaoa_mixer(beta);
        }
        builder.build()
    }
}

// ============================================================================
// HardwareEfficientAnsatz
// ============================================================================

/// Ry/Rz rotation layers separated by CX chains, closed by a final Ry layer
///
/// Parameters: `layers · 2N + N`, ordered layer by layer as
/// `[ry_0..ry_{N-1}, rz_0..rz_{N-1}]`, then the closing `ry` layer.
#[derive(Debug, Clone)]
pub struct HardwareEfficientAnsatz {
    num_qubits: usize,
    layers: usize,
}

impl HardwareEfficientAnsatz {
    /// Create an ansatz on at least one qubit
    pub fn new(num_qubits: usize, layers: usize) -> QalgoResult<Self> {
        if num_qubits == 0 {
            return Err(QalgoError::InvalidQubitCount {
                qubits: 0,
                max: DEFAULT_MAX_QUBITS,
            });
        }
        Ok(Self { num_qubits, layers })
    }

    /// Number of entangling layers
    pub fn layers(&self) -> usize {
        self.layers
    }
}

impl Ansatz for HardwareEfficientAnsatz {
    fn name(&self) -> &str {
        "hardware-efficient"
    }

    fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    fn num_parameters(&self) -> usize {
        self.layers * 2 * self.num_qubits + self.num_qubits
    }

    fn circuit(&self, params: &[f64]) -> QalgoResult<Circuit> {
        check_parameters(self.num_parameters(), params)?;
        let n = self.num_qubits;

        let mut builder = CircuitBuilder::with_name(n, "hardware_efficient");
        for layer in params[..self.layers * 2 * n].chunks(2 * n) {
            let (ry, rz) = layer.split_at(n);
            builder = builder.ry_layer(ry).rz_layer(rz);
            if n > 1 {
                builder = builder.cx_chain();
            }
        }
        builder.ry_layer(&params[self.layers * 2 * n..]).build()
    }
}

// ============================================================================
// Tests
// ============================================================================
