//! Oracle and diffusion fragments
//!
//! The oracle flips the phase of exactly one basis state `t`: X on every
//! qubit whose bit in `t` is 0 maps `t` onto |1…1⟩, a multi-controlled Z
//! over the whole register negates that state, and the X gates are undone.
//! The diffusion operator is the same construction around |0…0⟩ conjugated
//! by Hadamards, i.e. a reflection about the uniform superposition (up to a
//! global phase).

use qalgo_core::constants::grover;
use qalgo_core::{Circuit, CircuitBuilder, QalgoError, QalgoResult, QubitId};

fn all_qubits(n: usize) -> Vec<QubitId> {
    (0..n).collect()
}

/// Qubits whose bit in `target` is 0
pub fn zero_bits(num_qubits: usize, target: u64) -> Vec<QubitId> {
    (0..num_qubits)
        .filter(|&q| (target >> q) & 1 == 0)
        .collect()
}

/// Phase oracle marking basis state `target`
pub fn oracle(num_qubits: usize, target: u64) -> QalgoResult<Circuit> {
    if num_qubits < 64 && target >= 1u64 << num_qubits {
        return Err(QalgoError::TargetOutOfRange {
            target,
            qubits: num_qubits,
            size: 1u64 << num_qubits,
        });
    }
    let flips = zero_bits(num_qubits, target);
    let all = all_qubits(num_qubits);

    let mut builder = CircuitBuilder::with_name(num_qubits, "oracle");
    for &q in &flips {
        builder = builder.x(q);
    }
    builder = builder.multi_controlled_z(&all);
    for &q in &flips {
        builder = builder.x(q);
    }
    builder.build()
}

/// Reflection about the uniform superposition
pub fn diffusion(num_qubits: usize) -> QalgoResult<Circuit> {
    let all = all_qubits(num_qubits);
    CircuitBuilder::with_name(num_qubits, "diffusion")
        .hadamard_all()
        .pauli_x_all()
        .multi_controlled_z(&all)
        .pauli_x_all()
        .hadamard_all()
        .build()
}

/// One amplitude-amplification step: oracle then diffusion
pub fn grover_iteration(num_qubits: usize, target: u64) -> QalgoResult<Circuit> {
    let mut circuit = oracle(num_qubits, target)?;
    circuit.append(&diffusion(num_qubits)?)?;
    circuit.set_name("grover_iteration");
    Ok(circuit)
}

/// Full search circuit: uniform superposition then `iterations` steps
///
/// The measurement marker is not appended.
pub fn search_circuit(num_qubits: usize, target: u64, iterations: usize) -> QalgoResult<Circuit> {
    let step = grover_iteration(num_qubits, target)?;
    let mut builder = CircuitBuilder::with_name(num_qubits, "grover").hadamard_all();
    for _ in 0..iterations {
        builder = builder.append(&step);
    }
    builder.build()
}

/// floor(π/4 · √(2^N))
pub fn optimal_iterations(num_qubits: usize) -> usize {
    grover::optimal_iterations(num_qubits)
}

/// sin²((2k+1)θ) with θ = asin(1/√(2^N)), single marked item
pub fn theoretical_success_probability(num_qubits: usize, iterations: usize) -> f64 {
    let theta = 2f64.powf(-(num_qubits as f64) / 2.0).asin();
    ((2 * iterations + 1) as f64 * theta).sin().powi(2)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;
    use qalgo_backend::Simulator;
    use qalgo_core::Gate;

    #[test]
    fn test_zero_bits() {
        // 5 = 0b0101: qubits 1 and 3 are zero
        assert_eq!(zero_bits(4, 5), vec![1, 3]);
        assert!(zero_bits(3, 7).is_empty());
    }

    #[test]
    fn test_oracle_structure() {
        let c = oracle(4, 5).unwrap();
        assert_eq!(
            c.gates(),
            &[
                Gate::x(1),
                Gate::x(3),
                Gate::Mcz(vec![0, 1, 2, 3]),
                Gate::x(1),
                Gate::x(3),
            ]
        );
    }

    #[test]
    fn test_oracle_marks_only_target() {
        let sim = Simulator::new();
        let prep = CircuitBuilder::new(3).hadamard_all().build().unwrap();
        let mut circuit = prep.clone();
        circuit.append(&oracle(3, 6).unwrap()).unwrap();

        let before = sim.run(&prep).unwrap();
        let after = sim.run(&circuit).unwrap();
        for i in 0..8 {
            let expected = if i == 6 { -1.0 } else { 1.0 };
            assert_abs_diff_eq!(
                after.amplitudes()[i].re,
                expected * before.amplitudes()[i].re,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_oracle_rejects_target() {
        assert!(oracle(2, 4).unwrap_err().is_configuration_error());
    }

    #[test]
    fn test_diffusion_fixes_uniform_state() {
        let sim = Simulator::new();
        let prep = CircuitBuilder::new(3).hadamard_all().build().unwrap();
        let mut circuit = prep.clone();
        circuit.append(&diffusion(3).unwrap()).unwrap();

        let before = sim.run(&prep).unwrap();
        let after = sim.run(&circuit).unwrap();
        // Eigenstate up to a global phase
        assert_abs_diff_eq!(before.fidelity(&after).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_iteration_count_reference() {
        assert_eq!(optimal_iterations(4), 3);
    }

    #[test]
    fn test_theoretical_matches_statevector() {
        let sim = Simulator::new();
        for k in 0..=5 {
            let state = sim.run(&search_circuit(4, 5, k).unwrap()).unwrap();
            assert_abs_diff_eq!(
                state.probability(5),
                theoretical_success_probability(4, k),
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_theoretical_reference_value() {
        // N=4, k=3: sin²(7·asin(1/4)) ≈ 0.9613
        assert_abs_diff_eq!(
            theoretical_success_probability(4, 3),
            0.961319,
            epsilon = 1e-5
        );
    }

    proptest! {
        #[test]
        fn test_target_is_most_probable(n in 2usize..7, seed in any::<u64>()) {
            let target = seed % (1u64 << n);
            let circuit = search_circuit(n, target, optimal_iterations(n)).unwrap();
            let state = Simulator::new().run(&circuit).unwrap();
            prop_assert_eq!(state.most_probable(), target as usize);
        }
    }
}
