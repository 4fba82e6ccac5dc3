//! Gate application on a statevector
//!
//! Single-qubit gates act on amplitude pairs `(i, i | 1 << q)` for every
//! index `i` with bit `q` clear; the full `2^N × 2^N` operator is never
//! formed. Diagonal gates and X take dedicated paths.

use crate::state::StateVector;
use num_complex::Complex64;
use qalgo_core::{Gate, QalgoError, QalgoResult, QubitId, SingleQubitGate};
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_4};

/// 2×2 unitary as `[[m00, m01], [m10, m11]]`
pub type Matrix2 = [[Complex64; 2]; 2];

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

/// Matrix of a single-qubit gate
pub fn single_qubit_matrix(gate: SingleQubitGate) -> Matrix2 {
    let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
    match gate {
        SingleQubitGate::H => [[h, h], [h, -h]],
        SingleQubitGate::X => [[ZERO, ONE], [ONE, ZERO]],
        SingleQubitGate::Y => [[ZERO, -I], [I, ZERO]],
        SingleQubitGate::Z => [[ONE, ZERO], [ZERO, -ONE]],
        SingleQubitGate::S => [[ONE, ZERO], [ZERO, I]],
        SingleQubitGate::Sdg => [[ONE, ZERO], [ZERO, -I]],
        SingleQubitGate::T => [[ONE, ZERO], [ZERO, Complex64::from_polar(1.0, FRAC_PI_4)]],
        SingleQubitGate::Tdg => [[ONE, ZERO], [ZERO, Complex64::from_polar(1.0, -FRAC_PI_4)]],
        SingleQubitGate::Phase(lambda) => [[ONE, ZERO], [ZERO, Complex64::from_polar(1.0, lambda)]],
        SingleQubitGate::Rx(theta) => {
            let c = Complex64::new((theta / 2.0).cos(), 0.0);
            let s = Complex64::new(0.0, -(theta / 2.0).sin());
            [[c, s], [s, c]]
        }
        SingleQubitGate::Ry(theta) => {
            let c = Complex64::new((theta / 2.0).cos(), 0.0);
            let s = Complex64::new((theta / 2.0).sin(), 0.0);
            [[c, -s], [s, c]]
        }
        SingleQubitGate::Rz(theta) => [
            [Complex64::from_polar(1.0, -theta / 2.0), ZERO],
            [ZERO, Complex64::from_polar(1.0, theta / 2.0)],
        ],
    }
}

// ============================================================================
// Entry Point
// ============================================================================

/// Apply one gate to `state` in place
///
/// `MeasureAll` leaves the state untouched.
pub fn apply_gate(state: &mut StateVector, gate: &Gate) -> QalgoResult<()> {
    let n = state.num_qubits();
    for q in gate.qubits() {
        if q >= n {
            return Err(QalgoError::QubitOutOfRange {
                gate: gate.name().to_string(),
                qubit: q,
                num_qubits: n,
            });
        }
    }

    #[cfg(debug_assertions)]
    let norm_before = state.norm_squared();

    let amps = state.amplitudes_mut();
    match gate {
        Gate::Single(g, q) => apply_single(amps, *g, *q),
        Gate::Broadcast(g, qs) => {
            for &q in qs {
                apply_single(amps, *g, q);
            }
        }
        Gate::Cnot(c, t) => apply_cnot(amps, *c, *t),
        Gate::Cz(c, t) => apply_mcz(amps, &[*c, *t]),
        Gate::Swap(a, b) => apply_swap(amps, *a, *b),
        Gate::Mcz(qs) => apply_mcz(amps, qs),
        Gate::MeasureAll => {}
    }

    #[cfg(debug_assertions)]
    {
        let norm_after = state.norm_squared();
        debug_assert!(
            (norm_after - norm_before).abs() < qalgo_core::constants::EPSILON,
            "gate {} changed norm from {} to {}",
            gate,
            norm_before,
            norm_after
        );
    }

    Ok(())
}

/// Apply a gate sequence in order
pub fn apply_gates<'a>(
    state: &mut StateVector,
    gates: impl IntoIterator<Item = &'a Gate>,
) -> QalgoResult<()> {
    for gate in gates {
        apply_gate(state, gate)?;
    }
    Ok(())
}

// ============================================================================
// Single-Qubit Gates
// ============================================================================

fn apply_single(amps: &mut [Complex64], gate: SingleQubitGate, q: QubitId) {
    match gate {
        SingleQubitGate::X => apply_x(amps, q),
        g if g.is_diagonal() => {
            let m = single_qubit_matrix(g);
            apply_diagonal(amps, q, m[0][0], m[1][1]);
        }
        g => {
            let m = single_qubit_matrix(g);
            apply_pairwise(amps, q, |a, b| {
                (m[0][0] * a + m[0][1] * b, m[1][0] * a + m[1][1] * b)
            });
        }
    }
}

fn apply_pairwise<F>(amps: &mut [Complex64], q: QubitId, f: F)
where
    F: Fn(Complex64, Complex64) -> (Complex64, Complex64),
{
    let mask = 1usize << q;
    for i in 0..amps.len() {
        if i & mask == 0 {
            let j = i | mask;
            let (new_i, new_j) = f(amps[i], amps[j]);
            amps[i] = new_i;
            amps[j] = new_j;
        }
    }
}

fn apply_x(amps: &mut [Complex64], q: QubitId) {
    let mask = 1usize << q;
    for i in 0..amps.len() {
        if i & mask == 0 {
            amps.swap(i, i | mask);
        }
    }
}

fn apply_diagonal(amps: &mut [Complex64], q: QubitId, d0: Complex64, d1: Complex64) {
    let mask = 1usize << q;
    let skip_zero = d0 == ONE;
    for (i, a) in amps.iter_mut().enumerate() {
        if i & mask == 0 {
            if !skip_zero {
                *a *= d0;
            }
        } else {
            *a *= d1;
        }
    }
}

// ============================================================================
// Two-Qubit and Multi-Controlled Gates
// ============================================================================

fn apply_cnot(amps: &mut [Complex64], control: QubitId, target: QubitId) {
    let control_mask = 1usize << control;
    let target_mask = 1usize << target;
    for i in 0..amps.len() {
        if i & control_mask != 0 && i & target_mask == 0 {
            amps.swap(i, i | target_mask);
        }
    }
}

fn apply_swap(amps: &mut [Complex64], a: QubitId, b: QubitId) {
    let mask_a = 1usize << a;
    let mask_b = 1usize << b;
    for i in 0..amps.len() {
        // Visit each |..1..0..⟩ ↔ |..0..1..⟩ pair once
        if i & mask_a != 0 && i & mask_b == 0 {
            amps.swap(i, i ^ mask_a ^ mask_b);
        }
    }
}

fn apply_mcz(amps: &mut [Complex64], qubits: &[QubitId]) {
    let mask = qubits.iter().fold(0usize, |m, &q| m | (1usize << q));
    for (i, a) in amps.iter_mut().enumerate() {
        if i & mask == mask {
            *a = -*a;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
