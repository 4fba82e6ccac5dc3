//! Convergence detection and step scheduling
//!
//! The outer loop converges once `window` consecutive iterations change the
//! expectation by less than `tolerance`.

use qalgo_core::constants::optimizer;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Windowed |Δ| < tolerance detector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Convergence {
    /// Consecutive small changes required
    pub window: usize,

    /// Threshold on |Δ|
    pub tolerance: f64,

    history: VecDeque<f64>,
}

impl Convergence {
    /// Create a detector
    pub fn new(window: usize, tolerance: f64) -> Self {
        let window = window.max(1);
        Self {
            window,
            tolerance,
            history: VecDeque::with_capacity(window),
        }
    }

    /// Record the latest change
    pub fn push(&mut self, delta: f64) {
        self.history.push_back(delta);
        while self.history.len() > self.window {
            self.history.pop_front();
        }
    }

    /// True once the window is full and every entry is below tolerance
    pub fn check(&self) -> bool {
        self.history.len() >= self.window
            && self.history.iter().all(|d| d.abs() < self.tolerance)
    }

    /// Forget recorded changes
    pub fn reset(&mut self) {
        self.history.clear();
    }

    /// Entries currently in the window
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Most recent change
    pub fn last(&self) -> Option<f64> {
        self.history.back().copied()
    }
}

/// Geometric step schedule: δ_j = base · decay^j
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepSchedule {
    /// Initial step
    pub base: f64,

    /// Per-shrink factor
    pub decay: f64,

    /// Smallest useful step
    pub min_step: f64,

    shrinks: u32,
}

impl StepSchedule {
    /// Create a schedule
    pub fn new(base: f64, decay: f64) -> Self {
        Self {
            base,
            decay,
            min_step: optimizer::MIN_STEP,
            shrinks: 0,
        }
    }

    /// Current step
    pub fn current(&self) -> f64 {
        self.step(self.shrinks)
    }

    /// Step after `j` shrinks
    pub fn step(&self, j: u32) -> f64 {
        self.base * self.decay.powi(j as i32)
    }

    /// Advance to the next smaller step
    pub fn shrink(&mut self) {
        self.shrinks += 1;
    }

    /// True once the step fell below `min_step`
    pub fn exhausted(&self) -> bool {
        self.current() < self.min_step
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_needs_full_window() {
        let mut conv = Convergence::new(2, 1e-6);
        assert!(!conv.check());
        conv.push(1e-9);
        assert!(!conv.check());
        conv.push(1e-9);
        assert!(conv.check());
    }

    #[test]
    fn test_large_change_breaks_window() {
        let mut conv = Convergence::new(2, 1e-6);
        conv.push(1e-9);
        conv.push(0.5);
        assert!(!conv.check());
        conv.push(1e-8);
        assert!(!conv.check());
        conv.push(1e-8);
        assert!(conv.check());
    }

    #[test]
    fn test_negative_changes_use_magnitude() {
        let mut conv = Convergence::new(1, 1e-3);
        conv.push(-0.1);
        assert!(!conv.check());
        conv.push(-1e-4);
        assert!(conv.check());
    }

    #[test]
    fn test_reset() {
        let mut conv = Convergence::new(3, 1e-6);
        conv.push(0.1);
        conv.push(0.2);
        assert_eq!(conv.history_len(), 2);
        assert_eq!(conv.last(), Some(0.2));
        conv.reset();
        assert_eq!(conv.history_len(), 0);
    }

    #[test]
    fn test_step_schedule() {
        let mut s = StepSchedule::new(0.5, 0.5);
        assert_relative_eq!(s.current(), 0.5);
        s.shrink();
        assert_relative_eq!(s.current(), 0.25);
        assert_relative_eq!(s.step(3), 0.0625);
        for _ in 0..40 {
            s.shrink();
        }
        assert!(s.exhausted());
    }

    proptest! {
        #[test]
        fn test_window_needs_every_entry_small(
            deltas in proptest::collection::vec(-1.0f64..1.0, 1..20),
            window in 1usize..5,
        ) {
            let mut conv = Convergence::new(window, 1e-3);
            for d in &deltas {
                conv.push(*d);
            }
            let tail = &deltas[deltas.len().saturating_sub(window)..];
            let expected = deltas.len() >= window && tail.iter().all(|d| d.abs() < 1e-3);
            prop_assert_eq!(conv.check(), expected);
        }

        #[test]
        fn test_schedule_is_decreasing(base in 1e-3f64..2.0, j in 0u32..30) {
            let s = StepSchedule::new(base, 0.5);
            prop_assert!(s.step(j + 1) < s.step(j));
        }
    }
}
