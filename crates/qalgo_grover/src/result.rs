//! Grover search result

use qalgo_backend::MeasurementResult;
use qalgo_core::{index_to_bitstring, QalgoResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Grover search result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroverResult {
    /// Sampled measurement counts
    pub counts: MeasurementResult,

    /// Oracle+diffusion steps applied
    pub iterations: usize,

    /// Marked basis index
    pub target: u64,

    /// Marked basis index as a bitstring
    pub target_bitstring: String,

    /// Exact probability of the target in the final state
    pub success_probability: f64,

    /// True if the most frequent outcome is the target
    pub found: bool,
}

impl GroverResult {
    /// Assemble a result from a measurement
    pub fn new(
        counts: MeasurementResult,
        iterations: usize,
        target: u64,
        num_qubits: usize,
        success_probability: f64,
    ) -> Self {
        let target_bitstring = index_to_bitstring(target, num_qubits);
        let found = counts
            .most_frequent()
            .map(|(bs, _)| bs == target_bitstring)
            .unwrap_or(false);
        Self {
            counts,
            iterations,
            target,
            target_bitstring,
            success_probability,
            found,
        }
    }

    /// Target observed strictly more often than every other bitstring
    pub fn target_dominates(&self) -> bool {
        self.counts.dominates(&self.target_bitstring)
    }

    /// Number of shots landing on the target
    pub fn target_count(&self) -> u64 {
        self.counts.count(&self.target_bitstring)
    }

    /// Fraction of shots landing on the target
    pub fn empirical_success_rate(&self) -> f64 {
        self.counts.probability(&self.target_bitstring)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> QalgoResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for GroverResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GroverResult(target={}, iterations={}, hits={}/{}, p_exact={:.4}, found={})",
            self.target_bitstring,
            self.iterations,
            self.target_count(),
            self.counts.shots,
            self.success_probability,
            self.found
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use qalgo_core::Counts;

    fn make_result(target_hits: u64, other_hits: u64) -> GroverResult {
        let mut counts = Counts::new();
        counts.insert("0101".to_string(), target_hits);
        counts.insert("0000".to_string(), other_hits);
        let m = MeasurementResult::new(counts, target_hits + other_hits, 4, "test");
        GroverResult::new(m, 3, 5, 4, 0.96)
    }

    #[test]
    fn test_found_and_dominates() {
        let r = make_result(900, 100);
        assert!(r.found);
        assert!(r.target_dominates());
        assert_eq!(r.target_count(), 900);
        assert!((r.empirical_success_rate() - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_tie_does_not_dominate() {
        let r = make_result(50, 50);
        assert!(!r.target_dominates());
        // "0000" sorts first on ties
        assert!(!r.found);
    }

    #[test]
    fn test_display_and_json() {
        let r = make_result(10, 1);
        assert!(r.to_string().contains("target=0101"));
        let json = r.to_json().unwrap();
        assert!(json.contains("\"target_bitstring\": \"0101\""));
    }
}
