//! Grover search configuration

use qalgo_core::constants::{grover, DEFAULT_SHOTS, MAX_SHOTS};
use qalgo_core::{index_to_bitstring, QalgoError, QalgoResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Grover search configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroverConfig {
    /// Number of qubits N (database size 2^N)
    pub qubits: usize,

    /// Marked basis index t
    pub target: u64,

    /// Number of measurement shots
    pub shots: u64,

    /// Sampling seed
    pub seed: Option<u64>,

    /// Iteration count override (analytic optimum when `None`)
    pub iterations: Option<usize>,
}

impl GroverConfig {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Search for `target` among `2^qubits` entries
    pub fn new(qubits: usize, target: u64) -> Self {
        Self {
            qubits,
            target,
            shots: DEFAULT_SHOTS,
            seed: None,
            iterations: None,
        }
    }

    /// 16-entry search for index 5
    pub fn reference() -> Self {
        Self::new(grover::REFERENCE_QUBITS, grover::REFERENCE_TARGET)
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    /// Set number of qubits
    pub fn with_qubits(mut self, qubits: usize) -> Self {
        self.qubits = qubits;
        self
    }

    /// Set target index
    pub fn with_target(mut self, target: u64) -> Self {
        self.target = target;
        self
    }

    /// Set number of shots
    pub fn with_shots(mut self, shots: u64) -> Self {
        self.shots = shots;
        self
    }

    /// Set seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Override the iteration count
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = Some(iterations);
        self
    }

    // ========================================================================
    // Derived Values
    // ========================================================================

    /// Database size 2^N
    pub fn database_size(&self) -> u64 {
        1u64 << self.qubits.min(63)
    }

    /// Iterations that will actually run
    pub fn effective_iterations(&self) -> usize {
        self.iterations
            .unwrap_or_else(|| grover::optimal_iterations(self.qubits))
    }

    /// Target rendered as a bitstring
    pub fn target_bitstring(&self) -> String {
        index_to_bitstring(self.target, self.qubits)
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validate against an executor that accepts at most `max_qubits` qubits
    pub fn validate(&self, max_qubits: usize) -> QalgoResult<()> {
        if self.qubits == 0 || self.qubits > max_qubits {
            return Err(QalgoError::InvalidConfig(format!(
                "qubits must be in [1, {}], got {}",
                max_qubits, self.qubits
            )));
        }

        if self.target >= self.database_size() {
            return Err(QalgoError::TargetOutOfRange {
                target: self.target,
                qubits: self.qubits,
                size: self.database_size(),
            });
        }

        if self.shots == 0 || self.shots > MAX_SHOTS {
            return Err(QalgoError::InvalidShots {
                shots: self.shots,
                max: MAX_SHOTS,
            });
        }

        Ok(())
    }
}

impl Default for GroverConfig {
    fn default() -> Self {
        Self::reference()
    }
}

impl fmt::Display for GroverConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GroverConfig({}Q, target={} ({}), shots={}, iterations={})",
            self.qubits,
            self.target,
            self.target_bitstring(),
            self.shots,
            self.effective_iterations()
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference() {
        let config = GroverConfig::default();
        assert_eq!(config.qubits, 4);
        assert_eq!(config.target, 5);
        assert_eq!(config.shots, 1024);
        assert_eq!(config.effective_iterations(), 3);
        assert_eq!(config.target_bitstring(), "0101");
        assert!(config.validate(24).is_ok());
    }

    #[test]
    fn test_builder() {
        let config = GroverConfig::new(3, 1)
            .with_shots(64)
            .with_seed(9)
            .with_iterations(1);
        assert_eq!(config.shots, 64);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.effective_iterations(), 1);
    }

    #[test]
    fn test_target_out_of_range() {
        let err = GroverConfig::new(4, 16).validate(24).unwrap_err();
        assert_eq!(
            err,
            QalgoError::TargetOutOfRange {
                target: 16,
                qubits: 4,
                size: 16
            }
        );
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_invalid_qubits() {
        assert!(GroverConfig::new(0, 0).validate(24).is_err());
        assert!(GroverConfig::new(10, 0)
            .validate(8)
            .unwrap_err()
            .is_configuration_error());
    }

    #[test]
    fn test_zero_shots() {
        assert!(GroverConfig::reference()
            .with_shots(0)
            .validate(24)
            .unwrap_err()
            .is_configuration_error());
    }
}
