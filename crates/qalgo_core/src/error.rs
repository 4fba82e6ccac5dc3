//! Error types for QALGO
//!
//! One error enum shared by every crate in the workspace. Variants are
//! grouped into the five failure families the toolkit distinguishes
//! (dimension, circuit, configuration, observable, optimization) plus
//! I/O for configuration files.

// Error variant fields are self-documenting via error messages
#![allow(missing_docs)]

use thiserror::Error;

/// Main error type for QALGO
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QalgoError {
    // ========================================================================
    // Dimension Errors
    // ========================================================================
    /// Qubit count is zero or exceeds the simulator capacity
    #[error("Invalid qubit count {qubits}: must be in range [1, {max}]")]
    InvalidQubitCount { qubits: usize, max: usize },

    /// Amplitude vector length is not a power of two
    #[error("Invalid state length {0}: must be a power of two >= 2")]
    InvalidStateLength(usize),

    /// Amplitudes do not form a unit vector
    #[error("State is not normalized: squared norm is {norm}")]
    NotNormalized { norm: f64 },

    // ========================================================================
    // Circuit Errors
    // ========================================================================
    /// Gate references a qubit outside the register
    #[error("Gate '{gate}' references qubit {qubit} but circuit has only {num_qubits} qubits")]
    QubitOutOfRange {
        gate: String,
        qubit: usize,
        num_qubits: usize,
    },

    /// Gate uses the same qubit twice (e.g. control == target)
    #[error("Gate '{gate}' uses qubit {qubit} more than once")]
    DuplicateQubit { gate: String, qubit: usize },

    /// Gate appended after the terminal measurement marker
    #[error("Gate '{gate}' appended after measure_all")]
    GateAfterMeasure { gate: String },

    /// Circuit and state disagree on the register size
    #[error("Circuit declares {circuit_qubits} qubits but state has {state_qubits}")]
    DimensionMismatch {
        circuit_qubits: usize,
        state_qubits: usize,
    },

    /// Rotation angle is NaN or infinite
    #[error("Invalid angle {0}: must be finite")]
    InvalidAngle(f64),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Grover target does not fit in the register
    #[error("Target index {target} out of range for {qubits} qubits (database size {size})")]
    TargetOutOfRange {
        target: u64,
        qubits: usize,
        size: u64,
    },

    /// Shot count is zero or above the limit
    #[error("Shots {shots} out of range [1, {max}]")]
    InvalidShots { shots: u64, max: u64 },

    /// Generic configuration problem
    #[error("Configuration error: {0}")]
    InvalidConfig(String),

    // ========================================================================
    // Observable Errors
    // ========================================================================
    /// Pauli term acts on a qubit the circuit does not have
    #[error("Observable references qubit {qubit} but circuit has only {num_qubits} qubits")]
    ObservableQubitOutOfRange { qubit: usize, num_qubits: usize },

    /// Unknown Pauli label character
    #[error("Invalid Pauli '{0}': must be I, X, Y, or Z")]
    InvalidPauli(String),

    /// Coefficient is NaN or infinite
    #[error("Invalid coefficient {0}: must be finite")]
    InvalidCoefficient(f64),

    /// Observable has no terms
    #[error("Observable has no terms")]
    EmptyObservable,

    // ========================================================================
    // Optimization Errors
    // ========================================================================
    /// Expectation value diverged
    #[error("Expectation value became non-finite ({value}) at evaluation {evaluation}")]
    NonFiniteExpectation { evaluation: usize, value: f64 },

    /// Parameter vector does not match the ansatz
    #[error("Ansatz expects {expected} parameters, got {got}")]
    ParameterCountMismatch { expected: usize, got: usize },

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(String),

    /// File I/O error
    #[error("File error: {0}")]
    FileError(String),
}

/// Result type alias for QALGO operations
pub type QalgoResult<T> = Result<T, QalgoError>;

/// Failure family of a [`QalgoError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid qubit count or state capacity
    Dimension,
    /// Malformed gate sequence or dimension mismatch
    Circuit,
    /// Invalid Grover target/size, shots, or other settings
    Configuration,
    /// Malformed observable
    Observable,
    /// Diverging or ill-posed optimization
    Optimization,
    /// Configuration file I/O
    Io,
}

// ============================================================================
// Error Conversion Helpers
// ============================================================================

impl From<serde_json::Error> for QalgoError {
    fn from(err: serde_json::Error) -> Self {
        QalgoError::JsonError(err.to_string())
    }
}

impl From<std::io::Error> for QalgoError {
    fn from(err: std::io::Error) -> Self {
        QalgoError::FileError(err.to_string())
    }
}

// ============================================================================
// Error Helpers
// ============================================================================

impl QalgoError {
    /// Failure family of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            QalgoError::InvalidQubitCount { .. }
            | QalgoError::InvalidStateLength(_)
            | QalgoError::NotNormalized { .. } => ErrorKind::Dimension,

            QalgoError::QubitOutOfRange { .. }
            | QalgoError::DuplicateQubit { .. }
            | QalgoError::GateAfterMeasure { .. }
            | QalgoError::DimensionMismatch { .. }
            | QalgoError::InvalidAngle(_) => ErrorKind::Circuit,

            QalgoError::TargetOutOfRange { .. }
            | QalgoError::InvalidShots { .. }
            | QalgoError::InvalidConfig(_) => ErrorKind::Configuration,

            QalgoError::ObservableQubitOutOfRange { .. }
            | QalgoError::InvalidPauli(_)
            | QalgoError::InvalidCoefficient(_)
            | QalgoError::EmptyObservable => ErrorKind::Observable,

            QalgoError::NonFiniteExpectation { .. }
            | QalgoError::ParameterCountMismatch { .. } => ErrorKind::Optimization,

            QalgoError::JsonError(_) | QalgoError::FileError(_) => ErrorKind::Io,
        }
    }

    /// Check if error is a dimension error
    pub fn is_dimension_error(&self) -> bool {
        self.kind() == ErrorKind::Dimension
    }

    /// Check if error is a circuit error
    pub fn is_circuit_error(&self) -> bool {
        self.kind() == ErrorKind::Circuit
    }

    /// Check if error is a configuration error
    pub fn is_configuration_error(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }

    /// Check if error is an observable error
    pub fn is_observable_error(&self) -> bool {
        self.kind() == ErrorKind::Observable
    }

    /// Check if error is an optimization error
    pub fn is_optimization_error(&self) -> bool {
        self.kind() == ErrorKind::Optimization
    }
}

// ============================================================================
// Tests
// ============================================================================
