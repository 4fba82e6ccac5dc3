//! Optimizer configuration
//!
//! Plain builder-style struct with JSON load/save for file-based runs.

use qalgo_core::constants::optimizer;
use qalgo_core::{QalgoError, QalgoResult};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Classical minimization strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum MinimizerMethod {
    /// ±step probes per coordinate
    #[default]
    CoordinateDescent,

    /// Downhill simplex
    NelderMead,

    /// Gradient steps with backtracking
    GradientDescent,
}

impl MinimizerMethod {
    /// Kebab-case name
    pub fn name(&self) -> &'static str {
        match self {
            MinimizerMethod::CoordinateDescent => "coordinate-descent",
            MinimizerMethod::NelderMead => "nelder-mead",
            MinimizerMethod::GradientDescent => "gradient-descent",
        }
    }
}

impl FromStr for MinimizerMethod {
    type Err = QalgoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "coordinate-descent" | "coordinate" | "cd" => Ok(MinimizerMethod::CoordinateDescent),
            "nelder-mead" | "simplex" | "nm" => Ok(MinimizerMethod::NelderMead),
            "gradient-descent" | "gradient" | "gd" => Ok(MinimizerMethod::GradientDescent),
            other => Err(QalgoError::InvalidConfig(format!(
                "unknown minimizer method '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for MinimizerMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// How gradients are estimated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum GradientRule {
    /// Central differences with a small step
    #[default]
    FiniteDifference,

    /// (f(θ+π/2) − f(θ−π/2)) / 2, exact when each parameter drives one rotation
    ParameterShift,
}

/// Variational optimizer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Convergence tolerance on |Δ expectation|
    pub tolerance: f64,

    /// Maximum outer iterations
    pub max_iterations: usize,

    /// Consecutive small changes required to converge
    pub window: usize,

    /// Initial probe step (coordinate descent) or simplex edge (Nelder-Mead)
    pub initial_step: f64,

    /// Gradient descent learning rate
    pub learning_rate: f64,

    /// Minimization strategy
    pub method: MinimizerMethod,

    /// Gradient estimate for gradient descent
    pub gradient: GradientRule,

    /// Seed for random initial parameters and shot sampling
    pub seed: Option<u64>,
}

impl OptimizerConfig {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Configuration with library defaults
    pub fn new() -> Self {
        Self {
            tolerance: optimizer::DEFAULT_TOLERANCE,
            max_iterations: optimizer::DEFAULT_MAX_ITERATIONS,
            window: optimizer::DEFAULT_WINDOW,
            initial_step: optimizer::DEFAULT_INITIAL_STEP,
            learning_rate: optimizer::DEFAULT_LEARNING_RATE,
            method: MinimizerMethod::default(),
            gradient: GradientRule::default(),
            seed: None,
        }
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    /// Set tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set iteration cap
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set convergence window
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Set initial step
    pub fn with_initial_step(mut self, step: f64) -> Self {
        self.initial_step = step;
        self
    }

    /// Set learning rate
    pub fn with_learning_rate(mut self, rate: f64) -> Self {
        self.learning_rate = rate;
        self
    }

    /// Set minimization method
    pub fn with_method(mut self, method: MinimizerMethod) -> Self {
        self.method = method;
        self
    }

    /// Set gradient rule
    pub fn with_gradient(mut self, rule: GradientRule) -> Self {
        self.gradient = rule;
        self
    }

    /// Set seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    // ========================================================================
    // Derived Values
    // ========================================================================

    /// Starting parameters of length `count`
    ///
    /// Uniform in [−π, π) when seeded, otherwise a fixed small offset so the
    /// search does not start on a stationary point of cosine landscapes.
    pub fn initial_parameters(&self, count: usize) -> Vec<f64> {
        match self.seed {
            Some(seed) => {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                (0..count).map(|_| rng.gen_range(-PI..PI)).collect()
            }
            None => vec![0.1; count],
        }
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Check every field
    pub fn validate(&self) -> QalgoResult<()> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(QalgoError::InvalidConfig(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(QalgoError::InvalidConfig(
                "max_iterations must be at least 1".into(),
            ));
        }
        if self.window == 0 {
            return Err(QalgoError::InvalidConfig(
                "window must be at least 1".into(),
            ));
        }
        if !(self.initial_step.is_finite() && self.initial_step > 0.0) {
            return Err(QalgoError::InvalidConfig(format!(
                "initial_step must be positive, got {}",
                self.initial_step
            )));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(QalgoError::InvalidConfig(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }

    // ========================================================================
    // JSON I/O
    // ========================================================================

    /// Parse and validate a JSON document; missing fields take defaults
    pub fn from_json_str(json: &str) -> QalgoResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> QalgoResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> QalgoResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write pretty JSON to a file
    pub fn save_json(&self, path: impl AsRef<Path>) -> QalgoResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OptimizerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OptimizerConfig({}, tol={:e}, max_iter={}, window={})",
            self.method, self.tolerance, self.max_iterations, self.window
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
    fn test_defaults() {
        let config = OptimizerConfig::default();
        assert_eq!(config.tolerance, 1e-6);
        assert_eq!(config.max_iterations, 200);
        assert_eq!(config.window, 2);
        assert_eq!(config.method, MinimizerMethod::CoordinateDescent);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = OptimizerConfig::new()
            .with_tolerance(1e-4)
            .with_max_iterations(10)
            .with_method(MinimizerMethod::NelderMead)
            .with_seed(7);
        assert_eq!(config.tolerance, 1e-4);
        assert_eq!(config.max_iterations, 10);
        assert_eq!(config.method, MinimizerMethod::NelderMead);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_validate_rejects() {
        assert!(OptimizerConfig::new().with_tolerance(0.0).validate().is_err());
        assert!(OptimizerConfig::new()
            .with_tolerance(f64::NAN)
            .validate()
            .is_err());
        assert!(OptimizerConfig::new()
            .with_max_iterations(0)
            .validate()
            .is_err());
        let err = OptimizerConfig::new().with_window(0).validate().unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_method_parse() {
        assert_eq!(
            "nelder-mead".parse::<MinimizerMethod>().unwrap(),
            MinimizerMethod::NelderMead
        );
        assert_eq!(
            "Gradient_Descent".parse::<MinimizerMethod>().unwrap(),
            MinimizerMethod::GradientDescent
        );
        assert!("bfgs".parse::<MinimizerMethod>().is_err());
    }

    #[test]
    fn test_json_partial_document() {
        let config =
            OptimizerConfig::from_json_str(r#"{ "tolerance": 1e-4, "method": "nelder-mead" }"#)
                .unwrap();
        assert_eq!(config.tolerance, 1e-4);
        assert_eq!(config.method, MinimizerMethod::NelderMead);
        assert_eq!(config.max_iterations, 200);
    }

    #[test]
    fn test_json_errors() {
        let err = OptimizerConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, QalgoError::JsonError(_)));

        let err = OptimizerConfig::from_json_str(r#"{ "window": 0 }"#).unwrap_err();
        assert!(err.is_configuration_error());

        let err = OptimizerConfig::from_json_file("/nonexistent/qalgo.json").unwrap_err();
        assert!(matches!(err, QalgoError::FileError(_)));
    }

    #[test]
    fn test_json_file_roundtrip() {
        let path = std::env::temp_dir().join(format!("qalgo_opt_{}.json", std::process::id()));
        let config = OptimizerConfig::new()
            .with_method(MinimizerMethod::GradientDescent)
            .with_seed(3);
        config.save_json(&path).unwrap();
        let loaded = OptimizerConfig::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_initial_parameters() {
        assert_eq!(OptimizerConfig::new().initial_parameters(3), vec![0.1; 3]);

        let a = OptimizerConfig::new().with_seed(5).initial_parameters(4);
        let b = OptimizerConfig::new().with_seed(5).initial_parameters(4);
        assert_eq!(a, b);
        assert!(a.iter().all(|p| (-PI..PI).contains(p)));
    }
}
