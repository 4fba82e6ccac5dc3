//! Classical minimization strategies
//!
//! A [`Minimizer`] drives an objective `f: ℝⁿ → ℝ` that may fail; any error
//! from the objective aborts the search and is returned unchanged.

use crate::config::{GradientRule, MinimizerMethod, OptimizerConfig};
use crate::convergence::{Convergence, StepSchedule};
use qalgo_core::constants::optimizer;
use qalgo_core::QalgoResult;
use serde::{Deserialize, Serialize};

/// Objective function handed to a minimizer
pub type Objective<'a> = dyn FnMut(&[f64]) -> QalgoResult<f64> + 'a;

/// When a minimizer should stop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StoppingCriteria {
    /// Threshold on |Δ| per iteration
    pub tolerance: f64,

    /// Iteration cap
    pub max_iterations: usize,

    /// Consecutive small changes required
    pub window: usize,
}

impl StoppingCriteria {
    /// Criteria from an optimizer configuration
    pub fn from_config(config: &OptimizerConfig) -> Self {
        Self {
            tolerance: config.tolerance,
            max_iterations: config.max_iterations,
            window: config.window,
        }
    }

    fn convergence(&self) -> Convergence {
        Convergence::new(self.window, self.tolerance)
    }
}

impl Default for StoppingCriteria {
    fn default() -> Self {
        Self::from_config(&OptimizerConfig::default())
    }
}

/// One outer iteration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationRecord {
    /// Iteration index
    pub iteration: usize,

    /// Best value after the iteration
    pub value: f64,

    /// Change measured by the convergence test
    pub delta: f64,

    /// Step, simplex spread or learning rate in use
    pub step: f64,
}

/// What a minimizer returns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinimizerOutcome {
    /// Best parameters found
    pub params: Vec<f64>,

    /// Objective at `params`
    pub value: f64,

    /// Outer iterations performed
    pub iterations: usize,

    /// True only if the convergence test passed
    pub converged: bool,

    /// Per-iteration trace
    pub history: Vec<IterationRecord>,
}

/// Pluggable minimization strategy
pub trait Minimizer {
    /// Strategy name
    fn name(&self) -> &str;

    /// Minimize `objective` starting from `initial`
    fn minimize(
        &mut self,
        objective: &mut Objective<'_>,
        initial: &[f64],
        criteria: &StoppingCriteria,
    ) -> QalgoResult<MinimizerOutcome>;
}

/// Minimizer selected by `config.method`
pub fn from_config(config: &OptimizerConfig) -> Box<dyn Minimizer> {
    match config.method {
        MinimizerMethod::CoordinateDescent => Box::new(CoordinateDescent::new(config.initial_step)),
        MinimizerMethod::NelderMead => Box::new(NelderMead::new(config.initial_step)),
        MinimizerMethod::GradientDescent => {
            Box::new(
                GradientDescent::new(config.learning_rate, config.gradient)
                    .with_escape_step(config.initial_step),
            )
        }
    }
}

// ============================================================================
// CoordinateDescent
// ============================================================================

/// ±step probes along each coordinate in turn
///
/// A probe is kept when it lowers the objective. The step shrinks
/// geometrically after every sweep in which no probe helped. The change
/// reported to the convergence test is the largest |f(probe) − f(x)| seen
/// in the sweep, so a flat sweep means every coordinate is bracketed
/// within tolerance.
#[derive(Debug, Clone)]
pub struct CoordinateDescent {
    schedule: StepSchedule,
}

impl CoordinateDescent {
    /// Create with initial step
    pub fn new(initial_step: f64) -> Self {
        Self {
            schedule: StepSchedule::new(initial_step, optimizer::STEP_DECAY),
        }
    }

    /// Override the shrink factor
    pub fn with_decay(mut self, decay: f64) -> Self {
        self.schedule.decay = decay;
        self
    }
}

impl Minimizer for CoordinateDescent {
    fn name(&self) -> &str {
        "coordinate-descent"
    }

    fn minimize(
        &mut self,
        objective: &mut Objective<'_>,
        initial: &[f64],
        criteria: &StoppingCriteria,
    ) -> QalgoResult<MinimizerOutcome> {
        let mut schedule = StepSchedule::new(self.schedule.base, self.schedule.decay);
        let mut convergence = criteria.convergence();
        let mut x = initial.to_vec();
        let mut fx = objective(&x)?;
        let mut history = Vec::new();
        let mut converged = false;

        for iteration in 0..criteria.max_iterations {
            let step = schedule.current();
            let mut improved = false;
            let mut delta: f64 = 0.0;

            for i in 0..x.len() {
                let origin = x[i];
                let mut best = (origin, fx);
                for candidate in [origin + step, origin - step] {
                    x[i] = candidate;
                    let f = objective(&x)?;
                    delta = delta.max((f - fx).abs());
                    if f < best.1 {
                        best = (candidate, f);
                    }
                }
                x[i] = best.0;
                if best.1 < fx {
                    fx = best.1;
                    improved = true;
                }
            }

            if !improved {
                schedule.shrink();
            }

            history.push(IterationRecord {
                iteration,
                value: fx,
                delta,
                step,
            });
            log::debug!(
                "coordinate-descent iter {}: f={:.9} step={:.3e} delta={:.3e}",
                iteration,
                fx,
                step,
                delta
            );

            convergence.push(delta);
            if convergence.check() {
                converged = true;
                break;
            }
            if schedule.exhausted() {
                // Every coordinate is bracketed within the step floor
                log::debug!(
                    "coordinate-descent: step below {:.1e} after {} iterations",
                    schedule.min_step,
                    iteration + 1
                );
                converged = true;
                break;
            }
        }

        Ok(MinimizerOutcome {
            params: x,
            value: fx,
            iterations: history.len(),
            converged,
            history,
        })
    }
}

// ============================================================================
// NelderMead
// ============================================================================

/// Downhill simplex with standard coefficients
///
/// Converges when the spread f(worst) − f(best) stays below tolerance.
#[derive(Debug, Clone)]
pub struct NelderMead {
    initial_step: f64,
    reflection: f64,
    expansion: f64,
    contraction: f64,
    shrink: f64,
}

impl NelderMead {
    /// Create with initial simplex edge length
    pub fn new(initial_step: f64) -> Self {
        Self {
            initial_step,
            reflection: 1.0,
            expansion: 2.0,
            contraction: 0.5,
            shrink: 0.5,
        }
    }
}

fn lerp(a: &[f64], b: &[f64], t: f64) -> Vec<f64> {
    // a + t·(b − a)
    a.iter().zip(b).map(|(&x, &y)| x + t * (y - x)).collect()
}

impl Minimizer for NelderMead {
    fn name(&self) -> &str {
        "nelder-mead"
    }

    fn minimize(
        &mut self,
        objective: &mut Objective<'_>,
        initial: &[f64],
        criteria: &StoppingCriteria,
    ) -> QalgoResult<MinimizerOutcome> {
        let n = initial.len();
        let mut convergence = criteria.convergence();

        let mut simplex: Vec<(Vec<f64>, f64)> = Vec::with_capacity(n + 1);
        simplex.push((initial.to_vec(), objective(initial)?));
        for i in 0..n {
            let mut v = initial.to_vec();
            v[i] += self.initial_step;
            let f = objective(&v)?;
            simplex.push((v, f));
        }

        let mut history = Vec::new();
        let mut converged = false;

        for iteration in 0..criteria.max_iterations {
            simplex.sort_by(|a, b| a.1.total_cmp(&b.1));
            let best = simplex[0].1;
            let worst = simplex[n].1;
            let second_worst = simplex[n.saturating_sub(1)].1;

            // Centroid of all but the worst vertex
            let mut centroid = vec![0.0; n];
            for (v, _) in &simplex[..n] {
                for (c, x) in centroid.iter_mut().zip(v) {
                    *c += x / n as f64;
                }
            }

            let reflected = lerp(&centroid, &simplex[n].0, -self.reflection);
            let f_reflected = objective(&reflected)?;

            if f_reflected < best {
                let expanded = lerp(&centroid, &simplex[n].0, -self.expansion);
                let f_expanded = objective(&expanded)?;
                simplex[n] = if f_expanded < f_reflected {
                    (expanded, f_expanded)
                } else {
                    (reflected, f_reflected)
                };
            } else if f_reflected < second_worst {
                simplex[n] = (reflected, f_reflected);
            } else {
                let (toward, f_toward) = if f_reflected < worst {
                    (reflected.clone(), f_reflected)
                } else {
                    (simplex[n].0.clone(), worst)
                };
                let contracted = lerp(&centroid, &toward, self.contraction);
                let f_contracted = objective(&contracted)?;
                if f_contracted < f_toward {
                    simplex[n] = (contracted, f_contracted);
                } else {
                    let anchor = simplex[0].0.clone();
                    for vertex in simplex.iter_mut().skip(1) {
                        let v = lerp(&anchor, &vertex.0, self.shrink);
                        let f = objective(&v)?;
                        *vertex = (v, f);
                    }
                }
            }

            simplex.sort_by(|a, b| a.1.total_cmp(&b.1));
            let spread = simplex[n].1 - simplex[0].1;
            history.push(IterationRecord {
                iteration,
                value: simplex[0].1,
                delta: spread,
                step: spread,
            });
            log::debug!(
                "nelder-mead iter {}: f={:.9} spread={:.3e}",
                iteration,
                simplex[0].1,
                spread
            );

            convergence.push(spread);
            if convergence.check() {
                converged = true;
                break;
            }
        }

        let (params, value) = simplex.swap_remove(0);
        Ok(MinimizerOutcome {
            params,
            value,
            iterations: history.len(),
            converged,
            history,
        })
    }
}

// ============================================================================
// GradientDescent
// ============================================================================

/// Steepest descent with backtracking line search
///
/// When the line search finds no lower point (a vanishing gradient at a
/// maximum or saddle looks the same as one at a minimum), ±`escape_step`
/// probes along each coordinate decide. The iteration counts as stalled
/// only if none of them improves.
#[derive(Debug, Clone)]
pub struct GradientDescent {
    learning_rate: f64,
    rule: GradientRule,
    max_backtracks: usize,
    escape_step: f64,
}

impl GradientDescent {
    /// Create with learning rate and gradient rule
    pub fn new(learning_rate: f64, rule: GradientRule) -> Self {
        Self {
            learning_rate,
            rule,
            max_backtracks: 20,
            escape_step: optimizer::DEFAULT_INITIAL_STEP,
        }
    }

    /// Set the probe length used when the line search stalls
    pub fn with_escape_step(mut self, step: f64) -> Self {
        self.escape_step = step;
        self
    }

    /// Best ±`escape_step` coordinate probe, if it beats `fx`
    fn escape(
        &self,
        objective: &mut Objective<'_>,
        x: &[f64],
        fx: f64,
    ) -> QalgoResult<Option<(Vec<f64>, f64)>> {
        let mut best: Option<(Vec<f64>, f64)> = None;
        let mut probe = x.to_vec();
        for i in 0..x.len() {
            for candidate in [x[i] + self.escape_step, x[i] - self.escape_step] {
                probe[i] = candidate;
                let f = objective(&probe)?;
                if f < best.as_ref().map_or(fx, |b| b.1) {
                    best = Some((probe.clone(), f));
                }
            }
            probe[i] = x[i];
        }
        Ok(best)
    }

    fn gradient(&self, objective: &mut Objective<'_>, x: &[f64]) -> QalgoResult<Vec<f64>> {
        let (shift, scale) = match self.rule {
            GradientRule::ParameterShift => (optimizer::PARAMETER_SHIFT, 0.5),
            GradientRule::FiniteDifference => (
                optimizer::FINITE_DIFF_STEP,
                0.5 / optimizer::FINITE_DIFF_STEP,
            ),
        };
        let mut probe = x.to_vec();
        let mut grad = Vec::with_capacity(x.len());
        for i in 0..x.len() {
            probe[i] = x[i] + shift;
            let plus = objective(&probe)?;
            probe[i] = x[i] - shift;
            let minus = objective(&probe)?;
            probe[i] = x[i];
            grad.push(scale * (plus - minus));
        }
        Ok(grad)
    }
}

impl Minimizer for GradientDescent {
    fn name(&self) -> &str {
        "gradient-descent"
    }

    fn minimize(
        &mut self,
        objective: &mut Objective<'_>,
        initial: &[f64],
        criteria: &StoppingCriteria,
    ) -> QalgoResult<MinimizerOutcome> {
        let mut convergence = criteria.convergence();
        let mut x = initial.to_vec();
        let mut fx = objective(&x)?;
        let mut history = Vec::new();
        let mut converged = false;

        for iteration in 0..criteria.max_iterations {
            let grad = self.gradient(objective, &x)?;

            let mut rate = self.learning_rate;
            let mut delta = 0.0;
            let mut moved = false;
            for _ in 0..=self.max_backtracks {
                let candidate: Vec<f64> =
                    x.iter().zip(&grad).map(|(xi, gi)| xi - rate * gi).collect();
                let f = objective(&candidate)?;
                if f < fx {
                    delta = fx - f;
                    x = candidate;
                    fx = f;
                    moved = true;
                    break;
                }
                rate *= 0.5;
            }

            if !moved {
                if let Some((escaped, f)) = self.escape(objective, &x, fx)? {
                    log::debug!(
                        "gradient-descent iter {}: line search stalled, probe moved f {:.9} -> {:.9}",
                        iteration,
                        fx,
                        f
                    );
                    delta = fx - f;
                    x = escaped;
                    fx = f;
                }
            }

            history.push(IterationRecord {
                iteration,
                value: fx,
                delta,
                step: rate,
            });
            log::debug!(
                "gradient-descent iter {}: f={:.9} rate={:.3e} delta={:.3e}",
                iteration,
                fx,
                rate,
                delta
            );

            convergence.push(delta);
            if convergence.check() {
                converged = true;
                break;
            }
        }

        Ok(MinimizerOutcome {
            params: x,
            value: fx,
            iterations: history.len(),
            converged,
            history,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use qalgo_core::QalgoError;

    fn quadratic(x: &[f64]) -> QalgoResult<f64> {
        Ok((x[0] - 1.0).powi(2) + 2.0 * (x[1] + 0.5).powi(2) + 3.0)
    }

    fn cosine(x: &[f64]) -> QalgoResult<f64> {
        Ok(x[0].cos())
    }

    fn criteria() -> StoppingCriteria {
        StoppingCriteria {
            tolerance: 1e-8,
            max_iterations: 500,
            window: 2,
        }
    }

    #[test]
    fn test_coordinate_descent_quadratic() {
        let mut m = CoordinateDescent::new(0.5);
        let out = m.minimize(&mut quadratic, &[0.0, 0.0], &criteria()).unwrap();
        assert!(out.converged);
        assert_abs_diff_eq!(out.value, 3.0, epsilon = 1e-7);
        assert_abs_diff_eq!(out.params[0], 1.0, epsilon = 1e-3);
        assert_abs_diff_eq!(out.params[1], -0.5, epsilon = 1e-3);
    }

    #[test]
    fn test_coordinate_descent_cosine_within_tolerance() {
        let mut m = CoordinateDescent::new(0.5);
        let c = StoppingCriteria {
            tolerance: 1e-6,
            max_iterations: 200,
            window: 2,
        };
        let out = m.minimize(&mut cosine, &[0.1], &c).unwrap();
        assert!(out.converged);
        assert!(out.value + 1.0 < 1e-6);
    }

    #[test]
    fn test_nelder_mead_quadratic() {
        let mut m = NelderMead::new(0.5);
        let out = m.minimize(&mut quadratic, &[0.0, 0.0], &criteria()).unwrap();
        assert!(out.converged);
        assert_abs_diff_eq!(out.value, 3.0, epsilon = 1e-6);
    }

    #[test]
    fn test_gradient_descent_rules() {
        for rule in [GradientRule::FiniteDifference, GradientRule::ParameterShift] {
            let mut m = GradientDescent::new(0.2, rule);
            let out = m.minimize(&mut cosine, &[0.3], &criteria()).unwrap();
            assert_abs_diff_eq!(out.value, -1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_iteration_cap_is_not_convergence() {
        let mut m = CoordinateDescent::new(0.01);
        let c = StoppingCriteria {
            tolerance: 1e-12,
            max_iterations: 3,
            window: 2,
        };
        let out = m.minimize(&mut quadratic, &[10.0, 10.0], &c).unwrap();
        assert!(!out.converged);
        assert_eq!(out.iterations, 3);
        assert_eq!(out.history.len(), 3);
    }

    #[test]
    fn test_objective_error_propagates() {
        let mut calls = 0;
        let mut failing = |_: &[f64]| -> QalgoResult<f64> {
            calls += 1;
            if calls > 3 {
                Err(QalgoError::NonFiniteExpectation {
                    evaluation: calls,
                    value: f64::NAN,
                })
            } else {
                Ok(1.0)
            }
        };
        let err = NelderMead::new(0.5)
            .minimize(&mut failing, &[0.0, 0.0], &criteria())
            .unwrap_err();
        assert!(err.is_optimization_error());
    }

    #[test]
    fn test_from_config() {
        let config = OptimizerConfig::new().with_method(MinimizerMethod::NelderMead);
        assert_eq!(from_config(&config).name(), "nelder-mead");
        assert_eq!(
            from_config(&OptimizerConfig::default()).name(),
            "coordinate-descent"
        );
    }

    #[test]
    fn test_gradient_descent_leaves_stationary_maximum() {
        // cos has zero gradient at 0, where it is maximal
        let mut m = GradientDescent::new(0.2, GradientRule::FiniteDifference);
        let out = m.minimize(&mut cosine, &[0.0], &criteria()).unwrap();
        assert!(out.converged);
        assert_abs_diff_eq!(out.value, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_gradient_descent_stays_at_minimum() {
        let mut m = GradientDescent::new(0.2, GradientRule::ParameterShift);
        let out = m
            .minimize(&mut cosine, &[std::f64::consts::PI], &criteria())
            .unwrap();
        assert!(out.converged);
        assert_eq!(out.iterations, 2);
        assert_abs_diff_eq!(out.value, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_coordinate_descent_step_floor_converges() {
        let mut m = CoordinateDescent::new(0.5);
        let c = StoppingCriteria {
            tolerance: 0.0,
            max_iterations: 10_000,
            window: 2,
        };
        let out = m.minimize(&mut quadratic, &[0.0, 0.0], &c).unwrap();
        assert!(out.converged);
        assert!(out.iterations < c.max_iterations);
        assert_abs_diff_eq!(out.value, 3.0, epsilon = 1e-12);
    }
}
