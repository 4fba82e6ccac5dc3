//! Optimize command implementation.

use anyhow::{anyhow, Context, Result};
use qalgo_bench::{ReportFormat, Reporter};
use qalgo_core::{Observable, PauliTerm};
use qalgo_variational::{
    exact_minimum_eigenvalue, MinimizerMethod, OptimizerConfig, VariationalOptimizer,
};

/// Parse `LABEL` or `COEFF*LABEL` into a weighted Pauli term
pub fn parse_term(text: &str) -> Result<PauliTerm> {
    let (coeff, label) = match text.split_once('*') {
        Some((c, l)) => {
            let coeff: f64 = c
                .trim()
                .parse()
                .map_err(|_| anyhow!("invalid coefficient '{}' in '{}'", c.trim(), text))?;
            (coeff, l.trim())
        }
        None => (1.0, text.trim()),
    };
    PauliTerm::from_label(label, coeff).with_context(|| format!("invalid Pauli term '{}'", text))
}

/// Sum of parsed terms
pub fn parse_observable(texts: &[String]) -> Result<Observable> {
    let terms = texts
        .iter()
        .map(|s| parse_term(s))
        .collect::<Result<Vec<_>>>()?;
    Ok(Observable::from_terms(terms))
}

/// Execute the optimize command.
pub fn execute(
    observables: &[String],
    layers: usize,
    method: Option<MinimizerMethod>,
    config_path: Option<&str>,
    seed: Option<u64>,
    format: ReportFormat,
) -> Result<String> {
    let observable = parse_observable(observables)?;

    let mut config = match config_path {
        Some(path) => OptimizerConfig::from_json_file(path)
            .with_context(|| format!("failed to load optimizer config from {}", path))?,
        None => OptimizerConfig::default(),
    };
    if let Some(method) = method {
        config = config.with_method(method);
    }
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }

    let mut optimizer =
        VariationalOptimizer::statevector(config).context("invalid optimizer configuration")?;
    let result = optimizer
        .minimum_eigenvalue(&observable, layers)
        .context("variational optimization failed")?;

    if let Some(exact) = exact_minimum_eigenvalue(&observable) {
        log::info!(
            "exact diagonal minimum {:.6}, gap {:.3e}",
            exact,
            result.value - exact
        );
    }
    Ok(Reporter::optimization(&result, format)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_term() {
        let term = parse_term("-0.5*XI").unwrap();
        assert_eq!(term.coeff(), -0.5);
        assert_eq!(term.weight(), 1);

        let term = parse_term("ZZII").unwrap();
        assert_eq!(term.coeff(), 1.0);
        assert_eq!(term.weight(), 2);

        assert!(parse_term("abc*ZZ").is_err());
        assert!(parse_term("ZQ").is_err());
    }

    #[test]
    fn test_parse_observable() {
        let texts = vec!["ZZII".to_string(), "0.25*IIIX".to_string()];
        let obs = parse_observable(&texts).unwrap();
        assert_eq!(obs.len(), 2);
        assert_eq!(obs.min_qubits(), 4);
    }

    #[test]
    fn test_reference_query_optimization() {
        let json = execute(
            &["ZZII".to_string()],
            2,
            None,
            None,
            None,
            ReportFormat::Json,
        )
        .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let value = parsed["value"].as_f64().unwrap();
        assert!(value < 1.0);
    }

    #[test]
    fn test_missing_config_file() {
        let err = execute(
            &["Z".to_string()],
            1,
            None,
            Some("/nonexistent/optimizer.json"),
            None,
            ReportFormat::Text,
        )
        .unwrap_err();
        assert!(err.to_string().contains("failed to load optimizer config"));
    }
}
