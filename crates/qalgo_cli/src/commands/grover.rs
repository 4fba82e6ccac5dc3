//! Grover command implementation.

use anyhow::{Context, Result};
use qalgo_backend::Simulator;
use qalgo_bench::{ReportFormat, Reporter};
use qalgo_grover::{search, GroverConfig};

/// Execute the grover command.
pub fn execute(
    qubits: usize,
    target: u64,
    shots: u64,
    seed: Option<u64>,
    iterations: Option<usize>,
    format: ReportFormat,
) -> Result<String> {
    let mut config = GroverConfig::new(qubits, target).with_shots(shots);
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    if let Some(iterations) = iterations {
        config = config.with_iterations(iterations);
    }

    let result = search(config, Simulator::new())
        .with_context(|| format!("Grover search for {} on {} qubits failed", target, qubits))?;
    if !result.found {
        log::warn!(
            "target {} was not the most frequent outcome",
            result.target_bitstring
        );
    }
    Ok(Reporter::grover(&result, format)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_search_report() {
        let text = execute(4, 5, 1024, Some(7), None, ReportFormat::Text).unwrap();
        assert!(text.contains("Found:       yes"));
    }

    #[test]
    fn test_target_out_of_range() {
        let err = execute(2, 9, 100, None, None, ReportFormat::Text).unwrap_err();
        assert!(err.to_string().contains("Grover search for 9"));
    }
}
