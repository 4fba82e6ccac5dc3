//! Bench command implementation.

use anyhow::{Context, Result};
use qalgo_bench::{BenchSuite, ReportFormat, Reporter};

/// Execute the bench command.
pub fn execute(
    max_qubits: usize,
    seeds: usize,
    seed: u64,
    shots: u64,
    format: ReportFormat,
) -> Result<String> {
    let mut suite = BenchSuite::with_seed(seed).with_shots(shots);
    let results = suite
        .run_qubit_sweep(max_qubits, seeds)
        .context("benchmark sweep failed")?;
    Ok(Reporter::benchmarks(&results, format)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_sweep_csv() {
        let csv = execute(2, 1, 1, 128, ReportFormat::Csv).unwrap();
        assert_eq!(csv.lines().count(), 3);
        assert!(csv.contains("grover_1q"));
    }
}
