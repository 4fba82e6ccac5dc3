//! Result reporting
//!
//! Renders Grover, optimizer and benchmark results as Markdown, JSON, CSV
//! or plain text.

use crate::histogram::Histogram;
use crate::suite::{BenchmarkResult, BenchmarkStatistics};
use qalgo_core::{QalgoError, QalgoResult};
use qalgo_grover::GroverResult;
use qalgo_variational::OptimizationResult;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};
use std::str::FromStr;

/// Histogram width in report output
const BAR_WIDTH: usize = 40;

/// Histogram rows shown in reports
const TOP_ROWS: usize = 8;

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ReportFormat {
    /// Markdown
    Markdown,
    /// JSON
    Json,
    /// CSV (benchmark tables only; other results fall back to text)
    Csv,
    /// Plain text
    #[default]
    Text,
}

impl FromStr for ReportFormat {
    type Err = QalgoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            "text" | "txt" => Ok(ReportFormat::Text),
            other => Err(QalgoError::InvalidConfig(format!(
                "unknown report format '{}'",
                other
            ))),
        }
    }
}

/// Renders results
pub struct Reporter;

impl Reporter {
    // ========================================================================
    // Grover
    // ========================================================================

    /// Grover search result
    pub fn grover(result: &GroverResult, format: ReportFormat) -> QalgoResult<String> {
        match format {
            ReportFormat::Json => result.to_json(),
            ReportFormat::Markdown => Ok(render(|out| grover_markdown(out, result))),
            ReportFormat::Csv | ReportFormat::Text => Ok(render(|out| grover_text(out, result))),
        }
    }

    // ========================================================================
    // Optimization
    // ========================================================================

    /// Variational optimization result
    pub fn optimization(result: &OptimizationResult, format: ReportFormat) -> QalgoResult<String> {
        match format {
            ReportFormat::Json => result.to_json(),
            ReportFormat::Markdown => Ok(render(|out| optimization_markdown(out, result))),
            ReportFormat::Csv | ReportFormat::Text => {
                Ok(render(|out| optimization_text(out, result)))
            }
        }
    }

    // ========================================================================
    // Benchmarks
    // ========================================================================

    /// Benchmark table
    pub fn benchmarks(results: &[BenchmarkResult], format: ReportFormat) -> QalgoResult<String> {
        match format {
            ReportFormat::Json => {
                let report = serde_json::json!({
                    "statistics": BenchmarkStatistics::from_results(results),
                    "results": results,
                });
                Ok(serde_json::to_string_pretty(&report)?)
            }
            ReportFormat::Markdown => Ok(render(|out| bench_markdown(out, results))),
            ReportFormat::Csv => Ok(render(|out| bench_csv(out, results))),
            ReportFormat::Text => Ok(render(|out| bench_text(out, results))),
        }
    }
}

/// Run a writer into a fresh string
fn render<F>(write: F) -> String
where
    F: FnOnce(&mut String) -> fmt::Result,
{
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write(&mut out);
    out
}

fn grover_text(out: &mut String, r: &GroverResult) -> fmt::Result {
    writeln!(out, "Grover Search")?;
    writeln!(out, "=============\n")?;
    writeln!(out, "  Qubits:      {}", r.target_bitstring.len())?;
    writeln!(out, "  Target:      {} ({})", r.target_bitstring, r.target)?;
    writeln!(out, "  Iterations:  {}", r.iterations)?;
    writeln!(out, "  Shots:       {}", r.counts.shots)?;
    writeln!(out, "  P(exact):    {:.4}", r.success_probability)?;
    writeln!(out, "  P(sampled):  {:.4}", r.empirical_success_rate())?;
    writeln!(out, "  Found:       {}\n", if r.found { "yes" } else { "no" })?;
    write!(out, "{}", Histogram::from_counts(&r.counts.counts, BAR_WIDTH).top(TOP_ROWS))
}

fn grover_markdown(out: &mut String, r: &GroverResult) -> fmt::Result {
    writeln!(out, "# Grover Search\n")?;
    writeln!(out, "- **Target**: `{}` ({})", r.target_bitstring, r.target)?;
    writeln!(out, "- **Iterations**: {}", r.iterations)?;
    writeln!(out, "- **Shots**: {}", r.counts.shots)?;
    writeln!(out, "- **P(exact)**: {:.4}", r.success_probability)?;
    writeln!(out, "- **Found**: {}\n", if r.found { "✓" } else { "✗" })?;
    writeln!(out, "| Bitstring | Count | Probability |")?;
    writeln!(out, "|-----------|-------|-------------|")?;
    for (bs, count) in r.counts.sorted_by_count().into_iter().take(TOP_ROWS) {
        writeln!(
            out,
            "| `{}` | {} | {:.4} |",
            bs,
            count,
            r.counts.probability(bs)
        )?;
    }
    Ok(())
}

fn optimization_text(out: &mut String, r: &OptimizationResult) -> fmt::Result {
    writeln!(out, "Variational Optimization")?;
    writeln!(out, "========================\n")?;
    writeln!(out, "  Value:        {:.9}", r.value)?;
    writeln!(out, "  Status:       {}", r.status)?;
    writeln!(out, "  Minimizer:    {}", r.minimizer)?;
    writeln!(out, "  Iterations:   {}", r.iterations)?;
    writeln!(out, "  Evaluations:  {}", r.evaluations)?;
    writeln!(out, "  Bound:        ±{:.4}", r.spectral_bound)?;
    let params: Vec<String> = r.params.iter().map(|p| format!("{:.4}", p)).collect();
    writeln!(out, "  Parameters:   [{}]", params.join(", "))
}

fn optimization_markdown(out: &mut String, r: &OptimizationResult) -> fmt::Result {
    writeln!(out, "# Variational Optimization\n")?;
    writeln!(out, "- **Value**: {:.9}", r.value)?;
    writeln!(out, "- **Status**: {}", r.status)?;
    writeln!(out, "- **Minimizer**: {}", r.minimizer)?;
    writeln!(out, "- **Evaluations**: {}\n", r.evaluations)?;
    if r.history.is_empty() {
        return Ok(());
    }
    writeln!(out, "| Iter | Value | Δ | Step |")?;
    writeln!(out, "|------|-------|---|------|")?;
    for rec in &r.history {
        writeln!(
            out,
            "| {} | {:.9} | {:.3e} | {:.3e} |",
            rec.iteration, rec.value, rec.delta, rec.step
        )?;
    }
    Ok(())
}

fn bench_markdown(out: &mut String, results: &[BenchmarkResult]) -> fmt::Result {
    let stats = BenchmarkStatistics::from_results(results);
    writeln!(out, "# QALGO Benchmark Results\n")?;
    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Benchmarks**: {}", stats.count)?;
    writeln!(out, "- **Mean Success**: {:.4}", stats.mean_success)?;
    writeln!(out, "- **Mean Dominance**: {:.1}%", stats.mean_dominance * 100.0)?;
    writeln!(
        out,
        "- **Total Time**: {:.2}s\n",
        stats.total_time_ms as f64 / 1000.0
    )?;

    writeln!(out, "## Detailed Results\n")?;
    writeln!(
        out,
        "| Name | Qubits | Iters | Runs | Theory | Sampled | Dominance | Time(ms) |"
    )?;
    writeln!(
        out,
        "|------|--------|-------|------|--------|---------|-----------|----------|"
    )?;
    for r in results {
        writeln!(
            out,
            "| {} | {} | {} | {} | {:.4} | {:.4} | {:.1}% | {} |",
            r.name,
            r.qubits,
            r.iterations,
            r.runs,
            r.theoretical_success,
            r.empirical_success,
            r.dominance_rate * 100.0,
            r.time_ms
        )?;
    }
    Ok(())
}

fn bench_csv(out: &mut String, results: &[BenchmarkResult]) -> fmt::Result {
    writeln!(
        out,
        "name,qubits,iterations,runs,shots,theoretical_success,empirical_success,dominance_rate,time_ms"
    )?;
    for r in results {
        writeln!(
            out,
            "{},{},{},{},{},{},{},{},{}",
            r.name,
            r.qubits,
            r.iterations,
            r.runs,
            r.shots,
            r.theoretical_success,
            r.empirical_success,
            r.dominance_rate,
            r.time_ms
        )?;
    }
    Ok(())
}

fn bench_text(out: &mut String, results: &[BenchmarkResult]) -> fmt::Result {
    let stats = BenchmarkStatistics::from_results(results);
    writeln!(out, "QALGO Benchmark Results")?;
    writeln!(out, "=======================\n")?;
    writeln!(out, "Summary:")?;
    writeln!(out, "  Benchmarks run:   {}", stats.count)?;
    writeln!(out, "  Mean success:     {:.4}", stats.mean_success)?;
    writeln!(out, "  Lowest success:   {:.4}", stats.min_success)?;
    writeln!(out, "  Mean dominance:   {:.1}%\n", stats.mean_dominance * 100.0)?;
    writeln!(out, "Individual Results:")?;
    for r in results {
        writeln!(
            out,
            "  {} ({} iters): sampled {:.4} vs theory {:.4}, dominance {:.0}%, {}ms",
            r.name,
            r.iterations,
            r.empirical_success,
            r.theoretical_success,
            r.dominance_rate * 100.0,
            r.time_ms
        )?;
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use qalgo_backend::Simulator;
    use qalgo_grover::{search, GroverConfig};
    use qalgo_core::Observable;
    use qalgo_variational::minimum_eigenvalue;

    fn make_test_results() -> Vec<BenchmarkResult> {
        vec![
            BenchmarkResult {
                name: "grover_2q".to_string(),
                qubits: 2,
                iterations: 1,
                runs: 4,
                shots: 1024,
                theoretical_success: 1.0,
                empirical_success: 1.0,
                dominance_rate: 1.0,
                time_ms: 3,
            },
            BenchmarkResult {
                name: "grover_4q".to_string(),
                qubits: 4,
                iterations: 3,
                runs: 4,
                shots: 1024,
                theoretical_success: 0.9613,
                empirical_success: 0.958,
                dominance_rate: 1.0,
                time_ms: 7,
            },
        ]
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("md".parse::<ReportFormat>().unwrap(), ReportFormat::Markdown);
        assert_eq!("JSON".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert!("yaml".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_bench_markdown() {
        let md = Reporter::benchmarks(&make_test_results(), ReportFormat::Markdown).unwrap();
        assert!(md.contains("# QALGO Benchmark Results"));
        assert!(md.contains("| Name |"));
        assert!(md.contains("grover_4q"));
    }

    #[test]
    fn test_bench_json() {
        let json = Reporter::benchmarks(&make_test_results(), ReportFormat::Json).unwrap();
        assert!(json.contains("\"statistics\""));
        assert!(json.contains("\"results\""));
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["results"].as_array().map(|a| a.len()), Some(2));
    }

    #[test]
    fn test_bench_csv() {
        let csv = Reporter::benchmarks(&make_test_results(), ReportFormat::Csv).unwrap();
        assert!(csv.starts_with("name,qubits,iterations"));
        assert!(csv.contains("grover_2q,2,1,4,1024"));
    }

    #[test]
    fn test_bench_text() {
        let text = Reporter::benchmarks(&make_test_results(), ReportFormat::Text).unwrap();
        assert!(text.contains("QALGO Benchmark Results"));
        assert!(text.contains("Benchmarks run:   2"));
    }

    #[test]
    fn test_grover_reports() {
        let result = search(GroverConfig::reference().with_seed(42), Simulator::new()).unwrap();

        let text = Reporter::grover(&result, ReportFormat::Text).unwrap();
        assert!(text.contains("Target:      0101 (5)"));
        assert!(text.contains("0101 | "));

        let md = Reporter::grover(&result, ReportFormat::Markdown).unwrap();
        assert!(md.lines().any(|l| l.starts_with("| `0101` |")));

        let json = Reporter::grover(&result, ReportFormat::Json).unwrap();
        assert!(json.contains("\"found\": true"));
    }

    #[test]
    fn test_optimization_reports() {
        let obs = Observable::from_label("Z", 1.0).unwrap();
        let result = minimum_eigenvalue(&obs, 1).unwrap();

        let text = Reporter::optimization(&result, ReportFormat::Text).unwrap();
        assert!(text.contains("Status:"));
        assert!(text.contains(&format!("Evaluations:  {}", result.evaluations)));

        let md = Reporter::optimization(&result, ReportFormat::Markdown).unwrap();
        assert!(md.contains("| Iter | Value |"));
    }
}
