//! Cluster command implementation.

use anyhow::{Context, Result};
use qalgo_backend::Simulator;
use qalgo_bench::{Histogram, ReportFormat};
use qalgo_cluster::{uniform_points, ClusteringPipeline, ClusteringResult, KMeans};
use std::fmt::{self, Write};

/// Execute the cluster command.
pub fn execute(
    points: usize,
    k: usize,
    seed: u64,
    shots: u64,
    format: ReportFormat,
) -> Result<String> {
    let data = uniform_points(points, seed);
    let pipeline =
        ClusteringPipeline::new(KMeans::new(k).with_seed(seed), Simulator::new()).with_shots(shots);
    let result = pipeline
        .run(&data)
        .with_context(|| format!("clustering {} points into {} clusters failed", points, k))?;

    let report = match format {
        ReportFormat::Json => result.to_json()?,
        ReportFormat::Markdown => render(&result, true)?,
        ReportFormat::Csv | ReportFormat::Text => render(&result, false)?,
    };
    Ok(report)
}

fn render(result: &ClusteringResult, markdown: bool) -> Result<String, fmt::Error> {
    let model = &result.model;
    let mut out = String::new();
    if markdown {
        writeln!(out, "# Clustering\n")?;
        writeln!(out, "| Cluster | Size | Centroid |")?;
        writeln!(out, "|---------|------|----------|")?;
    } else {
        writeln!(out, "Clustering")?;
        writeln!(out, "==========\n")?;
    }
    for (i, (size, centroid)) in model
        .cluster_sizes()
        .iter()
        .zip(&model.centroids)
        .enumerate()
    {
        let coords: Vec<String> = centroid.iter().map(|c| format!("{:.4}", c)).collect();
        if markdown {
            writeln!(out, "| {} | {} | ({}) |", i, size, coords.join(", "))?;
        } else {
            writeln!(
                out,
                "  Cluster {}: {} points, centroid ({})",
                i,
                size,
                coords.join(", ")
            )?;
        }
    }
    writeln!(out)?;
    writeln!(out, "Inertia: {:.6} after {} iterations", model.inertia, model.iterations)?;
    writeln!(
        out,
        "Register: {} qubits, {} shots\n",
        result.register_qubits, result.measurement.shots
    )?;
    let histogram = Histogram::from_counts(&result.measurement.counts, 40);
    if markdown {
        writeln!(out, "```text\n{}```", histogram)?;
    } else {
        write!(out, "{}", histogram)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_clustering() {
        let text = execute(100, 2, 0, 1024, ReportFormat::Text).unwrap();
        assert!(text.contains("Cluster 0:"));
        assert!(text.contains("Cluster 1:"));
        assert!(text.contains("Register: 2 qubits, 1024 shots"));
    }

    #[test]
    fn test_json_round_trip_fields() {
        let json = execute(20, 3, 5, 64, ReportFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["model"]["labels"].as_array().map(|a| a.len()), Some(20));
        assert_eq!(parsed["register_qubits"].as_u64(), Some(2));
    }

    #[test]
    fn test_too_many_clusters() {
        assert!(execute(2, 5, 0, 64, ReportFormat::Text).is_err());
    }
}
