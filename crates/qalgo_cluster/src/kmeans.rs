//! k-means clustering
//!
//! k-means++ seeding followed by Lloyd iterations. Seeding draws from a
//! `ChaCha8Rng`, so a fixed seed reproduces labels exactly.

use crate::data::Point;
use qalgo_core::{QalgoError, QalgoResult};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Squared Euclidean distance
fn distance_sq(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Index and squared distance of the nearest centroid
fn nearest(point: &[f64], centroids: &[Point]) -> (usize, f64) {
    centroids
        .iter()
        .enumerate()
        .map(|(i, c)| (i, distance_sq(point, c)))
        .fold((0, f64::INFINITY), |best, cur| if cur.1 < best.1 { cur } else { best })
}

/// k-means configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KMeans {
    /// Number of clusters
    pub k: usize,

    /// Lloyd iteration cap
    pub max_iterations: usize,

    /// Stop once no centroid moves more than this (squared distance)
    pub tolerance: f64,

    /// Seeding RNG seed
    pub seed: u64,
}

impl KMeans {
    /// `k` clusters with default limits
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iterations: 300,
            tolerance: 1e-8,
            seed: 0,
        }
    }

    /// Set iteration cap
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check the configuration against a point set
    pub fn validate(&self, points: &[Point]) -> QalgoResult<()> {
        if self.k == 0 {
            return Err(QalgoError::InvalidConfig("k must be at least 1".into()));
        }
        if self.max_iterations == 0 {
            return Err(QalgoError::InvalidConfig(
                "max_iterations must be at least 1".into(),
            ));
        }
        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return Err(QalgoError::InvalidConfig(format!(
                "tolerance must be non-negative, got {}",
                self.tolerance
            )));
        }
        if points.len() < self.k {
            return Err(QalgoError::InvalidConfig(format!(
                "need at least k={} points, got {}",
                self.k,
                points.len()
            )));
        }

        let dim = points[0].len();
        if dim == 0 {
            return Err(QalgoError::InvalidConfig("points have no coordinates".into()));
        }
        for (i, p) in points.iter().enumerate() {
            if p.len() != dim {
                return Err(QalgoError::InvalidConfig(format!(
                    "point {} has {} coordinates, expected {}",
                    i,
                    p.len(),
                    dim
                )));
            }
            if p.iter().any(|v| !v.is_finite()) {
                return Err(QalgoError::InvalidConfig(format!(
                    "point {} has a non-finite coordinate",
                    i
                )));
            }
        }
        Ok(())
    }

    // ========================================================================
    // Fitting
    // ========================================================================

    /// k-means++ initial centroids
    fn seed_centroids(&self, points: &[Point], rng: &mut ChaCha8Rng) -> Vec<Point> {
        let mut centroids = Vec::with_capacity(self.k);
        centroids.push(points[rng.gen_range(0..points.len())].clone());

        let mut weights: Vec<f64> = points
            .iter()
            .map(|p| distance_sq(p, &centroids[0]))
            .collect();

        while centroids.len() < self.k {
            let total: f64 = weights.iter().sum();
            let chosen = if total > 0.0 {
                // Sample proportional to D(x)²
                let mut r = rng.gen::<f64>() * total;
                let mut idx = points.len() - 1;
                for (i, w) in weights.iter().enumerate() {
                    if r < *w {
                        idx = i;
                        break;
                    }
                    r -= w;
                }
                idx
            } else {
                // Every point coincides with a centroid
                rng.gen_range(0..points.len())
            };

            let c = points[chosen].clone();
            for (w, p) in weights.iter_mut().zip(points) {
                *w = w.min(distance_sq(p, &c));
            }
            centroids.push(c);
        }
        centroids
    }

    /// Cluster `points`
    pub fn fit(&self, points: &[Point]) -> QalgoResult<KMeansModel> {
        self.validate(points)?;
        let dim = points[0].len();

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut centroids = self.seed_centroids(points, &mut rng);
        let mut labels = vec![0usize; points.len()];
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iterations {
            iterations += 1;

            for (label, p) in labels.iter_mut().zip(points) {
                *label = nearest(p, &centroids).0;
            }

            let mut sums = vec![vec![0.0; dim]; self.k];
            let mut sizes = vec![0usize; self.k];
            for (&label, p) in labels.iter().zip(points) {
                sizes[label] += 1;
                for (s, v) in sums[label].iter_mut().zip(p) {
                    *s += v;
                }
            }

            let mut shift: f64 = 0.0;
            for (j, centroid) in centroids.iter_mut().enumerate() {
                // Empty clusters keep their centroid
                if sizes[j] == 0 {
                    continue;
                }
                let updated: Point = sums[j].iter().map(|s| s / sizes[j] as f64).collect();
                shift = shift.max(distance_sq(centroid, &updated));
                *centroid = updated;
            }

            if shift <= self.tolerance {
                converged = true;
                break;
            }
        }

        // Final assignment against the final centroids
        let mut inertia = 0.0;
        for (label, p) in labels.iter_mut().zip(points) {
            let (j, d) = nearest(p, &centroids);
            *label = j;
            inertia += d;
        }

        log::debug!(
            "k-means: k={} n={} iterations={} inertia={:.6} converged={}",
            self.k,
            points.len(),
            iterations,
            inertia,
            converged
        );

        Ok(KMeansModel {
            labels,
            centroids,
            inertia,
            iterations,
            converged,
        })
    }
}

impl Default for KMeans {
    fn default() -> Self {
        Self::new(2)
    }
}

/// Fitted k-means model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KMeansModel {
    /// Cluster index of every input point
    pub labels: Vec<usize>,

    /// Cluster centers
    pub centroids: Vec<Point>,

    /// Σ squared distance to the assigned centroid
    pub inertia: f64,

    /// Lloyd iterations run
    pub iterations: usize,

    /// True if centroids stopped moving before the cap
    pub converged: bool,
}

impl KMeansModel {
    /// Number of clusters
    pub fn k(&self) -> usize {
        self.centroids.len()
    }

    /// Nearest centroid for a new point
    pub fn predict(&self, point: &[f64]) -> usize {
        nearest(point, &self.centroids).0
    }

    /// Points per cluster
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.k()];
        for &l in &self.labels {
            sizes[l] += 1;
        }
        sizes
    }
}

impl fmt::Display for KMeansModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "KMeansModel(k={}, sizes={:?}, inertia={:.4}, iterations={})",
            self.k(),
            self.cluster_sizes(),
            self.inertia,
            self.iterations
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
