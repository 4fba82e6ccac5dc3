//! Synthetic point sets

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f64::consts::PI;

/// A point in ℝ^d
pub type Point = Vec<f64>;

/// Standard normal sample via Box-Muller
fn gaussian<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(1e-12);
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

/// `count` points uniform in the unit square
pub fn uniform_points(count: usize, seed: u64) -> Vec<Point> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| vec![rng.gen::<f64>(), rng.gen::<f64>()])
        .collect()
}

/// Isotropic Gaussian blobs, `per_center` points around each center
///
/// Points are emitted center by center, so the true label of point `i`
/// is `i / per_center`.
pub fn gaussian_blobs(centers: &[[f64; 2]], per_center: usize, spread: f64, seed: u64) -> Vec<Point> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut points = Vec::with_capacity(centers.len() * per_center);
    for c in centers {
        for _ in 0..per_center {
            points.push(vec![
                c[0] + spread * gaussian(&mut rng),
                c[1] + spread * gaussian(&mut rng),
            ]);
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_points() {
        let pts = uniform_points(50, 1);
        assert_eq!(pts.len(), 50);
        assert!(pts.iter().flatten().all(|v| (0.0..1.0).contains(v)));
        assert_eq!(pts, uniform_points(50, 1));
    }

    #[test]
    fn test_blobs_centered() {
        let pts = gaussian_blobs(&[[5.0, 5.0]], 2000, 0.5, 3);
        let mean_x: f64 = pts.iter().map(|p| p[0]).sum::<f64>() / pts.len() as f64;
        let mean_y: f64 = pts.iter().map(|p| p[1]).sum::<f64>() / pts.len() as f64;
        assert!((mean_x - 5.0).abs() < 0.05);
        assert!((mean_y - 5.0).abs() < 0.05);
    }
}
