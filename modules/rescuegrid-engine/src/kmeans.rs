//! Seeded centroid partitioning over flat (lat, lng) coordinates.
//!
//! Lloyd's algorithm with random restarts. Coordinates are treated as plain
//! Euclidean values; no geodesic projection is applied, which is a known
//! accuracy limit at large spans.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Iteration cap per restart. Small batches converge long before this.
const MAX_ITERATIONS: usize = 100;

/// Number of seeded restarts; the lowest-inertia labeling wins.
const RESTARTS: usize = 10;

/// Partition `points` into `k` clusters, returning one cluster index per
/// point. The same input and seed always produce the same grouping.
///
/// Requires `1 <= k <= points.len()`.
pub(crate) fn kmeans_partition(points: &[(f64, f64)], k: usize, seed: u64) -> Vec<usize> {
    debug_assert!(k >= 1 && k <= points.len());
    let mut rng = StdRng::seed_from_u64(seed);
    let mut best: Option<(f64, Vec<usize>)> = None;

    for _ in 0..RESTARTS {
        let (labels, inertia) = run_lloyd(points, k, &mut rng);
        if best.as_ref().is_none_or(|(best_inertia, _)| inertia < *best_inertia) {
            best = Some((inertia, labels));
        }
    }

    best.map(|(_, labels)| labels).unwrap_or_default()
}

/// One Lloyd run: sample initial centroids, iterate assignment and mean
/// updates until stable, return the labeling and its inertia.
fn run_lloyd(points: &[(f64, f64)], k: usize, rng: &mut StdRng) -> (Vec<usize>, f64) {
    let mut centroids = initial_centroids(points, k, rng);
    let mut labels = vec![0usize; points.len()];

    for _ in 0..MAX_ITERATIONS {
        let mut changed = false;

        for (label, point) in labels.iter_mut().zip(points) {
            let nearest = nearest_centroid(*point, &centroids);
            if *label != nearest {
                *label = nearest;
                changed = true;
            }
        }

        let mut sums = vec![(0.0f64, 0.0f64, 0usize); k];
        for (label, point) in labels.iter().zip(points) {
            let slot = &mut sums[*label];
            slot.0 += point.0;
            slot.1 += point.1;
            slot.2 += 1;
        }
        for (centroid, (lat_sum, lng_sum, count)) in centroids.iter_mut().zip(&sums) {
            if *count > 0 {
                *centroid = (lat_sum / *count as f64, lng_sum / *count as f64);
            } else {
                // An empty cluster is re-seeded from a random input point so
                // every labeling uses all k slots where the data allows.
                *centroid = points[rng.random_range(0..points.len())];
                changed = true;
            }
        }

        if !changed {
            break;
        }
    }

    let inertia = labels
        .iter()
        .zip(points)
        .map(|(label, point)| squared_distance(*point, centroids[*label]))
        .sum();
    (labels, inertia)
}

/// k distinct input positions as starting centroids.
fn initial_centroids(points: &[(f64, f64)], k: usize, rng: &mut StdRng) -> Vec<(f64, f64)> {
    let mut indices: Vec<usize> = (0..points.len()).collect();
    indices.shuffle(rng);
    indices.truncate(k);
    indices.into_iter().map(|i| points[i]).collect()
}

/// Index of the nearest centroid, first on ties.
fn nearest_centroid(point: (f64, f64), centroids: &[(f64, f64)]) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (i, centroid) in centroids.iter().enumerate() {
        let distance = squared_distance(point, *centroid);
        if distance < best_distance {
            best_distance = distance;
            best = i;
        }
    }
    best
}

fn squared_distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    let d_lat = a.0 - b.0;
    let d_lng = a.1 - b.1;
    d_lat * d_lat + d_lng * d_lng
}
