//! Group-count estimation from raw report coordinates.
//!
//! A single greedy radius pass that counts how many distinct groups a
//! coordinate list forms. The count seeds the centroid-partitioning pass;
//! it is a hint, not a clustering in its own right.

/// Estimate how many distinct incident groups a set of coordinates forms.
///
/// Walks the points in input order. Each unvisited point starts a group and
/// folds in every other unvisited point within `radius_m` of itself.
/// Membership is measured against the group representative only: a point
/// within radius of a folded-in member but outside radius of the
/// representative starts its own group. The result depends on input order
/// and on nothing else.
///
/// `distance_m` supplies great-circle distance in meters between two
/// lat/lng pairs.
pub fn estimate_incident_groups(
    points: &[(f64, f64)],
    radius_m: f64,
    distance_m: impl Fn(f64, f64, f64, f64) -> f64,
) -> usize {
    if points.len() <= 2 {
        return 1;
    }

    let mut visited = vec![false; points.len()];
    let mut groups = 0;

    for i in 0..points.len() {
        if visited[i] {
            continue;
        }
        groups += 1;
        visited[i] = true;

        let (lat1, lng1) = points[i];
        for j in 0..points.len() {
            if i != j && !visited[j] {
                let (lat2, lng2) = points[j];
                if distance_m(lat1, lng1, lat2, lng2) <= radius_m {
                    visited[j] = true;
                }
            }
        }
    }

    groups
}
