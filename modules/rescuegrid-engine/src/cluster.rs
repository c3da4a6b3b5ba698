//! Partitioning of a report batch into incident groups.

use std::collections::HashMap;

use tracing::debug;

use rescuegrid_common::{haversine_m, EngineConfig, Report};

use crate::kmeans::kmeans_partition;
use crate::proximity::estimate_incident_groups;

/// Fixed seed for the partitioning pass. Group membership must be
/// reproducible across runs for identical input.
const PARTITION_SEED: u64 = 42;

/// Groups reports into incidents by geographic proximity.
pub struct LocationClusterer {
    config: EngineConfig,
}

impl LocationClusterer {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Partition a batch into incident groups, keyed by 1-based label.
    ///
    /// Fewer than two reports form a single `incident_1`; an empty batch
    /// still yields that key with an empty member list. Larger batches are
    /// partitioned around the estimated group count. The estimate is only a
    /// hint, so a produced group can spread wider than the proximity
    /// radius.
    pub fn cluster(&self, reports: &[Report]) -> HashMap<String, Vec<Report>> {
        if reports.len() < 2 {
            let mut clustered = HashMap::new();
            clustered.insert(incident_label(0), reports.to_vec());
            return clustered;
        }

        let coordinates: Vec<(f64, f64)> = reports.iter().map(|r| (r.lat, r.lng)).collect();
        let k = estimate_incident_groups(&coordinates, self.config.proximity_radius_m, haversine_m);
        let labels = kmeans_partition(&coordinates, k, PARTITION_SEED);

        let mut clustered: HashMap<String, Vec<Report>> = HashMap::new();
        for (report, cluster_index) in reports.iter().zip(&labels) {
            clustered
                .entry(incident_label(*cluster_index))
                .or_default()
                .push(report.clone());
        }

        debug!(
            reports = reports.len(),
            group_hint = k,
            incidents = clustered.len(),
            "Reports grouped by location"
        );
        clustered
    }
}

/// Incident labels are 1-based: cluster index 0 becomes `incident_1`.
fn incident_label(cluster_index: usize) -> String {
    format!("incident_{}", cluster_index + 1)
}
