//! Batch processing: cluster a report batch and score every member.
//!
//! The same pipeline serves two call sites: freshly submitted batches at
//! sync time, and the previously verified subset at dashboard-assembly
//! time.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::info;

use rescuegrid_common::{
    AuthenticityVerdict, EngineConfig, GeoPoint, IncidentSummary, Report, RescueGridError,
};

use crate::authenticity::AuthenticityScorer;
use crate::cluster::LocationClusterer;

/// Everything produced by one batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// Incident label to member reports. Every input report appears under
    /// exactly one label.
    pub clustered_reports: HashMap<String, Vec<Report>>,
    /// Authenticity verdicts keyed by report id.
    pub validation_results: HashMap<i64, AuthenticityVerdict>,
    /// Aggregates per incident label.
    pub incident_summary: HashMap<String, IncidentSummary>,
    pub total_reports_processed: usize,
    pub total_incidents: usize,
}

/// Runs the full batch pipeline: location clustering, per-report
/// authenticity verdicts, and per-incident aggregation.
pub struct BatchProcessor {
    clusterer: LocationClusterer,
    scorer: AuthenticityScorer,
}

impl BatchProcessor {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            clusterer: LocationClusterer::new(config.clone()),
            scorer: AuthenticityScorer::new(config),
        }
    }

    /// Process a batch of reports.
    ///
    /// An empty batch yields a well-formed outcome with a single empty
    /// incident. A clustered report without a verdict would mean the
    /// pipeline broke its own contract and surfaces as a `Validation`
    /// error rather than being skipped.
    pub fn process(&self, reports: &[Report]) -> Result<BatchOutcome, RescueGridError> {
        let clustered_reports = self.clusterer.cluster(reports);

        let validation_results: HashMap<i64, AuthenticityVerdict> =
            reports.iter().map(|r| (r.id, self.scorer.score(r))).collect();

        let mut incident_summary = HashMap::new();
        for (label, members) in &clustered_reports {
            incident_summary.insert(
                label.clone(),
                summarize_incident(label, members, &validation_results)?,
            );
        }

        let total_incidents = clustered_reports.len();
        info!(
            reports = reports.len(),
            incidents = total_incidents,
            authentic = validation_results.values().filter(|v| v.is_likely_authentic).count(),
            "Batch processed"
        );

        Ok(BatchOutcome {
            clustered_reports,
            validation_results,
            incident_summary,
            total_reports_processed: reports.len(),
            total_incidents,
        })
    }
}

fn summarize_incident(
    label: &str,
    members: &[Report],
    verdicts: &HashMap<i64, AuthenticityVerdict>,
) -> Result<IncidentSummary, RescueGridError> {
    let mut authentic_reports = 0;
    for member in members {
        let verdict = verdicts.get(&member.id).ok_or_else(|| {
            RescueGridError::Validation(format!(
                "report {} clustered into {label} has no authenticity verdict",
                member.id
            ))
        })?;
        if verdict.is_likely_authentic {
            authentic_reports += 1;
        }
    }

    Ok(IncidentSummary {
        total_reports: members.len(),
        authentic_reports,
        priority: members.iter().map(|r| r.priority).max().unwrap_or(1),
        disaster_types: distinct_disaster_types(members),
        location: centroid(members),
    })
}

/// Distinct member disaster types, sorted for stable output.
fn distinct_disaster_types(members: &[Report]) -> Vec<String> {
    members
        .iter()
        .map(|r| r.disaster_type.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Coordinate-wise mean of member locations. An empty member list maps to
/// the origin so the summary stays finite and serializable.
fn centroid(members: &[Report]) -> GeoPoint {
    if members.is_empty() {
        return GeoPoint { lat: 0.0, lng: 0.0 };
    }
    let count = members.len() as f64;
    GeoPoint {
        lat: members.iter().map(|r| r.lat).sum::<f64>() / count,
        lng: members.iter().map(|r| r.lng).sum::<f64>() / count,
    }
}

// ---------------------------------------------------------------------------
// Write-back helpers
// ---------------------------------------------------------------------------

/// Stamp each report's `incident_id` from the cluster label its id landed
/// under. Labels are per-batch; re-clustering a different batch may assign
/// different labels to the same reports.
pub fn apply_incident_labels(
    reports: &mut [Report],
    clustered_reports: &HashMap<String, Vec<Report>>,
) {
    let label_by_id: HashMap<i64, &String> = clustered_reports
        .iter()
        .flat_map(|(label, members)| members.iter().map(move |r| (r.id, label)))
        .collect();

    for report in reports {
        if let Some(label) = label_by_id.get(&report.id) {
            report.incident_id = Some((*label).clone());
        }
    }
}

/// Mark reports verified where their verdict is likely-authentic. Reports
/// already verified stay verified; a negative verdict never un-verifies.
pub fn apply_verdicts(reports: &mut [Report], verdicts: &HashMap<i64, AuthenticityVerdict>) {
    for report in reports {
        if let Some(verdict) = verdicts.get(&report.id) {
            if verdict.is_likely_authentic {
                report.is_verified = true;
            }
        }
    }
}
