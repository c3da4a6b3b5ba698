//! Dashboard and statistics assembly over in-memory report sets.
//!
//! The read side of the pipeline: clusters only previously verified
//! reports, orders incidents for responders, and aggregates platform-wide
//! counters. Callers supply the full report set; nothing here touches
//! storage.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use rescuegrid_common::{GeoPoint, Report, RescueGridError};

use crate::batch::BatchProcessor;

/// One incident with its member reports, as rendered to responders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentDetail {
    pub incident_id: String,
    pub total_reports: usize,
    pub authentic_reports: usize,
    pub priority: u8,
    pub disaster_types: Vec<String>,
    pub location: GeoPoint,
    pub reports: Vec<Report>,
}

/// The responder dashboard: verified incidents plus platform totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub incidents: Vec<IncidentDetail>,
    pub total_reports: usize,
    pub total_incidents: usize,
    pub verified_reports: usize,
    pub pending_verification: usize,
}

/// Platform-wide counters for the admin view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformStatistics {
    pub total_reports: usize,
    pub verified_reports: usize,
    pub pending_verification: usize,
    /// Verified share of all reports, in percent. Zero for an empty set.
    pub verification_rate: f64,
    pub disaster_type_breakdown: BTreeMap<String, usize>,
    /// Report counts per priority level, verified reports only.
    pub priority_breakdown: BTreeMap<u8, usize>,
    pub recent_reports_24h: usize,
}

/// Assemble the responder dashboard from the full report set.
///
/// Only verified reports are clustered; in that view every member is
/// already vetted, so each incident's authentic count equals its member
/// count. Incidents are ordered by priority, highest first, then by their
/// most recent member submission.
pub fn assemble_dashboard(
    processor: &BatchProcessor,
    all_reports: &[Report],
) -> Result<DashboardSnapshot, RescueGridError> {
    let verified: Vec<Report> = all_reports.iter().filter(|r| r.is_verified).cloned().collect();
    let pending = all_reports.len() - verified.len();

    if verified.is_empty() {
        return Ok(DashboardSnapshot {
            incidents: Vec::new(),
            total_reports: all_reports.len(),
            total_incidents: 0,
            verified_reports: 0,
            pending_verification: pending,
        });
    }

    let outcome = processor.process(&verified)?;

    let mut incidents = Vec::with_capacity(outcome.clustered_reports.len());
    for (label, members) in outcome.clustered_reports {
        let summary = outcome.incident_summary.get(&label).ok_or_else(|| {
            RescueGridError::Validation(format!("incident {label} has no summary"))
        })?;
        incidents.push(IncidentDetail {
            incident_id: label,
            total_reports: members.len(),
            authentic_reports: members.len(),
            priority: summary.priority,
            disaster_types: summary.disaster_types.clone(),
            location: summary.location,
            reports: members,
        });
    }

    incidents.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| latest_submission(&a.reports).cmp(&latest_submission(&b.reports)))
    });

    debug!(
        incidents = incidents.len(),
        verified = verified.len(),
        pending,
        "Dashboard assembled"
    );

    Ok(DashboardSnapshot {
        total_incidents: incidents.len(),
        incidents,
        total_reports: all_reports.len(),
        verified_reports: verified.len(),
        pending_verification: pending,
    })
}

/// Summary view for one incident's member reports. `None` when the member
/// list is empty: an incident with no verified members does not exist
/// from the responder's point of view.
pub fn incident_detail(incident_id: &str, members: &[Report]) -> Option<IncidentDetail> {
    if members.is_empty() {
        return None;
    }

    let count = members.len() as f64;
    let location = GeoPoint {
        lat: members.iter().map(|r| r.lat).sum::<f64>() / count,
        lng: members.iter().map(|r| r.lng).sum::<f64>() / count,
    };

    let mut disaster_types: Vec<String> = members.iter().map(|r| r.disaster_type.clone()).collect();
    disaster_types.sort();
    disaster_types.dedup();

    Some(IncidentDetail {
        incident_id: incident_id.to_string(),
        total_reports: members.len(),
        authentic_reports: members.len(),
        priority: members.iter().map(|r| r.priority).max().unwrap_or(1),
        disaster_types,
        location,
        reports: members.to_vec(),
    })
}

/// Platform-wide counters. `now` is injected so the 24-hour window is
/// testable and the function stays pure.
pub fn platform_statistics(all_reports: &[Report], now: DateTime<Utc>) -> PlatformStatistics {
    let total = all_reports.len();
    let verified = all_reports.iter().filter(|r| r.is_verified).count();

    let mut disaster_type_breakdown: BTreeMap<String, usize> = BTreeMap::new();
    for report in all_reports {
        *disaster_type_breakdown.entry(report.disaster_type.clone()).or_default() += 1;
    }

    let mut priority_breakdown: BTreeMap<u8, usize> = BTreeMap::new();
    for report in all_reports.iter().filter(|r| r.is_verified) {
        *priority_breakdown.entry(report.priority).or_default() += 1;
    }

    let window_start = now - Duration::hours(24);
    let recent_reports_24h = all_reports.iter().filter(|r| r.submitted_at >= window_start).count();

    PlatformStatistics {
        total_reports: total,
        verified_reports: verified,
        pending_verification: total - verified,
        verification_rate: if total > 0 {
            verified as f64 / total as f64 * 100.0
        } else {
            0.0
        },
        disaster_type_breakdown,
        priority_breakdown,
        recent_reports_24h,
    }
}

fn latest_submission(reports: &[Report]) -> DateTime<Utc> {
    reports
        .iter()
        .map(|r| r.submitted_at)
        .max()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rescuegrid_common::EngineConfig;

    fn report(id: i64, lat: f64, lng: f64, verified: bool, priority: u8) -> Report {
        Report {
            id,
            lat,
            lng,
            disaster_type: "flood".to_string(),
            needs: vec!["water".to_string()],
            priority,
            title: "Flooding near the river".to_string(),
            description: None,
            is_verified: verified,
            incident_id: None,
            submitted_at: Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn no_verified_reports_yields_empty_dashboard() {
        let processor = BatchProcessor::new(EngineConfig::default());
        let reports = vec![report(1, 40.0, -74.0, false, 3), report(2, 41.0, -74.0, false, 2)];

        let snapshot = assemble_dashboard(&processor, &reports).unwrap();
        assert!(snapshot.incidents.is_empty());
        assert_eq!(snapshot.total_reports, 2);
        assert_eq!(snapshot.total_incidents, 0);
        assert_eq!(snapshot.verified_reports, 0);
        assert_eq!(snapshot.pending_verification, 2);
    }

    #[test]
    fn dashboard_clusters_only_the_verified_subset() {
        let processor = BatchProcessor::new(EngineConfig::default());
        let reports = vec![
            report(1, 40.0, -74.0, true, 3),
            report(2, 40.0, -74.0, true, 4),
            report(3, 44.0, -93.0, false, 5),
        ];

        let snapshot = assemble_dashboard(&processor, &reports).unwrap();
        assert_eq!(snapshot.verified_reports, 2);
        assert_eq!(snapshot.pending_verification, 1);
        let clustered_ids: Vec<i64> = snapshot
            .incidents
            .iter()
            .flat_map(|i| i.reports.iter().map(|r| r.id))
            .collect();
        assert!(!clustered_ids.contains(&3));
        assert_eq!(clustered_ids.len(), 2);
    }

    #[test]
    fn verified_incidents_count_all_members_authentic() {
        let processor = BatchProcessor::new(EngineConfig::default());
        let reports = vec![report(1, 40.0, -74.0, true, 3), report(2, 40.0, -74.0, true, 2)];

        let snapshot = assemble_dashboard(&processor, &reports).unwrap();
        let incident = &snapshot.incidents[0];
        assert_eq!(incident.authentic_reports, incident.total_reports);
    }

    #[test]
    fn incidents_are_ordered_by_priority_descending() {
        let processor = BatchProcessor::new(EngineConfig::default());
        let reports = vec![
            report(1, 40.0, -74.0, true, 2),
            report(2, 40.0, -74.0, true, 2),
            report(3, 44.0, -93.0, true, 5),
            report(4, 44.0, -93.0, true, 4),
        ];

        let snapshot = assemble_dashboard(&processor, &reports).unwrap();
        assert_eq!(snapshot.incidents.len(), 2);
        assert_eq!(snapshot.incidents[0].priority, 5);
        assert_eq!(snapshot.incidents[1].priority, 2);
    }

    #[test]
    fn incident_detail_of_empty_members_is_none() {
        assert!(incident_detail("incident_9", &[]).is_none());
    }

    #[test]
    fn incident_detail_aggregates_members() {
        let members = vec![report(1, 40.0, -74.0, true, 2), report(2, 41.0, -75.0, true, 5)];
        let detail = incident_detail("incident_2", &members).unwrap();

        assert_eq!(detail.incident_id, "incident_2");
        assert_eq!(detail.total_reports, 2);
        assert_eq!(detail.authentic_reports, 2);
        assert_eq!(detail.priority, 5);
        assert_eq!(detail.disaster_types, vec!["flood".to_string()]);
        assert!((detail.location.lat - 40.5).abs() < 1e-9);
        assert!((detail.location.lng - -74.5).abs() < 1e-9);
    }

    #[test]
    fn statistics_over_empty_set_are_all_zero() {
        let stats = platform_statistics(&[], Utc::now());
        assert_eq!(stats.total_reports, 0);
        assert_eq!(stats.verification_rate, 0.0);
        assert!(stats.disaster_type_breakdown.is_empty());
        assert_eq!(stats.recent_reports_24h, 0);
    }

    #[test]
    fn statistics_break_down_types_and_verified_priorities() {
        let mut reports = vec![
            report(1, 40.0, -74.0, true, 3),
            report(2, 40.0, -74.0, true, 3),
            report(3, 40.0, -74.0, false, 5),
        ];
        reports[2].disaster_type = "fire".to_string();

        let stats = platform_statistics(&reports, Utc::now());
        assert_eq!(stats.verified_reports, 2);
        assert_eq!(stats.pending_verification, 1);
        assert!((stats.verification_rate - 2.0 / 3.0 * 100.0).abs() < 1e-9);
        assert_eq!(stats.disaster_type_breakdown["flood"], 2);
        assert_eq!(stats.disaster_type_breakdown["fire"], 1);
        // Priority 5 belongs to the unverified report and must not appear.
        assert_eq!(stats.priority_breakdown.get(&5), None);
        assert_eq!(stats.priority_breakdown[&3], 2);
    }

    #[test]
    fn recent_window_respects_the_24h_boundary() {
        let now = Utc.with_ymd_and_hms(2026, 8, 2, 12, 0, 0).unwrap();
        let mut inside = report(1, 40.0, -74.0, false, 3);
        inside.submitted_at = now - Duration::hours(23);
        let mut outside = report(2, 40.0, -74.0, false, 3);
        outside.submitted_at = now - Duration::hours(25);

        let stats = platform_statistics(&[inside, outside], now);
        assert_eq!(stats.recent_reports_24h, 1);
    }
}
