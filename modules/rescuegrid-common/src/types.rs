use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// --- Geo Types ---

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Haversine great-circle distance between two lat/lng points in meters.
pub fn haversine_m(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    const EARTH_RADIUS_M: f64 = 6_371_000.0;
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let lat1_r = lat1.to_radians();
    let lat2_r = lat2.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1_r.cos() * lat2_r.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();
    EARTH_RADIUS_M * c
}

// --- Reports ---

/// One submitted observation of a disaster.
///
/// Coordinates and priority arrive pre-validated by the transport layer
/// (lat ∈ [-90, 90], lng ∈ [-180, 180], priority ∈ [1, 5], non-empty title).
/// `is_verified` is set from the authenticity verdict and `incident_id` is
/// stamped at batch-sync time; the engine treats everything else as
/// immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: i64,
    pub lat: f64,
    pub lng: f64,
    pub disaster_type: String,
    /// Immediate needs, in the order the reporter listed them.
    pub needs: Vec<String>,
    /// 1-5, 5 being highest.
    pub priority: u8,
    pub title: String,
    pub description: Option<String>,
    pub is_verified: bool,
    pub incident_id: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

// --- Incidents ---

/// Aggregate view of one incident group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct IncidentSummary {
    pub total_reports: usize,
    pub authentic_reports: usize,
    /// Max over member priorities, 1 for an empty group.
    pub priority: u8,
    /// Distinct member disaster types, sorted.
    pub disaster_types: Vec<String>,
    /// Coordinate-wise mean of member locations.
    pub location: GeoPoint,
}

// --- Authenticity ---

/// The scorer's judgment of whether a report is likely genuine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AuthenticityVerdict {
    pub is_likely_authentic: bool,
    /// Best normalized similarity against the reference corpus, in [0, 1].
    pub similarity_score: f64,
    /// Reference phrase that produced `similarity_score`, if any scored above zero.
    pub matching_reference: Option<String>,
    /// Structural heuristics: short title, empty needs, unknown disaster type.
    pub indicator_vector: [bool; 3],
    /// Fraction of fake indicators raised: one of 0, 1/3, 2/3, 1.
    pub fake_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_sf_to_oakland() {
        // ~13 km apart
        let dist = haversine_m(37.7749, -122.4194, 37.8044, -122.2712);
        assert!(dist > 12_000.0 && dist < 14_000.0, "got {dist}");
    }

    #[test]
    fn haversine_same_point_is_zero() {
        let dist = haversine_m(40.7128, -74.0060, 40.7128, -74.0060);
        assert!(dist.abs() < 1e-9);
    }

    #[test]
    fn haversine_fifty_meter_scale() {
        // ~50 m north of the origin point
        let dist = haversine_m(40.7128, -74.0060, 40.7128 + 50.0 / 111_320.0, -74.0060);
        assert!((dist - 50.0).abs() < 1.0, "got {dist}");
    }

    #[test]
    fn verdict_round_trips_through_json() {
        let verdict = AuthenticityVerdict {
            is_likely_authentic: true,
            similarity_score: 0.82,
            matching_reference: Some("Major earthquake hits downtown area".to_string()),
            indicator_vector: [false, false, false],
            fake_score: 0.0,
        };
        let json = serde_json::to_string(&verdict).unwrap();
        let back: AuthenticityVerdict = serde_json::from_str(&json).unwrap();
        assert_eq!(back, verdict);
    }
}
