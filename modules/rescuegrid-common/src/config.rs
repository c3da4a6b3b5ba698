use std::env;

use crate::error::RescueGridError;

/// Engine configuration, injected at construction and read-only afterward.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Radius (meters) within which two reports likely describe the same incident.
    pub proximity_radius_m: f64,
    /// Minimum reference-corpus similarity for a report to count as authentic.
    pub similarity_accept_threshold: f64,
    /// Reports at or above this fake score are rejected regardless of similarity.
    pub fake_score_reject_threshold: f64,
    /// Known event phrases the scorer matches report text against.
    pub reference_phrases: Vec<String>,
    /// Disaster categories accepted without raising the unknown-type indicator.
    pub known_disaster_types: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            proximity_radius_m: 50.0,
            similarity_accept_threshold: 0.30,
            fake_score_reject_threshold: 0.70,
            reference_phrases: default_reference_phrases(),
            known_disaster_types: default_known_disaster_types(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables, falling back to the
    /// defaults for anything unset. A set-but-malformed numeric value is a
    /// configuration error, not a silent fallback.
    pub fn from_env() -> Result<Self, RescueGridError> {
        let defaults = Self::default();
        Ok(Self {
            proximity_radius_m: parse_var("RESCUEGRID_PROXIMITY_RADIUS_M", defaults.proximity_radius_m)?,
            similarity_accept_threshold: parse_var(
                "RESCUEGRID_SIMILARITY_ACCEPT_THRESHOLD",
                defaults.similarity_accept_threshold,
            )?,
            fake_score_reject_threshold: parse_var(
                "RESCUEGRID_FAKE_SCORE_REJECT_THRESHOLD",
                defaults.fake_score_reject_threshold,
            )?,
            reference_phrases: defaults.reference_phrases,
            known_disaster_types: defaults.known_disaster_types,
        })
    }
}

fn parse_var(key: &str, default: f64) -> Result<f64, RescueGridError> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| RescueGridError::Config(format!("{key} must be a number, got {raw:?}"))),
        Err(_) => Ok(default),
    }
}

fn default_reference_phrases() -> Vec<String> {
    [
        "Major earthquake hits downtown area",
        "Flash floods reported in residential zones",
        "Wildfire spreading through forest areas",
        "Tornado warning issued for suburban regions",
        "Hurricane approaching coastal areas",
        "Landslide blocks mountain roads",
        "Building collapse in commercial district",
        "Chemical spill in industrial zone",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

fn default_known_disaster_types() -> Vec<String> {
    [
        "flood",
        "earthquake",
        "fire",
        "tornado",
        "hurricane",
        "landslide",
        "collapse",
        "spill",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}
