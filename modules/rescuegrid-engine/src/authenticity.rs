//! Authenticity scoring for individual reports.
//!
//! Compares report text against a reference corpus of known event phrases
//! and applies structural heuristics that each contribute one fake point.

use strsim::sorensen_dice;

use rescuegrid_common::{AuthenticityVerdict, EngineConfig, Report};

/// Scores one report's likely genuineness. Holds read-only configuration
/// and no per-call state.
pub struct AuthenticityScorer {
    config: EngineConfig,
}

impl AuthenticityScorer {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Judge whether a report is likely genuine.
    ///
    /// Title and description are matched case-insensitively against every
    /// reference phrase; the best normalized ratio wins, first phrase on
    /// ties. A missing description and an empty needs list are neutral
    /// inputs, never an error.
    pub fn score(&self, report: &Report) -> AuthenticityVerdict {
        let title = report.title.to_lowercase();
        let description = report
            .description
            .as_deref()
            .unwrap_or("")
            .to_lowercase();

        let mut similarity_score = 0.0_f64;
        let mut matching_reference: Option<&String> = None;
        for phrase in &self.config.reference_phrases {
            let phrase_lower = phrase.to_lowercase();
            let title_similarity = sorensen_dice(&title, &phrase_lower);
            let description_similarity = sorensen_dice(&description, &phrase_lower);
            let overall = title_similarity.max(description_similarity);
            if overall > similarity_score {
                similarity_score = overall;
                matching_reference = Some(phrase);
            }
        }

        let indicator_vector = [
            report.title.chars().count() < 10,
            report.needs.is_empty(),
            !self.is_known_disaster_type(&report.disaster_type),
        ];
        let fake_score =
            indicator_vector.iter().filter(|raised| **raised).count() as f64 / indicator_vector.len() as f64;

        AuthenticityVerdict {
            is_likely_authentic: similarity_score >= self.config.similarity_accept_threshold
                && fake_score < self.config.fake_score_reject_threshold,
            similarity_score,
            matching_reference: matching_reference.cloned(),
            indicator_vector,
            fake_score,
        }
    }

    fn is_known_disaster_type(&self, disaster_type: &str) -> bool {
        self.config
            .known_disaster_types
            .iter()
            .any(|known| known.eq_ignore_ascii_case(disaster_type))
    }
}
