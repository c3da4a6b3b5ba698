pub mod authenticity;
pub mod batch;
pub mod cluster;
pub mod dashboard;
pub mod proximity;

mod kmeans;

pub use authenticity::AuthenticityScorer;
pub use batch::{apply_incident_labels, apply_verdicts, BatchOutcome, BatchProcessor};
pub use cluster::LocationClusterer;
pub use dashboard::{
    assemble_dashboard, incident_detail, platform_statistics, DashboardSnapshot, IncidentDetail,
    PlatformStatistics,
};
pub use proximity::estimate_incident_groups;
