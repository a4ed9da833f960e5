use crate::analysis::{self, DateSummary, StateSummary};
use crate::api::CredentialProvider;
use crate::cache::{self, CacheMode};
use crate::config::Config;
use crate::error::Result;
use crate::models::Course;
use crate::store::SnapshotStore;
use tracing::info;

pub const DATE_SUMMARY_KEY: &str = "analyzesPerDateSummary";
pub const STATE_SUMMARY_KEY: &str = "analyzesPerStateSummary";

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct Report {
    pub mode: CacheMode,
    pub courses: Vec<Course>,
    pub per_date: DateSummary,
    pub per_state: StateSummary,
}

/// Load the student's courses, analyze them and store both summaries.
pub async fn run(
    config: &Config,
    store: &dyn SnapshotStore,
    credentials: &dyn CredentialProvider,
) -> Result<Report> {
    let (mode, courses) = cache::load_courses(config, store, credentials).await?;

    let analysis = analysis::analyze(&courses, &config.window)?;
    let per_date = analysis.date_summary();
    let per_state = analysis.state_summary();
    info!(
        courses = courses.len(),
        assignments = analysis.len(),
        dates = per_date.len(),
        states = per_state.len(),
        "analysis complete"
    );

    let student = config.student_id.as_str();
    cache::write_json(store, student, DATE_SUMMARY_KEY, &per_date).await?;
    cache::write_json(store, student, STATE_SUMMARY_KEY, &per_state).await?;

    Ok(Report {
        mode,
        courses,
        per_date,
        per_state,
    })
}
