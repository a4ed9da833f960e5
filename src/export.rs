use crate::analysis::{DateSummary, StateSummary};
use anyhow::{Context, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};

/// Export the state summary to CSV, one row per (state, date) plus a total row per state
pub fn export_state_summary(
    summary: &StateSummary,
    student: &str,
    dir: &Path,
) -> Result<PathBuf> {
    let filepath = dir.join(csv_filename("summary_states", student));

    let mut wtr = csv::Writer::from_path(&filepath)
        .with_context(|| format!("Failed to create CSV file {}", filepath.display()))?;

    wtr.write_record(["state", "date", "count"])
        .context("Failed to write CSV headers")?;

    for (state, totals) in summary {
        for (date, count) in &totals.dates {
            wtr.write_record([state.as_str(), date.as_str(), count.to_string().as_str()])
                .context("Failed to write CSV record")?;
        }
        wtr.write_record([state.as_str(), "TOTAL", totals.total.to_string().as_str()])
            .context("Failed to write CSV record")?;
    }

    wtr.flush().context("Failed to flush CSV writer")?;

    Ok(filepath)
}

/// Export the date summary to CSV, one row per (date, state)
pub fn export_date_summary(
    summary: &DateSummary,
    student: &str,
    dir: &Path,
) -> Result<PathBuf> {
    let filepath = dir.join(csv_filename("summary_dates", student));

    let mut wtr = csv::Writer::from_path(&filepath)
        .with_context(|| format!("Failed to create CSV file {}", filepath.display()))?;

    wtr.write_record(["date", "state", "count"])
        .context("Failed to write CSV headers")?;

    for (date, states) in summary {
        for (state, count) in states {
            wtr.write_record([date.as_str(), state.as_str(), count.to_string().as_str()])
                .context("Failed to write CSV record")?;
        }
    }

    wtr.flush().context("Failed to flush CSV writer")?;

    Ok(filepath)
}

fn csv_filename(prefix: &str, student: &str) -> String {
    // Generate filename with timestamp
    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let student: String = student
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}_{}_{}.csv", prefix, student, timestamp)
}
