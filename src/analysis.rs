//! Cross-tabulation of submissions by update date and by state.

use crate::error::{Error, Result};
use crate::filter::DateWindow;
use crate::models::{Assignment, Course, Submission};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `table[primary][secondary]` holds the assignments under both keys.
pub type CrossTable<'a> = BTreeMap<String, BTreeMap<String, Vec<&'a Assignment>>>;

/// date -> state -> count, dates newest first.
pub type DateSummary = IndexMap<String, IndexMap<String, usize>>;

/// state -> totals, states in descending order.
pub type StateSummary = IndexMap<String, StateTotals>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateTotals {
    pub total: usize,
    pub dates: IndexMap<String, usize>,
}

#[derive(Debug, Default)]
pub struct Analysis<'a> {
    pub per_date: CrossTable<'a>,
    pub per_state: CrossTable<'a>,
}

/// The single submission an analyzed assignment must carry.
fn only_submission(assignment: &Assignment) -> Result<&Submission> {
    match assignment.submissions.as_slice() {
        [submission] => Ok(submission),
        other => Err(Error::Integrity {
            assignment_id: assignment.id.clone(),
            count: other.len(),
        }),
    }
}

/// Build both cross-tabulations from the given (already course-filtered) courses.
pub fn analyze<'a>(courses: &'a [Course], window: &DateWindow) -> Result<Analysis<'a>> {
    let mut analysis = Analysis::default();

    for course in courses {
        for task in &course.tasks {
            let submission = only_submission(task)?;
            let date = submission.update_date();
            if !window.includes(date) {
                continue;
            }
            let date = date.to_string();

            analysis
                .per_date
                .entry(date.clone())
                .or_default()
                .entry(submission.state.clone())
                .or_default()
                .push(task);
            analysis
                .per_state
                .entry(submission.state.clone())
                .or_default()
                .entry(date)
                .or_default()
                .push(task);
        }
    }

    Ok(analysis)
}

fn descending_counts(row: &BTreeMap<String, Vec<&Assignment>>) -> IndexMap<String, usize> {
    row.iter()
        .rev()
        .map(|(key, tasks)| (key.clone(), tasks.len()))
        .collect()
}

impl Analysis<'_> {
    pub fn date_summary(&self) -> DateSummary {
        self.per_date
            .iter()
            .rev()
            .map(|(date, states)| (date.clone(), descending_counts(states)))
            .collect()
    }

    pub fn state_summary(&self) -> StateSummary {
        self.per_state
            .iter()
            .rev()
            .map(|(state, dates)| {
                let dates = descending_counts(dates);
                let total = dates.values().sum();
                (state.clone(), StateTotals { total, dates })
            })
            .collect()
    }

    /// Number of assignments that made it into the tables.
    pub fn len(&self) -> usize {
        self.per_state
            .values()
            .flat_map(|dates| dates.values())
            .map(Vec::len)
            .sum()
    }
}
