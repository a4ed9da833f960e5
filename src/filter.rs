use crate::models::{Course, UpdateDate};
use chrono::NaiveDate;
use std::collections::HashSet;

/// Courses left out of every fetch and report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseFilter {
    excluded: HashSet<String>,
}

impl CourseFilter {
    pub fn new<I, S>(excluded: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            excluded: excluded.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_excluded(&self, course: &Course) -> bool {
        self.excluded.contains(&course.id)
    }

    pub fn retain(&self, courses: Vec<Course>) -> Vec<Course> {
        courses
            .into_iter()
            .filter(|course| !self.is_excluded(course))
            .collect()
    }
}

/// Inclusive date bounds on submission update dates.
///
/// Submissions without a date are always inside the window, whatever the
/// bounds are.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DateWindow {
    pub begin: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
}

impl DateWindow {
    pub fn new(begin: Option<NaiveDate>, until: Option<NaiveDate>) -> Self {
        Self { begin, until }
    }

    pub fn includes(&self, date: UpdateDate) -> bool {
        let UpdateDate::Dated(date) = date else {
            return true;
        };
        if self.begin.is_some_and(|begin| date < begin) {
            return false;
        }
        if self.until.is_some_and(|until| date > until) {
            return false;
        }
        true
    }
}
