use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Google Classroom API Models
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_state: Option<String>,
    /// Coursework joined with this student's submissions. Never sent by the API.
    #[serde(default)]
    pub tasks: Vec<Assignment>,
}

/// A piece of coursework ("task") issued in a course.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_type: Option<String>,
    #[serde(default)]
    pub submissions: Vec<Submission>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    #[serde(rename = "courseWorkId")]
    pub assignment_id: String,
    #[serde(default)]
    pub state: String,
    /// Kept in the offset the API reported it in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<DateTime<FixedOffset>>,
}

impl Submission {
    pub fn update_date(&self) -> UpdateDate {
        self.update_time
            .map(|ts| UpdateDate::Dated(ts.date_naive()))
            .unwrap_or(UpdateDate::WithoutDate)
    }
}

/// Calendar date a submission was last touched, used as the grouping key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateDate {
    Dated(NaiveDate),
    WithoutDate,
}

impl UpdateDate {
    pub const WITHOUT_DATE: &'static str = "WITHOUT_DATE";
}

impl fmt::Display for UpdateDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateDate::Dated(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            UpdateDate::WithoutDate => f.write_str(Self::WITHOUT_DATE),
        }
    }
}

// ============================================================================
// List Responses
// ============================================================================

/// One page of a list operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_page_token: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_page_token: Option<String>) -> Self {
        Self {
            items,
            next_page_token,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCoursesResponse {
    #[serde(default)]
    pub courses: Vec<Course>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCourseWorkResponse {
    #[serde(default)]
    pub course_work: Vec<Assignment>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListStudentSubmissionsResponse {
    #[serde(default)]
    pub student_submissions: Vec<Submission>,
    pub next_page_token: Option<String>,
}

impl From<ListCoursesResponse> for Page<Course> {
    fn from(resp: ListCoursesResponse) -> Self {
        Page::new(resp.courses, resp.next_page_token)
    }
}

impl From<ListCourseWorkResponse> for Page<Assignment> {
    fn from(resp: ListCourseWorkResponse) -> Self {
        Page::new(resp.course_work, resp.next_page_token)
    }
}

impl From<ListStudentSubmissionsResponse> for Page<Submission> {
    fn from(resp: ListStudentSubmissionsResponse) -> Self {
        Page::new(resp.student_submissions, resp.next_page_token)
    }
}
