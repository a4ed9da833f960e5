//! Paged in-memory Classroom API for tests.

use crate::api::{CredentialProvider, RemoteClassroomApi};
use crate::error::{self, ApiError};
use crate::models::{Assignment, Course, Page, Submission};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone, Default)]
pub struct MockClassroom {
    pub courses: Vec<Vec<Course>>,
    pub course_work: HashMap<String, Vec<Vec<Assignment>>>,
    pub submissions: HashMap<String, Vec<Vec<Submission>>>,
    /// Course whose submission listing answers with a server error.
    pub failing_course: Option<String>,
    /// Per-course latency of the submission listing.
    pub delays: HashMap<String, Duration>,
    /// Course ids in the order their submission listing answered.
    pub answered: Arc<Mutex<Vec<String>>>,
    pub calls: Arc<AtomicUsize>,
}

impl MockClassroom {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn answered(&self) -> Vec<String> {
        self.answered.lock().map(|ids| ids.clone()).unwrap_or_default()
    }
}

/// Serves `pages[token]`, using the page index as the continuation token.
fn serve<T: Clone>(pages: &[Vec<T>], page_token: Option<String>) -> Result<Page<T>, ApiError> {
    let index = match page_token {
        Some(token) => token.parse::<usize>().map_err(|_| ApiError::Status {
            status: 400,
            url: "mock".to_string(),
            body: format!("bad page token {}", token),
        })?,
        None => 0,
    };
    let items = pages.get(index).cloned().unwrap_or_default();
    let next = (index + 1 < pages.len()).then(|| (index + 1).to_string());
    Ok(Page::new(items, next))
}

#[async_trait]
impl RemoteClassroomApi for MockClassroom {
    async fn list_courses(&self, page_token: Option<String>) -> Result<Page<Course>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        serve(&self.courses, page_token)
    }

    async fn list_course_work(
        &self,
        course_id: &str,
        page_token: Option<String>,
    ) -> Result<Page<Assignment>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let pages = self.course_work.get(course_id).cloned().unwrap_or_default();
        serve(&pages, page_token)
    }

    async fn list_submissions(
        &self,
        course_id: &str,
        page_token: Option<String>,
    ) -> Result<Page<Submission>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(course_id) {
            tokio::time::sleep(*delay).await;
        }
        if let Ok(mut answered) = self.answered.lock() {
            answered.push(course_id.to_string());
        }
        if self.failing_course.as_deref() == Some(course_id) {
            return Err(ApiError::Status {
                status: 500,
                url: format!("mock/courses/{}/studentSubmissions", course_id),
                body: "backend error".to_string(),
            });
        }
        let pages = self.submissions.get(course_id).cloned().unwrap_or_default();
        serve(&pages, page_token)
    }
}

pub struct MockCredentials {
    pub api: MockClassroom,
    pub logins: Arc<AtomicUsize>,
}

impl MockCredentials {
    pub fn new(api: MockClassroom) -> Self {
        Self {
            api,
            logins: Arc::default(),
        }
    }
}

#[async_trait]
impl CredentialProvider for MockCredentials {
    async fn authenticate(&self) -> error::Result<Box<dyn RemoteClassroomApi>> {
        self.logins.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(self.api.clone()))
    }
}

pub fn course(id: &str, name: &str) -> Course {
    Course {
        id: id.to_string(),
        name: name.to_string(),
        section: None,
        course_state: Some("ACTIVE".to_string()),
        tasks: Vec::new(),
    }
}

pub fn assignment(id: &str, title: &str) -> Assignment {
    Assignment {
        id: id.to_string(),
        title: title.to_string(),
        state: "PUBLISHED".to_string(),
        work_type: None,
        submissions: Vec::new(),
    }
}

/// `updated` is an RFC 3339 timestamp.
pub fn submission(id: &str, assignment_id: &str, state: &str, updated: Option<&str>) -> Submission {
    Submission {
        id: id.to_string(),
        assignment_id: assignment_id.to_string(),
        state: state.to_string(),
        update_time: updated.map(|ts| ts.parse().expect("valid RFC 3339 timestamp")),
    }
}
