mod auth;
mod classroom;
#[cfg(test)]
pub mod mock;

pub use auth::{CredentialProvider, TokenCredentials};
pub use classroom::ClassroomClient;

use crate::error::ApiError;
use crate::models::{Assignment, Course, Page, Submission};
use async_trait::async_trait;

/// Read-only list operations of the Classroom API, one page per call.
#[async_trait]
pub trait RemoteClassroomApi: Send + Sync {
    async fn list_courses(&self, page_token: Option<String>) -> Result<Page<Course>, ApiError>;

    async fn list_course_work(
        &self,
        course_id: &str,
        page_token: Option<String>,
    ) -> Result<Page<Assignment>, ApiError>;

    /// Submissions of the authenticated student for any coursework in the course.
    async fn list_submissions(
        &self,
        course_id: &str,
        page_token: Option<String>,
    ) -> Result<Page<Submission>, ApiError>;
}
