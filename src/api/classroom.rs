use crate::api::RemoteClassroomApi;
use crate::error::ApiError;
use crate::models::{
    Assignment, Course, ListCourseWorkResponse, ListCoursesResponse,
    ListStudentSubmissionsResponse, Page, Submission,
};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde::de::DeserializeOwned;
use std::time::Duration;

const API_BASE: &str = "https://classroom.googleapis.com/v1";
const COURSES_PAGE_SIZE: &str = "10";
/// Selects submissions for every coursework item in a course.
const ANY_COURSE_WORK: &str = "-";

#[derive(Clone)]
pub struct ClassroomClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl ClassroomClient {
    pub fn new(token: String) -> Result<Self, ApiError> {
        Self::with_base_url(token, API_BASE)
    }

    pub fn with_base_url(token: String, base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(ApiError::Client)?;
        Ok(Self {
            client,
            token,
            base_url: base_url.into(),
        })
    }

    fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("classroom-snapshot"));
        headers
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .headers(self.build_headers())
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();

        // Get the response text for both error and success cases
        let response_text = response
            .text()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url,
                body: response_text.chars().take(500).collect(),
            });
        }

        serde_json::from_str(&response_text).map_err(|source| ApiError::Decode { url, source })
    }
}

fn paged_query<'a>(
    mut query: Vec<(&'a str, &'a str)>,
    page_token: Option<&'a str>,
) -> Vec<(&'a str, &'a str)> {
    if let Some(token) = page_token {
        query.push(("pageToken", token));
    }
    query
}

#[async_trait]
impl RemoteClassroomApi for ClassroomClient {
    async fn list_courses(&self, page_token: Option<String>) -> Result<Page<Course>, ApiError> {
        let query = paged_query(vec![("pageSize", COURSES_PAGE_SIZE)], page_token.as_deref());
        let resp: ListCoursesResponse = self.get("/courses", &query).await?;
        Ok(resp.into())
    }

    async fn list_course_work(
        &self,
        course_id: &str,
        page_token: Option<String>,
    ) -> Result<Page<Assignment>, ApiError> {
        let path = format!("/courses/{}/courseWork", course_id);
        let query = paged_query(Vec::new(), page_token.as_deref());
        let resp: ListCourseWorkResponse = self.get(&path, &query).await?;
        Ok(resp.into())
    }

    async fn list_submissions(
        &self,
        course_id: &str,
        page_token: Option<String>,
    ) -> Result<Page<Submission>, ApiError> {
        let path = format!(
            "/courses/{}/courseWork/{}/studentSubmissions",
            course_id, ANY_COURSE_WORK
        );
        let query = paged_query(Vec::new(), page_token.as_deref());
        let resp: ListStudentSubmissionsResponse = self.get(&path, &query).await?;
        Ok(resp.into())
    }
}
