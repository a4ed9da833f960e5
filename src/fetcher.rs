use crate::api::RemoteClassroomApi;
use crate::error::{ApiError, Error, Result};
use crate::join::join_submissions;
use crate::models::{Course, Page};
use futures::future::try_join_all;
use std::future::Future;
use tracing::{debug, info};

/// Collect every item of a paginated list operation.
///
/// `list` is called with the continuation token of the previous page until the
/// server stops returning one. Pages are concatenated in request order. Any
/// failure aborts the whole collection; nothing gathered so far is returned.
pub async fn fetch_all<T, F, Fut>(
    operation: &str,
    start: Option<String>,
    mut list: F,
) -> Result<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = std::result::Result<Page<T>, ApiError>>,
{
    let mut items = Vec::new();
    let mut page_token = start;
    let mut pages = 0usize;

    loop {
        let page = list(page_token.take())
            .await
            .map_err(|source| Error::Fetch {
                operation: operation.to_string(),
                source,
            })?;
        pages += 1;
        items.extend(page.items);

        match page.next_page_token {
            Some(token) if !token.is_empty() => page_token = Some(token),
            _ => break,
        }
    }

    debug!(operation, pages, items = items.len(), "collected all pages");
    Ok(items)
}

pub async fn fetch_courses(api: &dyn RemoteClassroomApi) -> Result<Vec<Course>> {
    fetch_all("courses.list", None, |token| api.list_courses(token)).await
}

/// Fetch coursework and submissions of one course and join them.
pub async fn fetch_course_tasks(api: &dyn RemoteClassroomApi, mut course: Course) -> Result<Course> {
    let course_id = course.id.as_str();
    let work_op = format!("courses.courseWork.list (course {})", course_id);
    let subs_op = format!("courses.courseWork.studentSubmissions.list (course {})", course_id);

    let (assignments, submissions) = tokio::try_join!(
        fetch_all(&work_op, None, |token| api.list_course_work(course_id, token)),
        fetch_all(&subs_op, None, |token| api.list_submissions(course_id, token)),
    )?;

    info!(
        course = %course.id,
        name = %course.name,
        assignments = assignments.len(),
        submissions = submissions.len(),
        "fetched course"
    );

    course.tasks = join_submissions(&course.id, assignments, submissions)?;
    Ok(course)
}

/// Fetch the tasks of all courses concurrently, one future per course.
///
/// The futures are polled together on the calling task rather than spawned, so
/// they may borrow `api`; the requests still overlap on the wire. The first
/// failure wins and the remaining fetches are dropped. Output order follows
/// the input order regardless of which course finishes first.
pub async fn fetch_all_tasks(
    api: &dyn RemoteClassroomApi,
    courses: Vec<Course>,
) -> Result<Vec<Course>> {
    try_join_all(courses.into_iter().map(|course| fetch_course_tasks(api, course))).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{assignment, course, submission, MockClassroom};
    use std::collections::HashMap;
    use std::time::Duration;

    #[tokio::test]
    async fn test_fetch_all_follows_every_page() {
        let api = MockClassroom {
            courses: vec![
                vec![course("1", "Math"), course("2", "History")],
                vec![],
                vec![course("3", "Biology")],
            ],
            ..Default::default()
        };

        let courses = fetch_courses(&api).await.unwrap();
        let ids: Vec<&str> = courses.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(api.calls(), 3);
    }

    #[tokio::test]
    async fn test_fetch_all_from_start_token() {
        let api = MockClassroom {
            courses: vec![vec![course("1", "Math")], vec![course("2", "History")]],
            ..Default::default()
        };

        let courses = fetch_all("courses.list", Some("1".to_string()), |token| {
            api.list_courses(token)
        })
        .await
        .unwrap();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].id, "2");
    }

    #[tokio::test]
    async fn test_empty_token_ends_pagination() {
        let mut served = 0;
        let items: Vec<u32> = fetch_all("numbers", None, |_| {
            served += 1;
            async { Ok(Page::new(vec![1, 2], Some(String::new()))) }
        })
        .await
        .unwrap();
        assert_eq!(items, vec![1, 2]);
        assert_eq!(served, 1);
    }

    #[tokio::test]
    async fn test_failure_names_operation() {
        let mut served = 0;
        let result: Result<Vec<u32>> = fetch_all("numbers", None, |_| {
            served += 1;
            let page = if served == 1 {
                Ok(Page::new(vec![1], Some("next".to_string())))
            } else {
                Err(ApiError::Status {
                    status: 503,
                    url: "numbers".to_string(),
                    body: String::new(),
                })
            };
            async move { page }
        })
        .await;

        match result {
            Err(Error::Fetch { operation, source }) => {
                assert_eq!(operation, "numbers");
                assert!(matches!(source, ApiError::Status { status: 503, .. }));
            }
            other => panic!("expected fetch error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_all_tasks_joins_each_course() {
        let api = MockClassroom {
            course_work: HashMap::from([
                (
                    "1".to_string(),
                    vec![vec![assignment("a1", "Essay")], vec![assignment("a2", "Quiz")]],
                ),
                ("2".to_string(), vec![vec![assignment("b1", "Lab")]]),
            ]),
            submissions: HashMap::from([
                (
                    "1".to_string(),
                    vec![vec![
                        submission("s2", "a2", "CREATED", None),
                        submission("s1", "a1", "TURNED_IN", Some("2024-03-01T10:00:00Z")),
                    ]],
                ),
                (
                    "2".to_string(),
                    vec![vec![], vec![submission("s3", "b1", "RETURNED", None)]],
                ),
            ]),
            ..Default::default()
        };

        let courses = fetch_all_tasks(&api, vec![course("1", "Math"), course("2", "Lab")])
            .await
            .unwrap();

        assert_eq!(courses[0].id, "1");
        assert_eq!(courses[0].tasks.len(), 2);
        assert_eq!(courses[0].tasks[0].submissions[0].id, "s1");
        assert_eq!(courses[0].tasks[1].submissions[0].id, "s2");
        assert_eq!(courses[1].tasks[0].submissions[0].id, "s3");
    }

    #[tokio::test]
    async fn test_one_failing_course_fails_the_fetch() {
        let api = MockClassroom {
            course_work: HashMap::from([("2".to_string(), vec![vec![assignment("b1", "Lab")]])]),
            failing_course: Some("2".to_string()),
            ..Default::default()
        };

        let err = fetch_all_tasks(&api, vec![course("1", "Math"), course("2", "Lab")])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("course 2"));
    }

    #[tokio::test]
    async fn test_fetch_all_tasks_keeps_input_order() {
        let api = MockClassroom {
            course_work: HashMap::from([
                ("1".to_string(), vec![vec![assignment("a1", "Essay")]]),
                ("2".to_string(), vec![vec![assignment("b1", "Lab")]]),
            ]),
            delays: HashMap::from([("1".to_string(), Duration::from_millis(50))]),
            ..Default::default()
        };

        let courses = fetch_all_tasks(&api, vec![course("1", "Math"), course("2", "Lab")])
            .await
            .unwrap();

        assert_eq!(api.answered(), vec!["2", "1"]);
        let ids: Vec<&str> = courses.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(courses[0].tasks[0].id, "a1");
        assert_eq!(courses[1].tasks[0].id, "b1");
    }
}
