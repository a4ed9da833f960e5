use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure of a single request against the Classroom REST API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("API request failed with status {status} for URL {url}\nResponse body: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    #[error("failed to parse JSON response from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no `{key}` stored for student {student}")]
    NotFound { student: String, key: String },

    #[error("I/O error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Every way a snapshot run can fail. None of these are recovered from.
#[derive(Debug, Error)]
pub enum Error {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("failed to fetch {operation}")]
    Fetch {
        operation: String,
        #[source]
        source: ApiError,
    },

    #[error("replay selected but no `{key}` snapshot exists for student {student}")]
    CacheMiss { student: String, key: String },

    #[error(
        "submission {submission_id} in course {course_id} references unknown assignment {assignment_id}"
    )]
    Join {
        course_id: String,
        submission_id: String,
        assignment_id: String,
    },

    #[error("wrong number of submissions for assignment {assignment_id}: {count} (expected 1)")]
    Integrity { assignment_id: String, count: usize },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to serialize or deserialize `{key}`")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
