use crate::api::CredentialProvider;
use crate::config::Config;
use crate::error::{Error, Result, StoreError};
use crate::fetcher;
use crate::models::Course;
use crate::store::SnapshotStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

pub const COURSES_KEY: &str = "courses";

/// Where the courses of this run come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheMode {
    /// Fetch everything from the API and overwrite the snapshot.
    Refresh,
    /// Reuse the stored snapshot without touching the network.
    Replay,
}

impl CacheMode {
    pub async fn decide(config: &Config, store: &dyn SnapshotStore) -> Result<Self> {
        if config.force_refresh || !store.exists(&config.student_id, COURSES_KEY).await? {
            Ok(CacheMode::Refresh)
        } else {
            Ok(CacheMode::Replay)
        }
    }
}

/// Serialize `value` as pretty JSON and store it under `key`.
pub async fn write_json<T: Serialize + ?Sized>(
    store: &dyn SnapshotStore,
    student: &str,
    key: &str,
    value: &T,
) -> Result<()> {
    let data = serde_json::to_vec_pretty(value).map_err(|source| Error::Serialization {
        key: key.to_string(),
        source,
    })?;
    store.write(student, key, &data).await?;
    Ok(())
}

pub async fn read_json<T: DeserializeOwned>(
    store: &dyn SnapshotStore,
    student: &str,
    key: &str,
) -> Result<T> {
    let data = store.read(student, key).await.map_err(|e| match e {
        StoreError::NotFound { student, key } => Error::CacheMiss { student, key },
        other => Error::Store(other),
    })?;
    serde_json::from_slice(&data).map_err(|source| Error::Serialization {
        key: key.to_string(),
        source,
    })
}

/// Load the joined courses of the configured student, excluded courses removed.
///
/// The mode is decided once. Refresh authenticates, fetches and stores a new
/// snapshot; Replay reads the stored one.
pub async fn load_courses(
    config: &Config,
    store: &dyn SnapshotStore,
    credentials: &dyn CredentialProvider,
) -> Result<(CacheMode, Vec<Course>)> {
    let mode = CacheMode::decide(config, store).await?;

    let courses = match mode {
        CacheMode::Refresh => {
            info!(student = %config.student_id, "fetching courses in online mode");
            let api = credentials.authenticate().await?;

            let courses = config.courses.retain(fetcher::fetch_courses(api.as_ref()).await?);
            let courses = fetcher::fetch_all_tasks(api.as_ref(), courses).await?;

            write_json(store, &config.student_id, COURSES_KEY, &courses).await?;
            info!(courses = courses.len(), "snapshot stored");
            courses
        }
        CacheMode::Replay => {
            info!(student = %config.student_id, "fetching courses in offline mode");
            let courses: Vec<Course> = read_json(store, &config.student_id, COURSES_KEY).await?;
            config.courses.retain(courses)
        }
    };

    Ok((mode, courses))
}
