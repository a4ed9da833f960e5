use crate::error::{Error, Result};
use crate::filter::{CourseFilter, DateWindow};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_DIR: &str = "_data";
pub const DEFAULT_TOKEN_PATH: &str = "token.json";

/// Settings for one run. Built once at startup and never changed afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub student_id: String,
    pub force_refresh: bool,
    pub courses: CourseFilter,
    pub window: DateWindow,
    pub data_dir: PathBuf,
    pub token_path: PathBuf,
    pub access_token: Option<String>,
}

/// Optional YAML settings file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub excluded_courses: Vec<String>,
    pub begin: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
}

impl FileConfig {
    pub fn parse(yaml_content: &str) -> Result<Self> {
        serde_yaml::from_str(yaml_content)
            .map_err(|e| Error::Config(format!("invalid settings file: {}", e)))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("could not read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }
}

/// Raw settings gathered from the command line, environment and settings file.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    pub student_id: Option<String>,
    pub force_refresh: bool,
    pub excluded_course_ids: Vec<String>,
    pub begin: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
    pub data_dir: Option<PathBuf>,
    pub token_path: Option<PathBuf>,
    pub access_token: Option<String>,
}

impl ConfigBuilder {
    /// Fill in what the command line left unset from the settings file.
    pub fn merge_file(mut self, file: FileConfig) -> Self {
        self.excluded_course_ids.extend(file.excluded_courses);
        self.begin = self.begin.or(file.begin);
        self.until = self.until.or(file.until);
        self
    }

    pub fn build(self) -> Result<Config> {
        let student_id = self
            .student_id
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                Error::Config("the student is undefined (set STUDENT or pass --student)".to_string())
            })?;
        validate_student_id(&student_id)?;

        if let (Some(begin), Some(until)) = (self.begin, self.until) {
            if begin > until {
                return Err(Error::Config(format!(
                    "date window begins ({}) after it ends ({})",
                    begin, until
                )));
            }
        }

        let excluded = self
            .excluded_course_ids
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .map(str::to_string);

        Ok(Config {
            student_id,
            force_refresh: self.force_refresh,
            courses: CourseFilter::new(excluded),
            window: DateWindow::new(self.begin, self.until),
            data_dir: self
                .data_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            token_path: self
                .token_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_PATH)),
            access_token: self.access_token.filter(|t| !t.is_empty()),
        })
    }
}

/// The student id names a directory, so it must be a single path component.
fn validate_student_id(student_id: &str) -> Result<()> {
    if student_id == "." || student_id == ".." || student_id.contains(['/', '\\']) {
        return Err(Error::Config(format!(
            "invalid student name '{}': must not be a path",
            student_id
        )));
    }
    Ok(())
}
