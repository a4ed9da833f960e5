use crate::api::{ClassroomClient, RemoteClassroomApi};
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;

/// Produces an authenticated API handle.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn authenticate(&self) -> Result<Box<dyn RemoteClassroomApi>>;
}

/// Stored OAuth token as written by the Google authorization flow.
#[derive(Debug, Deserialize)]
struct StoredToken {
    access_token: Option<String>,
}

/// Uses an access token given directly, falling back to a stored token file.
#[derive(Debug, Clone)]
pub struct TokenCredentials {
    pub access_token: Option<String>,
    pub token_path: PathBuf,
}

impl TokenCredentials {
    pub fn new(access_token: Option<String>, token_path: impl Into<PathBuf>) -> Self {
        Self {
            access_token,
            token_path: token_path.into(),
        }
    }

    async fn resolve_token(&self) -> Result<String> {
        if let Some(token) = self.access_token.as_deref().filter(|t| !t.is_empty()) {
            return Ok(token.to_string());
        }

        let content = tokio::fs::read(&self.token_path).await.map_err(|e| {
            Error::Auth(format!(
                "could not read token file {}: {}. Set CLASSROOM_ACCESS_TOKEN or authorize once to create it",
                self.token_path.display(),
                e
            ))
        })?;
        let stored: StoredToken = serde_json::from_slice(&content).map_err(|e| {
            Error::Auth(format!(
                "token file {} is not valid JSON: {}",
                self.token_path.display(),
                e
            ))
        })?;

        stored
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                Error::Auth(format!(
                    "token file {} has no access_token",
                    self.token_path.display()
                ))
            })
    }
}

#[async_trait]
impl CredentialProvider for TokenCredentials {
    async fn authenticate(&self) -> Result<Box<dyn RemoteClassroomApi>> {
        let token = self.resolve_token().await?;
        let client = ClassroomClient::new(token)
            .map_err(|e| Error::Auth(format!("could not create API client: {}", e)))?;
        Ok(Box::new(client))
    }
}
