use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

use crate::config::ServiceConfig;
use crate::error::{Result, SubfetchError};
use super::{SubtitleCandidate, SubtitleService};

/// OpenSubtitles-backed implementation of the subtitle service.
pub struct OpenSubtitlesService {
    config: ServiceConfig,
    client: Client,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<SearchEntry>,
}

#[derive(Debug, Deserialize)]
struct SearchEntry {
    attributes: SearchAttributes,
}

#[derive(Debug, Deserialize)]
struct SearchAttributes {
    download_link: String,
    language: String,
    release: Option<String>,
}

impl OpenSubtitlesService {
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(SubfetchError::Http)?;

        Ok(Self {
            config,
            client,
            token: None,
        })
    }

    fn token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .ok_or_else(|| SubfetchError::Auth("Not logged in".to_string()))
    }
}

#[async_trait]
impl SubtitleService for OpenSubtitlesService {
    async fn login(&mut self) -> Result<()> {
        info!("Logging in to {}", self.config.endpoint);

        let response = self
            .client
            .post(format!("{}/api/v1/login", self.config.endpoint))
            .json(&serde_json::json!({
                "username": self.config.username,
                "password": self.config.password,
            }))
            .send()
            .await
            .map_err(|e| SubfetchError::Auth(format!("Cannot reach subtitle service: {}", e)))?;

        if !response.status().is_success() {
            return Err(SubfetchError::Auth(format!(
                "Login rejected: HTTP {}",
                response.status()
            )));
        }

        let body: LoginResponse = response
            .json()
            .await
            .map_err(|e| SubfetchError::Auth(format!("Malformed login response: {}", e)))?;

        self.token = Some(body.token);
        info!("Login successful");
        Ok(())
    }

    async fn search(&self, language: &str, video_path: &Path) -> Result<Vec<SubtitleCandidate>> {
        let file_name = video_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        let file_size = std::fs::metadata(video_path).map(|m| m.len()).unwrap_or(0);

        debug!(
            "Searching subtitles: language={}, file={}, size={}",
            language, file_name, file_size
        );

        let response = self
            .client
            .get(format!("{}/api/v1/subtitles", self.config.endpoint))
            .bearer_auth(self.token()?)
            .query(&[
                ("languages", language),
                ("query", file_name.as_str()),
                ("moviebytesize", file_size.to_string().as_str()),
            ])
            .send()
            .await
            .map_err(SubfetchError::Http)?;

        if !response.status().is_success() {
            return Err(SubfetchError::Service(format!(
                "Search failed: HTTP {}",
                response.status()
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| SubfetchError::Service(format!("Malformed search response: {}", e)))?;

        let candidates = body
            .data
            .into_iter()
            .map(|entry| SubtitleCandidate {
                download_url: entry.attributes.download_link,
                language: entry.attributes.language,
                release_name: entry.attributes.release,
            })
            .collect::<Vec<_>>();

        debug!("Search returned {} candidates", candidates.len());
        Ok(candidates)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        debug!("Downloading subtitle payload from {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SubfetchError::Download(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(SubfetchError::Download(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SubfetchError::Download(format!("Transfer failed: {}", e)))?;

        Ok(bytes.to_vec())
    }

    async fn logout(&mut self) -> Result<()> {
        let token = match self.token.take() {
            Some(token) => token,
            None => return Ok(()),
        };

        let response = self
            .client
            .delete(format!("{}/api/v1/logout", self.config.endpoint))
            .bearer_auth(token)
            .send()
            .await
            .map_err(SubfetchError::Http)?;

        if !response.status().is_success() {
            return Err(SubfetchError::Service(format!(
                "Logout failed: HTTP {}",
                response.status()
            )));
        }

        info!("Logged out");
        Ok(())
    }
}
