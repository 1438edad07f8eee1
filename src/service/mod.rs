// Subtitle service abstraction
//
// The remote search protocol is an external collaborator: everything that
// talks to the network sits behind the SubtitleService trait so the batch
// workflow can be driven by any implementation, including the stub used in
// tests.

pub mod opensubtitles;

use async_trait::async_trait;
use std::path::Path;

use crate::config::ServiceConfig;
use crate::error::Result;

/// One entry from a subtitle search, in service order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleCandidate {
    /// URL of the gzip-compressed subtitle payload
    pub download_url: String,
    /// Language tag reported by the service
    pub language: String,
    /// Release name the subtitle was made for, if the service reports one
    pub release_name: Option<String>,
}

/// Session-oriented subtitle lookup service.
#[async_trait]
pub trait SubtitleService: Send + Sync {
    /// Open a session with the service
    async fn login(&mut self) -> Result<()>;

    /// Search for subtitles matching a video file in the given language
    async fn search(&self, language: &str, video_path: &Path) -> Result<Vec<SubtitleCandidate>>;

    /// Fetch the raw compressed payload behind a candidate's download URL
    async fn download(&self, url: &str) -> Result<Vec<u8>>;

    /// Close the session
    async fn logout(&mut self) -> Result<()>;
}

/// Factory for creating subtitle service instances
pub struct ServiceFactory;

impl ServiceFactory {
    /// Create the default service implementation (OpenSubtitles-based)
    pub fn create(config: ServiceConfig) -> Result<Box<dyn SubtitleService>> {
        Ok(Box::new(opensubtitles::OpenSubtitlesService::new(config)?))
    }
}
