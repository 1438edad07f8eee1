use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tracing::{info, warn};

use crate::config::{Config, MatchMode};
use crate::error::{Result, SubfetchError};
use crate::organizer::organize;
use crate::scanner::{VideoFile, scan_videos};
use crate::service::{ServiceFactory, SubtitleService};
use crate::transfer::{decompress, resolve_encoding, transcode};

/// Outcome counters for one batch run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    /// Files moved into their own directory
    pub organized: usize,
    /// Subtitle files written
    pub downloaded: usize,
    /// Files the service had no subtitle for
    pub missing: usize,
    /// Files that failed and were skipped
    pub failed: usize,
}

enum FileOutcome {
    Downloaded,
    NoSubtitle,
}

pub struct Workflow {
    config: Config,
    service: Box<dyn SubtitleService>,
}

impl Workflow {
    pub fn new(config: Config) -> Result<Self> {
        let service = ServiceFactory::create(config.service.clone())?;
        Ok(Self { config, service })
    }

    /// Build a workflow around an existing service instance.
    pub fn with_service(config: Config, service: Box<dyn SubtitleService>) -> Self {
        Self { config, service }
    }

    /// Organize every matching video under `root` and fetch its subtitle.
    ///
    /// The service session brackets the whole batch: login happens before
    /// any file is touched and logout runs no matter how the batch ended.
    pub async fn run(
        &mut self,
        root: &Path,
        language: &str,
        token: &str,
        mode: MatchMode,
    ) -> Result<BatchSummary> {
        if !root.is_dir() {
            return Err(SubfetchError::InvalidDirectory(root.display().to_string()));
        }

        self.service.login().await?;

        let result = self.process_batch(root, language, token, mode).await;

        if let Err(e) = self.service.logout().await {
            warn!("Logout failed: {}", e);
        }

        result
    }

    async fn process_batch(
        &self,
        root: &Path,
        language: &str,
        token: &str,
        mode: MatchMode,
    ) -> Result<BatchSummary> {
        let videos = scan_videos(root, token, mode)?;
        info!("Found {} video files to process", videos.len());

        let pb = ProgressBar::new(videos.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );

        let mut summary = BatchSummary::default();

        for video in videos {
            pb.set_message(video.file_name.clone());

            match self.process_video(&video, language).await {
                Ok(FileOutcome::Downloaded) => {
                    summary.organized += 1;
                    summary.downloaded += 1;
                }
                Ok(FileOutcome::NoSubtitle) => {
                    summary.organized += 1;
                    summary.missing += 1;
                }
                Err(e) => {
                    warn!("Skipping {}: {}", video.file_name, e);
                    summary.failed += 1;
                }
            }

            pb.inc(1);
        }

        pb.finish_with_message("done");
        Ok(summary)
    }

    async fn process_video(&self, video: &VideoFile, language: &str) -> Result<FileOutcome> {
        let video_path = organize(video, self.config.organize.resume)?;

        let candidates = self.service.search(language, &video_path).await?;
        let candidate = match candidates.into_iter().next() {
            Some(candidate) => candidate,
            None => {
                warn!(
                    "Could not find a \"{}\" subtitle for {}",
                    language,
                    video_path.display()
                );
                return Ok(FileOutcome::NoSubtitle);
            }
        };

        let payload = self.service.download(&candidate.download_url).await?;
        let raw_text = decompress(&payload)?;

        let encoding = resolve_encoding(self.config.charset_for_language(language))?;
        let subtitle = transcode(
            &raw_text,
            encoding,
            self.config.encoding.bom,
            self.config.encoding.utf8_passthrough,
        )?;

        let srt_path = video_path.with_extension("srt");
        std::fs::write(&srt_path, subtitle).map_err(|e| {
            SubfetchError::Write(format!("Cannot write {}: {}", srt_path.display(), e))
        })?;

        info!("Wrote subtitle: {}", srt_path.display());
        Ok(FileOutcome::Downloaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::SubtitleCandidate;
    use crate::transfer::UTF8_BOM;
    use async_trait::async_trait;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::fs;
    use std::io::Write;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory service standing in for the remote collaborator.
    struct StubService {
        candidates: Vec<SubtitleCandidate>,
        payload: Vec<u8>,
        logins: Arc<AtomicUsize>,
        logouts: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl SubtitleService for StubService {
        async fn login(&mut self) -> crate::error::Result<()> {
            self.logins.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn search(
            &self,
            _language: &str,
            _video_path: &std::path::Path,
        ) -> crate::error::Result<Vec<SubtitleCandidate>> {
            Ok(self.candidates.clone())
        }

        async fn download(&self, _url: &str) -> crate::error::Result<Vec<u8>> {
            if self.payload.is_empty() {
                return Err(SubfetchError::Download("stub transfer failure".to_string()));
            }
            Ok(self.payload.clone())
        }

        async fn logout(&mut self) -> crate::error::Result<()> {
            self.logouts.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn gzip(bytes: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(bytes).unwrap();
        encoder.finish().unwrap()
    }

    fn candidate() -> SubtitleCandidate {
        SubtitleCandidate {
            download_url: "https://example.invalid/sub.gz".to_string(),
            language: "tur".to_string(),
            release_name: None,
        }
    }

    struct Harness {
        workflow: Workflow,
        logins: Arc<AtomicUsize>,
        logouts: Arc<AtomicUsize>,
    }

    fn harness(candidates: Vec<SubtitleCandidate>, payload: Vec<u8>) -> Harness {
        let logins = Arc::new(AtomicUsize::new(0));
        let logouts = Arc::new(AtomicUsize::new(0));
        let service = StubService {
            candidates,
            payload,
            logins: logins.clone(),
            logouts: logouts.clone(),
        };
        Harness {
            workflow: Workflow::with_service(Config::default(), Box::new(service)),
            logins,
            logouts,
        }
    }

    #[tokio::test]
    async fn test_end_to_end_organize_and_fetch() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("show.mp4"), b"video bytes").unwrap();

        let text = "1\n00:00:01,000 --> 00:00:02,000\nGünaydın\n";
        let encoding = resolve_encoding("ISO-8859-9").unwrap();
        let (latin5, _, _) = encoding.encode(text);
        let mut h = harness(vec![candidate()], gzip(&latin5));

        let summary = h
            .workflow
            .run(dir.path(), "tur", ".mp4", MatchMode::Suffix)
            .await
            .unwrap();

        assert_eq!(summary.organized, 1);
        assert_eq!(summary.downloaded, 1);
        assert_eq!(summary.failed, 0);

        let video = dir.path().join("show").join("show.mp4");
        let srt = dir.path().join("show").join("show.srt");
        assert_eq!(fs::read(&video).unwrap(), b"video bytes");

        let srt_bytes = fs::read(&srt).unwrap();
        assert_eq!(&srt_bytes[..3], &UTF8_BOM);
        assert_eq!(std::str::from_utf8(&srt_bytes[3..]).unwrap(), text);

        assert_eq!(h.logins.load(Ordering::SeqCst), 1);
        assert_eq!(h.logouts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_no_candidate_leaves_video_moved_without_srt() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("show.mp4"), b"x").unwrap();

        let mut h = harness(Vec::new(), Vec::new());
        let summary = h
            .workflow
            .run(dir.path(), "tur", ".mp4", MatchMode::Suffix)
            .await
            .unwrap();

        assert_eq!(summary.missing, 1);
        assert_eq!(summary.downloaded, 0);
        assert!(dir.path().join("show").join("show.mp4").exists());
        assert!(!dir.path().join("show").join("show.srt").exists());
    }

    #[tokio::test]
    async fn test_download_failure_is_isolated_per_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("one.mp4"), b"a").unwrap();
        fs::write(dir.path().join("two.mp4"), b"b").unwrap();

        // Empty payload makes the stub's download fail.
        let mut h = harness(vec![candidate()], Vec::new());
        let summary = h
            .workflow
            .run(dir.path(), "tur", ".mp4", MatchMode::Suffix)
            .await
            .unwrap();

        // Both files failed past the move, but the batch ran to the end
        // and the session was still closed.
        assert_eq!(summary.failed, 2);
        assert!(dir.path().join("one").join("one.mp4").exists());
        assert!(dir.path().join("two").join("two.mp4").exists());
        assert_eq!(h.logouts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_malformed_gzip_produces_no_partial_srt() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("show.mp4"), b"x").unwrap();

        let mut h = harness(vec![candidate()], b"not gzip at all".to_vec());
        let summary = h
            .workflow
            .run(dir.path(), "tur", ".mp4", MatchMode::Suffix)
            .await
            .unwrap();

        assert_eq!(summary.failed, 1);
        assert!(!dir.path().join("show").join("show.srt").exists());
    }

    #[tokio::test]
    async fn test_invalid_root_fails_before_login() {
        let mut h = harness(vec![candidate()], Vec::new());
        let err = h
            .workflow
            .run(
                std::path::Path::new("/no/such/root"),
                "tur",
                ".mp4",
                MatchMode::Suffix,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, SubfetchError::InvalidDirectory(_)));
        assert_eq!(h.logins.load(Ordering::SeqCst), 0);
        assert_eq!(h.logouts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rerun_resumes_over_organized_tree() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("show.mp4"), b"x").unwrap();

        let mut h = harness(Vec::new(), Vec::new());
        h.workflow
            .run(dir.path(), "tur", ".mp4", MatchMode::Suffix)
            .await
            .unwrap();

        // Second run finds nothing at the top level; the moved file is
        // out of scan scope and nothing fails.
        let summary = h
            .workflow
            .run(dir.path(), "tur", ".mp4", MatchMode::Suffix)
            .await
            .unwrap();
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.organized, 0);
    }
}
