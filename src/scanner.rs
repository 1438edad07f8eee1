use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::config::MatchMode;
use crate::error::{Result, SubfetchError};

/// A video file selected for processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFile {
    /// Current absolute path of the file
    pub path: PathBuf,
    /// File name component, including the matched token
    pub file_name: String,
    /// File name with the token removed, used to name the target directory
    pub base_name: String,
}

/// List the immediate children of `root` whose names match `token`.
///
/// Order is whatever the underlying directory listing yields; callers must
/// not assume it is sorted.
pub fn scan_videos(root: &Path, token: &str, mode: MatchMode) -> Result<Vec<VideoFile>> {
    if !root.is_dir() {
        return Err(SubfetchError::InvalidDirectory(
            root.display().to_string(),
        ));
    }

    let mut videos = Vec::new();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().to_string();
        if let Some(base_name) = match_token(&file_name, token, mode) {
            debug!("Matched video file: {}", file_name);
            videos.push(VideoFile {
                path: entry.path().to_path_buf(),
                file_name,
                base_name,
            });
        }
    }

    Ok(videos)
}

/// Apply the token match, returning the derived base name on a hit.
fn match_token(file_name: &str, token: &str, mode: MatchMode) -> Option<String> {
    if token.is_empty() {
        return None;
    }

    let base = match mode {
        MatchMode::Suffix => file_name.strip_suffix(token)?.to_string(),
        MatchMode::Substring => {
            let pos = file_name.find(token)?;
            let mut base = String::with_capacity(file_name.len() - token.len());
            base.push_str(&file_name[..pos]);
            base.push_str(&file_name[pos + token.len()..]);
            base
        }
    };

    let base = base.trim_end_matches(['.', ' ']).to_string();
    if base.is_empty() {
        return None;
    }

    Some(base)
}
