use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::error::{Result, SubfetchError};
use crate::scanner::VideoFile;

/// Move a matched video into a sibling directory named after its base name.
///
/// Returns the video's new path. With `resume` enabled a rerun over an
/// already organized tree is a no-op for files that were moved before;
/// without it an existing target directory is an error.
pub fn organize(video: &VideoFile, resume: bool) -> Result<PathBuf> {
    let parent = video.path.parent().ok_or_else(|| {
        SubfetchError::MoveFailed(format!("{} has no parent directory", video.path.display()))
    })?;

    let target_dir = parent.join(&video.base_name);
    let target_path = target_dir.join(&video.file_name);

    if target_dir.exists() {
        if !resume {
            return Err(SubfetchError::DirectoryExists(
                target_dir.display().to_string(),
            ));
        }
        if target_path.exists() {
            debug!("Already organized, skipping move: {}", target_path.display());
            return Ok(target_path);
        }
    } else {
        fs::create_dir(&target_dir).map_err(|e| {
            SubfetchError::MoveFailed(format!(
                "Cannot create {}: {}",
                target_dir.display(),
                e
            ))
        })?;
    }

    fs::rename(&video.path, &target_path).map_err(|e| {
        SubfetchError::MoveFailed(format!(
            "Cannot move {} to {}: {}",
            video.path.display(),
            target_path.display(),
            e
        ))
    })?;

    info!("Moved {} -> {}", video.file_name, target_path.display());
    Ok(target_path)
}
