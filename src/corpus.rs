//! Facilities for discovering input files and loading line-oriented text corpora.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::IngestConfig;
use crate::error::{Result, SlicesError};

/// Discovers files rooted at the provided input paths according to the ingest configuration.
///
/// Directories are traversed recursively by default; set [`IngestConfig::recursive`] to `false`
/// to limit discovery to the first level. Symlink traversal is controlled through
/// [`IngestConfig::follow_symlinks`]; a symlinked input is skipped unless it is set. Files found inside a directory are returned in sorted
/// order so corpus order, and therefore tie-breaking during training, is reproducible.
pub fn collect_paths<P: AsRef<Path>>(inputs: &[P], cfg: &IngestConfig) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        let path = input.as_ref();
        if !path.exists() {
            return Err(SlicesError::InvalidConfig(format!(
                "input path {path:?} does not exist"
            )));
        }
        let mut metadata = path
            .symlink_metadata()
            .map_err(|err| SlicesError::io(err, Some(path.to_path_buf())))?;
        if metadata.file_type().is_symlink() {
            if !cfg.follow_symlinks {
                continue;
            }
            metadata =
                fs::metadata(path).map_err(|err| SlicesError::io(err, Some(path.to_path_buf())))?;
        }
        if metadata.is_dir() {
            let max_depth = if cfg.recursive { usize::MAX } else { 1 };
            let walker = WalkDir::new(path)
                .follow_links(cfg.follow_symlinks)
                .max_depth(max_depth)
                .sort_by_file_name();
            for entry in walker {
                let entry = entry.map_err(|err| SlicesError::Internal(err.to_string()))?;
                if entry.file_type().is_file() {
                    files.push(entry.path().to_path_buf());
                }
            }
        } else if metadata.is_file() {
            files.push(path.to_path_buf());
        }
    }
    if files.is_empty() {
        return Err(SlicesError::InvalidConfig(
            "no files discovered in provided inputs".into(),
        ));
    }
    Ok(files)
}

/// Loads every non-empty line from the discovered files, in file order.
///
/// Trailing carriage returns are stripped so CRLF corpora segment identically to LF ones.
pub fn load_text_corpus<P: AsRef<Path>>(inputs: &[P], cfg: &IngestConfig) -> Result<Vec<String>> {
    let file_paths = collect_paths(inputs, cfg)?;
    let mut lines = Vec::new();
    for file_path in file_paths {
        let contents = fs::read_to_string(&file_path)
            .map_err(|err| SlicesError::io(err, Some(file_path.clone())))?;
        lines.extend(
            contents
                .lines()
                .map(|line| line.trim_end_matches('\r'))
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
    }
    if lines.is_empty() {
        return Err(SlicesError::InvalidConfig(
            "no non-empty lines could be loaded from inputs".into(),
        ));
    }
    Ok(lines)
}
