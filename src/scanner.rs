//! Directory Scanner Module
//!
//! Recursively discovers markdown files under a base directory and
//! extracts the metadata shown in file listings (title, preview, sizes,
//! timestamps).

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::MarkdownFile;

/// Directory names skipped during scanning.
const DEFAULT_EXCLUDE_DIRS: &[&str] = &[".git", "node_modules", "target"];

/// Preview length cap in characters.
const PREVIEW_MAX_CHARS: usize = 200;

// == Markdown Scanner ==
/// Scans a directory tree for markdown files.
#[derive(Debug)]
pub struct MarkdownScanner {
    base_dir: PathBuf,
    max_depth: Option<usize>,
    exclude_dirs: HashSet<String>,
    max_file_size: u64,
}

impl MarkdownScanner {
    // == Constructor ==
    /// Creates a scanner rooted at `base_dir`.
    ///
    /// Fails fast when the directory does not exist or is not a directory.
    pub fn new(base_dir: &Path, max_depth: Option<usize>, max_file_size: u64) -> Result<Self> {
        if !base_dir.exists() {
            return Err(AppError::Config(format!(
                "base directory does not exist: {}",
                base_dir.display()
            )));
        }
        if !base_dir.is_dir() {
            return Err(AppError::Config(format!(
                "base path is not a directory: {}",
                base_dir.display()
            )));
        }

        Ok(Self {
            base_dir: base_dir.to_path_buf(),
            max_depth,
            exclude_dirs: DEFAULT_EXCLUDE_DIRS.iter().map(|s| s.to_string()).collect(),
            max_file_size,
        })
    }

    // == Scan ==
    /// Walks the tree and returns every readable markdown file with its
    /// metadata, sorted by relative path. Unreadable or oversized files are
    /// skipped with a warning, never fatal.
    pub fn scan(&self) -> Vec<MarkdownFile> {
        let mut walker = WalkDir::new(&self.base_dir);
        if let Some(depth) = self.max_depth {
            // +1: depth 0 is the base directory itself
            walker = walker.max_depth(depth + 1);
        }

        let mut files: Vec<MarkdownFile> = walker
            .into_iter()
            .filter_entry(|entry| !self.is_excluded_dir(entry.path()))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    warn!(%err, "skipping unreadable directory entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file() && is_markdown(entry.path()))
            .filter_map(|entry| match self.describe(entry.path()) {
                Ok(file) => Some(file),
                Err(err) => {
                    warn!(path = %entry.path().display(), %err, "skipping file");
                    None
                }
            })
            .collect();

        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        debug!(count = files.len(), base_dir = %self.base_dir.display(), "scan complete");
        files
    }

    fn is_excluded_dir(&self, path: &Path) -> bool {
        path.is_dir()
            && path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| self.exclude_dirs.contains(name))
    }

    /// Builds the MarkdownFile record for one path.
    fn describe(&self, path: &Path) -> Result<MarkdownFile> {
        let meta = path.metadata()?;

        if meta.len() > self.max_file_size {
            return Err(AppError::InvalidRequest(format!(
                "file too large: {} bytes",
                meta.len()
            )));
        }

        let relative_path = path
            .strip_prefix(&self.base_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .into_owned();

        Ok(MarkdownFile {
            path: path.to_path_buf(),
            relative_path,
            filename: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            size: meta.len(),
            modified_at: meta.modified().map(DateTime::<Utc>::from)?,
            created_at: meta.created().ok().map(DateTime::<Utc>::from),
            title: extract_title(path),
            preview: extract_preview(path),
        })
    }
}

/// Convenience wrapper building a scanner from the application config.
pub fn scan_markdown_files(config: &Config) -> Result<Vec<MarkdownFile>> {
    let scanner = MarkdownScanner::new(&config.base_dir, config.max_depth, config.max_file_size)?;
    Ok(scanner.scan())
}

fn is_markdown(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "md")
}

// == Metadata Extraction ==
/// First `# ` heading, but only if it appears before any other content.
fn extract_title(path: &Path) -> Option<String> {
    let file = File::open(path).ok()?;
    for line in BufReader::new(file).lines() {
        let line = line.ok()?;
        let line = line.trim();
        if let Some(title) = line.strip_prefix("# ") {
            return Some(title.trim().to_string());
        }
        if !line.is_empty() {
            break;
        }
    }
    None
}

/// First non-heading prose, skipping fenced code blocks, truncated to
/// `PREVIEW_MAX_CHARS` characters.
fn extract_preview(path: &Path) -> Option<String> {
    let file = File::open(path).ok()?;
    let mut in_code_block = false;
    let mut preview_lines: Vec<String> = Vec::new();

    for line in BufReader::new(file).lines() {
        let line = line.ok()?;
        let line = line.trim();

        if line.starts_with("```") {
            in_code_block = !in_code_block;
            continue;
        }
        if in_code_block || line.starts_with('#') {
            continue;
        }
        if !line.is_empty() {
            preview_lines.push(line.to_string());
            if preview_lines.join(" ").chars().count() > PREVIEW_MAX_CHARS {
                break;
            }
        }
    }

    if preview_lines.is_empty() {
        return None;
    }

    let preview = preview_lines.join(" ");
    if preview.chars().count() > PREVIEW_MAX_CHARS {
        let truncated: String = preview.chars().take(PREVIEW_MAX_CHARS - 3).collect();
        Some(format!("{truncated}..."))
    } else {
        Some(preview)
    }
}
