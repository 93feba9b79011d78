use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::FileScanningConfig;
use crate::error::{CodexError, Result};

pub const PYTHON_PATTERNS: &[&str] = &["*.py"];

/// Finds input files under a directory.
///
/// Include globs are matched against file names, exclude globs against each
/// entry's name and its path relative to the root; an excluded directory is
/// not descended into. Results come back sorted by path.
pub struct RepositoryScanner {
    include: GlobSet,
    exclude: GlobSet,
    follow_symlinks: bool,
    max_depth: Option<usize>,
    recursive: bool,
}

fn build_globset<S: AsRef<str>>(patterns: &[S]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern.as_ref()).map_err(|e| {
            CodexError::Configuration(format!("invalid glob pattern '{}': {}", pattern.as_ref(), e))
        })?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| CodexError::Configuration(format!("failed to build glob set: {}", e)))
}

impl RepositoryScanner {
    pub fn new<S: AsRef<str>>(include_patterns: &[S], config: &FileScanningConfig) -> Result<Self> {
        Ok(Self {
            include: build_globset(include_patterns)?,
            exclude: build_globset(&config.exclude_patterns)?,
            follow_symlinks: config.follow_symlinks,
            max_depth: config.max_depth,
            recursive: true,
        })
    }

    /// Scanner for `*.py` files
    pub fn python(config: &FileScanningConfig) -> Result<Self> {
        Self::new(PYTHON_PATTERNS, config)
    }

    /// When off, only the root directory's own files are returned.
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    fn is_excluded(&self, entry: &DirEntry, root: &Path) -> bool {
        if entry.depth() == 0 {
            return false;
        }
        if self.exclude.is_match(entry.file_name()) {
            return true;
        }
        entry
            .path()
            .strip_prefix(root)
            .map(|relative| self.exclude.is_match(relative))
            .unwrap_or(false)
    }

    pub fn scan(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if !root.exists() {
            return Err(CodexError::io(
                root,
                std::io::Error::new(std::io::ErrorKind::NotFound, "path does not exist"),
            ));
        }

        let mut walker = WalkDir::new(root)
            .follow_links(self.follow_symlinks)
            .sort_by_file_name();
        let depth = if self.recursive { self.max_depth } else { Some(1) };
        if let Some(depth) = depth {
            walker = walker.max_depth(depth);
        }

        let mut files = Vec::new();
        for entry in walker.into_iter().filter_entry(|e| !self.is_excluded(e, root)) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable entry");
                    continue;
                }
            };

            if entry.file_type().is_file() && self.include.is_match(entry.file_name()) {
                files.push(entry.into_path());
            }
        }

        files.sort();
        debug!(root = %root.display(), files = files.len(), "Scan complete");
        Ok(files)
    }
}
