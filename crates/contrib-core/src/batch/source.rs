//! Listing page images.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::config::BatchConfig;

/// Lists the page images of a batch, in processing order.
pub trait PageSource {
    fn list_pages(&self, dir: &Path) -> Result<Vec<PathBuf>>;
}

/// Lists regular files in a directory by extension.
#[derive(Debug, Clone)]
pub struct DirectoryPageSource {
    extensions: Vec<String>,
    sort: bool,
}

impl DirectoryPageSource {
    /// Accept files with any of `extensions` (case-insensitive). An empty
    /// list accepts every file.
    pub fn new(extensions: Vec<String>, sort: bool) -> Self {
        Self {
            extensions: extensions.into_iter().map(|e| e.to_lowercase()).collect(),
            sort,
        }
    }

    pub fn from_config(config: &BatchConfig) -> Self {
        Self::new(config.extensions.clone(), config.sort_entries)
    }

    fn accepts(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        self.extensions.iter().any(|e| *e == ext)
    }
}

impl Default for DirectoryPageSource {
    fn default() -> Self {
        Self::from_config(&BatchConfig::default())
    }
}

impl PageSource for DirectoryPageSource {
    fn list_pages(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut pages = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && self.accepts(&path) {
                pages.push(path);
            }
        }

        if self.sort {
            pages.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        }

        Ok(pages)
    }
}

impl PageSource for Vec<PathBuf> {
    fn list_pages(&self, _dir: &Path) -> Result<Vec<PathBuf>> {
        Ok(self.clone())
    }
}
