//! Local filesystem page store.
//!
//! A corpus directory holds one JSON document per page (`*.json`). Files
//! are read in file-name order so the corpus order is stable.

use std::fs;
use std::path::{Path, PathBuf};

use crate::corpus::Page;
use crate::storage::{PageStore, StorageError};

/// Page store reading page JSON files from a directory.
pub struct LocalPageStore {
    root: PathBuf,
}

impl LocalPageStore {
    /// Create a new local page store rooted at the given directory.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Every `*.json` file directly under the root, sorted by file name.
    fn page_files(&self) -> Result<Vec<PathBuf>, StorageError> {
        if !self.root.exists() {
            return Ok(vec![]);
        }

        let entries = fs::read_dir(&self.root)
            .map_err(|e| StorageError::ReadError(format!("{}: {e}", self.root.display())))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| StorageError::ReadError(format!("{}: {e}", self.root.display())))?
                .path();

            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }

    fn read_page(path: &Path) -> Result<Page, StorageError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| StorageError::ReadError(format!("{}: {e}", path.display())))?;

        serde_json::from_str(&contents)
            .map_err(|e| StorageError::ParseError(format!("{}: {e}", path.display())))
    }
}

impl PageStore for LocalPageStore {
    fn all_pages(&self) -> Result<Vec<Page>, StorageError> {
        self.page_files()?
            .iter()
            .map(|path| Self::read_page(path))
            .collect()
    }

    fn page(&self, id: &str) -> Result<Page, StorageError> {
        self.all_pages()?
            .into_iter()
            .find(|page| page.id == id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }
}
