//! In-memory page store.

use crate::corpus::Page;
use crate::storage::{PageStore, StorageError};

/// Page store backed by a vector held in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryPageStore {
    pages: Vec<Page>,
}

impl MemoryPageStore {
    #[must_use]
    pub fn new(pages: Vec<Page>) -> Self {
        Self { pages }
    }
}

impl From<Vec<Page>> for MemoryPageStore {
    fn from(pages: Vec<Page>) -> Self {
        Self::new(pages)
    }
}

impl PageStore for MemoryPageStore {
    fn all_pages(&self) -> Result<Vec<Page>, StorageError> {
        Ok(self.pages.clone())
    }

    fn page(&self, id: &str) -> Result<Page, StorageError> {
        self.pages
            .iter()
            .find(|page| page.id == id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }
}
