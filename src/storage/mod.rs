//! Page storage collaborator.
//!
//! The search engine only ever reads pages. This module provides the trait
//! it reads through, plus a local-directory backend and an in-memory one.

pub mod local;
pub mod memory;

use crate::corpus::Page;

/// Errors that can occur while fetching pages.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Page not found: {0}")]
    NotFound(String),

    #[error("Failed to read: {0}")]
    ReadError(String),

    #[error("Failed to parse page: {0}")]
    ParseError(String),
}

/// Trait for page stores (local directory, in-memory, database, etc.).
pub trait PageStore: Send + Sync {
    /// Fetch every page in the corpus, in store order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if any page cannot be read or parsed.
    fn all_pages(&self) -> Result<Vec<Page>, StorageError>;

    /// Fetch a single page by identifier.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no page has this identifier.
    fn page(&self, id: &str) -> Result<Page, StorageError>;
}
