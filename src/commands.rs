//! Command implementations behind the CLI.

use crate::config::Config;
use crate::corpus::Page;
use crate::search::extract::extract_text;
use crate::search::index::InvertedIndex;
use crate::search::{SearchEngine, SearchError, SearchResponse};
use crate::storage::PageStore;
use crate::storage::local::LocalPageStore;

/// Summary of a built index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSummary {
    pub pages: usize,
    pub terms: usize,
}

/// Identifier and display title of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInfo {
    pub id: String,
    pub title: String,
}

/// Open an engine over the configured corpus directory.
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be loaded.
pub fn open_engine() -> anyhow::Result<SearchEngine<LocalPageStore>> {
    let config = Config::load()?;
    let store = LocalPageStore::new(config.corpus_root());
    Ok(SearchEngine::with_config(store, config.search))
}

/// Search the configured corpus.
///
/// # Arguments
///
/// * `query` - The free-text query
/// * `limit` - Optional cap below the configured result limit
///
/// # Errors
///
/// Returns an error if config loading fails or the pages cannot be read.
pub fn search(query: &str, limit: Option<usize>) -> anyhow::Result<SearchResponse> {
    let engine = open_engine()?;
    let mut response = engine.query(query)?;

    if let Some(limit) = limit {
        response.pages.truncate(limit);
    }

    Ok(response)
}

/// Build the index over the configured corpus.
///
/// # Errors
///
/// Returns an error if config loading fails or the pages cannot be read.
pub fn index() -> anyhow::Result<IndexSummary> {
    let engine = open_engine()?;
    Ok(build_summary(&engine)?)
}

/// Initialize an engine and report the size of its index.
///
/// # Errors
///
/// Returns `SearchError` if the pages cannot be fetched.
pub fn build_summary<S: PageStore>(engine: &SearchEngine<S>) -> Result<IndexSummary, SearchError> {
    engine.initialize()?;

    Ok(IndexSummary {
        pages: engine.pages().map_or(0, <[Page]>::len),
        terms: engine.index().map_or(0, InvertedIndex::len),
    })
}

/// List the pages of the configured corpus.
///
/// # Errors
///
/// Returns an error if config loading fails or the pages cannot be read.
pub fn list() -> anyhow::Result<Vec<PageInfo>> {
    let engine = open_engine()?;

    Ok(engine
        .store()
        .all_pages()?
        .iter()
        .map(|page| PageInfo {
            id: page.id.clone(),
            title: page.title_text(),
        })
        .collect())
}

/// Get the plain text of a page by identifier.
///
/// # Errors
///
/// Returns an error if the page is not found or the pages cannot be read.
pub fn get(id: &str) -> anyhow::Result<String> {
    let engine = open_engine()?;
    let page = engine.store().page(id)?;
    Ok(page_text(&page))
}

/// Clean text of every non-empty block, one block per line.
#[must_use]
pub fn page_text(page: &Page) -> String {
    page.blocks()
        .iter()
        .map(extract_text)
        .filter(|text| !text.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
