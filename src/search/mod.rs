//! In-process search engine over wiki pages.
//!
//! The engine builds a weighted inverted index from the page store once,
//! then answers queries in two passes:
//!
//! 1. rank pages by the summed index weight of terms matching the query,
//! 2. re-scan the blocks of the best pages, boosting blocks that contain
//!    query terms, and return the best blocks with highlighted snippets.

pub mod anchor;
pub mod extract;
pub mod highlight;
pub mod index;
pub mod tokenizer;

use std::collections::HashMap;

use once_cell::sync::OnceCell;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::SearchConfig;
use crate::corpus::Page;
use crate::storage::{PageStore, StorageError};

use self::anchor::anchor;
use self::extract::extract_text;
use self::highlight::Highlighter;
use self::index::InvertedIndex;
use self::tokenizer::tokenize_unique;

/// Score multiplier applied to a block for each query term it contains.
pub const TERM_MATCH_MULTIPLIER: f64 = 10.0;

/// Errors that can occur while building the index.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Failed to load pages: {0}")]
    Storage(#[from] StorageError),
}

/// Outcome of [`SearchEngine::initialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStatus {
    /// This call built the index.
    Built { pages: usize, terms: usize },
    /// The index already existed; nothing was done.
    AlreadyBuilt,
}

/// A single block-level hit.
///
/// Serializes with the page's own fields merged in next to the hit fields.
#[derive(Debug, Clone, Serialize)]
pub struct ResultEntry {
    #[serde(flatten)]
    pub page: Page,
    /// Block text with matched terms wrapped in highlight spans.
    #[serde(rename = "shortBody")]
    pub short_body: String,
    /// Fragment identifier of `section`.
    pub anchor: String,
    /// Text of the nearest header at or before the block.
    pub section: String,
    pub ratio: f64,
}

/// Response to a query.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResponse {
    /// Reserved for query suggestions; always empty.
    pub suggestions: Vec<String>,
    pub pages: Vec<ResultEntry>,
}

/// Index plus the page snapshot it was built from.
#[derive(Debug)]
struct IndexState {
    index: InvertedIndex,
    pages: Vec<Page>,
    /// Position in `pages` by id; a repeated id resolves to its last page.
    positions: HashMap<String, usize>,
}

/// Block hit before the page is cloned into a [`ResultEntry`].
struct BlockHit<'a> {
    page: &'a Page,
    short_body: String,
    section: String,
    ratio: f64,
}

impl IndexState {
    fn new(pages: Vec<Page>) -> Self {
        let index = InvertedIndex::build(&pages);
        let positions = pages
            .iter()
            .enumerate()
            .map(|(position, page)| (page.id.clone(), position))
            .collect();

        Self {
            index,
            pages,
            positions,
        }
    }

    fn page(&self, id: &str) -> Option<&Page> {
        self.positions.get(id).map(|&position| &self.pages[position])
    }

    fn search(&self, search: &str, config: &SearchConfig) -> SearchResponse {
        let terms = tokenize_unique(search);
        let candidates = self.index.candidates(terms.as_slice());
        let highlighter = Highlighter::new(terms.as_slice(), &config.highlight_class);

        let mut hits = Vec::new();

        for candidate in candidates.iter().take(config.candidate_limit) {
            let Some(page) = self.page(&candidate.page_id) else {
                debug!(page_id = %candidate.page_id, "candidate page missing from snapshot");
                continue;
            };

            let mut section = String::new();

            for block in page.blocks() {
                let text = extract_text(block);
                if block.is_header() {
                    section.clone_from(&text);
                }

                let lowered = text.to_lowercase();
                let multiplier = terms
                    .iter()
                    .filter(|term| lowered.contains(term.as_str()))
                    .fold(1.0, |acc, _| acc * TERM_MATCH_MULTIPLIER);

                hits.push(BlockHit {
                    page,
                    short_body: highlighter.apply(&text),
                    section: section.clone(),
                    ratio: candidate.score * multiplier,
                });
            }
        }

        hits.sort_by(|a, b| b.ratio.total_cmp(&a.ratio));
        hits.truncate(config.result_limit);

        debug!(
            terms = terms.len(),
            candidates = candidates.len(),
            entries = hits.len(),
            "query evaluated"
        );

        SearchResponse {
            suggestions: vec![],
            pages: hits
                .into_iter()
                .map(|hit| ResultEntry {
                    page: hit.page.clone(),
                    short_body: hit.short_body,
                    anchor: anchor(&hit.section),
                    section: hit.section,
                    ratio: hit.ratio,
                })
                .collect(),
        }
    }
}

/// Search service owning a page store and a lazily built index.
///
/// The index is built at most once per engine. Concurrent first calls are
/// serialized: one builds while the others wait for it. A failed build
/// leaves the engine uninitialized so the next call retries. Once built,
/// queries only read the index.
pub struct SearchEngine<S> {
    store: S,
    config: SearchConfig,
    state: OnceCell<IndexState>,
}

impl<S: PageStore> SearchEngine<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_config(store, SearchConfig::default())
    }

    #[must_use]
    pub fn with_config(store: S, config: SearchConfig) -> Self {
        Self {
            store,
            config,
            state: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Build the index if it has not been built yet.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::Storage` if the pages cannot be fetched. The
    /// engine stays uninitialized and a later call retries the build.
    pub fn initialize(&self) -> Result<InitStatus, SearchError> {
        let mut status = InitStatus::AlreadyBuilt;

        self.state.get_or_try_init(|| {
            let state = self.build()?;
            status = InitStatus::Built {
                pages: state.pages.len(),
                terms: state.index.len(),
            };
            Ok::<_, SearchError>(state)
        })?;

        Ok(status)
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.state.get().is_some()
    }

    /// The built index, if initialization has happened.
    #[must_use]
    pub fn index(&self) -> Option<&InvertedIndex> {
        self.state.get().map(|state| &state.index)
    }

    /// Pages snapshotted at build time.
    #[must_use]
    pub fn pages(&self) -> Option<&[Page]> {
        self.state.get().map(|state| state.pages.as_slice())
    }

    /// Answer a free-text query, building the index first if needed.
    ///
    /// A query with no usable terms, or matching nothing, returns an empty
    /// response.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::Storage` if this call had to build the index
    /// and the pages could not be fetched.
    pub fn query(&self, search: &str) -> Result<SearchResponse, SearchError> {
        let state = self.state.get_or_try_init(|| self.build())?;
        Ok(state.search(search, &self.config))
    }

    fn build(&self) -> Result<IndexState, SearchError> {
        let pages = self.store.all_pages()?;
        let state = IndexState::new(pages);

        info!(
            pages = state.pages.len(),
            terms = state.index.len(),
            "search index built"
        );

        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Block;
    use crate::storage::memory::MemoryPageStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Store that counts fetches and fails the first `failures` of them.
    struct FlakyStore {
        pages: Vec<Page>,
        failures: usize,
        calls: AtomicUsize,
    }

    impl FlakyStore {
        fn new(pages: Vec<Page>, failures: usize) -> Self {
            Self {
                pages,
                failures,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl PageStore for FlakyStore {
        fn all_pages(&self) -> Result<Vec<Page>, StorageError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                return Err(StorageError::ReadError("disk on fire".to_string()));
            }
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

    fn approx(actual: f64, expected: f64) -> bool {
        (actual - expected).abs() < 1e-9
    }

    fn getting_started() -> Page {
        Page::new(
            "getting-started",
            vec![
                Block::header(1, "Getting Started"),
                Block::paragraph("Install the tool and configure it."),
            ],
        )
    }

    #[test]
    fn end_to_end_install_query() {
        let engine = SearchEngine::new(MemoryPageStore::new(vec![getting_started()]));

        let response = engine.query("install").unwrap();
        let top = &response.pages[0];

        assert!(response.suggestions.is_empty());
        assert_eq!(top.page.id, "getting-started");
        assert_eq!(top.section, "Getting Started");
        assert_eq!(top.anchor, "getting-started");
        assert!(approx(top.ratio, 1.1 * 10.0));
        assert_eq!(
            top.short_body,
            "<span class=\"search-word\">Install</span> the tool and configure it."
        );
    }

    #[test]
    fn unmatched_blocks_of_candidates_are_still_emitted() {
        let engine = SearchEngine::new(MemoryPageStore::new(vec![getting_started()]));

        let response = engine.query("install").unwrap();

        assert_eq!(response.pages.len(), 2);
        let header_hit = &response.pages[1];
        assert_eq!(header_hit.short_body, "Getting Started");
        assert_eq!(header_hit.section, "Getting Started");
        assert!(approx(header_hit.ratio, 1.1));
    }

    #[test]
    fn multiplier_grows_per_distinct_term() {
        let page = Page::new(
            "p1",
            vec![Block::paragraph("alpha beta"), Block::paragraph("alpha only")],
        );
        let engine = SearchEngine::new(MemoryPageStore::new(vec![page]));

        // alpha: 1.1 + 1.1, beta: 1.1 -> candidate score 3.3
        let response = engine.query("alpha beta alpha").unwrap();

        assert!(approx(response.pages[0].ratio, 3.3 * 100.0));
        assert!(approx(response.pages[1].ratio, 3.3 * 10.0));
    }

    #[test]
    fn section_follows_most_recent_header() {
        let page = Page::new(
            "p1",
            vec![
                Block::paragraph("preface words"),
                Block::header(1, "Guide"),
                Block::header(2, "Setup <i>steps</i>"),
                Block::list(["download words", "unpack"]),
            ],
        );
        let engine = SearchEngine::new(MemoryPageStore::new(vec![page]));

        let response = engine.query("words").unwrap();
        let sections: Vec<_> = response
            .pages
            .iter()
            .map(|entry| (entry.short_body.clone(), entry.section.clone(), entry.anchor.clone()))
            .collect();

        assert!(sections.contains(&(
            "preface <span class=\"search-word\">words</span>".to_string(),
            String::new(),
            String::new()
        )));
        assert!(sections.contains(&(
            "download <span class=\"search-word\">words</span> unpack".to_string(),
            "Setup steps".to_string(),
            "setup-steps".to_string()
        )));
    }

    #[test]
    fn empty_and_short_queries_return_nothing() {
        let engine = SearchEngine::new(MemoryPageStore::new(vec![getting_started()]));

        assert!(engine.query("").unwrap().pages.is_empty());
        assert!(engine.query("to it").unwrap().pages.is_empty());
        assert!(engine.query("nonexistent").unwrap().pages.is_empty());
    }

    #[test]
    fn caps_candidates_and_entries() {
        let pages = (0..20)
            .map(|i| {
                Page::new(
                    format!("page-{i:02}"),
                    vec![Block::paragraph("alpha"), Block::list(["alpha"])],
                )
            })
            .collect();
        let engine = SearchEngine::new(MemoryPageStore::new(pages));

        let response = engine.query("alpha").unwrap();
        let distinct: std::collections::HashSet<_> =
            response.pages.iter().map(|entry| entry.page.id.as_str()).collect();

        assert_eq!(response.pages.len(), 15);
        assert!(distinct.len() <= 10);
    }

    #[test]
    fn keeps_only_top_ten_candidate_pages() {
        let pages = (0..20)
            .map(|i| Page::new(format!("page-{i:02}"), vec![Block::paragraph("alpha")]))
            .collect();
        let engine = SearchEngine::new(MemoryPageStore::new(pages));

        let response = engine.query("alpha").unwrap();
        let distinct: std::collections::HashSet<_> =
            response.pages.iter().map(|entry| entry.page.id.as_str()).collect();

        assert_eq!(response.pages.len(), 10);
        assert_eq!(distinct.len(), 10);
    }

    #[test]
    fn custom_limits_apply() {
        let pages: Vec<Page> = (0..5)
            .map(|i| Page::new(format!("p{i}"), vec![Block::paragraph("alpha")]))
            .collect();

        let config = SearchConfig {
            candidate_limit: 2,
            result_limit: 15,
            ..SearchConfig::default()
        };
        let engine = SearchEngine::with_config(MemoryPageStore::new(pages.clone()), config);
        let response = engine.query("alpha").unwrap();
        let distinct: std::collections::HashSet<_> =
            response.pages.iter().map(|entry| entry.page.id.as_str()).collect();

        assert_eq!(engine.config().candidate_limit, 2);
        assert_eq!(response.pages.len(), 2);
        assert_eq!(distinct.len(), 2);

        let config = SearchConfig {
            candidate_limit: 2,
            result_limit: 1,
            ..SearchConfig::default()
        };
        let engine = SearchEngine::with_config(MemoryPageStore::new(pages), config);

        assert_eq!(engine.query("alpha").unwrap().pages.len(), 1);
    }

    #[test]
    fn initialize_is_idempotent() {
        let engine = SearchEngine::new(FlakyStore::new(vec![getting_started()], 0));

        assert!(engine.pages().is_none());

        let first = engine.initialize().unwrap();
        let snapshot = serde_json::to_string(engine.index().unwrap()).unwrap();
        let second = engine.initialize().unwrap();

        let ids: Vec<_> = engine.pages().unwrap().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["getting-started"]);

        assert!(matches!(first, InitStatus::Built { pages: 1, .. }));
        assert_eq!(second, InitStatus::AlreadyBuilt);
        assert_eq!(serde_json::to_string(engine.index().unwrap()).unwrap(), snapshot);
        assert_eq!(engine.store().calls(), 1);
    }

    #[test]
    fn query_builds_lazily_once() {
        let engine = SearchEngine::new(FlakyStore::new(vec![getting_started()], 0));
        assert!(!engine.is_initialized());

        engine.query("install").unwrap();
        engine.query("started").unwrap();

        assert!(engine.is_initialized());
        assert_eq!(engine.initialize().unwrap(), InitStatus::AlreadyBuilt);
        assert_eq!(engine.store().calls(), 1);
    }

    #[test]
    fn storage_failure_propagates_and_retries() {
        let engine = SearchEngine::new(FlakyStore::new(vec![getting_started()], 1));

        let err = engine.query("install").unwrap_err();
        assert!(matches!(err, SearchError::Storage(StorageError::ReadError(_))));
        assert!(!engine.is_initialized());

        let status = engine.initialize().unwrap();
        assert!(matches!(status, InitStatus::Built { pages: 1, .. }));
        assert_eq!(engine.query("install").unwrap().pages.len(), 2);
        assert_eq!(engine.store().calls(), 2);
    }

    #[test]
    fn concurrent_first_queries_build_once() {
        let engine = SearchEngine::new(FlakyStore::new(vec![getting_started()], 0));

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    let response = engine.query("install").unwrap();
                    assert_eq!(response.pages.len(), 2);
                });
            }
        });

        assert_eq!(engine.store().calls(), 1);
    }

    #[test]
    fn missing_candidate_page_is_skipped() {
        let indexed = vec![
            getting_started(),
            Page::new("gone", vec![Block::header(1, "Install guide")]),
        ];
        let mut state = IndexState::new(indexed);
        state.pages.retain(|page| page.id != "gone");
        state.positions = state
            .pages
            .iter()
            .enumerate()
            .map(|(position, page)| (page.id.clone(), position))
            .collect();

        let response = state.search("install", &SearchConfig::default());

        assert!(!response.pages.is_empty());
        assert!(response.pages.iter().all(|entry| entry.page.id == "getting-started"));
    }

    #[test]
    fn response_serializes_with_merged_page_fields() {
        let engine = SearchEngine::new(MemoryPageStore::new(vec![getting_started()]));

        let value = serde_json::to_value(engine.query("install").unwrap()).unwrap();
        let top = &value["pages"][0];

        assert_eq!(value["suggestions"], serde_json::json!([]));
        assert_eq!(top["_id"], "getting-started");
        assert!(top["body"]["blocks"].is_array());
        assert_eq!(top["section"], "Getting Started");
        assert_eq!(top["anchor"], "getting-started");
        assert!(top["shortBody"].as_str().unwrap().contains("search-word"));
        assert!(top["ratio"].is_number());
    }
}
