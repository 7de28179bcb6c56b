//! Weighted inverted index over page blocks.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::corpus::Page;
use crate::search::extract::{block_weight, extract_text};
use crate::search::tokenizer::tokenize;

/// Maps each term to the pages containing it and their accumulated weight.
///
/// A (term, page) weight is the sum of the block weights of every
/// occurrence of the term in that page. Both levels are ordered maps so the
/// index serializes and iterates deterministically.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct InvertedIndex {
    terms: BTreeMap<String, BTreeMap<String, f64>>,
}

/// A page ranked by the summed weight of its matching terms.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub page_id: String,
    pub score: f64,
}

impl InvertedIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index over every block of every page.
    #[must_use]
    pub fn build(pages: &[Page]) -> Self {
        let mut index = Self::new();
        for page in pages {
            index.add_page(page);
        }
        index
    }

    /// Add the contributions of one page's blocks.
    ///
    /// Pages without an identifier are skipped.
    pub fn add_page(&mut self, page: &Page) {
        if page.id.is_empty() {
            return;
        }

        for block in page.blocks() {
            let weight = block_weight(block);
            if weight <= 0.0 {
                continue;
            }

            for term in tokenize(&extract_text(block)) {
                *self
                    .terms
                    .entry(term)
                    .or_default()
                    .entry(page.id.clone())
                    .or_insert(0.0) += weight;
            }
        }
    }

    /// Accumulated weight of `term` within `page_id`.
    #[must_use]
    pub fn weight(&self, term: &str, page_id: &str) -> Option<f64> {
        self.terms.get(term)?.get(page_id).copied()
    }

    /// Pages containing `term`, with their weights.
    #[must_use]
    pub fn postings(&self, term: &str) -> Option<&BTreeMap<String, f64>> {
        self.terms.get(term)
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(String::as_str)
    }

    /// Number of distinct terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Rank pages against search terms, best first.
    ///
    /// An indexed term matches when it contains any search term as a
    /// substring, so "cat" matches "category". Every matching term adds its
    /// per-page weight to that page's score. Equal scores keep page id order.
    #[must_use]
    pub fn candidates<T: AsRef<str>>(&self, search_terms: &[T]) -> Vec<Candidate> {
        if search_terms.is_empty() {
            return vec![];
        }

        let mut scores: BTreeMap<&str, f64> = BTreeMap::new();

        let matching = self.terms.iter().filter(|(term, _)| {
            search_terms
                .iter()
                .any(|search| term.contains(search.as_ref()))
        });

        for (_, postings) in matching {
            for (page_id, weight) in postings {
                *scores.entry(page_id.as_str()).or_insert(0.0) += weight;
            }
        }

        let mut ranked: Vec<Candidate> = scores
            .into_iter()
            .map(|(page_id, score)| Candidate {
                page_id: page_id.to_string(),
                score,
            })
            .collect();

        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked
    }
}
