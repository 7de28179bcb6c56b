//! pagesearch - embedded full-text search for block-structured wiki pages.
//!
//! Pages are made of typed content blocks (headers, paragraphs, lists). The
//! engine builds a weighted inverted index over them in memory, once per
//! process, and answers free-text queries with ranked, highlighted,
//! section-anchored block snippets.
//!
//! # Modules
//!
//! - [`search`] - Tokenizer, block extractor, index, and query engine
//! - [`corpus`] - Page and block types
//! - [`storage`] - Page store trait and implementations
//! - [`commands`] - High-level operations (search, index, list, get)
//! - [`config`] - Configuration loading
//! - [`cli`] - Command-line interface definitions

pub mod cli;
pub mod commands;
pub mod config;
pub mod corpus;
pub mod search;
pub mod storage;
