//! CLI interface for pagesearch.
//!
//! Provides command-line argument parsing using clap.

use clap::{Parser, Subcommand};

/// Command-line interface for pagesearch.
#[derive(Parser)]
#[command(name = "pagesearch")]
#[command(author, version, about = "Full-text search over wiki pages", long_about = None)]
pub struct Cli {
    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Search the pages for a free-text query.
    Search {
        /// The search query string.
        query: String,

        /// Show at most this many results (never more than the configured result limit).
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print the raw JSON response.
        #[arg(short, long)]
        json: bool,
    },

    /// Build the search index and report its size.
    Index,

    /// List all pages in the corpus.
    List,

    /// Print the plain text of a page by its identifier.
    Get {
        /// Page identifier (e.g., "getting-started").
        id: String,
    },
}
