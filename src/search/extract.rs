//! Plain text and importance weight of content blocks.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::corpus::Block;

/// Weight of a level 1 header (the page title).
pub const TITLE_WEIGHT: f64 = 16.0;
/// Weight of any other header level.
pub const SUBHEADING_WEIGHT: f64 = 2.0;
pub const PARAGRAPH_WEIGHT: f64 = 1.1;
pub const LIST_WEIGHT: f64 = 1.0;
/// Blocks without text never contribute to the index.
pub const OTHER_WEIGHT: f64 = 0.0;

// An unterminated tag or entity runs to the end of the text.
#[allow(clippy::expect_used)]
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>?").expect("tag pattern"));
#[allow(clippy::expect_used)]
static ENTITY: Lazy<Regex> = Lazy::new(|| Regex::new(r"&[^;]*;?").expect("entity pattern"));

/// Clean plain text of a block; empty for blocks without text.
#[must_use]
pub fn extract_text(block: &Block) -> String {
    match block {
        Block::Header { text, .. } | Block::Paragraph { text } => sanitize(text),
        Block::List { items } => sanitize(&items.join(" ")),
        Block::Other { .. } => String::new(),
    }
}

/// Importance of a match inside this block.
#[must_use]
pub fn block_weight(block: &Block) -> f64 {
    match block {
        Block::Header { level: 1, .. } => TITLE_WEIGHT,
        Block::Header { .. } => SUBHEADING_WEIGHT,
        Block::Paragraph { .. } => PARAGRAPH_WEIGHT,
        Block::List { .. } => LIST_WEIGHT,
        Block::Other { .. } => OTHER_WEIGHT,
    }
}

/// Remove tag-like substrings, then entity-like substrings.
#[must_use]
pub fn sanitize(text: &str) -> String {
    let without_tags = strip_tags(text);
    ENTITY.replace_all(&without_tags, "").into_owned()
}

#[must_use]
pub fn strip_tags(text: &str) -> String {
    TAG.replace_all(text, "").into_owned()
}
