//! Page and block types for the wiki corpus.
//!
//! Pages arrive from the storage collaborator in the block-editor JSON
//! shape: `{"_id": "...", "body": {"blocks": [{"type": "...", "data": {...}}]}}`.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::search::extract::extract_text;

/// A wiki page: a stable identifier and an ordered sequence of content blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Stable page identifier.
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Explicit page title, if the store keeps one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Public URI of the page (e.g., "getting-started").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Identifier of the parent page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default)]
    pub body: PageBody,
}

/// The ordered content of a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageBody {
    #[serde(default)]
    pub blocks: Vec<Block>,
}

/// A typed content block.
///
/// Decoding never fails on an unknown or malformed block: anything that is
/// not a well-formed header, paragraph or list becomes [`Block::Other`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawBlock", into = "RawBlock")]
pub enum Block {
    /// Level 1 is the page title, anything else a subheading.
    Header { level: u8, text: String },
    Paragraph { text: String },
    List { items: Vec<String> },
    /// Any block type without extractable text (images, code, embeds...).
    Other { kind: String, data: Value },
}

impl Block {
    #[must_use]
    pub fn header(level: u8, text: impl Into<String>) -> Self {
        Self::Header {
            level,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::Paragraph { text: text.into() }
    }

    #[must_use]
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::List {
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn is_header(&self) -> bool {
        matches!(self, Self::Header { .. })
    }
}

/// Wire shape of a block: a type tag plus an untyped payload.
#[derive(Serialize, Deserialize)]
struct RawBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

#[derive(Deserialize)]
struct HeaderData {
    #[serde(default)]
    level: u8,
    text: String,
}

#[derive(Deserialize)]
struct TextData {
    text: String,
}

#[derive(Deserialize)]
struct ListData {
    items: Vec<Value>,
}

/// List items are plain strings, or `{"content": "..."}` objects in nested lists.
fn list_item_text(item: Value) -> Option<String> {
    match item {
        Value::String(text) => Some(text),
        Value::Object(mut fields) => match fields.remove("content") {
            Some(Value::String(text)) => Some(text),
            _ => None,
        },
        _ => None,
    }
}

impl From<RawBlock> for Block {
    fn from(raw: RawBlock) -> Self {
        let decoded = match raw.kind.as_str() {
            "header" => serde_json::from_value::<HeaderData>(raw.data.clone())
                .ok()
                .map(|d| Block::Header {
                    level: d.level,
                    text: d.text,
                }),
            "paragraph" => serde_json::from_value::<TextData>(raw.data.clone())
                .ok()
                .map(|d| Block::Paragraph { text: d.text }),
            "list" => serde_json::from_value::<ListData>(raw.data.clone())
                .ok()
                .map(|d| Block::List {
                    items: d.items.into_iter().filter_map(list_item_text).collect(),
                }),
            _ => None,
        };

        decoded.unwrap_or(Block::Other {
            kind: raw.kind,
            data: raw.data,
        })
    }
}

impl From<Block> for RawBlock {
    fn from(block: Block) -> Self {
        match block {
            Block::Header { level, text } => RawBlock {
                kind: "header".to_string(),
                data: json!({ "level": level, "text": text }),
            },
            Block::Paragraph { text } => RawBlock {
                kind: "paragraph".to_string(),
                data: json!({ "text": text }),
            },
            Block::List { items } => RawBlock {
                kind: "list".to_string(),
                data: json!({ "items": items }),
            },
            Block::Other { kind, data } => RawBlock { kind, data },
        }
    }
}

impl Page {
    /// Create a page with the given identifier and blocks and no metadata.
    #[must_use]
    pub fn new(id: impl Into<String>, blocks: Vec<Block>) -> Self {
        Self {
            id: id.into(),
            title: None,
            uri: None,
            parent: None,
            body: PageBody { blocks },
        }
    }

    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.body.blocks
    }

    /// The explicit title, or the clean text of the first header block.
    #[must_use]
    pub fn title_text(&self) -> String {
        if let Some(title) = self.title.as_deref()
            && !title.is_empty()
        {
            return title.to_string();
        }

        self.blocks()
            .iter()
            .find(|block| block.is_header())
            .map(extract_text)
            .unwrap_or_default()
    }
}
