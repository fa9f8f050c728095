//! Page content codec.
//!
//! Pages are edited as an ordered list of typed blocks but persisted as a
//! single TEXT column. Each block becomes one line: a two-character tag
//! (`!H`, `!P`, `!I`) followed by the block body. Lines are joined with `\n`.
//!
//! Decoding is forgiving: lines without a recognized tag are dropped, so
//! legacy or hand-edited rows never fail to load.

use serde::{Deserialize, Serialize};

/// Line delimiter used in the persisted form.
const LINE_DELIMITER: &str = "\n";

/// Length in bytes of every block tag.
const TAG_LEN: usize = 2;

/// Kind of a content block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    Header,
    Paragraph,
    Image,
}

impl BlockKind {
    /// Persisted line tag for this kind.
    pub fn tag(self) -> &'static str {
        match self {
            BlockKind::Header => "!H",
            BlockKind::Paragraph => "!P",
            BlockKind::Image => "!I",
        }
    }

    /// Look up a kind by its persisted tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "!H" => Some(BlockKind::Header),
            "!P" => Some(BlockKind::Paragraph),
            "!I" => Some(BlockKind::Image),
            _ => None,
        }
    }
}

/// One unit of page content.
///
/// For [`BlockKind::Image`] the body is an image identifier rather than text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub body: String,
}

impl ContentBlock {
    pub fn new(kind: BlockKind, body: impl Into<String>) -> Self {
        Self {
            kind,
            body: body.into(),
        }
    }

    pub fn header(body: impl Into<String>) -> Self {
        Self::new(BlockKind::Header, body)
    }

    pub fn paragraph(body: impl Into<String>) -> Self {
        Self::new(BlockKind::Paragraph, body)
    }

    pub fn image(body: impl Into<String>) -> Self {
        Self::new(BlockKind::Image, body)
    }
}

/// Encode blocks into the persisted string.
///
/// Newlines inside a body are replaced with a single space each; the
/// encoding has no escape mechanism.
pub fn encode(blocks: &[ContentBlock]) -> String {
    blocks
        .iter()
        .map(|block| {
            let body = block.body.replace(LINE_DELIMITER, " ");
            format!("{}{}", block.kind.tag(), body)
        })
        .collect::<Vec<_>>()
        .join(LINE_DELIMITER)
}

/// Decode the persisted string into blocks.
///
/// `None` (a NULL column) and the empty string both decode to no blocks.
pub fn decode(content: Option<&str>) -> Vec<ContentBlock> {
    let Some(content) = content else {
        return Vec::new();
    };

    content
        .split(LINE_DELIMITER)
        .filter_map(decode_line)
        .collect()
}

fn decode_line(line: &str) -> Option<ContentBlock> {
    // `get` keeps a multi-byte character straddling the tag boundary from panicking.
    let tag = line.get(..TAG_LEN)?;
    let kind = BlockKind::from_tag(tag)?;
    Some(ContentBlock::new(kind, &line[TAG_LEN..]))
}
