//! # Document Model
//!
//! An article body is a [`Document`]: an envelope (`time`, `version`) around an
//! ordered list of [`Block`]s. Order is display order.
//!
//! ## Blocks
//!
//! A block is either [`Block::Typed`], one of the closed set of kinds in
//! [`BlockContent`], or [`Block::Fallback`], which holds anything the model does
//! not understand exactly as it arrived. Fallback blocks render to nothing but
//! are saved back verbatim, so content written by a newer or older tool set is
//! never lost on a round trip.
//!
//! ## JSON shape
//!
//! ```json
//! {
//!   "time": 1718000000000,
//!   "blocks": [
//!     { "id": "a1", "type": "header", "data": { "text": "Hi", "level": 2 },
//!       "tunes": { "highlight": { "highlighted": true } } },
//!     { "type": "paragraph", "data": { "text": "<b>Bold</b> claim" } }
//!   ],
//!   "version": "2.x"
//! }
//! ```
//!
//! Documents are only built by the normalizer or by an editor save, and expose
//! no mutation: producing a different document means building a new one.

pub mod kinds;
pub mod summary;
pub mod tunes;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

pub use kinds::{
    Fields, HeaderData, ImageData, ListData, ListStyle, ParagraphData, QuoteData, VideoData,
};
pub use summary::DocumentSummary;
pub use tunes::{HIGHLIGHT_CLASS, HighlightTune, Tunes};

/// Version tag written on documents this crate creates.
pub const DOCUMENT_VERSION: &str = "2.x";

/// Why a block's payload could not be read as its declared kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataError {
    #[error("block is not an object")]
    NotAnObject,
    #[error("block has no type")]
    MissingType,
    #[error("unrecognized block type `{0}`")]
    UnknownType(String),
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("field `{field}` must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
    #[error("unsupported list style `{0}`")]
    UnknownListStyle(String),
    #[error("unexpected block field `{0}`")]
    UnexpectedField(String),
}

/// The closed set of block kinds the model understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlockType {
    Paragraph,
    Header,
    List,
    Quote,
    Image,
    Video,
}

impl BlockType {
    pub const ALL: [BlockType; 6] = [
        BlockType::Paragraph,
        BlockType::Header,
        BlockType::List,
        BlockType::Quote,
        BlockType::Image,
        BlockType::Video,
    ];

    /// The `type` tag used in JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            BlockType::Paragraph => "paragraph",
            BlockType::Header => "header",
            BlockType::List => "list",
            BlockType::Quote => "quote",
            BlockType::Image => "image",
            BlockType::Video => "video",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == tag)
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of a typed block.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockContent {
    Paragraph(ParagraphData),
    Header(HeaderData),
    List(ListData),
    Quote(QuoteData),
    Image(ImageData),
    Video(VideoData),
}

impl BlockContent {
    pub fn block_type(&self) -> BlockType {
        match self {
            BlockContent::Paragraph(_) => BlockType::Paragraph,
            BlockContent::Header(_) => BlockType::Header,
            BlockContent::List(_) => BlockType::List,
            BlockContent::Quote(_) => BlockType::Quote,
            BlockContent::Image(_) => BlockType::Image,
            BlockContent::Video(_) => BlockType::Video,
        }
    }

    /// Reads a payload for a known block type.
    pub fn from_data(block_type: BlockType, data: Fields) -> Result<Self, DataError> {
        Ok(match block_type {
            BlockType::Paragraph => BlockContent::Paragraph(ParagraphData::from_data(data)?),
            BlockType::Header => BlockContent::Header(HeaderData::from_data(data)?),
            BlockType::List => BlockContent::List(ListData::from_data(data)?),
            BlockType::Quote => BlockContent::Quote(QuoteData::from_data(data)?),
            BlockType::Image => BlockContent::Image(ImageData::from_data(data)?),
            BlockType::Video => BlockContent::Video(VideoData::from_data(data)?),
        })
    }

    /// The payload as a JSON object.
    pub fn to_data(&self) -> Fields {
        let value = match self {
            BlockContent::Paragraph(d) => serde_json::to_value(d),
            BlockContent::Header(d) => serde_json::to_value(d),
            BlockContent::List(d) => serde_json::to_value(d),
            BlockContent::Quote(d) => serde_json::to_value(d),
            BlockContent::Image(d) => serde_json::to_value(d),
            BlockContent::Video(d) => serde_json::to_value(d),
        };
        match value {
            Ok(Value::Object(fields)) => fields,
            _ => Fields::new(),
        }
    }
}

impl Serialize for BlockContent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BlockContent::Paragraph(d) => d.serialize(serializer),
            BlockContent::Header(d) => d.serialize(serializer),
            BlockContent::List(d) => d.serialize(serializer),
            BlockContent::Quote(d) => d.serialize(serializer),
            BlockContent::Image(d) => d.serialize(serializer),
            BlockContent::Video(d) => d.serialize(serializer),
        }
    }
}

/// A block of one of the known kinds.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedBlock {
    pub id: Option<String>,
    pub content: BlockContent,
    pub tunes: Tunes,
}

/// A block kept exactly as it arrived because it could not be typed.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackBlock {
    raw: Value,
}

impl FallbackBlock {
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    /// The declared `type`, if the raw value had a string one.
    pub fn block_type(&self) -> Option<&str> {
        self.raw.get("type").and_then(Value::as_str)
    }

    pub fn data(&self) -> Option<&Value> {
        self.raw.get("data")
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn into_raw(self) -> Value {
        self.raw
    }
}

/// One unit of article content.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Typed(TypedBlock),
    Fallback(FallbackBlock),
}

impl Block {
    pub fn typed(content: BlockContent) -> Self {
        Block::Typed(TypedBlock {
            id: None,
            content,
            tunes: Tunes::default(),
        })
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::typed(BlockContent::Paragraph(ParagraphData::new(text)))
    }

    pub fn header(text: impl Into<String>, level: i64) -> Self {
        Self::typed(BlockContent::Header(HeaderData::new(text, level)))
    }

    pub fn list(style: ListStyle, items: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let items = items.into_iter().map(Into::into).collect();
        Self::typed(BlockContent::List(ListData::new(style, items)))
    }

    pub fn quote(text: impl Into<String>, caption: Option<&str>) -> Self {
        Self::typed(BlockContent::Quote(QuoteData::new(
            text,
            caption.map(str::to_string),
        )))
    }

    pub fn image(url: impl Into<String>, caption: Option<&str>) -> Self {
        Self::typed(BlockContent::Image(ImageData::new(
            url,
            caption.map(str::to_string),
        )))
    }

    pub fn video(url: Option<&str>) -> Self {
        Self::typed(BlockContent::Video(VideoData::new(url.map(str::to_string))))
    }

    pub fn fallback(raw: Value) -> Self {
        Block::Fallback(FallbackBlock::new(raw))
    }

    /// Sets the block id. Fallback blocks are returned unchanged.
    pub fn with_id(self, id: impl Into<String>) -> Self {
        match self {
            Block::Typed(mut b) => {
                b.id = Some(id.into());
                Block::Typed(b)
            }
            fallback => fallback,
        }
    }

    /// Sets the highlight tune. Fallback blocks are returned unchanged.
    pub fn with_highlight(self, highlighted: bool) -> Self {
        match self {
            Block::Typed(mut b) => {
                b.tunes.set_highlighted(highlighted);
                Block::Typed(b)
            }
            fallback => fallback,
        }
    }

    /// The `type` tag of this block, if it has one.
    pub fn type_tag(&self) -> Option<&str> {
        match self {
            Block::Typed(b) => Some(b.content.block_type().as_str()),
            Block::Fallback(f) => f.block_type(),
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Block::Typed(b) => b.id.as_deref(),
            Block::Fallback(f) => f.raw.get("id").and_then(Value::as_str),
        }
    }

    pub fn is_highlighted(&self) -> bool {
        match self {
            Block::Typed(b) => b.tunes.is_highlighted(),
            Block::Fallback(_) => false,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Block::Fallback(_))
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Block::Typed(b) => {
                let mut map = serializer.serialize_map(None)?;
                if let Some(id) = &b.id {
                    map.serialize_entry("id", id)?;
                }
                map.serialize_entry("type", b.content.block_type().as_str())?;
                map.serialize_entry("data", &b.content)?;
                if !b.tunes.is_empty() {
                    map.serialize_entry("tunes", &b.tunes)?;
                }
                map.end()
            }
            Block::Fallback(f) => f.raw.serialize(serializer),
        }
    }
}

/// An article body: ordered blocks plus advisory envelope metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    #[serde(skip_serializing_if = "Option::is_none")]
    time: Option<i64>,
    blocks: Vec<Block>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
}

impl Document {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            time: None,
            blocks,
            version: None,
        }
    }

    /// A document with no blocks and no envelope metadata.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A fresh empty document stamped with the current time and
    /// [`DOCUMENT_VERSION`]; the default body of a newly created article.
    pub fn empty_now() -> Self {
        Self::new(Vec::new())
            .with_time(chrono::Utc::now().timestamp_millis())
            .with_version(DOCUMENT_VERSION)
    }

    pub fn with_time(mut self, time: i64) -> Self {
        self.time = Some(time);
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn time(&self) -> Option<i64> {
        self.time
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// The document as a JSON value, in the shape the normalizer accepts.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Fields::new()))
    }

    pub fn to_json_string(&self) -> String {
        self.to_value().to_string()
    }

    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.to_value()).unwrap_or_default()
    }
}

/// Deserialization never fails on content: whatever JSON value arrives is
/// passed through [`crate::normalize::normalize`].
impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(crate::normalize::normalize(&raw))
    }
}
