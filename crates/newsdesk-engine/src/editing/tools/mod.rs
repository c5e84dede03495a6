//! Block tools: the per-type plugins an editing session composes.
//!
//! A [`ToolFactory`] is the loaded, configured form of a tool; it builds one
//! [`BlockTool`] per block. A block tool owns that block's state, describes
//! its editing surface as a markup [`Node`], and produces the block's `data`
//! on save. Tools know nothing about sessions: anything asynchronous (a confirm
//! delay, a metadata fetch) is requested through [`PasteOutcome`] and carried
//! out by the session.

pub mod header;
pub mod link;
pub mod list;
pub mod paragraph;
pub mod quote;
pub mod video;

use std::fmt;
use std::time::Duration;

pub use header::HeaderFactory;
pub use link::{LinkFactory, LinkPreviewSource, PreviewError};
pub use list::ListFactory;
pub use paragraph::ParagraphFactory;
pub use quote::QuoteFactory;
pub use video::{VideoFactory, VideoState};

use crate::document::{DataError, Fields};
use crate::render::{Element, Node};

pub const PARAGRAPH: &str = "paragraph";
pub const HEADER: &str = "header";
pub const LIST: &str = "list";
pub const QUOTE: &str = "quote";
pub const VIDEO: &str = "video";
/// The link tool saves blocks under this type, outside the closed block set.
pub const LINK: &str = "linkTool";

/// Toolbox entry shown in the block picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolbox {
    pub title: &'static str,
    pub icon: &'static str,
}

/// What a tool did with pasted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasteOutcome {
    /// The tool does not take pastes.
    Ignored,
    /// The paste was applied to the block.
    Applied,
    /// The paste was refused; the block is unchanged.
    Rejected(String),
    /// Accepted; the session calls [`BlockTool::confirm`] after `delay`.
    Pending { delay: Duration },
    /// Accepted; the session fetches metadata for `link` from `endpoint`
    /// and hands it to [`BlockTool::attach_preview`].
    Preview { endpoint: String, link: String },
}

/// One block's tool instance.
pub trait BlockTool: Send + fmt::Debug {
    /// Registry name, also the `type` written on save.
    fn name(&self) -> &'static str;

    /// The editing surface.
    fn render(&self, read_only: bool) -> Node;

    fn save(&self) -> Fields;

    /// Replaces the block data. Rejected data leaves the block unchanged.
    fn update(&mut self, data: Fields) -> Result<(), DataError>;

    /// Blocks that fail validation are left out of a save.
    fn validate(&self) -> bool {
        true
    }

    fn on_paste(&mut self, _text: &str) -> PasteOutcome {
        PasteOutcome::Ignored
    }

    /// Completes a [`PasteOutcome::Pending`] paste.
    fn confirm(&mut self) {}

    fn attach_preview(&mut self, _meta: Fields) {}

    /// Releases whatever the tool holds. Called once, before the tool is
    /// dropped by the session.
    fn destroy(&mut self) {}
}

/// A loaded tool: static configuration plus a constructor.
pub trait ToolFactory: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    fn toolbox(&self) -> Toolbox;

    /// Builds a tool for existing data, or for a fresh block when `data` is
    /// `None`.
    fn create(&self, data: Option<Fields>) -> Result<Box<dyn BlockTool>, DataError>;
}

/// `contenteditable` element shared by the text tools.
pub(crate) fn editable(tag: &'static str, class: &str, read_only: bool) -> Element {
    Element::new(tag)
        .class(class)
        .attr("contenteditable", if read_only { "false" } else { "true" })
}

/// Appends pasted plain text to rich text.
pub(crate) fn append_plain(rich: &mut String, text: &str) -> PasteOutcome {
    let text = text.trim();
    if text.is_empty() {
        return PasteOutcome::Ignored;
    }
    if !rich.is_empty() && !rich.ends_with(char::is_whitespace) {
        rich.push(' ');
    }
    rich.push_str(&html_escape::encode_text(text));
    PasteOutcome::Applied
}
