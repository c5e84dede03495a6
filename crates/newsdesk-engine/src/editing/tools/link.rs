//! Link tool: a pasted URL plus best-effort preview metadata.
//!
//! Blocks are saved as `{ "link": ..., "meta": {...} }` under type `linkTool`.
//! That type is outside the closed block set, so these blocks come back from
//! the normalizer as fallback blocks and the renderer skips them.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use super::{BlockTool, LINK, PasteOutcome, ToolFactory, Toolbox};
use crate::document::{DataError, Fields};
use crate::editing::settings::LinkPreviewSettings;
use crate::render::{Element, Node};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreviewError {
    #[error("preview request failed: {0}")]
    Request(String),
    #[error("preview response carried no metadata")]
    Empty,
}

/// Fetches link metadata (`title`, `description`, `image`) from the
/// configured preview endpoint.
#[async_trait]
pub trait LinkPreviewSource: Send + Sync {
    async fn fetch(&self, endpoint: &str, link: &str) -> Result<Fields, PreviewError>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LinkData {
    pub link: String,
    pub meta: Fields,
    #[serde(flatten)]
    pub extra: Fields,
}

impl LinkData {
    pub fn from_data(mut data: Fields) -> Result<Self, DataError> {
        let link = match data.remove("link") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(link)) => link,
            Some(_) => {
                return Err(DataError::WrongType {
                    field: "link",
                    expected: "a string",
                });
            }
        };
        let meta = match data.remove("meta") {
            None | Some(Value::Null) => Fields::new(),
            Some(Value::Object(meta)) => meta,
            Some(_) => {
                return Err(DataError::WrongType {
                    field: "meta",
                    expected: "an object",
                });
            }
        };
        Ok(Self {
            link,
            meta,
            extra: data,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct LinkFactory {
    settings: LinkPreviewSettings,
}

impl LinkFactory {
    pub fn new(settings: LinkPreviewSettings) -> Self {
        Self { settings }
    }
}

impl ToolFactory for LinkFactory {
    fn name(&self) -> &'static str {
        LINK
    }

    fn toolbox(&self) -> Toolbox {
        Toolbox {
            title: "Link",
            icon: "🔗",
        }
    }

    fn create(&self, data: Option<Fields>) -> Result<Box<dyn BlockTool>, DataError> {
        let data = match data {
            Some(data) => LinkData::from_data(data)?,
            None => LinkData::default(),
        };
        Ok(Box::new(LinkTool {
            data,
            endpoint: self.settings.endpoint.clone(),
        }))
    }
}

#[derive(Debug)]
pub struct LinkTool {
    data: LinkData,
    endpoint: String,
}

impl BlockTool for LinkTool {
    fn name(&self) -> &'static str {
        LINK
    }

    fn render(&self, _read_only: bool) -> Node {
        if self.data.link.is_empty() {
            return Element::new("div")
                .class("link-tool")
                .child(
                    Element::new("input")
                        .attr("type", "url")
                        .attr("placeholder", "Paste a link")
                        .class("link-tool__input"),
                )
                .into();
        }

        let title = self
            .data
            .meta
            .get("title")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .unwrap_or(self.data.link.as_str());
        let mut card = Element::new("a")
            .class("link-tool__content")
            .attr("href", &self.data.link)
            .attr("target", "_blank")
            .attr("rel", "nofollow noindex noreferrer")
            .child(
                Element::new("div")
                    .class("link-tool__title")
                    .child(Node::text(title)),
            );
        if let Some(description) = self.data.meta.get("description").and_then(Value::as_str) {
            card = card.child(
                Element::new("p")
                    .class("link-tool__description")
                    .child(Node::text(description)),
            );
        }
        Element::new("div").class("link-tool").child(card).into()
    }

    fn save(&self) -> Fields {
        match serde_json::to_value(&self.data) {
            Ok(Value::Object(fields)) => fields,
            _ => Fields::new(),
        }
    }

    fn update(&mut self, data: Fields) -> Result<(), DataError> {
        self.data = LinkData::from_data(data)?;
        Ok(())
    }

    fn validate(&self) -> bool {
        !self.data.link.is_empty()
    }

    /// Accepts an absolute http(s) URL and asks for its preview.
    fn on_paste(&mut self, text: &str) -> PasteOutcome {
        let link = text.trim();
        match Url::parse(link) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {
                self.data.link = link.to_string();
                self.data.meta = Fields::new();
                PasteOutcome::Preview {
                    endpoint: self.endpoint.clone(),
                    link: self.data.link.clone(),
                }
            }
            _ => PasteOutcome::Rejected(format!("`{link}` is not a web link")),
        }
    }

    fn attach_preview(&mut self, meta: Fields) {
        self.data.meta = meta;
    }
}
