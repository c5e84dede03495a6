//! Video tool.
//!
//! ```text
//!   Empty ──paste(resolvable url)──▶ Loading ──confirm──▶ Embedded
//!     ▲  └─paste(unresolvable)─┘                            │
//!     └───────────────────────── update(no url) ◀───────────┘
//! ```
//!
//! Only the pasted URL is persisted. The embed locator is resolved again on
//! every render and never stored in the block.

use std::time::Duration;

use super::{BlockTool, PasteOutcome, ToolFactory, Toolbox, VIDEO};
use crate::document::{BlockContent, DataError, Fields, VideoData};
use crate::editing::settings::VideoSettings;
use crate::embed;
use crate::render::{Element, Node};

/// `allow` list of the editor preview frame.
const PREVIEW_ALLOW: &str = "autoplay; encrypted-media; fullscreen; picture-in-picture";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoState {
    /// Waiting for a URL.
    Empty,
    /// URL accepted, embed not yet shown.
    Loading { url: String },
    Embedded { url: String },
}

#[derive(Debug, Clone, Default)]
pub struct VideoFactory {
    settings: VideoSettings,
}

impl VideoFactory {
    pub fn new(settings: VideoSettings) -> Self {
        Self { settings }
    }
}

impl ToolFactory for VideoFactory {
    fn name(&self) -> &'static str {
        VIDEO
    }

    fn toolbox(&self) -> Toolbox {
        Toolbox {
            title: "Video",
            icon: "▶️",
        }
    }

    fn create(&self, data: Option<Fields>) -> Result<Box<dyn BlockTool>, DataError> {
        let data = match data {
            Some(data) => VideoData::from_data(data)?,
            None => VideoData::default(),
        };
        Ok(Box::new(VideoTool::new(data, self.settings.clone())))
    }
}

#[derive(Debug)]
pub struct VideoTool {
    state: VideoState,
    /// Unknown payload keys, saved back as they came.
    extra: Fields,
    settings: VideoSettings,
}

impl VideoTool {
    fn new(data: VideoData, settings: VideoSettings) -> Self {
        Self {
            state: Self::state_for(data.url),
            extra: data.extra,
            settings,
        }
    }

    fn state_for(url: Option<String>) -> VideoState {
        match url {
            Some(url) => VideoState::Embedded { url },
            None => VideoState::Empty,
        }
    }

    pub fn state(&self) -> &VideoState {
        &self.state
    }

    fn surface(&self) -> Element {
        match &self.state {
            VideoState::Empty => Element::new("div").child(
                Element::new("input")
                    .attr("type", "url")
                    .attr("placeholder", &self.settings.placeholder)
                    .class("w-full rounded-md border px-3 py-2 text-sm"),
            ),
            VideoState::Loading { .. } => Element::new("div").child(
                Element::new("div")
                    .class("flex items-center gap-2 rounded-md border px-3 py-2 text-sm text-slate-600")
                    .child(Element::new("span").child(Node::text("Processing video…"))),
            ),
            VideoState::Embedded { url } => Element::new("div").child(
                Element::new("iframe")
                    .attr("src", embed::embed_url(url).unwrap_or_default())
                    .class("w-full aspect-video rounded-lg")
                    .attr("allow", PREVIEW_ALLOW)
                    .flag("allowfullscreen"),
            ),
        }
    }
}

impl BlockTool for VideoTool {
    fn name(&self) -> &'static str {
        VIDEO
    }

    fn render(&self, _read_only: bool) -> Node {
        self.surface().into()
    }

    /// A URL is only written once the embed has been confirmed.
    fn save(&self) -> Fields {
        let url = match &self.state {
            VideoState::Embedded { url } => Some(url.clone()),
            _ => None,
        };
        BlockContent::Video(VideoData {
            url,
            extra: self.extra.clone(),
        })
        .to_data()
    }

    fn update(&mut self, data: Fields) -> Result<(), DataError> {
        let data = VideoData::from_data(data)?;
        self.state = Self::state_for(data.url);
        self.extra = data.extra;
        Ok(())
    }

    fn on_paste(&mut self, text: &str) -> PasteOutcome {
        let url = text.trim();
        if url.is_empty() {
            return PasteOutcome::Ignored;
        }
        if matches!(self.state, VideoState::Loading { .. }) {
            return PasteOutcome::Rejected("a video is already being processed".to_string());
        }
        match embed::resolve(url) {
            Ok(_) => {
                self.state = VideoState::Loading {
                    url: url.to_string(),
                };
                PasteOutcome::Pending {
                    delay: Duration::from_millis(self.settings.confirm_delay_ms),
                }
            }
            Err(reason) => {
                log::debug!("video paste ignored: {reason}");
                PasteOutcome::Rejected(reason.to_string())
            }
        }
    }

    fn confirm(&mut self) {
        if let VideoState::Loading { url } = &self.state {
            self.state = VideoState::Embedded { url: url.clone() };
        }
    }
}
