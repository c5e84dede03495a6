use serde::{Deserialize, Serialize};

use crate::document::ListStyle;
use crate::editing::tools;

/// Session-wide editor options plus the static configuration of each tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub placeholder: String,
    pub read_only: bool,
    pub autofocus: bool,
    pub min_height: u32,
    pub tools: ToolsSettings,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            placeholder: "Write news content here…".to_string(),
            read_only: false,
            autofocus: true,
            min_height: 120,
            tools: ToolsSettings::default(),
        }
    }
}

/// One optional section per built-in tool.
///
/// When the whole `tools` table is missing every tool is enabled with its
/// defaults. When it is present, only the sections it names are enabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolsSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph: Option<ParagraphSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<HeaderSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list: Option<ListSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<QuoteSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_preview: Option<LinkPreviewSettings>,
}

impl ToolsSettings {
    /// No tool enabled.
    pub fn none() -> Self {
        Self {
            paragraph: None,
            header: None,
            list: None,
            quote: None,
            video: None,
            link_preview: None,
        }
    }

    /// Whether the tool registered under `name` should be loaded. Names that
    /// are not built-in tools are always enabled.
    pub fn is_enabled(&self, name: &str) -> bool {
        match name {
            tools::PARAGRAPH => self.paragraph.is_some(),
            tools::HEADER => self.header.is_some(),
            tools::LIST => self.list.is_some(),
            tools::QUOTE => self.quote.is_some(),
            tools::VIDEO => self.video.is_some(),
            tools::LINK => self.link_preview.is_some(),
            _ => true,
        }
    }
}

impl Default for ToolsSettings {
    fn default() -> Self {
        Self {
            paragraph: Some(ParagraphSettings::default()),
            header: Some(HeaderSettings::default()),
            list: Some(ListSettings::default()),
            quote: Some(QuoteSettings::default()),
            video: Some(VideoSettings::default()),
            link_preview: Some(LinkPreviewSettings::default()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParagraphSettings {
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderSettings {
    pub placeholder: String,
    pub levels: Vec<i64>,
    pub default_level: i64,
}

impl Default for HeaderSettings {
    fn default() -> Self {
        Self {
            placeholder: "Section heading".to_string(),
            levels: vec![2, 3, 4],
            default_level: 2,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListSettings {
    pub default_style: ListStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteSettings {
    pub text_placeholder: String,
    pub caption_placeholder: String,
}

impl Default for QuoteSettings {
    fn default() -> Self {
        Self {
            text_placeholder: "Enter a quote".to_string(),
            caption_placeholder: "Quote's author".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoSettings {
    pub placeholder: String,
    /// Pause between accepting a URL and showing the embed.
    pub confirm_delay_ms: u64,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            placeholder: "Paste YouTube / Facebook / Instagram URL".to_string(),
            confirm_delay_ms: 700,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkPreviewSettings {
    pub endpoint: String,
}

impl Default for LinkPreviewSettings {
    fn default() -> Self {
        Self {
            endpoint: "/api/link-preview".to_string(),
        }
    }
}
