//! Static tool registry.
//!
//! The set of tools is fixed and listed explicitly in [`ToolRegistry::builtin`].
//! Each entry is a [`ToolLoader`] that is awaited once per session while the
//! session initializes. A loader that fails only makes its tool unavailable.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use super::settings::ToolsSettings;
use super::tools::{
    self, HeaderFactory, LinkFactory, ListFactory, ParagraphFactory, QuoteFactory, ToolFactory,
    VideoFactory,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolLoadError {
    #[error("tool `{tool}` has invalid settings: {reason}")]
    InvalidSettings { tool: String, reason: String },
    #[error("tool `{tool}` failed to load: {reason}")]
    Failed { tool: String, reason: String },
}

/// Loaded tools by name.
pub type LoadedTools = BTreeMap<&'static str, Arc<dyn ToolFactory>>;

/// Produces a configured [`ToolFactory`], possibly asynchronously.
#[async_trait]
pub trait ToolLoader: Send + Sync {
    fn name(&self) -> &'static str;

    async fn load(&self, settings: &ToolsSettings) -> Result<Arc<dyn ToolFactory>, ToolLoadError>;
}

type BuildFn = fn(&ToolsSettings) -> Result<Arc<dyn ToolFactory>, ToolLoadError>;

/// Loader for a tool compiled into this crate.
pub struct BuiltinLoader {
    name: &'static str,
    build: BuildFn,
}

#[async_trait]
impl ToolLoader for BuiltinLoader {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn load(&self, settings: &ToolsSettings) -> Result<Arc<dyn ToolFactory>, ToolLoadError> {
        // Tools load off the caller's turn, as they would from a lazily
        // fetched bundle.
        tokio::task::yield_now().await;
        (self.build)(settings)
    }
}

#[derive(Clone, Default)]
pub struct ToolRegistry {
    loaders: Vec<Arc<dyn ToolLoader>>,
}

impl ToolRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in tools: paragraph, header, list, quote, video and link.
    pub fn builtin() -> Self {
        let builtins: [(&'static str, BuildFn); 6] = [
            (tools::PARAGRAPH, build_paragraph),
            (tools::HEADER, build_header),
            (tools::LIST, build_list),
            (tools::QUOTE, build_quote),
            (tools::VIDEO, build_video),
            (tools::LINK, build_link),
        ];

        builtins
            .into_iter()
            .fold(Self::empty(), |registry, (name, build)| {
                registry.with_loader(Arc::new(BuiltinLoader { name, build }))
            })
    }

    /// Adds a loader, replacing any loader registered under the same name.
    pub fn with_loader(mut self, loader: Arc<dyn ToolLoader>) -> Self {
        match self.loaders.iter_mut().find(|l| l.name() == loader.name()) {
            Some(existing) => *existing = loader,
            None => self.loaders.push(loader),
        }
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.loaders.iter().map(|l| l.name()).collect()
    }

    /// Loads every enabled tool. Failures are logged and skipped.
    pub async fn load_all(&self, settings: &ToolsSettings) -> LoadedTools {
        let mut loaded = LoadedTools::new();
        for loader in &self.loaders {
            let name = loader.name();
            if !settings.is_enabled(name) {
                log::debug!("tool `{name}` is not configured, skipping");
                continue;
            }
            match loader.load(settings).await {
                Ok(factory) => {
                    loaded.insert(name, factory);
                }
                Err(e) => log::warn!("{e}; continuing without it"),
            }
        }
        loaded
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

fn build_paragraph(settings: &ToolsSettings) -> Result<Arc<dyn ToolFactory>, ToolLoadError> {
    let paragraph = settings.paragraph.clone().unwrap_or_default();
    Ok(Arc::new(ParagraphFactory::new(paragraph)))
}

fn build_list(settings: &ToolsSettings) -> Result<Arc<dyn ToolFactory>, ToolLoadError> {
    let list = settings.list.clone().unwrap_or_default();
    Ok(Arc::new(ListFactory::new(list)))
}

fn build_quote(settings: &ToolsSettings) -> Result<Arc<dyn ToolFactory>, ToolLoadError> {
    let quote = settings.quote.clone().unwrap_or_default();
    Ok(Arc::new(QuoteFactory::new(quote)))
}

fn build_video(settings: &ToolsSettings) -> Result<Arc<dyn ToolFactory>, ToolLoadError> {
    let video = settings.video.clone().unwrap_or_default();
    Ok(Arc::new(VideoFactory::new(video)))
}

fn build_link(settings: &ToolsSettings) -> Result<Arc<dyn ToolFactory>, ToolLoadError> {
    let link = settings.link_preview.clone().unwrap_or_default();
    Ok(Arc::new(LinkFactory::new(link)))
}

fn build_header(settings: &ToolsSettings) -> Result<Arc<dyn ToolFactory>, ToolLoadError> {
    let header = settings.header.clone().unwrap_or_default();
    let invalid = |reason: &str| ToolLoadError::InvalidSettings {
        tool: tools::HEADER.to_string(),
        reason: reason.to_string(),
    };
    if header.levels.is_empty() {
        return Err(invalid("no heading levels configured"));
    }
    if !header.levels.contains(&header.default_level) {
        return Err(invalid("default level is not one of the configured levels"));
    }
    Ok(Arc::new(HeaderFactory::new(header)))
}
