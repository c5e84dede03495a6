use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;

use super::patch::{Cmd, Patch};
use super::registry::{LoadedTools, ToolRegistry};
use super::settings::EditorSettings;
use super::tools::{BlockTool, LinkPreviewSource, PasteOutcome, Toolbox};
use super::tune;
use crate::document::{
    Block, DOCUMENT_VERSION, DataError, Document, Fields, HIGHLIGHT_CLASS, Tunes,
};
use crate::normalize::normalize_block;
use crate::render::{Element, Node};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    Uninitialized,
    /// Tools are loading.
    Initializing,
    Ready,
    Destroyed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountOutcome {
    Mounted,
    /// The session was already ready or initializing; nothing happened.
    AlreadyMounted,
    /// No attachment point was given; the session stays uninitialized.
    NoHolder,
    /// The session was destroyed before initialization could finish.
    Abandoned,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    #[error("Editor not initialized")]
    NotInitialized,
    #[error("editor is read-only")]
    ReadOnly,
    #[error("no tool `{0}` is available")]
    UnknownTool(String),
    #[error("no block with id `{0}`")]
    BlockNotFound(String),
    #[error("index {index} is out of range for {len} blocks")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("invalid block data: {0}")]
    InvalidData(#[from] DataError),
    #[error("block `{id}` cannot record the `{tune}` tune")]
    TuneUnavailable { id: String, tune: &'static str },
}

/// A block as the session sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockView {
    pub id: String,
    /// Tool that owns the block; `None` for blocks held unchanged because no
    /// loaded tool understands them.
    pub tool: Option<&'static str>,
    pub block_type: Option<String>,
    pub highlighted: bool,
}

/// Read-only view of the session's blocks in on-screen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSnapshot {
    pub version: u64,
    pub blocks: Vec<BlockView>,
}

#[derive(Debug)]
enum SlotContent {
    Tool(Box<dyn BlockTool>),
    /// A block no loaded tool can edit, saved back as it came.
    Preserved(Value),
}

#[derive(Debug)]
struct Slot {
    id: String,
    tunes: Tunes,
    content: SlotContent,
}

impl Slot {
    fn preserved(id: String, raw: Value) -> Self {
        let tunes = raw
            .get("tunes")
            .and_then(|tunes| Tunes::from_value(tunes.clone()).ok())
            .unwrap_or_default();
        Self {
            id,
            tunes,
            content: SlotContent::Preserved(raw),
        }
    }

    /// Hands a stored block to its tool, or keeps it verbatim.
    fn load(block: Block, tools: &LoadedTools) -> Self {
        let raw = serde_json::to_value(&block).unwrap_or_default();
        let id = block.id().map(str::to_string).unwrap_or_else(new_block_id);

        let adopted = match &block {
            Block::Typed(typed) => tools
                .get(typed.content.block_type().as_str())
                .map(|factory| (factory, Some(typed.content.to_data()), typed.tunes.clone())),
            Block::Fallback(fallback) => fallback
                .block_type()
                .and_then(|tag| tools.get(tag))
                .and_then(|factory| {
                    let (data, tunes) = fallback_parts(fallback.raw())?;
                    Some((factory, Some(data), tunes))
                }),
        };

        let Some((factory, data, tunes)) = adopted else {
            return Self::preserved(id, raw);
        };
        match factory.create(data) {
            Ok(tool) => Self {
                id,
                tunes,
                content: SlotContent::Tool(tool),
            },
            Err(e) => {
                log::warn!("tool `{}` cannot edit block {id}: {e}", factory.name());
                Self::preserved(id, raw)
            }
        }
    }

    fn release(self) {
        if let SlotContent::Tool(mut tool) = self.content {
            tool.destroy();
        }
    }

    fn save(&self) -> Option<Block> {
        let raw = match &self.content {
            SlotContent::Preserved(raw) => raw.clone(),
            SlotContent::Tool(tool) => {
                if !tool.validate() {
                    log::debug!("block {} is empty, not saved", self.id);
                    return None;
                }
                let mut fields = Fields::new();
                fields.insert("id".into(), Value::String(self.id.clone()));
                fields.insert("type".into(), Value::String(tool.name().to_string()));
                fields.insert("data".into(), Value::Object(tool.save()));
                if !self.tunes.is_empty() {
                    fields.insert(
                        "tunes".into(),
                        serde_json::to_value(&self.tunes).unwrap_or_default(),
                    );
                }
                Value::Object(fields)
            }
        };
        Some(normalize_block(&raw).unwrap_or_else(|_| Block::fallback(raw)))
    }

    fn view(&self) -> BlockView {
        let (tool, block_type) = match &self.content {
            SlotContent::Tool(tool) => (Some(tool.name()), Some(tool.name().to_string())),
            SlotContent::Preserved(raw) => (
                None,
                raw.get("type").and_then(Value::as_str).map(str::to_string),
            ),
        };
        BlockView {
            id: self.id.clone(),
            tool,
            block_type,
            highlighted: self.tunes.is_highlighted(),
        }
    }

    fn surface(&self, read_only: bool) -> Node {
        let mut block = Element::new("div")
            .class("ce-block")
            .attr("data-id", &self.id);
        let content = match &self.content {
            SlotContent::Tool(tool) => tool.render(read_only),
            SlotContent::Preserved(raw) => {
                let tag = raw.get("type").and_then(Value::as_str).unwrap_or("unknown");
                block.add_class("ce-block--preserved");
                Node::text(format!("Unsupported block: {tag}"))
            }
        };
        if self.tunes.is_highlighted() {
            block.add_class(HIGHLIGHT_CLASS);
        }
        block = block.child(Element::new("div").class("ce-block__content").child(content));
        if !read_only {
            block = block.child(
                Element::new("div")
                    .class("ce-block__settings")
                    .child(tune::button(&self.tunes)),
            );
        }
        block.into()
    }
}

/// Data and tunes of a fallback block a tool can adopt. `None` when the raw
/// block carries anything that would not survive a save.
fn fallback_parts(raw: &Value) -> Option<(Fields, Tunes)> {
    let fields = raw.as_object()?;
    if fields
        .keys()
        .any(|k| !matches!(k.as_str(), "id" | "type" | "data" | "tunes"))
    {
        return None;
    }
    if fields.get("id").is_some_and(|id| !id.is_string()) {
        return None;
    }
    let data = match fields.get("data") {
        None | Some(Value::Null) => Fields::new(),
        Some(Value::Object(data)) => data.clone(),
        Some(_) => return None,
    };
    let tunes = match fields.get("tunes") {
        None => Tunes::default(),
        Some(tunes) => Tunes::from_value(tunes.clone()).ok()?,
    };
    Some((data, tunes))
}

fn new_block_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(10);
    id
}

struct Session {
    state: EditorState,
    settings: EditorSettings,
    /// Content to load on mount; taken when the session becomes ready.
    initial: Option<Document>,
    holder: Option<String>,
    tools: LoadedTools,
    slots: Vec<Slot>,
    version: u64,
}

impl Session {
    fn ensure_ready(&self) -> Result<(), EditorError> {
        match self.state {
            EditorState::Ready => Ok(()),
            _ => Err(EditorError::NotInitialized),
        }
    }

    fn ensure_writable(&self) -> Result<(), EditorError> {
        if self.settings.read_only {
            return Err(EditorError::ReadOnly);
        }
        Ok(())
    }

    fn position(&self, id: &str) -> Result<usize, EditorError> {
        self.slots
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| EditorError::BlockNotFound(id.to_string()))
    }

    fn slot_mut(&mut self, id: &str) -> Result<&mut Slot, EditorError> {
        let index = self.position(id)?;
        Ok(&mut self.slots[index])
    }

    fn release_slots(&mut self) {
        for slot in self.slots.drain(..) {
            slot.release();
        }
    }

    fn apply(&mut self, cmd: Cmd) -> Result<Vec<String>, EditorError> {
        match cmd {
            Cmd::Insert { tool, index, data } => {
                let factory = self
                    .tools
                    .get(tool.as_str())
                    .cloned()
                    .ok_or(EditorError::UnknownTool(tool))?;
                let len = self.slots.len();
                let at = index.unwrap_or(len);
                if at > len {
                    return Err(EditorError::IndexOutOfRange { index: at, len });
                }
                let slot = Slot {
                    id: new_block_id(),
                    tunes: Tunes::default(),
                    content: SlotContent::Tool(factory.create(data)?),
                };
                let id = slot.id.clone();
                self.slots.insert(at, slot);
                Ok(vec![id])
            }
            Cmd::Remove { id } => {
                let index = self.position(&id)?;
                self.slots.remove(index).release();
                Ok(vec![id])
            }
            Cmd::Move { id, to } => {
                let index = self.position(&id)?;
                let len = self.slots.len();
                if to >= len {
                    return Err(EditorError::IndexOutOfRange { index: to, len });
                }
                let slot = self.slots.remove(index);
                self.slots.insert(to, slot);
                Ok(vec![id])
            }
            Cmd::Update { id, data } => {
                let slot = self.slot_mut(&id)?;
                match &mut slot.content {
                    SlotContent::Tool(tool) => tool.update(data)?,
                    SlotContent::Preserved(raw) => {
                        let tag = raw.get("type").and_then(Value::as_str).unwrap_or("?");
                        return Err(EditorError::UnknownTool(tag.to_string()));
                    }
                }
                Ok(vec![id])
            }
            Cmd::ToggleHighlight { id } => {
                let slot = self.slot_mut(&id)?;
                if let SlotContent::Preserved(raw) = &mut slot.content
                    && !tune::write_raw(raw, !slot.tunes.is_highlighted())
                {
                    return Err(EditorError::TuneUnavailable {
                        id,
                        tune: Tunes::HIGHLIGHT,
                    });
                }
                tune::toggle(&mut slot.tunes);
                Ok(vec![id])
            }
        }
    }
}

/// An authoring session over one document.
///
/// The session is created uninitialized and becomes usable after [`mount`]
/// has loaded its tools. Handles are cheap to clone and share one session.
///
/// [`mount`]: Editor::mount
#[derive(Clone)]
pub struct Editor {
    session: Arc<Mutex<Session>>,
    registry: Arc<ToolRegistry>,
    previews: Option<Arc<dyn LinkPreviewSource>>,
}

impl Editor {
    /// A session over `initial` with the built-in tools.
    pub fn new(settings: EditorSettings, initial: Document) -> Self {
        Self::with_registry(settings, initial, ToolRegistry::builtin())
    }

    pub fn with_registry(settings: EditorSettings, initial: Document, registry: ToolRegistry) -> Self {
        Self {
            session: Arc::new(Mutex::new(Session {
                state: EditorState::Uninitialized,
                settings,
                initial: Some(initial),
                holder: None,
                tools: LoadedTools::new(),
                slots: Vec::new(),
                version: 0,
            })),
            registry: Arc::new(registry),
            previews: None,
        }
    }

    /// Source used to fetch link metadata. Without one, pasted links are kept
    /// without a preview.
    pub fn with_preview_source(mut self, source: Arc<dyn LinkPreviewSource>) -> Self {
        self.previews = Some(source);
        self
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn state(&self) -> EditorState {
        self.lock().state
    }

    pub fn is_ready(&self) -> bool {
        self.state() == EditorState::Ready
    }

    pub fn holder(&self) -> Option<String> {
        self.lock().holder.clone()
    }

    pub fn is_read_only(&self) -> bool {
        self.lock().settings.read_only
    }

    pub fn set_read_only(&self, read_only: bool) {
        self.lock().settings.read_only = read_only;
    }

    /// Initializes the session against `holder`.
    ///
    /// Only the first mount does anything. Tools load while the session is
    /// unlocked; if [`destroy`](Editor::destroy) runs meanwhile, the loaded
    /// tools are dropped and the session stays destroyed.
    pub async fn mount(&self, holder: Option<&str>) -> MountOutcome {
        let settings = {
            let mut session = self.lock();
            match session.state {
                EditorState::Ready | EditorState::Initializing => {
                    return MountOutcome::AlreadyMounted;
                }
                EditorState::Destroyed => return MountOutcome::Abandoned,
                EditorState::Uninitialized => {}
            }
            let Some(holder) = holder.filter(|h| !h.trim().is_empty()) else {
                log::debug!("editor has no holder, not mounting");
                return MountOutcome::NoHolder;
            };
            session.holder = Some(holder.to_string());
            session.state = EditorState::Initializing;
            session.settings.tools.clone()
        };

        let tools = self.registry.load_all(&settings).await;

        let mut session = self.lock();
        if session.state != EditorState::Initializing {
            log::debug!(
                "editor destroyed while loading, dropping {} tools",
                tools.len()
            );
            return MountOutcome::Abandoned;
        }
        let initial = session.initial.take().unwrap_or_default();
        session.slots = initial
            .into_blocks()
            .into_iter()
            .map(|block| Slot::load(block, &tools))
            .collect();
        session.tools = tools;
        session.state = EditorState::Ready;
        session.version += 1;
        log::debug!(
            "editor ready: {} tools, {} blocks",
            session.tools.len(),
            session.slots.len()
        );
        MountOutcome::Mounted
    }

    /// Tears the session down. Safe to call in any state, any number of times.
    pub fn destroy(&self) {
        let mut session = self.lock();
        if session.state == EditorState::Destroyed {
            return;
        }
        session.release_slots();
        session.tools.clear();
        session.initial = None;
        session.holder = None;
        session.state = EditorState::Destroyed;
        log::debug!("editor destroyed");
    }

    /// Composes the current blocks into a new document, in on-screen order.
    pub fn save(&self) -> Result<Document, EditorError> {
        let session = self.lock();
        session.ensure_ready()?;
        let blocks = session.slots.iter().filter_map(Slot::save).collect();
        Ok(Document::new(blocks)
            .with_time(chrono::Utc::now().timestamp_millis())
            .with_version(DOCUMENT_VERSION))
    }

    /// Removes every block.
    pub fn clear(&self) -> Result<(), EditorError> {
        let mut session = self.lock();
        session.ensure_ready()?;
        session.release_slots();
        session.version += 1;
        Ok(())
    }

    pub fn apply(&self, cmd: Cmd) -> Result<Patch, EditorError> {
        let mut session = self.lock();
        session.ensure_ready()?;
        session.ensure_writable()?;
        let changed = session.apply(cmd)?;
        session.version += 1;
        Ok(Patch {
            changed,
            version: session.version,
        })
    }

    /// Inserts a fresh block built by `tool` and returns its id.
    pub fn insert(&self, tool: &str, index: Option<usize>) -> Result<String, EditorError> {
        self.insert_with_data(tool, index, None)
    }

    pub fn insert_with_data(
        &self,
        tool: &str,
        index: Option<usize>,
        data: Option<Fields>,
    ) -> Result<String, EditorError> {
        let patch = self.apply(Cmd::Insert {
            tool: tool.to_string(),
            index,
            data,
        })?;
        patch
            .changed
            .into_iter()
            .next()
            .ok_or_else(|| EditorError::UnknownTool(tool.to_string()))
    }

    pub fn remove(&self, id: &str) -> Result<Patch, EditorError> {
        self.apply(Cmd::Remove { id: id.to_string() })
    }

    pub fn move_block(&self, id: &str, to: usize) -> Result<Patch, EditorError> {
        self.apply(Cmd::Move {
            id: id.to_string(),
            to,
        })
    }

    pub fn update_block(&self, id: &str, data: Fields) -> Result<Patch, EditorError> {
        self.apply(Cmd::Update {
            id: id.to_string(),
            data,
        })
    }

    /// Flips the block's highlight and returns the new state.
    pub fn toggle_highlight(&self, id: &str) -> Result<bool, EditorError> {
        self.apply(Cmd::ToggleHighlight { id: id.to_string() })?;
        let mut session = self.lock();
        Ok(session.slot_mut(id)?.tunes.is_highlighted())
    }

    /// Pastes text into a block.
    ///
    /// Follow-up work the tool asks for runs here, outside the session lock: a
    /// pending paste is confirmed after its delay, and a link preview is
    /// fetched and attached. If the block is gone by then, the follow-up is
    /// dropped.
    pub async fn paste(&self, id: &str, text: &str) -> Result<PasteOutcome, EditorError> {
        let outcome = {
            let mut session = self.lock();
            session.ensure_ready()?;
            session.ensure_writable()?;
            let outcome = match &mut session.slot_mut(id)?.content {
                SlotContent::Tool(tool) => tool.on_paste(text),
                SlotContent::Preserved(_) => PasteOutcome::Ignored,
            };
            session.version += 1;
            outcome
        };

        match &outcome {
            PasteOutcome::Pending { delay } => {
                tokio::time::sleep(*delay).await;
                self.with_tool(id, |tool| tool.confirm());
            }
            PasteOutcome::Preview { endpoint, link } => {
                self.fetch_preview(id, endpoint, link).await;
            }
            _ => {}
        }
        Ok(outcome)
    }

    async fn fetch_preview(&self, id: &str, endpoint: &str, link: &str) {
        let Some(source) = &self.previews else {
            log::debug!("no link preview source, keeping {link} without metadata");
            return;
        };
        match source.fetch(endpoint, link).await {
            Ok(meta) => self.with_tool(id, |tool| tool.attach_preview(meta)),
            Err(e) => log::warn!("link preview for {link} failed: {e}"),
        }
    }

    fn with_tool(&self, id: &str, f: impl FnOnce(&mut dyn BlockTool)) {
        let mut session = self.lock();
        if session.ensure_ready().is_err() {
            log::debug!("editor no longer ready, dropping follow-up for block {id}");
            return;
        }
        let Ok(Slot {
            content: SlotContent::Tool(tool),
            ..
        }) = session.slot_mut(id)
        else {
            log::debug!("block {id} is gone, dropping follow-up");
            return;
        };
        f(tool.as_mut());
        session.version += 1;
    }

    pub fn snapshot(&self) -> Result<EditorSnapshot, EditorError> {
        let session = self.lock();
        session.ensure_ready()?;
        Ok(EditorSnapshot {
            version: session.version,
            blocks: session.slots.iter().map(Slot::view).collect(),
        })
    }

    /// The editing surface of one block.
    pub fn render_block(&self, id: &str) -> Result<Node, EditorError> {
        let session = self.lock();
        session.ensure_ready()?;
        let index = session.position(id)?;
        Ok(session.slots[index].surface(session.settings.read_only))
    }

    /// Toolbox entries of the loaded tools.
    pub fn toolbox(&self) -> Vec<(&'static str, Toolbox)> {
        self.lock()
            .tools
            .iter()
            .map(|(name, factory)| (*name, factory.toolbox()))
            .collect()
    }

    /// Number of live tool instances held by the session.
    pub fn attached_tools(&self) -> usize {
        self.lock()
            .slots
            .iter()
            .filter(|s| matches!(s.content, SlotContent::Tool(_)))
            .count()
    }
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let session = self.lock();
        f.debug_struct("Editor")
            .field("state", &session.state)
            .field("blocks", &session.slots.len())
            .field("version", &session.version)
            .finish()
    }
}
