//! # Block Editor Session
//!
//! An [`Editor`] is the authoring side of a [`Document`](crate::document::Document):
//! a stateful session that composes a fixed set of block tools, lets the
//! author change blocks, and saves back a new document.
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialized --mount--> Initializing --tools loaded--> Ready
//!       |                        |                          |
//!       +--------destroy---------+----------destroy---------+--> Destroyed
//! ```
//!
//! Tool loading is asynchronous. A session destroyed while it initializes
//! never becomes ready, and nothing loaded for it is kept. Saving, clearing
//! and editing require a ready session.
//!
//! ## Editing
//!
//! Edits are [`Cmd`]s applied through [`Editor::apply`], each answering with a
//! [`Patch`] naming the blocks touched. Paste goes through the block's tool,
//! which may ask the session for follow-up work (a confirmation delay, a link
//! preview fetch).
//!
//! ```rust
//! use newsdesk_engine::document::Document;
//! use newsdesk_engine::editing::{Editor, EditorSettings, MountOutcome, tools};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let editor = Editor::new(EditorSettings::default(), Document::empty());
//! assert_eq!(editor.mount(Some("editor")).await, MountOutcome::Mounted);
//!
//! let id = editor.insert(tools::PARAGRAPH, None).unwrap();
//! editor.paste(&id, "Breaking news").await.unwrap();
//! assert_eq!(editor.save().unwrap().len(), 1);
//! # });
//! ```
//!
//! ## Modules
//!
//! - [`session`]: the [`Editor`] session and its state machine
//! - [`tools`]: block tools and the traits they implement
//! - [`registry`]: the static tool set and how it loads
//! - [`settings`]: editor and per-tool configuration
//! - [`tune`]: the highlight tune
//! - [`patch`]: edit commands and their results

pub mod patch;
pub mod registry;
pub mod session;
pub mod settings;
pub mod tools;
pub mod tune;

pub use patch::{Cmd, Patch};
pub use registry::{LoadedTools, ToolLoadError, ToolLoader, ToolRegistry};
pub use session::{BlockView, Editor, EditorError, EditorSnapshot, EditorState, MountOutcome};
pub use settings::{EditorSettings, ToolsSettings};
pub use tools::{BlockTool, LinkPreviewSource, PasteOutcome, ToolFactory, Toolbox};
