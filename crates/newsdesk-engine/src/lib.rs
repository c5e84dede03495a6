pub mod document;
pub mod editing;
pub mod embed;
pub mod io;
pub mod normalize;
pub mod render;
pub mod store;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use document::{Block, BlockContent, BlockType, DataError, Document, DocumentSummary, Tunes};
pub use editing::{Cmd, Editor, EditorError, EditorSettings, EditorState, MountOutcome, Patch};
pub use embed::{EmbedLocator, ParseFailure, resolve};
pub use io::*;
pub use normalize::{Degradation, Normalized, normalize, normalize_str, normalize_with_report};
pub use render::{Markup, Node, Renderer, render, render_html};
pub use store::{Article, ArticleFilter, ArticleInput, ArticleStatus, ArticleStore, StoreError};
