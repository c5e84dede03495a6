use crate::document::Fields;

/// An edit to the session's blocks.
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    /// Adds a block built by `tool`, at `index` or at the end.
    Insert {
        tool: String,
        index: Option<usize>,
        data: Option<Fields>,
    },
    Remove {
        id: String,
    },
    Move {
        id: String,
        to: usize,
    },
    Update {
        id: String,
        data: Fields,
    },
    ToggleHighlight {
        id: String,
    },
}

/// Result of applying a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Ids of the blocks the command touched.
    pub changed: Vec<String>,
    pub version: u64,
}
