use std::path::PathBuf;

use crate::state::{EntryId, Theme};

/// A file the user picked for inclusion, described by declaration rather
/// than by parsing its bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// Original filename.
    pub name: String,
    /// Informational size.
    pub size_bytes: u64,
    /// Declared content type, e.g. `application/pdf`.
    pub content_type: String,
    /// Opaque handle to the raw bytes; read lazily at merge time.
    pub payload: PathBuf,
}

/// Handle to a completed merge artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    pub output: PathBuf,
    pub pages: usize,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked one or more files to append.
    FilesSelected(Vec<SelectedFile>),
    /// User asked to substitute a single entry in place.
    FileReplaceRequested { id: EntryId, file: SelectedFile },
    /// User asked to remove a single entry.
    FileRemoveRequested { id: EntryId },
    /// User dropped an entry at a new position. `to_index` is in the
    /// post-removal index space.
    ReorderRequested { id: EntryId, to_index: usize },
    /// User triggered the merge.
    MergeRequested,
    /// The merge service resolved, successfully or not.
    MergeFinished { result: Result<MergeReport, String> },
    /// User asked to clear the persisted history (requires confirmation).
    ClearHistoryRequested,
    /// User confirmed the destructive clear.
    ClearHistoryConfirmed,
    /// Restore previously uploaded names from persisted state (startup only).
    HistoryRestored(Vec<String>),
    /// Apply the persisted theme preference (startup only).
    ThemeLoaded(Theme),
    /// User toggled the theme.
    ThemeToggled,
    /// Fallback for placeholder wiring.
    NoOp,
}
