use crate::msg::MergeReport;
use crate::state::{EntryId, ListState, Theme};

/// One rendered row of the ordered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRowView {
    pub id: EntryId,
    pub name: String,
    /// `None` for history placeholders, whose bytes are not retained.
    pub size_bytes: Option<u64>,
    pub mergeable: bool,
}

/// Transient user-facing outcome of the last operation. Replaced by the
/// next operation that produces one, cleared by successful mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    ValidationRejected(String),
    MergeSucceeded(MergeReport),
    MergeFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub list: ListState,
    pub entries: Vec<EntryRowView>,
    pub merge_available: bool,
    pub clear_history_available: bool,
    pub merge_in_flight: bool,
    pub theme: Theme,
    pub notice: Option<Notice>,
    pub dirty: bool,
}
