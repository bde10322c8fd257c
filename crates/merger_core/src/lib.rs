//! Merger core: pure state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::{MergeReport, Msg, SelectedFile};
pub use state::{AppState, Entry, EntryId, ListState, Theme};
pub use update::{update, MERGE_MIN_DOCUMENTS, PDF_CONTENT_TYPE};
pub use view_model::{AppViewModel, EntryRowView, Notice};
