use std::path::PathBuf;

use crate::state::Theme;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Rewrite the persisted name snapshot.
    PersistHistory(Vec<String>),
    /// Remove the persisted name snapshot.
    ClearPersistedHistory,
    /// Hand the ordered payloads to the merge service.
    StartMerge { inputs: Vec<PathBuf> },
    /// Ask the user to confirm the destructive history clear.
    ConfirmClearHistory,
    /// Rewrite the persisted theme preference.
    PersistTheme(Theme),
}
