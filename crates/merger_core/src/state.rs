use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::msg::SelectedFile;
use crate::view_model::{AppViewModel, EntryRowView, Notice};

/// Stable opaque identifier for a tracked document. Assigned once at
/// creation and never reused within a session; all mutations address
/// entries by id, never by render-time position.
pub type EntryId = u64;

/// One document tracked in the ordered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// An uploaded document whose bytes can be read from `payload`.
    Real {
        name: String,
        size_bytes: u64,
        payload: PathBuf,
    },
    /// A name restored from a previous session. Display-only; never
    /// eligible for merging until replaced by a real upload.
    Placeholder { name: String },
}

impl Entry {
    pub fn name(&self) -> &str {
        match self {
            Entry::Real { name, .. } | Entry::Placeholder { name } => name,
        }
    }

    pub fn is_real(&self) -> bool {
        matches!(self, Entry::Real { .. })
    }
}

/// Session-level list state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListState {
    #[default]
    Empty,
    /// Names restored from history without byte content.
    HistoryOnly,
    /// At least one real upload present.
    Populated,
}

/// Persisted display preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    entries: BTreeMap<EntryId, Entry>,
    order: Vec<EntryId>,
    next_id: EntryId,
    list: ListState,
    merge_in_flight: bool,
    theme: Theme,
    notice: Option<Notice>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let entries = self
            .order
            .iter()
            .filter_map(|id| self.entries.get(id).map(|entry| (*id, entry)))
            .map(|(id, entry)| match entry {
                Entry::Real {
                    name, size_bytes, ..
                } => EntryRowView {
                    id,
                    name: name.clone(),
                    size_bytes: Some(*size_bytes),
                    mergeable: true,
                },
                Entry::Placeholder { name } => EntryRowView {
                    id,
                    name: name.clone(),
                    size_bytes: None,
                    mergeable: false,
                },
            })
            .collect();

        AppViewModel {
            list: self.list,
            entries,
            merge_available: self.merge_eligible(),
            clear_history_available: self.list == ListState::HistoryOnly,
            merge_in_flight: self.merge_in_flight,
            theme: self.theme,
            notice: self.notice.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether a re-render is due, clearing the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn list_state(&self) -> ListState {
        self.list
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn merge_in_flight(&self) -> bool {
        self.merge_in_flight
    }

    /// Eligibility gate for the merge trigger: real uploads only, at
    /// least two of them, and nothing already running.
    pub fn merge_eligible(&self) -> bool {
        self.list == ListState::Populated
            && self.order.len() >= crate::update::MERGE_MIN_DOCUMENTS
            && !self.merge_in_flight
    }

    /// Ordered names, as persisted in the history snapshot.
    pub fn names(&self) -> Vec<String> {
        self.order
            .iter()
            .filter_map(|id| self.entries.get(id))
            .map(|entry| entry.name().to_owned())
            .collect()
    }

    /// Ordered payload paths of real entries, in merge order.
    pub fn ordered_payloads(&self) -> Vec<PathBuf> {
        self.order
            .iter()
            .filter_map(|id| self.entries.get(id))
            .filter_map(|entry| match entry {
                Entry::Real { payload, .. } => Some(payload.clone()),
                Entry::Placeholder { .. } => None,
            })
            .collect()
    }

    pub(crate) fn entry(&self, id: EntryId) -> Option<&Entry> {
        self.entries.get(&id)
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    pub(crate) fn append_real(&mut self, file: SelectedFile) -> EntryId {
        let id = self.allocate_id();
        self.entries.insert(
            id,
            Entry::Real {
                name: file.name,
                size_bytes: file.size_bytes,
                payload: file.payload,
            },
        );
        self.order.push(id);
        self.list = ListState::Populated;
        id
    }

    pub(crate) fn remove(&mut self, id: EntryId) {
        self.order.retain(|existing| *existing != id);
        self.entries.remove(&id);
        if self.order.is_empty() {
            self.list = ListState::Empty;
        }
    }

    /// Substitutes the entry in place: name, size and payload are all
    /// replaced, the position is preserved.
    pub(crate) fn replace(&mut self, id: EntryId, file: SelectedFile) {
        self.entries.insert(
            id,
            Entry::Real {
                name: file.name,
                size_bytes: file.size_bytes,
                payload: file.payload,
            },
        );
    }

    /// Atomic remove-and-reinsert. `to_index` is interpreted in the
    /// post-removal index space: the moved entry always lands at exactly
    /// `to_index`.
    pub(crate) fn move_to(&mut self, id: EntryId, to_index: usize) {
        let Some(from) = self.order.iter().position(|existing| *existing == id) else {
            return;
        };
        let moved = self.order.remove(from);
        let clamped = to_index.min(self.order.len());
        self.order.insert(clamped, moved);
    }

    pub(crate) fn restore_placeholders(&mut self, names: Vec<String>) {
        for name in names {
            let id = self.allocate_id();
            self.entries.insert(id, Entry::Placeholder { name });
            self.order.push(id);
        }
        self.list = ListState::HistoryOnly;
    }

    /// Drops restored placeholders when the first real upload arrives.
    pub(crate) fn drop_placeholders(&mut self) {
        self.order
            .retain(|id| self.entries.get(id).is_some_and(Entry::is_real));
        self.entries.retain(|_, entry| entry.is_real());
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.list = ListState::Empty;
    }

    pub(crate) fn set_merge_in_flight(&mut self, in_flight: bool) {
        self.merge_in_flight = in_flight;
    }

    pub(crate) fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub(crate) fn set_notice(&mut self, notice: Option<Notice>) {
        self.notice = notice;
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn allocate_id(&mut self) -> EntryId {
        self.next_id += 1;
        self.next_id
    }
}
