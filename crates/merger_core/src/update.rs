use crate::{AppState, Effect, ListState, Msg, Notice, SelectedFile};

/// Minimum number of real uploads before the merge trigger is offered.
pub const MERGE_MIN_DOCUMENTS: usize = 2;

/// Declared content type accepted for intake.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    // While a merge is in flight the list is frozen: the shell withdraws
    // the triggers and any mutation that slips through is dropped here.
    if state.merge_in_flight() && is_mutation(&msg) {
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::FilesSelected(files) => {
            let accepted: Vec<SelectedFile> =
                files.into_iter().filter(is_declared_pdf).collect();
            if accepted.is_empty() {
                state.set_notice(Some(Notice::ValidationRejected(
                    "selection contains no PDF documents".to_owned(),
                )));
                state.mark_dirty();
                return (state, Vec::new());
            }

            if state.list_state() == ListState::HistoryOnly {
                state.drop_placeholders();
            }
            for file in accepted {
                state.append_real(file);
            }
            state.set_notice(None);
            state.mark_dirty();
            vec![Effect::PersistHistory(state.names())]
        }
        Msg::FileReplaceRequested { id, file } => {
            // Unknown id or placeholder: structurally impossible from the
            // rendered list, so nothing to report.
            if !matches!(state.entry(id), Some(entry) if entry.is_real()) {
                return (state, Vec::new());
            }
            if !is_declared_pdf(&file) {
                state.set_notice(Some(Notice::ValidationRejected(format!(
                    "{} is not a PDF document",
                    file.name
                ))));
                state.mark_dirty();
                return (state, Vec::new());
            }

            state.replace(id, file);
            state.set_notice(None);
            state.mark_dirty();
            vec![Effect::PersistHistory(state.names())]
        }
        Msg::FileRemoveRequested { id } => {
            if !matches!(state.entry(id), Some(entry) if entry.is_real()) {
                return (state, Vec::new());
            }
            state.remove(id);
            state.set_notice(None);
            state.mark_dirty();
            vec![Effect::PersistHistory(state.names())]
        }
        Msg::ReorderRequested { id, to_index } => {
            if state.list_state() != ListState::Populated
                || state.entry(id).is_none()
                || to_index >= state.len()
            {
                return (state, Vec::new());
            }
            state.move_to(id, to_index);
            state.set_notice(None);
            state.mark_dirty();
            vec![Effect::PersistHistory(state.names())]
        }
        Msg::MergeRequested => {
            if state.merge_in_flight() {
                return (state, Vec::new());
            }
            if !state.merge_eligible() {
                state.set_notice(Some(Notice::ValidationRejected(
                    "at least two uploaded PDF documents are required; \
                     previously listed files must be re-uploaded"
                        .to_owned(),
                )));
                state.mark_dirty();
                return (state, Vec::new());
            }

            state.set_merge_in_flight(true);
            state.set_notice(None);
            state.mark_dirty();
            vec![Effect::StartMerge {
                inputs: state.ordered_payloads(),
            }]
        }
        Msg::MergeFinished { result } => {
            if !state.merge_in_flight() {
                return (state, Vec::new());
            }
            state.set_merge_in_flight(false);
            let notice = match result {
                Ok(report) => Notice::MergeSucceeded(report),
                Err(reason) => Notice::MergeFailed(reason),
            };
            state.set_notice(Some(notice));
            state.mark_dirty();
            Vec::new()
        }
        Msg::ClearHistoryRequested => {
            if state.len() == 0 {
                return (state, Vec::new());
            }
            // Destructive and irreversible from the user's perspective:
            // no mutation until the confirmation comes back.
            vec![Effect::ConfirmClearHistory]
        }
        Msg::ClearHistoryConfirmed => {
            state.clear();
            state.set_notice(None);
            state.mark_dirty();
            vec![Effect::ClearPersistedHistory]
        }
        Msg::HistoryRestored(names) => {
            if state.list_state() != ListState::Empty || names.is_empty() {
                return (state, Vec::new());
            }
            state.restore_placeholders(names);
            state.mark_dirty();
            Vec::new()
        }
        Msg::ThemeLoaded(theme) => {
            state.set_theme(theme);
            state.mark_dirty();
            Vec::new()
        }
        Msg::ThemeToggled => {
            let theme = state.theme().toggled();
            state.set_theme(theme);
            state.mark_dirty();
            vec![Effect::PersistTheme(theme)]
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn is_declared_pdf(file: &SelectedFile) -> bool {
    file.content_type == PDF_CONTENT_TYPE
}

fn is_mutation(msg: &Msg) -> bool {
    matches!(
        msg,
        Msg::FilesSelected(_)
            | Msg::FileReplaceRequested { .. }
            | Msg::FileRemoveRequested { .. }
            | Msg::ReorderRequested { .. }
            | Msg::ClearHistoryRequested
            | Msg::ClearHistoryConfirmed
    )
}
