use std::path::PathBuf;
use std::sync::Once;

use merger_core::{
    update, AppState, Effect, ListState, MergeReport, Msg, Notice, SelectedFile,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(merge_logging::initialize_for_tests);
}

fn pdf(name: &str, size_bytes: u64) -> SelectedFile {
    SelectedFile {
        name: name.to_string(),
        size_bytes,
        content_type: "application/pdf".to_string(),
        payload: PathBuf::from("uploads").join(name),
    }
}

fn populated(names: &[&str]) -> AppState {
    let files = names.iter().map(|n| pdf(n, 1024)).collect();
    let (state, _) = update(AppState::new(), Msg::FilesSelected(files));
    state
}

#[test]
fn merge_request_emits_ordered_inputs_and_sets_in_flight() {
    init_logging();
    let state = populated(&["x.pdf", "y.pdf"]);

    let (state, effects) = update(state, Msg::MergeRequested);

    assert!(state.merge_in_flight());
    assert!(!state.view().merge_available);
    assert_eq!(
        effects,
        vec![Effect::StartMerge {
            inputs: vec![
                PathBuf::from("uploads/x.pdf"),
                PathBuf::from("uploads/y.pdf"),
            ],
        }]
    );
}

#[test]
fn merge_request_below_minimum_rejects() {
    init_logging();
    let state = populated(&["only.pdf"]);

    let (state, effects) = update(state, Msg::MergeRequested);

    assert!(effects.is_empty());
    assert!(!state.merge_in_flight());
    assert!(matches!(
        state.view().notice,
        Some(Notice::ValidationRejected(_))
    ));
}

#[test]
fn mutations_are_dropped_while_merge_is_in_flight() {
    init_logging();
    let state = populated(&["x.pdf", "y.pdf"]);
    let (state, _) = update(state, Msg::MergeRequested);
    let first = state.view().entries[0].id;

    let (state, effects) = update(state.clone(), Msg::FilesSelected(vec![pdf("z.pdf", 1)]));
    assert_eq!(state.view().entries.len(), 2);
    assert!(effects.is_empty());

    let (state, effects) = update(state, Msg::FileRemoveRequested { id: first });
    assert_eq!(state.view().entries.len(), 2);
    assert!(effects.is_empty());

    let (state, effects) = update(
        state,
        Msg::ReorderRequested {
            id: first,
            to_index: 1,
        },
    );
    assert_eq!(state.view().entries[0].id, first);
    assert!(effects.is_empty());

    let (_, effects) = update(state, Msg::ClearHistoryRequested);
    assert!(effects.is_empty());
}

#[test]
fn second_merge_request_while_in_flight_is_ignored() {
    init_logging();
    let state = populated(&["x.pdf", "y.pdf"]);
    let (state, _) = update(state, Msg::MergeRequested);

    let (state, effects) = update(state, Msg::MergeRequested);

    assert!(effects.is_empty());
    assert!(state.merge_in_flight());
}

#[test]
fn merge_success_surfaces_handle_and_reenables_trigger() {
    init_logging();
    let state = populated(&["x.pdf", "y.pdf"]);
    let (state, _) = update(state, Msg::MergeRequested);

    let report = MergeReport {
        output: PathBuf::from("output/merged.pdf"),
        pages: 3,
        size_bytes: 4096,
    };
    let (state, effects) = update(
        state,
        Msg::MergeFinished {
            result: Ok(report.clone()),
        },
    );

    assert!(effects.is_empty());
    assert!(!state.merge_in_flight());
    assert!(state.view().merge_available);
    assert_eq!(state.view().notice, Some(Notice::MergeSucceeded(report)));
}

#[test]
fn merge_failure_leaves_sequence_intact() {
    init_logging();
    let state = populated(&["x.pdf", "y.pdf"]);
    let (state, _) = update(state, Msg::MergeRequested);
    let names_before: Vec<_> = state
        .view()
        .entries
        .iter()
        .map(|row| row.name.clone())
        .collect();

    let (state, effects) = update(
        state,
        Msg::MergeFinished {
            result: Err("document is damaged".to_string()),
        },
    );

    assert!(effects.is_empty());
    assert!(!state.merge_in_flight());
    assert!(state.view().merge_available);
    assert_eq!(
        state.view().notice,
        Some(Notice::MergeFailed("document is damaged".to_string()))
    );
    let names_after: Vec<_> = state
        .view()
        .entries
        .iter()
        .map(|row| row.name.clone())
        .collect();
    assert_eq!(names_before, names_after);
}

#[test]
fn stray_merge_completion_is_ignored() {
    init_logging();
    let mut state = populated(&["x.pdf", "y.pdf"]);
    assert!(state.consume_dirty());

    let (mut state, effects) = update(
        state,
        Msg::MergeFinished {
            result: Err("late completion".to_string()),
        },
    );

    assert!(effects.is_empty());
    assert!(state.view().notice.is_none());
    assert!(!state.consume_dirty());
}

#[test]
fn reorder_then_merge_uses_the_new_order() {
    init_logging();
    // End to end over the pure core: add [x, y], move x behind y, merge.
    let state = populated(&["x.pdf", "y.pdf"]);
    assert_eq!(state.list_state(), ListState::Populated);
    let x = state.view().entries[0].id;

    let (state, _) = update(state, Msg::ReorderRequested { id: x, to_index: 1 });
    let (state, effects) = update(state, Msg::MergeRequested);

    assert_eq!(
        effects,
        vec![Effect::StartMerge {
            inputs: vec![
                PathBuf::from("uploads/y.pdf"),
                PathBuf::from("uploads/x.pdf"),
            ],
        }]
    );
    let (state, _) = update(
        state,
        Msg::MergeFinished {
            result: Ok(MergeReport {
                output: PathBuf::from("output/merged.pdf"),
                pages: 2,
                size_bytes: 2048,
            }),
        },
    );
    assert!(matches!(
        state.view().notice,
        Some(Notice::MergeSucceeded(_))
    ));
}
