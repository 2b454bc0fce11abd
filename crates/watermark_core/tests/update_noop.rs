use watermark_core::{update, AppState, Msg, WorkflowKind};

#[test]
fn submit_without_selection_is_noop() {
    let state = AppState::new();
    let (mut next, effects) = update(state.clone(), Msg::SubmitClicked(WorkflowKind::Embed));

    assert_eq!(state, next);
    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
}

#[test]
fn download_all_without_archive_is_noop() {
    let state = AppState::new();
    let (mut next, effects) = update(state.clone(), Msg::DownloadAllClicked);

    assert_eq!(state, next);
    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
}

#[test]
fn reset_of_idle_workflow_does_not_mark_dirty() {
    let (mut next, effects) = update(AppState::new(), Msg::ResetClicked(WorkflowKind::Detect));

    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
}
