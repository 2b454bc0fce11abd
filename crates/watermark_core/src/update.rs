use watermark_logging::wm_warn;

use crate::workflow::{WorkflowKind, WorkflowState};
use crate::{classify, AppState, Effect, Msg, ARCHIVE_DISPLAY_NAME};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FilesPicked {
            workflow,
            origin,
            mode,
            candidates,
        } => {
            let selection = classify(candidates, mode);
            let changed = match workflow {
                WorkflowKind::Embed => state.embed.select(selection, origin),
                WorkflowKind::Detect => state.detect.select(selection, origin),
            };
            if changed {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SubmitClicked(workflow) => {
            let can_submit = match workflow {
                WorkflowKind::Embed => state.embed.can_submit(),
                WorkflowKind::Detect => state.detect.can_submit(),
            };
            if !can_submit {
                return (state, Vec::new());
            }
            let request_id = state.allocate_request_id();
            let files = match workflow {
                WorkflowKind::Embed => state.embed.begin_submit(request_id),
                WorkflowKind::Detect => state.detect.begin_submit(request_id),
            };
            match files {
                Some(files) => {
                    state.mark_dirty();
                    vec![Effect::Submit {
                        request_id,
                        workflow,
                        files,
                    }]
                }
                None => Vec::new(),
            }
        }
        Msg::ResetClicked(workflow) => {
            let changed = match workflow {
                WorkflowKind::Embed => state.embed.reset(),
                WorkflowKind::Detect => state.detect.reset(),
            };
            if changed {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::EmbedSucceeded {
            request_id,
            results,
            archive_ref,
        } => {
            if state.embed.succeed(request_id, results, archive_ref) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::DetectSucceeded {
            request_id,
            results,
        } => {
            if state.detect.succeed(request_id, results, None) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SubmissionFailed {
            workflow,
            request_id,
            message,
        } => {
            let changed = match workflow {
                WorkflowKind::Embed => state.embed.fail(request_id, message),
                WorkflowKind::Detect => state.detect.fail(request_id, message),
            };
            if changed {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::DownloadClicked { index } => {
            // Retrieval is fire-and-forget: no workflow state changes here.
            if state.embed.state() != WorkflowState::Succeeded {
                return (state, Vec::new());
            }
            match state.embed.results().get(index) {
                Some(result) if result.download_ref.is_empty() => {
                    wm_warn!("{} has no download reference", result.filename);
                    Vec::new()
                }
                Some(result) => vec![Effect::Retrieve {
                    reference: result.download_ref.clone(),
                    display_name: result.filename.clone(),
                }],
                None => Vec::new(),
            }
        }
        Msg::DownloadAllClicked => match state.embed.archive_ref() {
            Some(reference) => vec![Effect::Retrieve {
                reference: reference.to_string(),
                display_name: ARCHIVE_DISPLAY_NAME.to_string(),
            }],
            None => Vec::new(),
        },
    };

    (state, effects)
}
