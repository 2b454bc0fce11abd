use crate::{DetectResult, EmbedResult, FileCandidate, PickMode, PickOrigin, RequestId, WorkflowKind};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User picked or dropped files for a workflow.
    FilesPicked {
        workflow: WorkflowKind,
        origin: PickOrigin,
        mode: PickMode,
        candidates: Vec<FileCandidate>,
    },
    /// User asked to process the current selection.
    SubmitClicked(WorkflowKind),
    /// User asked to clear a workflow back to idle.
    ResetClicked(WorkflowKind),
    /// Embed endpoint answered with a success envelope.
    EmbedSucceeded {
        request_id: RequestId,
        results: Vec<EmbedResult>,
        archive_ref: Option<String>,
    },
    /// Detect endpoint answered with a success envelope.
    DetectSucceeded {
        request_id: RequestId,
        results: Vec<DetectResult>,
    },
    /// Submission failed; `message` is already decoded for display.
    SubmissionFailed {
        workflow: WorkflowKind,
        request_id: RequestId,
        message: String,
    },
    /// User asked to download one embed result by its position.
    DownloadClicked { index: usize },
    /// User asked for the batch archive.
    DownloadAllClicked,
}
