use crate::{RequestId, SelectedFile, WorkflowKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send `files` as one multipart request to the workflow's endpoint.
    Submit {
        request_id: RequestId,
        workflow: WorkflowKind,
        files: Vec<SelectedFile>,
    },
    /// Fetch one stored artifact and save it under a name derived from `display_name`.
    Retrieve {
        reference: String,
        display_name: String,
    },
}
