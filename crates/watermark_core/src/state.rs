use crate::view_model::AppViewModel;
use crate::workflow::{Workflow, WorkflowKind};
use crate::{DetectResult, EmbedResult};

/// Tags one outbound submission so late responses can be told apart.
pub type RequestId = u64;

/// Both workflows of a session. They share no mutable fields.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub(crate) embed: Workflow<EmbedResult>,
    pub(crate) detect: Workflow<DetectResult>,
    next_request_id: RequestId,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            embed: Workflow::new(WorkflowKind::Embed),
            detect: Workflow::new(WorkflowKind::Detect),
            next_request_id: 1,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn embed(&self) -> &Workflow<EmbedResult> {
        &self.embed
    }

    pub fn detect(&self) -> &Workflow<DetectResult> {
        &self.detect
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel::build(self)
    }

    /// Returns whether anything changed since the last call, then clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn allocate_request_id(&mut self) -> RequestId {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }
}
