use std::fmt;

use watermark_logging::{wm_debug, wm_warn};

use crate::selection::{PickOrigin, SelectedFile, Selection};
use crate::state::RequestId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowKind {
    Embed,
    Detect,
}

impl fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowKind::Embed => write!(f, "embed"),
            WorkflowKind::Detect => write!(f, "detect"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowState {
    #[default]
    Idle,
    Selected,
    Submitting,
    Succeeded,
    Failed,
}

/// One submission lifecycle. `R` is the per-file result shape of its endpoint.
///
/// Invariants:
/// - `files` is non-empty in `Submitting`.
/// - `results` is empty outside `Succeeded`.
/// - `error` is set only in `Failed`, or in `Selected` as a selection warning.
/// - `archive_ref` is set only in `Succeeded`.
#[derive(Debug, Clone, PartialEq)]
pub struct Workflow<R> {
    kind: WorkflowKind,
    state: WorkflowState,
    files: Vec<SelectedFile>,
    results: Vec<R>,
    error: Option<String>,
    archive_ref: Option<String>,
    in_flight: Option<RequestId>,
}

impl<R> Workflow<R> {
    pub fn new(kind: WorkflowKind) -> Self {
        Self {
            kind,
            state: WorkflowState::Idle,
            files: Vec::new(),
            results: Vec::new(),
            error: None,
            archive_ref: None,
            in_flight: None,
        }
    }

    pub fn kind(&self) -> WorkflowKind {
        self.kind
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }

    pub fn results(&self) -> &[R] {
        &self.results
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn archive_ref(&self) -> Option<&str> {
        self.archive_ref.as_deref()
    }

    pub fn in_flight(&self) -> Option<RequestId> {
        self.in_flight
    }

    pub fn can_submit(&self) -> bool {
        !self.files.is_empty()
            && matches!(
                self.state,
                WorkflowState::Selected | WorkflowState::Succeeded | WorkflowState::Failed
            )
    }

    /// Applies a classified pick. Returns whether the workflow changed.
    pub fn select(&mut self, selection: Selection, origin: PickOrigin) -> bool {
        if selection.is_empty_pick() {
            return false;
        }
        if self.state == WorkflowState::Submitting {
            wm_warn!("{} selection ignored while a submission is in flight", self.kind);
            return false;
        }

        self.results.clear();
        self.archive_ref = None;
        self.error = if selection.accepted.is_empty() {
            Some(origin.warning().to_string())
        } else {
            None
        };
        self.files = selection.accepted;
        self.state = WorkflowState::Selected;
        wm_debug!(
            "{} selected {} file(s), {} rejected",
            self.kind,
            self.files.len(),
            selection.rejected
        );
        true
    }

    /// Moves to `Submitting` under `request_id` and returns the files to send.
    ///
    /// Returns `None` (no transition) when there is nothing to submit or a
    /// request is already in flight.
    pub fn begin_submit(&mut self, request_id: RequestId) -> Option<Vec<SelectedFile>> {
        if !self.can_submit() {
            return None;
        }
        self.state = WorkflowState::Submitting;
        self.in_flight = Some(request_id);
        self.results.clear();
        self.archive_ref = None;
        self.error = None;
        Some(self.files.clone())
    }

    /// Applies a success envelope if it answers the in-flight request.
    pub fn succeed(
        &mut self,
        request_id: RequestId,
        results: Vec<R>,
        archive_ref: Option<String>,
    ) -> bool {
        if !self.answers(request_id) {
            return false;
        }
        if results.len() != self.files.len() {
            wm_warn!(
                "{} returned {} result(s) for {} submitted file(s)",
                self.kind,
                results.len(),
                self.files.len()
            );
        }
        self.state = WorkflowState::Succeeded;
        self.in_flight = None;
        self.results = results;
        self.archive_ref = match self.kind {
            WorkflowKind::Embed => archive_ref,
            WorkflowKind::Detect => None,
        };
        true
    }

    /// Applies a failure message if it answers the in-flight request.
    pub fn fail(&mut self, request_id: RequestId, message: String) -> bool {
        if !self.answers(request_id) {
            return false;
        }
        self.state = WorkflowState::Failed;
        self.in_flight = None;
        self.error = Some(message);
        true
    }

    /// Clears every field back to `Idle`. Rejected while submitting.
    pub fn reset(&mut self) -> bool {
        if self.state == WorkflowState::Submitting {
            wm_warn!("{} reset deferred: submission still in flight", self.kind);
            return false;
        }
        let changed = self.state != WorkflowState::Idle || self.error.is_some();
        self.state = WorkflowState::Idle;
        self.files.clear();
        self.results.clear();
        self.error = None;
        self.archive_ref = None;
        self.in_flight = None;
        changed
    }

    fn answers(&self, request_id: RequestId) -> bool {
        let current = self.state == WorkflowState::Submitting && self.in_flight == Some(request_id);
        if !current {
            wm_warn!(
                "{} ignoring stale response for request {} (in flight: {:?})",
                self.kind,
                request_id,
                self.in_flight
            );
        }
        current
    }
}
