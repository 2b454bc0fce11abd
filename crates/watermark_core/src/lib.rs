//! Watermark core: pure batch workflow state machine and view-model helpers.
mod effect;
mod msg;
mod results;
mod selection;
mod state;
mod update;
mod view_model;
mod workflow;

pub use effect::Effect;
pub use msg::Msg;
pub use results::{DetectResult, EmbedResult};
pub use selection::{
    classify, is_audio, FileCandidate, PickMode, PickOrigin, SelectedFile, Selection,
    AUDIO_EXTENSIONS, DROP_WARNING, PICK_WARNING,
};
pub use state::{AppState, RequestId};
pub use update::update;
pub use view_model::{
    format_percentage, verdict_label, AppViewModel, BulkDownload, DetectRowView, EmbedRowView,
    PartialResult, WorkflowView, ARCHIVE_DISPLAY_NAME,
};
pub use workflow::{Workflow, WorkflowKind, WorkflowState};
