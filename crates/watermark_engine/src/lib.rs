//! Watermark engine: batch submission, artifact retrieval and effect execution.
mod engine;
mod envelope;
mod filename;
mod persist;
mod retrieve;
mod settings;
mod submit;
mod types;

pub use engine::{EngineError, EngineHandle};
pub use envelope::{
    describe_failure, DetectEnvelope, DetectItem, EmbedEnvelope, EmbedItem, ErrorEnvelope,
    FieldError,
};
pub use filename::{derive_artifact_name, safe_relative_path, ARCHIVE_SUFFIX, WATERMARK_MARKER};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use retrieve::{ReqwestRetriever, Retriever};
pub use settings::{ClientSettings, BASE_ORIGIN_ENV, DEFAULT_BASE_ORIGIN};
pub use submit::{ReqwestSubmitter, Submitter, FILES_FIELD};
pub use types::{
    Endpoint, EngineEvent, FailureKind, RequestId, RetrieveError, SubmitError, SubmitResponse,
    UploadFile,
};
