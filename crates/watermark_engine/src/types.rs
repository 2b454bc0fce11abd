use std::fmt;
use std::path::PathBuf;

use crate::envelope::{DetectEnvelope, EmbedEnvelope};

pub type RequestId = u64;

/// Remote operation a batch is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Embed,
    Detect,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Embed => "/embed/folder",
            Endpoint::Detect => "/detect/folder",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Embed => write!(f, "embed"),
            Endpoint::Detect => write!(f, "detect"),
        }
    }
}

/// One multipart entry of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub path: PathBuf,
    /// Sent as the part's filename; may contain `/` in directory mode.
    pub entry_name: String,
    pub media_type: Option<String>,
}

/// Decoded 2xx body, shaped by the endpoint that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitResponse {
    Embed(EmbedEnvelope),
    Detect(DetectEnvelope),
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    SubmissionCompleted {
        request_id: RequestId,
        endpoint: Endpoint,
        result: Result<SubmitResponse, SubmitError>,
    },
    RetrievalCompleted {
        reference: String,
        result: Result<PathBuf, RetrieveError>,
    },
}

/// A submission that did not produce a success envelope.
///
/// `message` is ready for display: non-2xx bodies are already resolved
/// through the error envelope rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct SubmitError {
    pub kind: FailureKind,
    pub message: String,
}

impl SubmitError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// A retrieval that left nothing on disk.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct RetrieveError {
    pub kind: FailureKind,
    pub message: String,
}

impl RetrieveError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    LocalFile,
    InvalidResponse,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Persist,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::LocalFile => write!(f, "local file unreadable"),
            FailureKind::InvalidResponse => write!(f, "invalid response"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Persist => write!(f, "could not save artifact"),
        }
    }
}
