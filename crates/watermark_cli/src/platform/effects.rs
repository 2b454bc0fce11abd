use std::path::PathBuf;

use watermark_core::{DetectResult, Effect, EmbedResult, Msg, SelectedFile, WorkflowKind};
use watermark_engine::{
    ClientSettings, Endpoint, EngineError, EngineEvent, EngineHandle, RetrieveError,
    SubmitResponse, UploadFile,
};
use watermark_logging::{wm_debug, wm_info};

/// Something the engine finished, translated for the session loop.
#[derive(Debug)]
pub enum Incoming {
    Msg(Msg),
    Retrieved {
        reference: String,
        result: Result<PathBuf, RetrieveError>,
    },
}

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: ClientSettings, output_dir: PathBuf) -> Result<Self, EngineError> {
        Ok(Self {
            engine: EngineHandle::new(settings, output_dir)?,
        })
    }

    /// Hands effects to the engine. Returns how many retrievals were started.
    pub fn run(&self, effects: Vec<Effect>) -> usize {
        let mut retrievals = 0;
        for effect in effects {
            match effect {
                Effect::Submit {
                    request_id,
                    workflow,
                    files,
                } => {
                    wm_info!(
                        "submitting {} file(s) to {workflow} as request {request_id}",
                        files.len()
                    );
                    let uploads = files.into_iter().map(upload_file).collect();
                    self.engine.submit(request_id, endpoint_for(workflow), uploads);
                }
                Effect::Retrieve {
                    reference,
                    display_name,
                } => {
                    wm_debug!("retrieving {reference} as {display_name}");
                    self.engine.retrieve(reference, display_name);
                    retrievals += 1;
                }
            }
        }
        retrievals
    }

    /// Blocks for the next engine event. `None` once the engine is gone.
    pub fn next(&self) -> Option<Incoming> {
        self.engine.recv().map(event_to_incoming)
    }
}

fn upload_file(file: SelectedFile) -> UploadFile {
    UploadFile {
        path: file.source,
        entry_name: file.relative_path,
        media_type: file.media_type,
    }
}

fn endpoint_for(workflow: WorkflowKind) -> Endpoint {
    match workflow {
        WorkflowKind::Embed => Endpoint::Embed,
        WorkflowKind::Detect => Endpoint::Detect,
    }
}

fn workflow_for(endpoint: Endpoint) -> WorkflowKind {
    match endpoint {
        Endpoint::Embed => WorkflowKind::Embed,
        Endpoint::Detect => WorkflowKind::Detect,
    }
}

pub(crate) fn event_to_incoming(event: EngineEvent) -> Incoming {
    match event {
        EngineEvent::SubmissionCompleted {
            request_id,
            endpoint,
            result,
        } => {
            let msg = match result {
                Ok(SubmitResponse::Embed(envelope)) => Msg::EmbedSucceeded {
                    request_id,
                    results: envelope
                        .results
                        .into_iter()
                        .map(|item| EmbedResult {
                            filename: item.filename,
                            download_ref: item.download_url,
                            rms: item.rms,
                            si_snr: item.si_snr,
                        })
                        .collect(),
                    archive_ref: envelope.zip_download_url,
                },
                Ok(SubmitResponse::Detect(envelope)) => Msg::DetectSucceeded {
                    request_id,
                    results: envelope
                        .results
                        .into_iter()
                        .map(|item| DetectResult {
                            filename: item.filename,
                            probability: item.probability,
                            is_watermarked: item.is_watermarked,
                        })
                        .collect(),
                },
                Err(err) => Msg::SubmissionFailed {
                    workflow: workflow_for(endpoint),
                    request_id,
                    message: err.message,
                },
            };
            Incoming::Msg(msg)
        }
        EngineEvent::RetrievalCompleted { reference, result } => {
            Incoming::Retrieved { reference, result }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use watermark_engine::{
        DetectEnvelope, DetectItem, EmbedEnvelope, EmbedItem, FailureKind, SubmitError,
    };

    use super::*;

    fn expect_msg(incoming: Incoming) -> Msg {
        match incoming {
            Incoming::Msg(msg) => msg,
            other => panic!("expected msg, got {other:?}"),
        }
    }

    #[test]
    fn embed_envelope_becomes_embed_success() {
        let event = EngineEvent::SubmissionCompleted {
            request_id: 4,
            endpoint: Endpoint::Embed,
            result: Ok(SubmitResponse::Embed(EmbedEnvelope {
                results: vec![EmbedItem {
                    filename: "a.wav".to_string(),
                    download_url: "/embed/download/a_wm.wav".to_string(),
                    rms: 0.5,
                    si_snr: 30.0,
                }],
                zip_download_url: Some("/embed/download/all.zip".to_string()),
            })),
        };

        assert_eq!(
            expect_msg(event_to_incoming(event)),
            Msg::EmbedSucceeded {
                request_id: 4,
                results: vec![EmbedResult {
                    filename: "a.wav".to_string(),
                    download_ref: "/embed/download/a_wm.wav".to_string(),
                    rms: 0.5,
                    si_snr: 30.0,
                }],
                archive_ref: Some("/embed/download/all.zip".to_string()),
            }
        );
    }

    #[test]
    fn detect_envelope_becomes_detect_success() {
        let event = EngineEvent::SubmissionCompleted {
            request_id: 2,
            endpoint: Endpoint::Detect,
            result: Ok(SubmitResponse::Detect(DetectEnvelope {
                results: vec![DetectItem {
                    filename: "b.flac".to_string(),
                    probability: 0.1,
                    is_watermarked: false,
                }],
            })),
        };

        assert_eq!(
            expect_msg(event_to_incoming(event)),
            Msg::DetectSucceeded {
                request_id: 2,
                results: vec![DetectResult {
                    filename: "b.flac".to_string(),
                    probability: 0.1,
                    is_watermarked: false,
                }],
            }
        );
    }

    #[test]
    fn failures_keep_their_workflow_and_message() {
        let event = EngineEvent::SubmissionCompleted {
            request_id: 9,
            endpoint: Endpoint::Detect,
            result: Err(SubmitError {
                kind: FailureKind::HttpStatus(422),
                message: "body.files.0: Unsupported format".to_string(),
            }),
        };

        assert_eq!(
            expect_msg(event_to_incoming(event)),
            Msg::SubmissionFailed {
                workflow: WorkflowKind::Detect,
                request_id: 9,
                message: "body.files.0: Unsupported format".to_string(),
            }
        );
    }

    #[test]
    fn selected_files_map_to_uploads() {
        let upload = upload_file(SelectedFile {
            source: PathBuf::from("/tmp/album/a.wav"),
            relative_path: "album/a.wav".to_string(),
            media_type: None,
        });

        assert_eq!(upload.entry_name, "album/a.wav");
        assert_eq!(upload.path, PathBuf::from("/tmp/album/a.wav"));
        assert_eq!(endpoint_for(WorkflowKind::Embed), Endpoint::Embed);
    }
}
