use std::io;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc as async_mpsc;
use watermark_logging::{wm_debug, wm_warn};

use crate::retrieve::{ReqwestRetriever, Retriever};
use crate::submit::{ReqwestSubmitter, Submitter};
use crate::{ClientSettings, Endpoint, EngineEvent, RequestId, UploadFile};

enum EngineCommand {
    Submit {
        request_id: RequestId,
        endpoint: Endpoint,
        files: Vec<UploadFile>,
    },
    Retrieve {
        reference: String,
        display_name: String,
    },
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("could not start engine: {0}")]
    Startup(#[from] io::Error),
}

/// Runs network work on a background thread and reports back as [`EngineEvent`]s.
///
/// The thread drives a single-threaded runtime; requests interleave
/// cooperatively at their await points. Dropping the handle stops the thread
/// and abandons anything still in flight.
pub struct EngineHandle {
    cmd_tx: async_mpsc::UnboundedSender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings, output_dir: PathBuf) -> Result<Self, EngineError> {
        let submitter = Arc::new(ReqwestSubmitter::new(settings.clone()));
        let retriever = Arc::new(ReqwestRetriever::new(settings, output_dir));
        Self::with_services(submitter, retriever)
    }

    pub fn with_services(
        submitter: Arc<dyn Submitter>,
        retriever: Arc<dyn Retriever>,
    ) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let (cmd_tx, mut cmd_rx) = async_mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::Builder::new()
            .name("watermark-engine".to_string())
            .spawn(move || {
                runtime.block_on(async move {
                    while let Some(command) = cmd_rx.recv().await {
                        let submitter = submitter.clone();
                        let retriever = retriever.clone();
                        let event_tx = event_tx.clone();
                        tokio::spawn(async move {
                            handle_command(
                                submitter.as_ref(),
                                retriever.as_ref(),
                                command,
                                event_tx,
                            )
                            .await;
                        });
                    }
                    wm_debug!("engine command channel closed");
                });
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn submit(&self, request_id: RequestId, endpoint: Endpoint, files: Vec<UploadFile>) {
        self.send(EngineCommand::Submit {
            request_id,
            endpoint,
            files,
        });
    }

    pub fn retrieve(&self, reference: impl Into<String>, display_name: impl Into<String>) {
        self.send(EngineCommand::Retrieve {
            reference: reference.into(),
            display_name: display_name.into(),
        });
    }

    /// Blocks until the next event. `None` once the engine thread is gone.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            wm_warn!("engine thread is gone; command dropped");
        }
    }
}

async fn handle_command(
    submitter: &dyn Submitter,
    retriever: &dyn Retriever,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::Submit {
            request_id,
            endpoint,
            files,
        } => {
            let result = submitter.submit(endpoint, &files).await;
            if let Err(err) = &result {
                wm_warn!("{endpoint} request {request_id} failed ({}): {err}", err.kind);
            }
            EngineEvent::SubmissionCompleted {
                request_id,
                endpoint,
                result,
            }
        }
        EngineCommand::Retrieve {
            reference,
            display_name,
        } => {
            let result = retriever.retrieve(&reference, &display_name).await;
            EngineEvent::RetrievalCompleted { reference, result }
        }
    };
    let _ = event_tx.send(event);
}
