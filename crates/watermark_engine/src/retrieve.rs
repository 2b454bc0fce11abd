use std::path::PathBuf;

use futures_util::StreamExt;
use watermark_logging::{wm_debug, wm_info, wm_warn};

use crate::filename::{derive_artifact_name, safe_relative_path};
use crate::persist::{AtomicFileWriter, PersistError};
use crate::{ClientSettings, FailureKind, RetrieveError};

#[async_trait::async_trait]
pub trait Retriever: Send + Sync {
    /// Fetches `reference` and saves it under a name derived from `display_name`.
    ///
    /// On error nothing is written.
    async fn retrieve(&self, reference: &str, display_name: &str)
        -> Result<PathBuf, RetrieveError>;
}

pub struct ReqwestRetriever {
    settings: ClientSettings,
    writer: AtomicFileWriter,
}

impl ReqwestRetriever {
    pub fn new(settings: ClientSettings, output_dir: PathBuf) -> Self {
        Self {
            settings,
            writer: AtomicFileWriter::new(output_dir),
        }
    }

    async fn download(&self, reference: &str) -> Result<Vec<u8>, RetrieveError> {
        let url = self.settings.resolve(reference).map_err(|err| {
            RetrieveError::new(FailureKind::InvalidUrl, format!("{reference}: {err}"))
        })?;
        let client = self.settings.build_client().map_err(map_reqwest_error)?;

        wm_debug!("GET {url}");
        let response = client.get(url).send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(RetrieveError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let max_bytes = self.settings.max_artifact_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(max_bytes, Some(content_len)));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(max_bytes, Some(next_len)));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl Retriever for ReqwestRetriever {
    async fn retrieve(
        &self,
        reference: &str,
        display_name: &str,
    ) -> Result<PathBuf, RetrieveError> {
        let bytes = match self.download(reference).await {
            Ok(bytes) => bytes,
            Err(err) => {
                wm_warn!("Download failed for {reference}: {err}");
                return Err(err);
            }
        };

        let derived = derive_artifact_name(display_name);
        let relative = safe_relative_path(&derived)
            .ok_or_else(|| map_persist_error(PersistError::InvalidName(derived.clone())))?;
        let saved = self
            .writer
            .write(&relative, &bytes)
            .map_err(map_persist_error)?;
        wm_info!("Saved {} byte(s) to {}", bytes.len(), saved.display());
        Ok(saved)
    }
}

fn too_large(max_bytes: u64, actual: Option<u64>) -> RetrieveError {
    RetrieveError::new(
        FailureKind::TooLarge { max_bytes, actual },
        "artifact too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> RetrieveError {
    if err.is_timeout() {
        return RetrieveError::new(FailureKind::Timeout, err.to_string());
    }
    RetrieveError::new(FailureKind::Network, err.to_string())
}

fn map_persist_error(err: PersistError) -> RetrieveError {
    RetrieveError::new(FailureKind::Persist, err.to_string())
}
