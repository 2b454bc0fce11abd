use reqwest::multipart::{Form, Part};
use watermark_logging::{wm_debug, wm_info, wm_warn};

use crate::envelope::{describe_failure, DetectEnvelope, EmbedEnvelope, ErrorEnvelope};
use crate::{ClientSettings, Endpoint, FailureKind, SubmitError, SubmitResponse, UploadFile};

/// Multipart field every file is attached under.
pub const FILES_FIELD: &str = "files";

const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

#[async_trait::async_trait]
pub trait Submitter: Send + Sync {
    /// Sends the whole batch as one request and waits for the full response.
    async fn submit(
        &self,
        endpoint: Endpoint,
        files: &[UploadFile],
    ) -> Result<SubmitResponse, SubmitError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestSubmitter {
    settings: ClientSettings,
}

impl ReqwestSubmitter {
    pub fn new(settings: ClientSettings) -> Self {
        Self { settings }
    }

    async fn build_form(&self, files: &[UploadFile]) -> Result<Form, SubmitError> {
        // Entry names carry directory nesting; send them unescaped.
        let mut form = Form::new().percent_encode_noop();
        for file in files {
            let data = tokio::fs::read(&file.path).await.map_err(|err| {
                SubmitError::new(
                    FailureKind::LocalFile,
                    format!("could not read {}: {err}", file.path.display()),
                )
            })?;
            let media_type = match file.media_type.as_deref() {
                Some(media_type) if media_type.contains('/') => media_type,
                Some(other) => {
                    wm_warn!("unusable media type {other:?} for {}", file.entry_name);
                    FALLBACK_MEDIA_TYPE
                }
                None => FALLBACK_MEDIA_TYPE,
            };
            let part = Part::bytes(data)
                .file_name(file.entry_name.clone())
                .mime_str(media_type)
                .map_err(|err| SubmitError::new(FailureKind::LocalFile, err.to_string()))?;
            form = form.part(FILES_FIELD, part);
        }
        Ok(form)
    }
}

#[async_trait::async_trait]
impl Submitter for ReqwestSubmitter {
    async fn submit(
        &self,
        endpoint: Endpoint,
        files: &[UploadFile],
    ) -> Result<SubmitResponse, SubmitError> {
        let url = self.settings.resolve(endpoint.path()).map_err(|err| {
            SubmitError::new(FailureKind::InvalidUrl, format!("invalid service url: {err}"))
        })?;
        let client = self.settings.build_client().map_err(map_reqwest_error)?;
        let form = self.build_form(files).await?;

        wm_info!("POST {url} with {} file(s)", files.len());
        let response = client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        wm_debug!("{endpoint} answered {status} with {} byte(s)", body.len());

        if !status.is_success() {
            let envelope = ErrorEnvelope::decode(&body);
            let message = describe_failure(envelope.as_ref(), status.as_u16());
            return Err(SubmitError::new(
                FailureKind::HttpStatus(status.as_u16()),
                message,
            ));
        }

        decode_success(endpoint, &body)
    }
}

fn decode_success(endpoint: Endpoint, body: &[u8]) -> Result<SubmitResponse, SubmitError> {
    let decoded = match endpoint {
        Endpoint::Embed => serde_json::from_slice::<EmbedEnvelope>(body).map(SubmitResponse::Embed),
        Endpoint::Detect => {
            serde_json::from_slice::<DetectEnvelope>(body).map(SubmitResponse::Detect)
        }
    };
    decoded.map_err(|err| {
        SubmitError::new(
            FailureKind::InvalidResponse,
            format!("invalid response from server: {err}"),
        )
    })
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> SubmitError {
    if err.is_timeout() {
        return SubmitError::new(FailureKind::Timeout, format!("request timed out: {err}"));
    }
    SubmitError::new(FailureKind::Network, format!("network error: {err}"))
}
