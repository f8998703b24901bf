//! Outbound request to the classification service.

use std::{
    error::Error as StdError,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use shared::{domain::SelectedFile, error::UploadError, protocol::RawResponsePayload};
use tracing::{info, warn};
use url::Url;

use crate::config::Settings;

/// Name of the single multipart field carrying the recording.
pub const FILE_FIELD: &str = "file";

#[async_trait]
pub trait ClassificationTransport: Send + Sync {
    async fn classify(&self, file: &SelectedFile) -> Result<RawResponsePayload, UploadError>;
}

pub struct HttpClassificationTransport {
    http: Client,
    endpoint: Url,
    timeout_hint: Option<Duration>,
}

impl HttpClassificationTransport {
    pub fn new(endpoint: Url) -> Self {
        Self {
            http: Client::new(),
            endpoint,
            timeout_hint: None,
        }
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        Ok(Self::new(settings.endpoint_url()?).with_timeout_hint(settings.upload_timeout_hint()))
    }

    /// The hint is never enforced; an upload running past it is only logged.
    pub fn with_timeout_hint(mut self, hint: Duration) -> Self {
        self.timeout_hint = Some(hint);
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn check_timeout_hint(&self, file: &SelectedFile, elapsed: Duration) {
        if let Some(hint) = self.timeout_hint {
            if elapsed > hint {
                warn!(
                    file = %file.name,
                    elapsed_ms = elapsed.as_millis() as u64,
                    hint_ms = hint.as_millis() as u64,
                    "classification upload exceeded advisory timeout"
                );
            }
        }
    }
}

#[async_trait]
impl ClassificationTransport for HttpClassificationTransport {
    async fn classify(&self, file: &SelectedFile) -> Result<RawResponsePayload, UploadError> {
        let bytes = tokio::fs::read(&file.path)
            .await
            .map_err(|source| UploadError::FileRead {
                path: file.path.display().to_string(),
                source,
            })?;
        let size_bytes = bytes.len();
        let mime = mime_guess::from_path(&file.path).first_or_octet_stream();
        let part = Part::bytes(bytes)
            .file_name(file.name.clone())
            .mime_str(mime.essence_str())
            .map_err(|err| UploadError::Network(describe(&err)))?;
        let form = Form::new().part(FILE_FIELD, part);

        info!(file = %file.name, size_bytes, endpoint = %self.endpoint, "uploading recording");
        let started = Instant::now();
        let response = self
            .http
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|err| UploadError::Network(describe(&err)))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| UploadError::Network(describe(&err)))?;
        self.check_timeout_hint(file, started.elapsed());

        if !status.is_success() {
            let detail = RawResponsePayload::from_slice(&body)
                .ok()
                .and_then(|payload| payload.rejection_detail());
            return Err(UploadError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        RawResponsePayload::from_slice(&body)
    }
}

/// Flattens an error and its sources into one line.
fn describe(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
