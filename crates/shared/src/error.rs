use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rejected locally before any request was issued.
    Validation,
    /// Network failure, unreadable file, or non-2xx status.
    Transport,
    /// 2xx response whose body is malformed or carries an `error` field.
    Payload,
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Please select an EEG file first!")]
    MissingFile,
    #[error("an upload is already in progress")]
    UploadInFlight,
    #[error("could not read '{path}': {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}")]
    Network(String),
    #[error("Server returned {status}{}", detail_suffix(.detail))]
    Status { status: u16, detail: Option<String> },
    #[error("malformed response payload: {0}")]
    MalformedPayload(String),
    #[error("{0}")]
    Service(String),
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(detail) if !detail.is_empty() => format!(": {detail}"),
        _ => String::new(),
    }
}

impl UploadError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingFile | Self::UploadInFlight => ErrorCategory::Validation,
            Self::FileRead { .. } | Self::Network(_) | Self::Status { .. } => {
                ErrorCategory::Transport
            }
            Self::MalformedPayload(_) | Self::Service(_) => ErrorCategory::Payload,
        }
    }

    /// Text for the blocking alert shown to the user.
    pub fn alert_message(&self) -> String {
        match self {
            Self::MissingFile | Self::UploadInFlight => self.to_string(),
            Self::Service(message) => format!("Error: {message}"),
            _ => format!("Upload failed: {self}"),
        }
    }
}
