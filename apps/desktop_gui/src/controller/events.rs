//! Events delivered from the backend worker to the UI thread.

use client_core::UploadTicket;
use shared::{error::UploadError, protocol::RawResponsePayload};

pub enum UiEvent {
    Info(String),
    BackendFailure(String),
    UploadFinished {
        ticket: UploadTicket,
        outcome: Result<RawResponsePayload, UploadError>,
    },
}
