//! Backend commands queued from UI to backend worker.

use client_core::{Settings, UploadTicket};

pub enum BackendCommand {
    Classify { ticket: UploadTicket },
    Configure { settings: Settings },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Classify { .. } => "classify",
            Self::Configure { .. } => "configure",
        }
    }
}
