//! Upload life cycle: validation, state transitions, one request, and the
//! result or error that follows.

use std::{path::PathBuf, time::Instant};

use shared::{
    domain::{SelectedFile, UploadState},
    error::UploadError,
    protocol::{ClassificationResult, RawResponsePayload},
};
use tracing::{info, warn};

use crate::{
    renderer::{render, ProbabilityBar, ResultView},
    selection::SelectionHandler,
    transport::ClassificationTransport,
};

/// Proof that a submission was accepted. Handed back to
/// [`UploadController::finish`] together with the transport outcome.
#[derive(Debug)]
pub struct UploadTicket {
    seq: u64,
    file: SelectedFile,
}

impl UploadTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn file(&self) -> &SelectedFile {
        &self.file
    }
}

/// Everything the page shows, derived from controller state.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub state: UploadState,
    pub filename_indicator: String,
    pub submit_enabled: bool,
    pub progress_visible: bool,
    pub result: Option<ResultView>,
    pub bar_fraction: f32,
    pub alert: Option<String>,
}

/// What [`UploadController::finish`] did with a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// The ticket does not belong to the upload in flight.
    Discarded,
}

#[derive(Debug, Default)]
pub struct UploadController {
    selection: SelectionHandler,
    state: UploadState,
    result: Option<ClassificationResult>,
    alert: Option<String>,
    bar: ProbabilityBar,
    seq: u64,
}

impl UploadController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, path: Option<PathBuf>) -> Option<&SelectedFile> {
        self.selection.select(path)
    }

    pub fn selection(&self) -> &SelectionHandler {
        &self.selection
    }

    pub fn state(&self) -> UploadState {
        self.state
    }

    pub fn result(&self) -> Option<&ClassificationResult> {
        self.result.as_ref()
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn bar(&self) -> &ProbabilityBar {
        &self.bar
    }

    /// Validates and enters `Uploading`. Performs no I/O.
    pub fn begin_submit(&mut self) -> Result<UploadTicket, UploadError> {
        if self.state == UploadState::Uploading {
            warn!(seq = self.seq, "submit refused while an upload is in flight");
            return Err(UploadError::UploadInFlight);
        }
        let Some(file) = self.selection.current().cloned() else {
            let err = UploadError::MissingFile;
            self.alert = Some(err.alert_message());
            return Err(err);
        };

        self.seq += 1;
        self.state = UploadState::Uploading;
        self.alert = None;
        info!(seq = self.seq, file = %file.name, "submit accepted");
        Ok(UploadTicket {
            seq: self.seq,
            file,
        })
    }

    /// Applies the outcome of the request issued for `ticket`. A ticket that
    /// is not the one in flight is dropped without touching state.
    pub fn finish(
        &mut self,
        ticket: UploadTicket,
        outcome: Result<RawResponsePayload, UploadError>,
        now: Instant,
    ) -> Result<Completion, UploadError> {
        if ticket.seq != self.seq || self.state != UploadState::Uploading {
            warn!(
                seq = ticket.seq,
                current = self.seq,
                "discarding completion that does not match the upload in flight"
            );
            return Ok(Completion::Discarded);
        }

        let applied = outcome.and_then(|payload| payload.normalize().into_result());
        let completion = match applied {
            Ok(result) => {
                info!(
                    seq = ticket.seq,
                    label = %result.label,
                    probability = result.probability,
                    "classification received"
                );
                self.bar.animate_to(result.probability, now);
                self.result = Some(result);
                self.state = UploadState::Success;
                Ok(Completion::Applied)
            }
            Err(err) => {
                warn!(seq = ticket.seq, category = ?err.category(), "upload failed: {err}");
                self.alert = Some(err.alert_message());
                self.state = UploadState::Error;
                Err(err)
            }
        };
        debug_assert_ne!(self.state, UploadState::Uploading);
        completion
    }

    /// Validates, issues exactly one request, and applies its outcome. The
    /// exclusive borrow keeps a second submission out until this resolves.
    pub async fn submit<T>(&mut self, transport: &T) -> Result<(), UploadError>
    where
        T: ClassificationTransport + ?Sized,
    {
        let ticket = self.begin_submit()?;
        let outcome = transport.classify(ticket.file()).await;
        self.finish(ticket, outcome, Instant::now()).map(|_| ())
    }

    /// Returns to `Idle`. Refused while an upload is in flight: uploads
    /// cannot be cancelled.
    pub fn reset(&mut self) -> Result<(), UploadError> {
        if self.state == UploadState::Uploading {
            warn!(seq = self.seq, "reset refused while an upload is in flight");
            return Err(UploadError::UploadInFlight);
        }
        self.selection.clear();
        self.state = UploadState::Idle;
        self.result = None;
        self.alert = None;
        self.bar.reset();
        Ok(())
    }

    pub fn view(&self, now: Instant) -> PageView {
        let uploading = self.state == UploadState::Uploading;
        let result = match self.state {
            UploadState::Success => self.result.as_ref().map(render),
            _ => None,
        };
        PageView {
            state: self.state,
            filename_indicator: self.selection.indicator(),
            submit_enabled: !uploading,
            progress_visible: uploading,
            result,
            bar_fraction: self.bar.width_at(now),
            alert: self.alert.clone(),
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
