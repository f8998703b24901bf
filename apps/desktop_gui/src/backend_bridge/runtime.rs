//! Runtime bridge between UI command queue and backend event intake.

use std::thread;

use client_core::{ClassificationTransport, HttpClassificationTransport, Settings};
use crossbeam_channel::{Receiver, Sender};
use shared::error::UploadError;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, settings: Settings) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::BackendFailure(format!(
                    "backend worker startup failure: failed to build runtime: {err}"
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let mut transport = build_transport(&settings, &ui_tx);

            while let Ok(cmd) = cmd_rx.recv() {
                tracing::debug!(command = cmd.name(), "backend received command");
                match cmd {
                    BackendCommand::Configure { settings } => {
                        if let Some(next) = build_transport(&settings, &ui_tx) {
                            transport = Some(next);
                        }
                    }
                    BackendCommand::Classify { ticket } => {
                        let outcome = match &transport {
                            Some(transport) => transport.classify(ticket.file()).await,
                            None => Err(UploadError::Network(
                                "classification endpoint is not configured".to_string(),
                            )),
                        };
                        if ui_tx
                            .send(UiEvent::UploadFinished { ticket, outcome })
                            .is_err()
                        {
                            tracing::warn!("ui event channel closed; stopping backend worker");
                            break;
                        }
                    }
                }
            }
        });
    });
}

fn build_transport(
    settings: &Settings,
    ui_tx: &Sender<UiEvent>,
) -> Option<HttpClassificationTransport> {
    match HttpClassificationTransport::from_settings(settings) {
        Ok(transport) => {
            tracing::info!(endpoint = %transport.endpoint(), "classification endpoint configured");
            let _ = ui_tx.try_send(UiEvent::Info(format!(
                "Ready: {}",
                transport.endpoint()
            )));
            Some(transport)
        }
        Err(err) => {
            tracing::error!("invalid classification endpoint: {err:#}");
            let _ = ui_tx.try_send(UiEvent::BackendFailure(format!("{err:#}")));
            None
        }
    }
}
