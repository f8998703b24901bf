use std::time::{Duration, Instant};

use client_core::{Completion, PageView, ResultView, Settings, UploadController};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use egui::{Color32, RichText};
use shared::{domain::Badge, error::UploadError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::controller::orchestration::dispatch_backend_command;

const CONDITION_COLOR: Color32 = Color32::from_rgb(214, 78, 62);
const HEALTHY_COLOR: Color32 = Color32::from_rgb(56, 168, 98);

pub fn badge_color(badge: Badge) -> Color32 {
    match badge {
        Badge::ConditionDetected => CONDITION_COLOR,
        Badge::HealthyControl => HEALTHY_COLOR,
    }
}

pub struct ClassifierApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    controller: UploadController,
    settings: Settings,
    server_url_input: String,
    endpoint_path_input: String,
    status: String,
}

impl ClassifierApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        settings: Settings,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            controller: UploadController::new(),
            server_url_input: settings.server_url.clone(),
            endpoint_path_input: settings.endpoint_path.clone(),
            settings,
            status: "Starting backend worker...".to_string(),
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::BackendFailure(message) => {
                    self.status = format!("Backend error: {message}");
                }
                UiEvent::UploadFinished { ticket, outcome } => {
                    let name = ticket.file().name.clone();
                    self.status = match self.controller.finish(ticket, outcome, Instant::now()) {
                        Ok(Completion::Applied) => format!("Analysis finished for {name}"),
                        Ok(Completion::Discarded) => {
                            format!("Ignored a stale result for {name}")
                        }
                        Err(_) => format!("Analysis failed for {name}"),
                    };
                }
            }
        }
    }

    fn submit(&mut self) {
        let ticket = match self.controller.begin_submit() {
            Ok(ticket) => ticket,
            Err(err) => {
                tracing::debug!("submit rejected: {err}");
                return;
            }
        };
        self.status = format!("Uploading {}...", ticket.file().name);
        if let Some(BackendCommand::Classify { ticket }) = dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::Classify { ticket },
            &mut self.status,
        ) {
            let err = UploadError::Network(self.status.clone());
            let _ = self.controller.finish(ticket, Err(err), Instant::now());
        }
    }

    fn apply_service_settings(&mut self) {
        self.settings.server_url = self.server_url_input.trim().to_string();
        self.settings.endpoint_path = self.endpoint_path_input.trim().to_string();
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::Configure {
                settings: self.settings.clone(),
            },
            &mut self.status,
        );
    }

    fn upload_section(&mut self, ui: &mut egui::Ui, view: &PageView) {
        ui.group(|ui| {
            ui.set_width(ui.available_width());
            ui.vertical_centered(|ui| {
                ui.add_space(8.0);
                if ui
                    .add_enabled(
                        view.submit_enabled,
                        egui::Button::new("Choose EEG recording...")
                            .min_size(egui::vec2(240.0, 36.0)),
                    )
                    .clicked()
                {
                    let picked = rfd::FileDialog::new()
                        .add_filter("EEG recording", &["raw", "npz"])
                        .add_filter("All files", &["*"])
                        .pick_file();
                    self.controller.select(picked);
                }
                ui.label(&view.filename_indicator);
                ui.add_space(8.0);
            });
        });

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui
                .add_enabled(view.submit_enabled, egui::Button::new("Analyze"))
                .clicked()
            {
                self.submit();
            }
            if ui
                .add_enabled(view.submit_enabled, egui::Button::new("Reset"))
                .clicked()
            {
                self.status = match self.controller.reset() {
                    Ok(()) => "Form reset".to_string(),
                    Err(err) => err.alert_message(),
                };
            }
            if view.progress_visible {
                ui.add(egui::Spinner::new());
                ui.label("Processing recording...");
            }
        });
    }

    fn service_section(&mut self, ui: &mut egui::Ui, enabled: bool) {
        ui.collapsing("Classification service", |ui| {
            ui.add_enabled_ui(enabled, |ui| {
                egui::Grid::new("service_settings")
                    .num_columns(2)
                    .show(ui, |ui| {
                        ui.label("Server URL");
                        ui.text_edit_singleline(&mut self.server_url_input);
                        ui.end_row();
                        ui.label("Endpoint path");
                        ui.text_edit_singleline(&mut self.endpoint_path_input);
                        ui.end_row();
                    });
                if ui.button("Apply").clicked() {
                    self.apply_service_settings();
                }
            });
        });
    }
}

fn result_section(ui: &mut egui::Ui, result: &ResultView, bar_fraction: f32) {
    let color = badge_color(result.badge);
    ui.separator();
    ui.label(RichText::new(result.badge_text).color(color).strong().size(22.0));
    ui.add_space(4.0);
    ui.horizontal(|ui| {
        ui.label("Prediction:");
        ui.label(RichText::new(&result.label).strong());
    });
    ui.horizontal(|ui| {
        ui.label("Confidence:");
        ui.label(RichText::new(format!("{}%", result.percent)).strong());
    });
    ui.add(
        egui::ProgressBar::new(bar_fraction)
            .fill(color)
            .desired_width(ui.available_width().min(420.0)),
    );
    if let Some(subject) = &result.subject {
        ui.label(format!("Subject: {subject}"));
    }
    if !result.votes.is_empty() {
        let votes = result
            .votes
            .iter()
            .map(|(class, count)| format!("{class}: {count}"))
            .collect::<Vec<_>>()
            .join("   ");
        ui.label(format!("Trial votes: {votes}"));
    }
    ui.add_space(6.0);
    ui.collapsing("Raw response", |ui| {
        egui::ScrollArea::vertical()
            .max_height(260.0)
            .show(ui, |ui| {
                ui.monospace(&result.raw_json);
            });
    });
}

impl eframe::App for ClassifierApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        let now = Instant::now();
        let view = self.controller.view(now);
        let interactive = view.alert.is_none();

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.label(RichText::new(&self.status).small());
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_enabled_ui(interactive, |ui| {
                    ui.heading("EEG Depression Screening");
                    ui.label(
                        "Upload a resting-state EEG recording to classify it as MDD or healthy control.",
                    );
                    ui.add_space(10.0);
                    self.upload_section(ui, &view);
                    if let Some(result) = &view.result {
                        result_section(ui, result, view.bar_fraction);
                    }
                    ui.add_space(10.0);
                    self.service_section(ui, view.submit_enabled);
                });
            });
        });

        if let Some(message) = view.alert.as_deref() {
            let mut dismissed = false;
            egui::Window::new("Notice")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.add_space(6.0);
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            if dismissed {
                self.controller.dismiss_alert();
            }
        }

        if view.progress_visible || self.controller.bar().is_animating(now) {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }
}
