//! Viewer application entry point

use eframe::egui;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::dashboard::components::StatusCard;
use crate::dashboard::state::{EngineStatus, ViewerState};
use crate::dashboard::theme;
use crate::dashboard::views::{render_results_view, render_upload_controls, render_upload_preview};
use crate::pipeline::{load_image, PaddlePipeline};

/// The desktop card viewer
pub struct ViewerApp {
    config: AppConfig,
    state: ViewerState,
    /// Created on the first run and reused afterwards
    pipeline: Option<PaddlePipeline>,
    theme_applied: bool,
}

impl ViewerApp {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            state: ViewerState::default(),
            pipeline: None,
            theme_applied: false,
        }
    }

    /// Create eframe options for the viewer window
    pub fn options() -> eframe::NativeOptions {
        eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([1200.0, 780.0])
                .with_min_inner_size([800.0, 500.0])
                .with_drag_and_drop(true)
                .with_title("ID Card OCR"),
            ..Default::default()
        }
    }

    fn load(&mut self, path: &Path) {
        match load_image(path) {
            Ok(image) => {
                info!("Loaded {:?} ({}x{})", path, image.width(), image.height());
                self.state.set_upload(path.to_path_buf(), image);
            }
            Err(e) => {
                warn!("Could not load {:?}: {}", path, e);
                self.state.set_error(&e);
            }
        }
    }

    fn process(&mut self) {
        if !self.state.can_process() {
            return;
        }

        if self.pipeline.is_none() {
            match PaddlePipeline::from_config(&self.config) {
                Ok(pipeline) => {
                    self.pipeline = Some(pipeline);
                    self.state.engine = EngineStatus::Ready;
                }
                Err(e) => {
                    error!("OCR engine initialization failed: {:?}", e);
                    self.state.engine = EngineStatus::Failed;
                    self.state.set_error(&e);
                    return;
                }
            }
        }

        let (Some(pipeline), Some(upload)) = (self.pipeline.as_mut(), self.state.upload.as_ref())
        else {
            return;
        };

        match pipeline.process(&upload.image) {
            Ok(outcome) => self.state.set_outcome(outcome),
            Err(e) => {
                error!("Processing failed: {:?}", e);
                self.state.set_error(&e);
            }
        }
    }

    /// Files dropped onto the window replace the current upload
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .collect()
        });

        if let Some(path) = dropped.into_iter().next() {
            self.state.pending_load = Some(path);
        }
    }

    fn apply_pending(&mut self) {
        if let Some(path) = self.state.pending_load.take() {
            self.load(&path);
        }

        if self.state.pending_process {
            self.state.pending_process = false;
            self.process();
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply theme once
        if !self.theme_applied {
            theme::apply_theme(ctx);
            self.theme_applied = true;
        }

        self.handle_dropped_files(ctx);
        self.apply_pending();

        egui::TopBottomPanel::top("controls")
            .frame(egui::Frame::none().fill(theme::ThemeColors::BG_DARK).inner_margin(16.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading(egui::RichText::new("ID Card OCR").size(24.0).strong());
                    ui.add_space(24.0);
                    StatusCard::engine(self.state.engine).show(ui);
                    let kind = self.state.result.as_ref().map(|r| r.outcome.fields.kind());
                    StatusCard::document(kind).show(ui);
                });
                ui.add_space(8.0);
                render_upload_controls(ui, &mut self.state);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available_height = ui.available_height();
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.columns(2, |columns| {
                    render_upload_preview(&mut columns[0], &mut self.state, available_height * 0.8);
                    render_results_view(&mut columns[1], &mut self.state, available_height * 0.5);
                });
            });
        });

        // Actions requested this frame run on the next one
        if self.state.pending_process || self.state.pending_load.is_some() {
            ctx.request_repaint();
        }
    }
}

/// Run the viewer application
pub fn run_viewer(config: AppConfig) -> Result<(), eframe::Error> {
    let app = ViewerApp::new(config);
    eframe::run_native(
        "ID Card OCR",
        ViewerApp::options(),
        Box::new(|_cc| Ok(Box::new(app))),
    )
}
