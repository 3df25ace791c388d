//! Viewer state
//!
//! Holds the current upload and the most recent run. Each run replaces the
//! previous result wholesale.

use image::DynamicImage;
use std::path::PathBuf;

use crate::pipeline::{PipelineError, ProcessOutcome};

/// Engine lifecycle as shown in the header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineStatus {
    /// Models not loaded yet; loading happens on the first run
    #[default]
    NotLoaded,
    Ready,
    Failed,
}

impl EngineStatus {
    pub fn label(&self) -> &'static str {
        match self {
            EngineStatus::NotLoaded => "Loads on first run",
            EngineStatus::Ready => "Ready",
            EngineStatus::Failed => "Failed",
        }
    }
}

/// Message shown under the controls
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLine {
    Idle,
    Info(String),
    Error(String),
}

/// The uploaded photograph
pub struct Upload {
    pub path: PathBuf,
    pub image: DynamicImage,
    /// Source texture, created lazily by the upload view
    pub texture: Option<egui::TextureHandle>,
}

/// Result of the last successful run
pub struct RunResult {
    pub outcome: ProcessOutcome,
    /// Overlay texture, created lazily by the results view
    pub overlay_texture: Option<egui::TextureHandle>,
}

/// Everything the viewer renders
pub struct ViewerState {
    /// Contents of the path text box
    pub path_input: String,
    pub upload: Option<Upload>,
    pub result: Option<RunResult>,
    pub status: StatusLine,
    pub engine: EngineStatus,
    /// Set by the UI, consumed by the app on the next frame
    pub pending_load: Option<PathBuf>,
    pub pending_process: bool,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self {
            path_input: String::new(),
            upload: None,
            result: None,
            status: StatusLine::Idle,
            engine: EngineStatus::default(),
            pending_load: None,
            pending_process: false,
        }
    }
}

impl ViewerState {
    /// Replace the upload; results from the previous image are cleared
    pub fn set_upload(&mut self, path: PathBuf, image: DynamicImage) {
        self.path_input = path.display().to_string();
        self.status = StatusLine::Info(format!(
            "Loaded {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        ));
        self.upload = Some(Upload {
            path,
            image,
            texture: None,
        });
        self.result = None;
    }

    /// Store a fresh run, replacing the previous one
    pub fn set_outcome(&mut self, outcome: ProcessOutcome) {
        self.status = StatusLine::Info(format!(
            "{} text regions, document: {}",
            outcome.boxes.len(),
            outcome.fields.kind().label().unwrap_or("unrecognized")
        ));
        self.result = Some(RunResult {
            outcome,
            overlay_texture: None,
        });
    }

    /// Report a failure; the previous result is dropped
    pub fn set_error(&mut self, error: &PipelineError) {
        self.status = StatusLine::Error(format_error(error));
        self.result = None;
    }

    pub fn can_process(&self) -> bool {
        self.upload.is_some()
    }
}

/// Render an error with its source chain on one line
pub fn format_error(error: &(dyn std::error::Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
