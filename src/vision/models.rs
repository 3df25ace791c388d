//! Model management for ONNX Runtime
//!
//! Handles downloading, caching, and loading of PaddleOCR models.

use anyhow::{Context, Result};
use futures_util::StreamExt;
use ndarray::{Array4, ArrayD};
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use sha2::{Digest, Sha256};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;
use tracing::{debug, info};

use crate::config::ModelSettings;

/// Environment variable that forces offline mode
pub const OFFLINE_ENV: &str = "IDCARD_OCR_OFFLINE";

/// Files making up the PaddleOCR backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelType {
    /// Text detection model (DBNet)
    Detection,
    /// Text recognition model (CRNN)
    Recognition,
    /// Character dictionary for recognition
    Dictionary,
}

impl ModelType {
    pub const ALL: [ModelType; 3] = [
        ModelType::Detection,
        ModelType::Recognition,
        ModelType::Dictionary,
    ];

    /// Get the filename for this model type
    pub fn filename(&self) -> &'static str {
        match self {
            ModelType::Detection => "det.onnx",
            ModelType::Recognition => "rec.onnx",
            ModelType::Dictionary => "dict.txt",
        }
    }

    /// Download URL (PaddleOCR ONNX exports on Hugging Face)
    pub fn download_url(&self) -> &'static str {
        match self {
            ModelType::Detection => {
                "https://huggingface.co/monkt/paddleocr-onnx/resolve/main/detection/v3/det.onnx"
            }
            ModelType::Recognition => {
                "https://huggingface.co/monkt/paddleocr-onnx/resolve/main/languages/english/rec.onnx"
            }
            ModelType::Dictionary => {
                "https://huggingface.co/monkt/paddleocr-onnx/resolve/main/languages/english/dict.txt"
            }
        }
    }

    /// Plausible file size range in bytes, used as a cheap integrity check
    pub fn expected_size_range(&self) -> (u64, u64) {
        match self {
            ModelType::Detection => (1_000_000, 30_000_000),
            ModelType::Recognition => (1_000_000, 30_000_000),
            ModelType::Dictionary => (100, 100_000),
        }
    }

    /// Expected SHA256 checksum, when pinned
    pub fn expected_sha256(&self) -> Option<&'static str> {
        None
    }

    /// Display name for progress reporting
    pub fn display_name(&self) -> &'static str {
        match self {
            ModelType::Detection => "Text Detection",
            ModelType::Recognition => "Text Recognition",
            ModelType::Dictionary => "Character Dictionary",
        }
    }
}

/// Model manifest tracking downloaded models
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ModelManifest {
    pub version: String,
    pub models: Vec<ModelInfo>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ModelInfo {
    pub model_type: String,
    pub filename: String,
    pub size_bytes: u64,
    pub sha256: Option<String>,
    pub downloaded_at: String,
}

impl Default for ModelManifest {
    fn default() -> Self {
        Self {
            version: "1.0.0".to_string(),
            models: Vec::new(),
        }
    }
}

/// Downloads and caches the OCR model files
pub struct ModelManager {
    models_dir: PathBuf,
    offline: bool,
}

impl ModelManager {
    /// Create a model manager from configuration.
    ///
    /// Uses the configured directory, or `<data dir>/models` when unset.
    pub fn from_settings(settings: &ModelSettings) -> Result<Self> {
        let models_dir = match &settings.models_dir {
            Some(dir) => dir.clone(),
            None => crate::storage::get_data_dir()?.join("models"),
        };
        let offline = settings.offline || std::env::var_os(OFFLINE_ENV).is_some();

        let mut manager = Self::with_dir(models_dir)?;
        manager.offline = offline;
        Ok(manager)
    }

    /// Create model manager with custom directory
    pub fn with_dir(models_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&models_dir)
            .with_context(|| format!("Failed to create models directory {:?}", models_dir))?;
        Ok(Self {
            models_dir,
            offline: false,
        })
    }

    /// Refuse network access; missing models become errors
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    /// Get the models directory path
    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    /// Get the path to a specific model file
    pub fn model_path(&self, model_type: ModelType) -> PathBuf {
        self.models_dir.join(model_type.filename())
    }

    /// Check if a model is already downloaded and plausibly complete
    pub fn is_model_available(&self, model_type: ModelType) -> bool {
        match std::fs::metadata(self.model_path(model_type)) {
            Ok(metadata) => {
                let (min, max) = model_type.expected_size_range();
                let size = metadata.len();
                size >= min && size <= max
            }
            Err(_) => false,
        }
    }

    /// Check if all required models are available
    pub fn are_models_ready(&self) -> bool {
        ModelType::ALL.iter().all(|&m| self.is_model_available(m))
    }

    /// Get status of all models
    pub fn get_model_status(&self) -> Vec<(ModelType, bool, Option<u64>)> {
        ModelType::ALL
            .iter()
            .map(|&model_type| {
                let path = self.model_path(model_type);
                let available = self.is_model_available(model_type);
                let size = std::fs::metadata(&path).ok().map(|m| m.len());
                (model_type, available, size)
            })
            .collect()
    }

    /// Download a model if not already available.
    /// Returns the path to the model file.
    pub fn ensure_model(&self, model_type: ModelType) -> Result<PathBuf> {
        let path = self.model_path(model_type);

        if self.is_model_available(model_type) {
            debug!("Model {:?} already available at {:?}", model_type, path);
            return Ok(path);
        }

        self.download_model(model_type)?;
        Ok(path)
    }

    /// Download a specific model (blocking)
    fn download_model(&self, model_type: ModelType) -> Result<()> {
        let url = model_type.download_url();
        let path = self.model_path(model_type);

        if self.offline {
            anyhow::bail!(
                "Offline mode: cannot download {}. Download it from {} and place it at {:?}",
                model_type.display_name(),
                url,
                path
            );
        }

        info!("Downloading {} model from {}", model_type.display_name(), url);

        let rt = Runtime::new().context("Failed to create tokio runtime")?;
        rt.block_on(async { self.download_file_async(url, &path, model_type).await })?;

        if !self.is_model_available(model_type) {
            anyhow::bail!(
                "Downloaded {} but its size is outside the expected range",
                model_type.filename()
            );
        }

        self.update_manifest_for_model(model_type)?;

        info!("Successfully downloaded {} model", model_type.display_name());
        Ok(())
    }

    async fn download_file_async(&self, url: &str, path: &Path, model_type: ModelType) -> Result<()> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(300))
            .build()
            .context("Failed to create HTTP client")?;

        let response = client
            .get(url)
            .send()
            .await
            .context("Failed to send download request")?;

        if !response.status().is_success() {
            anyhow::bail!("Download failed with status {}: {}", response.status(), url);
        }

        let total_size = response.content_length();
        debug!("Download size: {:?} bytes", total_size);

        let temp_path = path.with_extension("tmp");
        let mut file = std::fs::File::create(&temp_path).context("Failed to create temp file")?;

        let mut hasher = Sha256::new();
        let mut downloaded: u64 = 0;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.context("Error reading download stream")?;
            file.write_all(&chunk).context("Failed to write to temp file")?;
            hasher.update(&chunk);
            downloaded += chunk.len() as u64;
        }

        file.flush().context("Failed to flush temp file")?;
        drop(file);
        debug!("{:?}: received {} / {:?} bytes", model_type, downloaded, total_size);

        let hash = format!("{:x}", hasher.finalize());
        if let Some(expected_hash) = model_type.expected_sha256() {
            if hash != expected_hash {
                std::fs::remove_file(&temp_path).ok();
                anyhow::bail!(
                    "Checksum mismatch for {}: expected {}, got {}",
                    model_type.filename(),
                    expected_hash,
                    hash
                );
            }
            info!("Checksum verified for {}", model_type.display_name());
        }

        std::fs::rename(&temp_path, path)
            .context("Failed to move downloaded file to final location")?;

        Ok(())
    }

    fn update_manifest_for_model(&self, model_type: ModelType) -> Result<()> {
        let mut manifest = self.load_manifest().unwrap_or_default();

        let path = self.model_path(model_type);
        let data = std::fs::read(&path)?;
        let hash = format!("{:x}", Sha256::digest(&data));

        let model_info = ModelInfo {
            model_type: format!("{:?}", model_type),
            filename: model_type.filename().to_string(),
            size_bytes: data.len() as u64,
            sha256: Some(hash),
            downloaded_at: unix_timestamp(),
        };

        if let Some(existing) = manifest
            .models
            .iter_mut()
            .find(|m| m.filename == model_info.filename)
        {
            *existing = model_info;
        } else {
            manifest.models.push(model_info);
        }

        self.save_manifest(&manifest)
    }

    /// Load the model manifest
    pub fn load_manifest(&self) -> Result<ModelManifest> {
        let manifest_path = self.models_dir.join("manifest.json");
        if manifest_path.exists() {
            let content = std::fs::read_to_string(&manifest_path)?;
            let manifest: ModelManifest = serde_json::from_str(&content)?;
            Ok(manifest)
        } else {
            Ok(ModelManifest::default())
        }
    }

    /// Save the model manifest
    pub fn save_manifest(&self, manifest: &ModelManifest) -> Result<()> {
        let manifest_path = self.models_dir.join("manifest.json");
        let content = serde_json::to_string_pretty(manifest)?;
        std::fs::write(manifest_path, content)?;
        Ok(())
    }
}

/// ONNX Runtime session with a single image input
pub struct OnnxSession {
    session: Session,
    input_name: String,
}

impl OnnxSession {
    /// Create a new ONNX session from a model file
    pub fn new(model_path: &Path) -> Result<Self> {
        if !model_path.exists() {
            anyhow::bail!("ONNX model not found: {}", model_path.display());
        }

        info!("Loading ONNX model from {:?}", model_path);

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(4)?
            .commit_from_file(model_path)
            .with_context(|| format!("Failed to load ONNX model from {}", model_path.display()))?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .unwrap_or_else(|| "x".to_string());

        debug!("Model loaded. Input: {}", input_name);

        Ok(Self {
            session,
            input_name,
        })
    }

    /// Run the model on an NCHW tensor and return its first output
    pub fn run(&mut self, input: Array4<f32>) -> Result<ArrayD<f32>> {
        let input_value = Value::from_array(input).context("Failed to create input tensor")?;

        let outputs = self
            .session
            .run(ort::inputs![self.input_name.as_str() => input_value])
            .context("Inference failed")?;

        let output = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?;

        Ok(output.to_owned())
    }
}

/// Seconds since the Unix epoch, as a string
fn unix_timestamp() -> String {
    use std::time::SystemTime;

    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
        .to_string()
}
