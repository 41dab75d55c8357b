#![deny(clippy::all)]

mod labels;
mod model;
mod tokenizer;

// Re-export for external use
pub use candle_core::Device;
pub use labels::{label_names, rank_labels, LabelScore};
pub use model::ClassifierModel;
pub use tokenizer::{BatchTokenizer, EncodedRow, FixedWidthEncoder, TokenBatch};

use std::path::Path;

/// Label the SST-2 style checkpoints use for the positive class.
pub const POSITIVE_LABEL: &str = "POSITIVE";

// Auto-initialize logging for debug builds
#[cfg(feature = "debug")]
#[ctor::ctor]
fn init_native_logging() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .try_init();
}

/// Binary sentiment classifier backed by a DistilBERT checkpoint.
///
/// Wraps ClassifierModel with a convenient API for loading models from files.
///
/// # Example
/// ```ignore
/// use sentiment_models::{Device, SentimentClassifier};
/// use std::path::Path;
///
/// let classifier = SentimentClassifier::new();
/// classifier.load_model_from_dir(
///     Path::new("models/distilbert-base-uncased-finetuned-sst-2-english"),
///     Path::new("models/distilbert-base-uncased/tokenizer.json"),
///     &Device::Cpu,
/// )?;
///
/// let ranked = classifier.predict("What a great film")?;
/// println!("{} ({:.2})", ranked[0].label, ranked[0].score);
/// ```
pub struct SentimentClassifier {
    model: ClassifierModel,
}

impl SentimentClassifier {
    /// Create a new, unloaded classifier.
    ///
    /// Call `load_model_from_dir()` before `predict()`.
    pub fn new() -> Self {
        Self {
            model: ClassifierModel::new(),
        }
    }

    /// Load model files from disk.
    ///
    /// # Arguments
    /// * `model_dir` - directory containing `config.json` and `model.safetensors`
    /// * `tokenizer_path` - `tokenizer.json` for the checkpoint's vocabulary. Fine-tuned
    ///   checkpoints often ship only `vocab.txt`, so the base model's tokenizer is used.
    /// * `device` - device to run inference on
    pub fn load_model_from_dir(
        &self,
        model_dir: &Path,
        tokenizer_path: &Path,
        device: &Device,
    ) -> anyhow::Result<()> {
        use std::fs;

        let config_path = model_dir.join("config.json");
        let weights_path = model_dir.join("model.safetensors");

        let config_json = fs::read_to_string(&config_path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", config_path.display(), e))?;

        let tokenizer_json = fs::read_to_string(tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", tokenizer_path.display(), e))?;

        let model_weights = fs::read(&weights_path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", weights_path.display(), e))?;

        self.model
            .load_model(&config_json, &tokenizer_json, &model_weights, device)
    }

    /// Load model from provided data (for cases where you have the data in memory).
    pub fn load_model(
        &self,
        config_json: &str,
        tokenizer_json: &str,
        model_weights: &[u8],
        device: &Device,
    ) -> anyhow::Result<()> {
        self.model
            .load_model(config_json, tokenizer_json, model_weights, device)
    }

    pub fn is_loaded(&self) -> bool {
        self.model.is_loaded()
    }

    /// Ranked label probabilities for one text.
    pub fn predict(&self, text: &str) -> anyhow::Result<Vec<LabelScore>> {
        self.model.predict(text)
    }

    /// Ranked label probabilities for each text, in input order.
    pub fn predict_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<LabelScore>>> {
        self.model.predict_batch(texts)
    }
}

impl Default for SentimentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

// Unit tests live next to each module; tests needing real weights are in tests/
