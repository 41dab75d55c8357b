use sentiment_models::{LabelScore, SentimentClassifier, POSITIVE_LABEL};
use std::path::Path;

use crate::config::ResourceConfig;
use crate::error::{Result, SentimentError};

/// Anything that ranks sentiment labels for a text, best first.
pub trait TextClassifier: Send + Sync {
    fn predict(&self, text: &str) -> anyhow::Result<Vec<LabelScore>>;
}

impl TextClassifier for SentimentClassifier {
    fn predict(&self, text: &str) -> anyhow::Result<Vec<LabelScore>> {
        SentimentClassifier::predict(self, text)
    }
}

/// Binary outcome of the polarity classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SentimentScore {
    NotPositive = 0,
    Positive = 1,
}

impl SentimentScore {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn is_positive(self) -> bool {
        self == Self::Positive
    }
}

impl From<SentimentScore> for u8 {
    fn from(score: SentimentScore) -> Self {
        score.as_u8()
    }
}

/// Collapses a sentiment classifier's ranked labels to 0 or 1.
pub struct PolarityClassifierAdapter {
    classifier: Box<dyn TextClassifier>,
}

impl PolarityClassifierAdapter {
    pub fn new(classifier: Box<dyn TextClassifier>) -> Self {
        Self { classifier }
    }

    /// Load a DistilBERT checkpoint from `model_dir`.
    ///
    /// The tokenizer comes from the configured tokenizer model directory,
    /// unless `model_dir` ships its own `tokenizer.json`.
    pub fn from_dir(model_dir: &Path, config: &ResourceConfig) -> Result<Self> {
        let local_tokenizer = model_dir.join("tokenizer.json");
        let tokenizer_path = if local_tokenizer.exists() {
            local_tokenizer
        } else {
            config.tokenizer_path()
        };

        let device = config
            .device
            .to_device()
            .map_err(|e| SentimentError::resource("device", format!("{:#}", e)))?;

        tracing::info!("Loading sentiment classifier from {}", model_dir.display());
        let classifier = SentimentClassifier::new();
        classifier
            .load_model_from_dir(model_dir, &tokenizer_path, &device)
            .map_err(|e| SentimentError::resource("sentiment classifier", format!("{:#}", e)))?;

        Ok(Self::new(Box::new(classifier)))
    }

    /// Load the configured classifier from the resource cache.
    pub fn from_config(config: &ResourceConfig) -> Result<Self> {
        Self::from_dir(&config.classifier_dir(), config)
    }

    /// Full ranked prediction, highest confidence first.
    pub fn predict(&self, text: &str) -> Result<Vec<LabelScore>> {
        self.classifier
            .predict(text)
            .map_err(|e| SentimentError::Inference(format!("{:#}", e)))
    }

    /// `Positive` iff the top-ranked label is `POSITIVE`.
    pub fn score(&self, text: &str) -> Result<SentimentScore> {
        let ranked = self.predict(text)?;
        let top = ranked
            .first()
            .ok_or_else(|| SentimentError::Inference("classifier returned no labels".to_string()))?;

        tracing::debug!(label = %top.label, score = top.score, "classified text");

        Ok(if top.label == POSITIVE_LABEL {
            SentimentScore::Positive
        } else {
            SentimentScore::NotPositive
        })
    }
}
