use indicatif::{ProgressBar, ProgressStyle};
use sentiment_models::{BatchTokenizer, TokenBatch};
use std::path::Path;

use crate::config::ResourceConfig;
use crate::error::{Result, SentimentError};

/// Whether `tokenize` draws a progress bar on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressMode {
    #[default]
    Visible,
    Hidden,
}

/// Fixed-width subword encoding for model input.
///
/// Every text becomes `[CLS] tokens [SEP]`, truncated on the right and then
/// right-padded to exactly `max_len` ids.
pub struct SubwordTokenizerAdapter {
    tokenizer: BatchTokenizer,
    progress: ProgressMode,
}

impl SubwordTokenizerAdapter {
    pub fn new(tokenizer: BatchTokenizer) -> Self {
        Self {
            tokenizer,
            progress: ProgressMode::default(),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let tokenizer = BatchTokenizer::from_file(path)
            .map_err(|e| SentimentError::resource("subword tokenizer", format!("{:#}", e)))?;
        tracing::info!("Loaded tokenizer from {}", path.display());
        Ok(Self::new(tokenizer))
    }

    /// Load `tokenizer.json` from a model directory.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        Self::from_file(&dir.join("tokenizer.json"))
    }

    pub fn from_config(config: &ResourceConfig) -> Result<Self> {
        Self::from_file(&config.tokenizer_path())
    }

    pub fn with_progress(mut self, progress: ProgressMode) -> Self {
        self.progress = progress;
        self
    }

    pub fn tokenizer(&self) -> &BatchTokenizer {
        &self.tokenizer
    }

    /// Encode `data` into two `data.len() x max_len` matrices.
    ///
    /// Fails as a whole if any text fails; the error carries its index.
    pub fn tokenize<S: AsRef<str>>(&self, data: &[S], max_len: usize) -> Result<TokenBatch> {
        if max_len == 0 {
            return Err(SentimentError::InvalidInput("max_len must be positive".to_string()));
        }
        let encoder = self
            .tokenizer
            .fixed_width(max_len)
            .map_err(|e| SentimentError::InvalidInput(e.to_string()))?;

        let bar = self.progress_bar(data.len() as u64);
        let rows = encode_rows(data, bar, |text| encoder.encode(text))?;

        let mut batch = TokenBatch::new(max_len);
        for row in rows {
            batch.push(row);
        }
        tracing::debug!(rows = batch.len(), max_len, "tokenized batch");
        Ok(batch)
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        match self.progress {
            ProgressMode::Hidden => ProgressBar::hidden(),
            ProgressMode::Visible => {
                let bar = ProgressBar::new(len);
                if let Ok(style) =
                    ProgressStyle::with_template("{prefix} [{bar:40}] {pos}/{len} ({eta})")
                {
                    bar.set_style(style.progress_chars("=> "));
                }
                bar.set_prefix("Tokenizing");
                bar
            }
        }
    }
}

/// Encode each text in order, stopping at the first failure.
///
/// The bar is cleared whether or not every text encodes.
fn encode_rows<S, T, E>(
    data: &[S],
    bar: ProgressBar,
    mut encode: impl FnMut(&str) -> std::result::Result<T, E>,
) -> Result<Vec<T>>
where
    S: AsRef<str>,
    E: Into<anyhow::Error>,
{
    let mut rows = Vec::with_capacity(data.len());
    for (index, text) in data.iter().enumerate() {
        match encode(text.as_ref()) {
            Ok(row) => rows.push(row),
            Err(e) => {
                bar.finish_and_clear();
                return Err(SentimentError::Tokenization {
                    index,
                    reason: format!("{:#}", e.into()),
                });
            }
        }
        bar.inc(1);
    }
    bar.finish_and_clear();
    Ok(rows)
}
