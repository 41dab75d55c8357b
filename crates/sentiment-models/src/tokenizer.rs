use anyhow::{Context, Result};
use candle_core::{Device, Tensor};
use std::path::Path;
use tokenizers::{PostProcessor, Tokenizer, TruncationDirection, TruncationParams, TruncationStrategy};

/// Token ids and attention masks for a batch, every row exactly `max_len` wide.
///
/// Row `i` belongs to input text `i`. Mask entries are 1 for real tokens
/// (including `[CLS]`/`[SEP]`) and 0 for padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenBatch {
    pub input_ids: Vec<Vec<u32>>,
    pub attention_mask: Vec<Vec<u32>>,
    pub max_len: usize,
}

/// A single fixed-width encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedRow {
    pub input_ids: Vec<u32>,
    pub attention_mask: Vec<u32>,
}

impl TokenBatch {
    pub fn new(max_len: usize) -> Self {
        Self {
            input_ids: Vec::new(),
            attention_mask: Vec::new(),
            max_len,
        }
    }

    pub fn push(&mut self, row: EncodedRow) {
        debug_assert_eq!(row.input_ids.len(), self.max_len);
        self.input_ids.push(row.input_ids);
        self.attention_mask.push(row.attention_mask);
    }

    pub fn len(&self) -> usize {
        self.input_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input_ids.is_empty()
    }

    /// Number of real (unpadded) tokens in each row.
    pub fn real_lengths(&self) -> Vec<usize> {
        self.attention_mask
            .iter()
            .map(|mask| mask.iter().filter(|&&m| m == 1).count())
            .collect()
    }

    /// Convert to `[rows, max_len]` u32 tensors (ids, mask).
    pub fn to_tensors(&self, device: &Device) -> Result<(Tensor, Tensor)> {
        let shape = (self.len(), self.max_len);
        let ids: Vec<u32> = self.input_ids.iter().flatten().copied().collect();
        let mask: Vec<u32> = self.attention_mask.iter().flatten().copied().collect();

        let ids = Tensor::from_vec(ids, shape, device).context("Failed to build id tensor")?;
        let mask = Tensor::from_vec(mask, shape, device).context("Failed to build mask tensor")?;
        Ok((ids, mask))
    }
}

/// Pre-trained subword tokenizer producing fixed-width rows.
///
/// Any padding or truncation stored in the tokenizer JSON is discarded;
/// width is chosen per call instead.
#[derive(Clone)]
pub struct BatchTokenizer {
    tokenizer: Tokenizer,
    pad_id: u32,
}

impl BatchTokenizer {
    pub fn from_bytes(tokenizer_json: &[u8]) -> Result<Self> {
        let tokenizer = Tokenizer::from_bytes(tokenizer_json)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;
        Self::from_tokenizer(tokenizer)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        Self::from_bytes(&json)
    }

    pub fn from_tokenizer(mut tokenizer: Tokenizer) -> Result<Self> {
        // Prefer the pad id the tokenizer was saved with, then the BERT convention
        let pad_id = tokenizer
            .get_padding()
            .map(|p| p.pad_id)
            .or_else(|| tokenizer.token_to_id("[PAD]"))
            .unwrap_or(0);

        tokenizer.with_padding(None);
        tokenizer
            .with_truncation(None)
            .map_err(|e| anyhow::anyhow!("Failed to reset truncation: {}", e))?;

        Ok(Self { tokenizer, pad_id })
    }

    pub fn pad_id(&self) -> u32 {
        self.pad_id
    }

    /// Special tokens added around a single sequence (`[CLS]`, `[SEP]`).
    pub fn special_token_count(&self) -> usize {
        self.tokenizer
            .get_post_processor()
            .map_or(0, |p| p.added_tokens(false))
    }

    /// Smallest `max_len` that still fits the special tokens.
    ///
    /// At exactly this width every text encodes to the special tokens alone.
    pub fn min_width(&self) -> usize {
        self.special_token_count().max(1)
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// An encoder that truncates and pads every text to exactly `max_len`.
    pub fn fixed_width(&self, max_len: usize) -> Result<FixedWidthEncoder> {
        if max_len < self.min_width() {
            anyhow::bail!(
                "max_len {} is too small: {} special tokens need at least {}",
                max_len,
                self.special_token_count(),
                self.min_width()
            );
        }

        let mut tokenizer = self.tokenizer.clone();
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: max_len,
                strategy: TruncationStrategy::LongestFirst,
                direction: TruncationDirection::Right,
                stride: 0,
            }))
            .map_err(|e| anyhow::anyhow!("Failed to configure truncation: {}", e))?;

        Ok(FixedWidthEncoder {
            tokenizer,
            pad_id: self.pad_id,
            max_len,
        })
    }

    /// Encode a whole batch, preserving input order.
    pub fn encode_batch_fixed<S: AsRef<str>>(&self, texts: &[S], max_len: usize) -> Result<TokenBatch> {
        let encoder = self.fixed_width(max_len)?;
        let mut batch = TokenBatch::new(max_len);
        for text in texts {
            batch.push(encoder.encode(text.as_ref())?);
        }
        Ok(batch)
    }
}

/// Tokenizer configured for one output width.
pub struct FixedWidthEncoder {
    tokenizer: Tokenizer,
    pad_id: u32,
    max_len: usize,
}

impl FixedWidthEncoder {
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Encode with special tokens, truncate on the right, then right-pad.
    pub fn encode(&self, text: &str) -> Result<EncodedRow> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))?;

        let mut input_ids = encoding.get_ids().to_vec();
        let mut attention_mask = encoding.get_attention_mask().to_vec();

        // Truncation already bounds the length; guard against a custom post-processor
        input_ids.truncate(self.max_len);
        attention_mask.truncate(self.max_len);

        input_ids.resize(self.max_len, self.pad_id);
        attention_mask.resize(self.max_len, 0);

        Ok(EncodedRow {
            input_ids,
            attention_mask,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = include_str!("../tests/fixtures/tokenizer.json");

    fn tokenizer() -> BatchTokenizer {
        BatchTokenizer::from_bytes(FIXTURE.as_bytes()).unwrap()
    }

    #[test]
    fn test_pad_id_from_vocab() {
        assert_eq!(tokenizer().pad_id(), 0);
        assert_eq!(tokenizer().special_token_count(), 2);
    }

    #[test]
    fn test_hello_world_padded() {
        let batch = tokenizer().encode_batch_fixed(&["hello world"], 8).unwrap();
        assert_eq!(batch.input_ids, vec![vec![2, 5, 6, 3, 0, 0, 0, 0]]);
        assert_eq!(batch.attention_mask, vec![vec![1, 1, 1, 1, 0, 0, 0, 0]]);
        assert_eq!(batch.real_lengths(), vec![4]);
    }

    #[test]
    fn test_truncates_right_keeping_special_tokens() {
        let batch = tokenizer()
            .encode_batch_fixed(&["the quick brown fox"], 4)
            .unwrap();
        assert_eq!(batch.input_ids, vec![vec![2, 11, 12, 3]]);
        assert_eq!(batch.attention_mask, vec![vec![1, 1, 1, 1]]);
    }

    #[test]
    fn test_subwords_and_unknowns() {
        let batch = tokenizer().encode_batch_fixed(&["Tokenizer zebra"], 6).unwrap();
        assert_eq!(batch.input_ids, vec![vec![2, 17, 18, 1, 3, 0]]);
    }

    #[test]
    fn test_rejects_width_below_special_tokens() {
        assert_eq!(tokenizer().min_width(), 2);
        assert!(tokenizer().fixed_width(1).is_err());
        assert!(tokenizer().fixed_width(2).is_ok());
    }

    #[test]
    fn test_width_of_special_tokens_only() {
        let batch = tokenizer().encode_batch_fixed(&["hello world"], 2).unwrap();
        assert_eq!(batch.input_ids, vec![vec![2, 3]]);
        assert_eq!(batch.attention_mask, vec![vec![1, 1]]);
    }

    #[test]
    fn test_to_tensors_shape() {
        let batch = tokenizer()
            .encode_batch_fixed(&["hello", "i love this movie"], 10)
            .unwrap();
        let (ids, mask) = batch.to_tensors(&Device::Cpu).unwrap();
        assert_eq!(ids.dims(), &[2, 10]);
        assert_eq!(mask.dims(), &[2, 10]);
        assert_eq!(ids.to_vec2::<u32>().unwrap(), batch.input_ids);
    }

    #[test]
    fn test_empty_batch_tensors() {
        let batch = tokenizer().encode_batch_fixed::<&str>(&[], 5).unwrap();
        assert!(batch.is_empty());
        let (ids, _) = batch.to_tensors(&Device::Cpu).unwrap();
        assert_eq!(ids.dims(), &[0, 5]);
    }
}
