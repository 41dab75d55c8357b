use anyhow::{Context, Result};
use candle_core::{DType, Device, IndexOp, Tensor, D};
use candle_nn::{linear, ops::softmax, Linear, Module, VarBuilder};
use candle_transformers::models::distilbert::{Config, DistilBertModel};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Mutex;
use tokenizers::{Tokenizer, TruncationParams};

use crate::labels::{label_names, rank_labels, LabelScore};

/// Fields of a sequence-classification `config.json` that the encoder config
/// does not expose.
#[derive(Debug, Deserialize)]
struct HeadConfig {
    dim: usize,
    #[serde(default = "default_max_positions")]
    max_position_embeddings: usize,
    id2label: HashMap<String, String>,
}

fn default_max_positions() -> usize {
    512
}

/// `pre_classifier -> ReLU -> classifier` over the first (`[CLS]`) position.
struct ClassificationHead {
    pre_classifier: Linear,
    classifier: Linear,
}

impl ClassificationHead {
    fn load(vb: &VarBuilder, dim: usize, num_labels: usize) -> Result<Self> {
        Ok(Self {
            pre_classifier: linear(dim, dim, vb.pp("pre_classifier"))?,
            classifier: linear(dim, num_labels, vb.pp("classifier"))?,
        })
    }

    /// hidden_states: [batch, seq_len, dim] -> logits: [batch, num_labels]
    fn forward(&self, hidden_states: &Tensor) -> Result<Tensor> {
        let cls = hidden_states.i((.., 0))?;
        let pooled = self.pre_classifier.forward(&cls)?.relu()?;
        Ok(self.classifier.forward(&pooled)?)
    }
}

/// DistilBERT sentiment classifier: loading and inference.
pub struct ClassifierModel {
    state: Mutex<Option<ModelState>>,
}

struct ModelState {
    encoder: DistilBertModel,
    head: ClassificationHead,
    tokenizer: Tokenizer,
    labels: Vec<String>,
    pad_id: u32,
    device: Device,
}

impl ClassifierModel {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(None),
        }
    }

    /// Initialize the classifier from in-memory model files.
    ///
    /// # Arguments
    /// * `config_json` - `config.json` of a DistilBERT sequence-classification checkpoint
    /// * `tokenizer_json` - matching `tokenizer.json`
    /// * `model_weights` - safetensors weights
    /// * `device` - device to run inference on
    pub fn load_model(
        &self,
        config_json: &str,
        tokenizer_json: &str,
        model_weights: &[u8],
        device: &Device,
    ) -> Result<()> {
        let mut state_guard = self.state.lock().unwrap();

        if state_guard.is_some() {
            return Ok(()); // Already loaded
        }

        let tokenizer = Tokenizer::from_bytes(tokenizer_json.as_bytes())
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;

        let config: Config =
            serde_json::from_str(config_json).context("Failed to parse config.json")?;
        let head_config: HeadConfig = serde_json::from_str(config_json)
            .context("config.json is missing classification fields (dim, id2label)")?;

        let vb = VarBuilder::from_buffered_safetensors(model_weights.to_vec(), DType::F32, device)?;

        *state_guard = Some(build_state(vb, &config, &head_config, tokenizer, device)?);

        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.state.lock().unwrap().is_some()
    }

    /// Classify one text. Labels come back ranked by probability, highest first.
    pub fn predict(&self, text: &str) -> Result<Vec<LabelScore>> {
        let state_guard = self.state.lock().unwrap();
        let state = state_guard
            .as_ref()
            .context("Classifier not loaded. Call load_model() first.")?;

        let encoding = state
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))?;

        let tokens: Vec<u32> = encoding.get_ids().to_vec();
        let mask = vec![encoding.get_attention_mask().to_vec()];

        let token_ids = Tensor::new(&tokens[..], &state.device)?.unsqueeze(0)?; // Add batch dimension
        let blocked = blocked_positions(&mask, &state.device)?;

        let hidden = state.encoder.forward(&token_ids, &blocked)?;
        let logits = state.head.forward(&hidden)?;

        #[cfg(feature = "debug")]
        log::debug!(
            "Classifier logits for {} tokens: {:?}",
            tokens.len(),
            logits.to_vec2::<f32>()?
        );

        let probabilities = softmax(&logits, D::Minus1)?.squeeze(0)?.to_vec1::<f32>()?;
        rank_labels(&probabilities, &state.labels)
    }

    /// Classify multiple texts in one forward pass.
    pub fn predict_batch(&self, texts: &[String]) -> Result<Vec<Vec<LabelScore>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let state_guard = self.state.lock().unwrap();
        let state = state_guard
            .as_ref()
            .context("Classifier not loaded. Call load_model() first.")?;

        let encodings: Vec<_> = texts
            .iter()
            .map(|text| {
                state
                    .tokenizer
                    .encode(text.as_str(), true)
                    .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))
            })
            .collect::<Result<Vec<_>>>()?;

        // Find max length for padding
        let max_len = encodings.iter().map(|e| e.len()).max().unwrap_or(0);

        let mut all_token_ids = Vec::with_capacity(encodings.len());
        let mut all_masks = Vec::with_capacity(encodings.len());

        for encoding in &encodings {
            let mut padded_tokens = encoding.get_ids().to_vec();
            let mut mask = vec![1u32; padded_tokens.len()];

            padded_tokens.resize(max_len, state.pad_id);
            mask.resize(max_len, 0);

            all_token_ids.push(padded_tokens);
            all_masks.push(mask);
        }

        let token_ids = Tensor::new(all_token_ids, &state.device)?;
        let blocked = blocked_positions(&all_masks, &state.device)?;

        let hidden = state.encoder.forward(&token_ids, &blocked)?;
        let logits = state.head.forward(&hidden)?;
        let probabilities = softmax(&logits, D::Minus1)?.to_vec2::<f32>()?;

        probabilities
            .iter()
            .map(|row| rank_labels(row, &state.labels))
            .collect()
    }

    #[cfg(test)]
    fn load_from_var_builder(
        &self,
        vb: VarBuilder,
        config_json: &str,
        tokenizer: Tokenizer,
        device: &Device,
    ) -> Result<()> {
        let config: Config = serde_json::from_str(config_json)?;
        let head_config: HeadConfig = serde_json::from_str(config_json)?;
        *self.state.lock().unwrap() = Some(build_state(vb, &config, &head_config, tokenizer, device)?);
        Ok(())
    }
}

impl Default for ClassifierModel {
    fn default() -> Self {
        Self::new()
    }
}

fn build_state(
    vb: VarBuilder,
    config: &Config,
    head_config: &HeadConfig,
    mut tokenizer: Tokenizer,
    device: &Device,
) -> Result<ModelState> {
    let labels = label_names(&head_config.id2label)?;
    if labels.is_empty() {
        anyhow::bail!("config.json id2label is empty");
    }

    let pad_id = tokenizer
        .get_padding()
        .map(|p| p.pad_id)
        .or_else(|| tokenizer.token_to_id("[PAD]"))
        .unwrap_or(0);

    // Variable-length inputs, capped at the position embedding table
    tokenizer.with_padding(None);
    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length: head_config.max_position_embeddings,
            ..Default::default()
        }))
        .map_err(|e| anyhow::anyhow!("Failed to configure truncation: {}", e))?;

    // Sequence-classification checkpoints nest the encoder under `distilbert.`
    let encoder = DistilBertModel::load(vb.pp("distilbert"), config)
        .context("Failed to load DistilBERT encoder weights")?;
    let head = ClassificationHead::load(&vb, head_config.dim, labels.len())
        .context("Failed to load classification head weights")?;

    Ok(ModelState {
        encoder,
        head,
        tokenizer,
        labels,
        pad_id,
        device: device.clone(),
    })
}

/// Attention mask in the encoder's convention: 1 marks a padding position to
/// be excluded, shaped `[batch, 1, 1, seq_len]` to broadcast over heads.
fn blocked_positions(attention_mask: &[Vec<u32>], device: &Device) -> Result<Tensor> {
    let batch = attention_mask.len();
    let seq_len = attention_mask.first().map_or(0, Vec::len);
    let blocked: Vec<u8> = attention_mask
        .iter()
        .flatten()
        .map(|&m| u8::from(m == 0))
        .collect();
    Ok(Tensor::from_vec(blocked, (batch, 1, 1, seq_len), device)?)
}
