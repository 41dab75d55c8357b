//! Sentiment scoring helpers for data pipelines.
//!
//! Four independent adapters, each owning its resource:
//!
//! | Adapter | Output |
//! |---|---|
//! | [`PolarityClassifierAdapter`] | 0/1 from a fine-tuned DistilBERT classifier |
//! | [`LexiconSentimentAdapter`] | `compound > 0` under VADER |
//! | [`GeneralSentimentAdapter`] | `polarity > 0` under the pattern `en-sentiment` lexicon |
//! | [`SubwordTokenizerAdapter`] | fixed-width token ids and attention masks |
//!
//! Resources are located through [`ResourceConfig`] and, with the default
//! `download` feature, fetched by [`download::prepare_all`].
//!
//! ```ignore
//! use sentiment_kit::{ResourceConfig, SubwordTokenizerAdapter};
//!
//! let config = ResourceConfig::from_env()?;
//! let tokenizer = SubwordTokenizerAdapter::from_config(&config)?;
//! let batch = tokenizer.tokenize(&["hello world"], 8)?;
//! assert_eq!(batch.input_ids[0].len(), 8);
//! ```

pub mod classifier;
pub mod config;
#[cfg(feature = "download")]
pub mod download;
pub mod error;
pub mod general;
pub mod lexicon;
pub mod tokenize;

pub use classifier::{PolarityClassifierAdapter, SentimentScore, TextClassifier};
pub use config::{ConfigError, DeviceChoice, ResourceConfig};
pub use error::{Result, SentimentError};
pub use general::GeneralSentimentAdapter;
pub use lexicon::LexiconSentimentAdapter;
pub use tokenize::{ProgressMode, SubwordTokenizerAdapter};

pub use lexicon_sentiment::{PolarityScores, Sentiment};
pub use sentiment_models::{LabelScore, TokenBatch};
