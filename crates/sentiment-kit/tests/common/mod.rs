#![allow(dead_code)]

use once_cell::sync::Lazy;
use sentiment_kit::{
    GeneralSentimentAdapter, LexiconSentimentAdapter, ProgressMode, SubwordTokenizerAdapter,
};
use std::path::PathBuf;

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

// Shared adapters built once for all tests
pub static TOKENIZER: Lazy<SubwordTokenizerAdapter> = Lazy::new(|| {
    SubwordTokenizerAdapter::from_file(&fixture("tokenizer.json"))
        .expect("Failed to load tokenizer fixture")
        .with_progress(ProgressMode::Hidden)
});

pub static LEXICON: Lazy<LexiconSentimentAdapter> = Lazy::new(|| {
    LexiconSentimentAdapter::from_lexicon_file(&fixture("vader_lexicon_sample.txt"))
        .expect("Failed to load lexicon fixture")
});

pub static GENERAL: Lazy<GeneralSentimentAdapter> =
    Lazy::new(|| GeneralSentimentAdapter::bundled().expect("Bundled lexicon is corrupt"));
