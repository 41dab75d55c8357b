use once_cell::sync::Lazy;
use sentiment_models::{Device, SentimentClassifier};
use std::path::PathBuf;

// Shared classifier loaded once for all tests (improves test performance)
pub static TEST_CLASSIFIER: Lazy<SentimentClassifier> = Lazy::new(|| {
    let classifier = SentimentClassifier::new();

    // Populate with the download helper in sentiment-kit, or by hand from Hugging Face
    let models = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("models");
    let model_dir = models.join("distilbert-base-uncased-finetuned-sst-2-english");
    let tokenizer = models.join("distilbert-base-uncased/tokenizer.json");

    classifier
        .load_model_from_dir(&model_dir, &tokenizer, &Device::Cpu)
        .expect("Failed to load classifier");

    classifier
});
