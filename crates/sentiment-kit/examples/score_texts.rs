//! Score each command-line argument with every adapter.
//!
//! ```text
//! RUST_LOG=info cargo run --example score_texts -- "I love this!" "I hate this."
//! ```

use sentiment_kit::{
    download, GeneralSentimentAdapter, LexiconSentimentAdapter, PolarityClassifierAdapter,
    ResourceConfig, SubwordTokenizerAdapter,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const MAX_LEN: usize = 32;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let texts: Vec<String> = std::env::args().skip(1).collect();
    if texts.is_empty() {
        eprintln!("usage: score_texts <text>...");
        std::process::exit(2);
    }

    let config = ResourceConfig::from_env()?;
    tracing::info!("Resource cache: {}", config.cache_dir.display());
    download::prepare_all(&config).await?;

    let classifier = PolarityClassifierAdapter::from_config(&config)?;
    let lexicon = LexiconSentimentAdapter::from_config(&config)?;
    let general = GeneralSentimentAdapter::from_config(&config)?;
    let tokenizer = SubwordTokenizerAdapter::from_config(&config)?;

    let batch = tokenizer.tokenize(&texts, MAX_LEN)?;
    let lengths = batch.real_lengths();

    println!("{:<40} {:>10} {:>8} {:>8} {:>7}", "text", "classifier", "vader", "general", "tokens");
    for (text, tokens) in texts.iter().zip(lengths) {
        println!(
            "{:<40} {:>10} {:>8} {:>8} {:>7}",
            truncate(text, 40),
            classifier.score(text)?.as_u8(),
            lexicon.is_positive(text),
            general.is_positive(text),
            tokens,
        );
    }

    Ok(())
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let head: String = text.chars().take(width - 3).collect();
        format!("{}...", head)
    }
}
