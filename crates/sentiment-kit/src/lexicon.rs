use lexicon_sentiment::{PolarityScores, SentimentIntensityAnalyzer, VaderLexicon};
use std::path::Path;

use crate::config::ResourceConfig;
use crate::error::{Result, SentimentError};

/// VADER scoring; positive iff the compound score is above zero.
pub struct LexiconSentimentAdapter {
    analyzer: SentimentIntensityAnalyzer,
}

impl LexiconSentimentAdapter {
    pub fn new(analyzer: SentimentIntensityAnalyzer) -> Self {
        Self { analyzer }
    }

    /// Load a `vader_lexicon.txt` style file.
    pub fn from_lexicon_file(path: &Path) -> Result<Self> {
        let lexicon = VaderLexicon::from_file(path)
            .map_err(|e| SentimentError::resource("VADER lexicon", e))?;
        tracing::info!("Loaded {} VADER lexicon entries from {}", lexicon.len(), path.display());
        Ok(Self::new(SentimentIntensityAnalyzer::new(lexicon)))
    }

    /// Load the lexicon from the resource cache.
    pub fn from_config(config: &ResourceConfig) -> Result<Self> {
        Self::from_lexicon_file(&config.lexicon_path())
    }

    pub fn polarity_scores(&self, text: &str) -> PolarityScores {
        self.analyzer.polarity_scores(text)
    }

    pub fn is_positive(&self, text: &str) -> bool {
        let scores = self.polarity_scores(text);
        tracing::debug!(compound = scores.compound, "scored text with VADER");
        scores.compound > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> LexiconSentimentAdapter {
        let lexicon = VaderLexicon::from_entries([("love", 3.2), ("hate", -2.7), ("okay", 0.9)]);
        LexiconSentimentAdapter::new(SentimentIntensityAnalyzer::new(lexicon))
    }

    #[test]
    fn test_positive_and_negative() {
        let adapter = adapter();
        assert!(adapter.is_positive("I love this!"));
        assert!(!adapter.is_positive("I hate this."));
    }

    #[test]
    fn test_neutral_text_is_not_positive() {
        let adapter = adapter();
        assert_eq!(adapter.polarity_scores("the table").compound, 0.0);
        assert!(!adapter.is_positive("the table"));
        assert!(!adapter.is_positive(""));
    }

    #[test]
    fn test_flag_matches_compound_sign() {
        let adapter = adapter();
        for text in ["okay", "not okay", "I LOVE it", "love but hate"] {
            let compound = adapter.polarity_scores(text).compound;
            assert_eq!(adapter.is_positive(text), compound > 0.0, "text: {}", text);
        }
    }

    #[test]
    fn test_missing_file_is_resource_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let result = LexiconSentimentAdapter::from_lexicon_file(&temp.path().join("absent.txt"));
        assert!(matches!(result, Err(SentimentError::ResourceUnavailable { .. })));
    }
}
