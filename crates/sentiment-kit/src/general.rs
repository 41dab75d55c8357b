use lexicon_sentiment::pattern::PatternLexicon;
use lexicon_sentiment::{PatternAnalyzer, Sentiment};
use std::path::Path;

use crate::config::ResourceConfig;
use crate::error::{Result, SentimentError};

/// General-purpose polarity scoring; positive iff polarity is above zero.
pub struct GeneralSentimentAdapter {
    analyzer: PatternAnalyzer,
}

impl GeneralSentimentAdapter {
    pub fn new(analyzer: PatternAnalyzer) -> Self {
        Self { analyzer }
    }

    /// Use the subset lexicon compiled into the binary.
    ///
    /// Covers common opinion words only; prefer [`Self::from_config`] once
    /// the full lexicon has been downloaded.
    pub fn bundled() -> Result<Self> {
        let analyzer =
            PatternAnalyzer::bundled().map_err(|e| SentimentError::resource("bundled lexicon", e))?;
        Ok(Self::new(analyzer))
    }

    /// Parse a tab-separated lexicon (`word polarity subjectivity intensity tag`, `RB` marks modifiers).
    pub fn from_lexicon_str(content: &str) -> Result<Self> {
        let lexicon =
            PatternLexicon::parse(content).map_err(|e| SentimentError::resource("sentiment lexicon", e))?;
        Ok(Self::new(PatternAnalyzer::new(lexicon)))
    }

    /// Load a lexicon file, either pattern's `en-sentiment.xml` or the
    /// tab-separated form accepted by [`Self::from_lexicon_str`].
    pub fn from_lexicon_file(path: &Path) -> Result<Self> {
        let lexicon =
            PatternLexicon::from_file(path).map_err(|e| SentimentError::resource("sentiment lexicon", e))?;
        tracing::info!("Loaded {} sentiment lexicon entries from {}", lexicon.len(), path.display());
        Ok(Self::new(PatternAnalyzer::new(lexicon)))
    }

    /// Load the full lexicon from the resource cache, falling back to the
    /// bundled subset when it has not been downloaded.
    pub fn from_config(config: &ResourceConfig) -> Result<Self> {
        let path = config.pattern_lexicon_path();
        if path.exists() {
            return Self::from_lexicon_file(&path);
        }
        tracing::warn!(
            "{} not found, using the bundled sentiment lexicon",
            path.display()
        );
        Self::bundled()
    }

    pub fn sentiment(&self, text: &str) -> Sentiment {
        self.analyzer.sentiment(text)
    }

    pub fn is_positive(&self, text: &str) -> bool {
        let polarity = self.analyzer.polarity(text);
        tracing::debug!(polarity, "scored text with pattern lexicon");
        polarity > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_loads() {
        let adapter = GeneralSentimentAdapter::bundled().unwrap();
        assert!(adapter.is_positive("What a good movie"));
        assert!(!adapter.is_positive("What a bad movie"));
    }

    #[test]
    fn test_no_opinion_words_is_not_positive() {
        let adapter = GeneralSentimentAdapter::bundled().unwrap();
        let sentiment = adapter.sentiment("The train leaves at noon");
        assert_eq!(sentiment.polarity, 0.0);
        assert!(sentiment.assessments.is_empty());
        assert!(!adapter.is_positive("The train leaves at noon"));
    }

    #[test]
    fn test_negation_flips() {
        let adapter = GeneralSentimentAdapter::bundled().unwrap();
        assert!(!adapter.is_positive("This is not good"));
    }

    #[test]
    fn test_custom_lexicon() {
        let adapter = GeneralSentimentAdapter::from_lexicon_str("splendid\t0.9\t1.0\t1.0\tJJ\n").unwrap();
        assert!(adapter.is_positive("splendid"));
        assert!(!adapter.is_positive("good"));
    }

    const XML_LEXICON: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<sentiment>
<word form="sorry" wordnet_id="a-01" pos="JJ" sense="feeling regret" polarity="-0.5" subjectivity="1.0" intensity="1.0" confidence="0.9" />
<word form="sorry" wordnet_id="a-02" pos="JJ" sense="pitiful" polarity="-0.5" subjectivity="0.7" intensity="1.0" confidence="0.9" />
<word form="truly" wordnet_id="r-01" pos="RB" sense="in fact" polarity="0.0" subjectivity="0.5" intensity="1.5" confidence="0.9" />
</sentiment>
"#;

    fn config_in(cache_dir: &Path) -> ResourceConfig {
        ResourceConfig {
            cache_dir: cache_dir.to_path_buf(),
            ..ResourceConfig::default()
        }
    }

    #[test]
    fn test_xml_lexicon_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("en-sentiment.xml");
        std::fs::write(&path, XML_LEXICON).unwrap();

        let adapter = GeneralSentimentAdapter::from_lexicon_file(&path).unwrap();
        assert!(!adapter.is_positive("I am sorry"));
        assert!(adapter.is_positive("truly not sorry"));
        // Words outside the file are unknown
        assert!(!adapter.is_positive("good"));
    }

    #[test]
    fn test_missing_lexicon_file_is_resource_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let result = GeneralSentimentAdapter::from_lexicon_file(&temp.path().join("absent.xml"));
        assert!(matches!(result, Err(SentimentError::ResourceUnavailable { .. })));
    }

    #[test]
    fn test_config_prefers_downloaded_lexicon() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = config_in(temp.path());
        let path = config.pattern_lexicon_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, XML_LEXICON).unwrap();

        let adapter = GeneralSentimentAdapter::from_config(&config).unwrap();
        assert_eq!(adapter.sentiment("sorry").polarity, -0.5);
        assert_eq!(adapter.sentiment("good").polarity, 0.0);
    }

    #[test]
    fn test_config_falls_back_to_bundled() {
        let temp = tempfile::TempDir::new().unwrap();
        let adapter = GeneralSentimentAdapter::from_config(&config_in(temp.path())).unwrap();
        assert!(adapter.is_positive("What a good movie"));
    }

    #[test]
    fn test_malformed_lexicon_is_resource_error() {
        let result = GeneralSentimentAdapter::from_lexicon_str("broken line\n");
        assert!(matches!(result, Err(SentimentError::ResourceUnavailable { .. })));
    }
}
