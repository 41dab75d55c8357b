use std::path::{Path, PathBuf};
use std::str::FromStr;

use sentiment_models::Device;

/// Binary SST-2 classifier checkpoint.
pub const DEFAULT_CLASSIFIER_MODEL: &str = "distilbert-base-uncased-finetuned-sst-2-english";
/// Uncased WordPiece vocabulary.
pub const DEFAULT_TOKENIZER_MODEL: &str = "distilbert-base-uncased";
pub const DEFAULT_LEXICON_URL: &str =
    "https://raw.githubusercontent.com/cjhutto/vaderSentiment/master/vaderSentiment/vader_lexicon.txt";

/// Full pattern/TextBlob adjective lexicon.
pub const DEFAULT_PATTERN_LEXICON_URL: &str =
    "https://raw.githubusercontent.com/sloria/TextBlob/dev/src/textblob/en/en-sentiment.xml";

const LEXICON_FILE: &str = "vader_lexicon.txt";
const PATTERN_LEXICON_FILE: &str = "en-sentiment.xml";

/// Where inference runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceChoice {
    #[default]
    Cpu,
    Cuda(usize),
    Metal(usize),
}

impl DeviceChoice {
    /// Fails when candle was built without support for the accelerator.
    pub fn to_device(self) -> anyhow::Result<Device> {
        Ok(match self {
            Self::Cpu => Device::Cpu,
            Self::Cuda(ordinal) => Device::new_cuda(ordinal)?,
            Self::Metal(ordinal) => Device::new_metal(ordinal)?,
        })
    }
}

impl FromStr for DeviceChoice {
    type Err = ConfigError;

    /// `cpu`, `cuda`, `cuda:1`, `metal`, `metal:0`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        let (kind, ordinal) = match lowered.split_once(':') {
            Some((kind, ordinal)) => {
                let ordinal = ordinal
                    .parse()
                    .map_err(|_| ConfigError::InvalidDevice(s.to_string()))?;
                (kind, ordinal)
            }
            None => (lowered.as_str(), 0),
        };

        match kind {
            "cpu" if ordinal == 0 => Ok(Self::Cpu),
            "cuda" | "gpu" => Ok(Self::Cuda(ordinal)),
            "metal" => Ok(Self::Metal(ordinal)),
            _ => Err(ConfigError::InvalidDevice(s.to_string())),
        }
    }
}

/// Resource locations, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ResourceConfig {
    /// Hugging Face repo id of the sentiment classifier
    pub classifier_model: String,
    /// Hugging Face repo id of the subword tokenizer
    pub tokenizer_model: String,
    /// Source of the VADER lexicon
    pub lexicon_url: String,
    /// Source of the general-purpose (pattern) lexicon
    pub pattern_lexicon_url: String,
    /// Root directory for downloaded models and lexicons
    pub cache_dir: PathBuf,
    pub device: DeviceChoice,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            classifier_model: DEFAULT_CLASSIFIER_MODEL.to_string(),
            tokenizer_model: DEFAULT_TOKENIZER_MODEL.to_string(),
            lexicon_url: DEFAULT_LEXICON_URL.to_string(),
            pattern_lexicon_url: DEFAULT_PATTERN_LEXICON_URL.to_string(),
            cache_dir: default_cache_dir(),
            device: DeviceChoice::default(),
        }
    }
}

impl ResourceConfig {
    /// Load configuration from environment variables.
    ///
    /// All variables are optional:
    /// - `SENTIMENT_CLASSIFIER_MODEL`: classifier repo id
    /// - `SENTIMENT_TOKENIZER_MODEL`: tokenizer repo id
    /// - `SENTIMENT_LEXICON_URL`: VADER lexicon URL
    /// - `SENTIMENT_PATTERN_LEXICON_URL`: pattern lexicon URL
    /// - `SENTIMENT_CACHE_DIR`: cache root (supports ~ for home directory)
    /// - `SENTIMENT_DEVICE`: `cpu`, `cuda[:N]` or `metal[:N]`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let device = match var("SENTIMENT_DEVICE") {
            Some(value) => value.parse()?,
            None => defaults.device,
        };

        Ok(Self {
            classifier_model: var("SENTIMENT_CLASSIFIER_MODEL").unwrap_or(defaults.classifier_model),
            tokenizer_model: var("SENTIMENT_TOKENIZER_MODEL").unwrap_or(defaults.tokenizer_model),
            lexicon_url: var("SENTIMENT_LEXICON_URL").unwrap_or(defaults.lexicon_url),
            pattern_lexicon_url: var("SENTIMENT_PATTERN_LEXICON_URL")
                .unwrap_or(defaults.pattern_lexicon_url),
            cache_dir: var("SENTIMENT_CACHE_DIR")
                .map(|dir| expand_tilde(&dir))
                .unwrap_or(defaults.cache_dir),
            device,
        })
    }

    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = cache_dir.into();
        self
    }

    pub fn with_device(mut self, device: DeviceChoice) -> Self {
        self.device = device;
        self
    }

    pub fn classifier_dir(&self) -> PathBuf {
        model_dir(&self.cache_dir, &self.classifier_model)
    }

    pub fn tokenizer_dir(&self) -> PathBuf {
        model_dir(&self.cache_dir, &self.tokenizer_model)
    }

    pub fn tokenizer_path(&self) -> PathBuf {
        self.tokenizer_dir().join("tokenizer.json")
    }

    pub fn lexicon_path(&self) -> PathBuf {
        self.cache_dir.join("lexicons").join(LEXICON_FILE)
    }

    pub fn pattern_lexicon_path(&self) -> PathBuf {
        self.cache_dir.join("lexicons").join(PATTERN_LEXICON_FILE)
    }
}

/// `org/name` repo ids become a single `org--name` directory.
fn model_dir(cache_dir: &Path, repo: &str) -> PathBuf {
    cache_dir.join("models").join(repo.replace('/', "--"))
}

fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("sentiment-kit")
}

/// Expand ~ or ~/ prefix to the user's home directory.
fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from("~"))
    } else if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path))
    } else {
        PathBuf::from(path)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unrecognized device {0:?} (expected cpu, cuda[:N] or metal[:N])")]
    InvalidDevice(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = ResourceConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.classifier_model, DEFAULT_CLASSIFIER_MODEL);
        assert_eq!(config.tokenizer_model, DEFAULT_TOKENIZER_MODEL);
        assert_eq!(config.device, DeviceChoice::Cpu);
        assert_eq!(config.pattern_lexicon_url, DEFAULT_PATTERN_LEXICON_URL);
        assert!(config.cache_dir.ends_with("sentiment-kit"));
    }

    #[test]
    fn test_overrides() {
        let config = ResourceConfig::from_lookup(lookup(&[
            ("SENTIMENT_CLASSIFIER_MODEL", "org/custom-sst2"),
            ("SENTIMENT_CACHE_DIR", "/tmp/sentiment"),
            ("SENTIMENT_DEVICE", "cuda:1"),
            ("SENTIMENT_PATTERN_LEXICON_URL", "https://example.org/en-sentiment.xml"),
        ]))
        .unwrap();

        assert_eq!(config.device, DeviceChoice::Cuda(1));
        assert_eq!(
            config.classifier_dir(),
            PathBuf::from("/tmp/sentiment/models/org--custom-sst2")
        );
        assert_eq!(
            config.tokenizer_path(),
            PathBuf::from("/tmp/sentiment/models/distilbert-base-uncased/tokenizer.json")
        );
        assert_eq!(
            config.lexicon_path(),
            PathBuf::from("/tmp/sentiment/lexicons/vader_lexicon.txt")
        );
        assert_eq!(config.pattern_lexicon_url, "https://example.org/en-sentiment.xml");
        assert_eq!(
            config.pattern_lexicon_path(),
            PathBuf::from("/tmp/sentiment/lexicons/en-sentiment.xml")
        );
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = ResourceConfig::from_lookup(lookup(&[("SENTIMENT_TOKENIZER_MODEL", "  ")])).unwrap();
        assert_eq!(config.tokenizer_model, DEFAULT_TOKENIZER_MODEL);
    }

    #[test]
    fn test_invalid_device() {
        let err = ResourceConfig::from_lookup(lookup(&[("SENTIMENT_DEVICE", "tpu")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDevice(_)));
    }

    #[test]
    fn test_device_parsing() {
        assert_eq!("cpu".parse::<DeviceChoice>().unwrap(), DeviceChoice::Cpu);
        assert_eq!("CUDA".parse::<DeviceChoice>().unwrap(), DeviceChoice::Cuda(0));
        assert_eq!("metal:2".parse::<DeviceChoice>().unwrap(), DeviceChoice::Metal(2));
        assert!("cuda:x".parse::<DeviceChoice>().is_err());
        assert!("cpu:1".parse::<DeviceChoice>().is_err());
    }

    #[test]
    fn test_cpu_device() {
        assert!(DeviceChoice::Cpu.to_device().unwrap().is_cpu());
    }

    #[test]
    fn test_expand_tilde() {
        let expanded = expand_tilde("~/models");
        assert!(!expanded.starts_with("~") || dirs::home_dir().is_none());
        assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
    }
}
