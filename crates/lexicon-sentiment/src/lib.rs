//! Rule-based sentiment scoring.
//!
//! Two independent scorers live here:
//! - [`vader`]: VADER intensity analysis over a loadable lexicon, tuned for
//!   short informal text (posts, reviews, chat).
//! - [`pattern`]: general-purpose adjective polarity from the `en-sentiment.xml`
//!   lexicon (or a bundled subset), producing polarity and subjectivity.
//!
//! Neither scorer holds mutable state, so a loaded analyzer can be shared
//! freely between threads.

pub mod pattern;
pub mod vader;

pub use pattern::{Assessment, PatternAnalyzer, Sentiment};
pub use vader::{PolarityScores, SentimentIntensityAnalyzer, VaderLexicon};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("Failed to read lexicon {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed lexicon entry on line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("Lexicon is empty")]
    Empty,
}

pub type Result<T> = std::result::Result<T, LexiconError>;
