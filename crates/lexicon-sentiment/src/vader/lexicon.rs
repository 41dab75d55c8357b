use std::collections::HashMap;
use std::path::Path;

use crate::{LexiconError, Result};

/// Word valences for the VADER analyzer.
///
/// The on-disk format is the one published with VADER (`vader_lexicon.txt`):
/// one entry per line, tab separated, `token<TAB>mean<TAB>std<TAB>[ratings]`.
/// Only the first two columns are used.
#[derive(Debug, Clone, Default)]
pub struct VaderLexicon {
    valences: HashMap<String, f64>,
}

impl VaderLexicon {
    /// Parse a lexicon from its text form.
    pub fn parse(content: &str) -> Result<Self> {
        let mut valences = HashMap::new();

        for (idx, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let mut columns = line.split('\t');
            let token = columns.next().unwrap_or_default();
            let measure = columns.next().ok_or_else(|| LexiconError::Malformed {
                line: idx + 1,
                reason: format!("expected a tab-separated valence after {:?}", token),
            })?;

            let valence: f64 = measure.trim().parse().map_err(|_| LexiconError::Malformed {
                line: idx + 1,
                reason: format!("invalid valence {:?}", measure),
            })?;

            valences.insert(token.to_string(), valence);
        }

        if valences.is_empty() {
            return Err(LexiconError::Empty);
        }

        Ok(Self { valences })
    }

    /// Read and parse a lexicon file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| LexiconError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Build a lexicon directly from `(token, valence)` pairs.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            valences: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Valence for an already-lowercased token.
    pub fn get(&self, token: &str) -> Option<f64> {
        self.valences.get(token).copied()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.valences.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.valences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valences.is_empty()
    }
}
