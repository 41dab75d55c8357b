use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;

use crate::{LexiconError, Result};

static WORD_ELEMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<word\b([^>]*?)/?>").expect("word pattern is valid"));

static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([\w:-]+)\s*=\s*"([^"]*)""#).expect("attribute pattern is valid")
});

/// Part-of-speech tag of words that modify the next word.
const MODIFIER_TAG: &str = "RB";

/// Lexicon shipped with the crate.
pub static BUNDLED_LEXICON: &str = include_str!("../../lexicon/en-sentiment.tsv");

/// Scores for a single lexicon word.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WordScore {
    pub polarity: f64,
    pub subjectivity: f64,
    /// Multiplier applied to the next word when this word is a modifier.
    pub intensity: f64,
    /// Adverbs (`RB`) modify the word that follows them.
    pub is_modifier: bool,
}

/// Adjective/adverb polarity lexicon.
///
/// Two formats are read:
/// - tab-separated `word polarity subjectivity intensity pos`, with `#`
///   comment lines, where a later entry for a word replaces an earlier one
///   (the bundled subset);
/// - the full `en-sentiment.xml` of pattern/TextBlob, where every
///   `<word form=".." pos=".." polarity=".." .../>` is one word sense.
#[derive(Debug, Clone, Default)]
pub struct PatternLexicon {
    words: HashMap<String, WordScore>,
}

impl PatternLexicon {
    pub fn bundled() -> Result<Self> {
        Self::parse(BUNDLED_LEXICON)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut words = HashMap::new();

        for (idx, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let columns: Vec<&str> = line.split('\t').collect();
            if columns.len() != 5 {
                return Err(LexiconError::Malformed {
                    line: idx + 1,
                    reason: format!("expected 5 columns, found {}", columns.len()),
                });
            }

            let number = |column: usize| -> Result<f64> {
                columns[column]
                    .trim()
                    .parse()
                    .map_err(|_| LexiconError::Malformed {
                        line: idx + 1,
                        reason: format!("invalid number {:?}", columns[column]),
                    })
            };

            let score = WordScore {
                polarity: number(1)?,
                subjectivity: number(2)?,
                intensity: number(3)?,
                is_modifier: columns[4].trim() == "RB",
            };

            if score.intensity <= 0.0 {
                return Err(LexiconError::Malformed {
                    line: idx + 1,
                    reason: "intensity must be positive".to_string(),
                });
            }

            words.insert(columns[0].trim().to_lowercase(), score);
        }

        if words.is_empty() {
            return Err(LexiconError::Empty);
        }

        Ok(Self { words })
    }

    /// Parse the XML lexicon.
    ///
    /// Senses are averaged per part-of-speech tag and the tags are then
    /// averaged with equal weight. A word with any `RB` sense is a modifier.
    pub fn parse_xml(content: &str) -> Result<Self> {
        // form -> tag -> senses as [polarity, subjectivity, intensity]
        let mut senses: HashMap<String, HashMap<String, Vec<[f64; 3]>>> = HashMap::new();

        for element in WORD_ELEMENT.captures_iter(content) {
            let start = element.get(0).map_or(0, |m| m.start());
            let attributes: HashMap<&str, &str> = ATTRIBUTE
                .captures_iter(&element[1])
                .filter_map(|a| Some((a.get(1)?.as_str(), a.get(2)?.as_str())))
                .collect();

            let Some(form) = attributes.get("form").map(|f| unescape(f)) else {
                continue;
            };
            if form.is_empty() {
                continue;
            }

            let number = |name: &str, default: f64| -> Result<f64> {
                match attributes.get(name) {
                    Some(value) => value.trim().parse().map_err(|_| LexiconError::Malformed {
                        line: content[..start].matches('\n').count() + 1,
                        reason: format!("invalid {} {:?} for {:?}", name, value, form),
                    }),
                    None => Ok(default),
                }
            };
            let sense = [
                number("polarity", 0.0)?,
                number("subjectivity", 0.0)?,
                number("intensity", 1.0)?,
            ];
            let tag = attributes.get("pos").copied().unwrap_or_default().to_string();

            senses
                .entry(form.to_lowercase())
                .or_default()
                .entry(tag)
                .or_default()
                .push(sense);
        }

        let words: HashMap<String, WordScore> = senses
            .into_iter()
            .map(|(form, tags)| {
                let is_modifier = tags.contains_key(MODIFIER_TAG);
                let per_tag: Vec<[f64; 3]> = tags.values().map(|s| mean(s)).collect();
                let [polarity, subjectivity, intensity] = mean(&per_tag);
                let score = WordScore {
                    polarity,
                    subjectivity,
                    intensity,
                    is_modifier,
                };
                (form, score)
            })
            .collect();

        if words.is_empty() {
            return Err(LexiconError::Empty);
        }

        Ok(Self { words })
    }

    /// Read a lexicon file in either format; XML is recognised by a leading `<`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| LexiconError::Io {
            path: path.display().to_string(),
            source,
        })?;
        if content.trim_start().starts_with('<') {
            Self::parse_xml(&content)
        } else {
            Self::parse(&content)
        }
    }

    pub fn get(&self, word: &str) -> Option<&WordScore> {
        self.words.get(word)
    }

    pub fn is_modifier(&self, word: &str) -> bool {
        self.words.get(word).is_some_and(|w| w.is_modifier)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

fn mean(rows: &[[f64; 3]]) -> [f64; 3] {
    let count = rows.len().max(1) as f64;
    let mut sum = [0.0; 3];
    for row in rows {
        for (total, value) in sum.iter_mut().zip(row) {
            *total += value;
        }
    }
    sum.map(|total| total / count)
}

fn unescape(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_lexicon_parses() {
        let lexicon = PatternLexicon::bundled().expect("bundled lexicon should parse");
        assert!(lexicon.len() > 100);
        assert!(lexicon.get("good").unwrap().polarity > 0.0);
        assert!(lexicon.get("bad").unwrap().polarity < 0.0);
        assert!(lexicon.is_modifier("very"));
        assert!(!lexicon.is_modifier("good"));
    }

    #[test]
    fn test_parse_rejects_short_rows() {
        let err = PatternLexicon::parse("# header\ngood\t0.7\t0.6\n").unwrap_err();
        match err {
            LexiconError::Malformed { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_rejects_zero_intensity() {
        assert!(PatternLexicon::parse("very\t0.2\t0.3\t0\tRB").is_err());
    }

    const XML_SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<sentiment language="en" version="1.3">
<word form="good" wordnet_id="a-01123148" pos="JJ" sense="having desirable qualities" polarity="0.7" subjectivity="0.6" intensity="1.0" confidence="0.9" />
<word form="good" wordnet_id="a-01129977" pos="JJ" sense="morally admirable" polarity="0.5" subjectivity="0.6" intensity="1.0" confidence="0.9" />
<word form="sorry" wordnet_id="a-01364008" pos="JJ" polarity="-0.5" subjectivity="1.0" intensity="1.0" confidence="0.9" />
<word form="really" wordnet_id="r-00040353" pos="RB" polarity="0.2" subjectivity="0.2" intensity="1.2" confidence="0.9" />
<word form="rock &amp; roll" pos="NN" polarity="0.4" subjectivity="0.5" />
<word form="well" pos="JJ" polarity="0.6" subjectivity="0.4" />
<word form="well" pos="RB" polarity="0.0" subjectivity="0.0" intensity="1.4" />
</sentiment>"#;

    #[test]
    fn test_parse_xml_averages_senses() {
        let lexicon = PatternLexicon::parse_xml(XML_SAMPLE).unwrap();
        assert_eq!(lexicon.len(), 5);

        let good = lexicon.get("good").unwrap();
        assert!((good.polarity - 0.6).abs() < 1e-9);
        assert!((good.subjectivity - 0.6).abs() < 1e-9);
        assert!(!good.is_modifier);

        assert_eq!(lexicon.get("sorry").unwrap().polarity, -0.5);
        assert!(lexicon.is_modifier("really"));
        assert_eq!(lexicon.get("really").unwrap().intensity, 1.2);
    }

    #[test]
    fn test_parse_xml_averages_across_tags() {
        let lexicon = PatternLexicon::parse_xml(XML_SAMPLE).unwrap();
        let well = lexicon.get("well").unwrap();
        assert!((well.polarity - 0.3).abs() < 1e-9);
        assert!((well.intensity - 1.2).abs() < 1e-9);
        assert!(well.is_modifier);
    }

    #[test]
    fn test_parse_xml_defaults_and_entities() {
        let lexicon = PatternLexicon::parse_xml(XML_SAMPLE).unwrap();
        let phrase = lexicon.get("rock & roll").unwrap();
        assert_eq!(phrase.intensity, 1.0);
    }

    #[test]
    fn test_parse_xml_rejects_bad_numbers() {
        let xml = "<sentiment>\n<word form=\"odd\" polarity=\"high\" />\n</sentiment>";
        match PatternLexicon::parse_xml(xml).unwrap_err() {
            LexiconError::Malformed { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_xml_without_words_is_empty() {
        assert!(matches!(
            PatternLexicon::parse_xml("<sentiment></sentiment>"),
            Err(LexiconError::Empty)
        ));
    }

    #[test]
    fn test_from_file_detects_format() {
        let dir = tempfile::TempDir::new().unwrap();
        let xml_path = dir.path().join("en-sentiment.xml");
        let tsv_path = dir.path().join("custom.tsv");
        std::fs::write(&xml_path, XML_SAMPLE).unwrap();
        std::fs::write(&tsv_path, "splendid\t0.9\t1.0\t1.0\tJJ\n").unwrap();

        assert!(PatternLexicon::from_file(&xml_path).unwrap().get("sorry").is_some());
        assert!(PatternLexicon::from_file(&tsv_path).unwrap().get("splendid").is_some());
        assert!(matches!(
            PatternLexicon::from_file(&dir.path().join("missing.xml")),
            Err(LexiconError::Io { .. })
        ));
    }
}
