//! General-purpose polarity and subjectivity scoring.
//!
//! Polarity comes mostly from adjectives. Each known word produces an
//! [`Assessment`]; adverbs such as "very" scale the word that follows them,
//! negations ("not", "never", "n't") invert and halve it, and exclamation
//! marks boost the preceding assessment. The text's score is the mean over
//! all assessments.

mod lexicon;
mod tokens;

pub use lexicon::{PatternLexicon, WordScore, BUNDLED_LEXICON};

use serde::{Deserialize, Serialize};

use crate::Result;

const NEGATIONS: &[&str] = &["no", "not", "n't", "never"];

/// Polarity multiplier for a negated assessment ("not good" is slightly bad).
const NEGATED_POLARITY: f64 = -0.5;
const EXCLAMATION_BOOST: f64 = 1.25;

const EMOTICONS: &[(&str, f64)] = &[
    ("<3", 1.0),
    (":-d", 1.0),
    (":d", 1.0),
    (":-p", 0.75),
    (":p", 0.75),
    (":-)", 0.5),
    (":)", 0.5),
    ("=)", 0.5),
    (";-)", 0.25),
    (";)", 0.25),
    (":-o", 0.05),
    (":-/", -0.25),
    (":/", -0.25),
    (":-(", -0.75),
    (":(", -0.75),
    (":'(", -1.0),
];

/// One scored span of text, such as "very good" or "not bad".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub words: Vec<String>,
    pub polarity: f64,
    pub subjectivity: f64,
}

/// Polarity in [-1, 1] and subjectivity in [0, 1].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Sentiment {
    pub polarity: f64,
    pub subjectivity: f64,
    pub assessments: Vec<Assessment>,
}

#[derive(Debug)]
struct Pending {
    words: Vec<String>,
    polarity: f64,
    subjectivity: f64,
    intensity: f64,
    negated: bool,
}

impl Pending {
    fn new(word: &str, polarity: f64, subjectivity: f64, intensity: f64) -> Self {
        Self {
            words: vec![word.to_string()],
            polarity,
            subjectivity,
            intensity,
            negated: false,
        }
    }

    fn finish(self) -> Assessment {
        Assessment {
            words: self.words,
            polarity: if self.negated {
                self.polarity * NEGATED_POLARITY
            } else {
                self.polarity
            },
            subjectivity: self.subjectivity,
        }
    }
}

/// Scores text against a [`PatternLexicon`].
#[derive(Debug, Clone)]
pub struct PatternAnalyzer {
    lexicon: PatternLexicon,
}

impl PatternAnalyzer {
    pub fn new(lexicon: PatternLexicon) -> Self {
        Self { lexicon }
    }

    /// Analyzer over the lexicon compiled into this crate.
    pub fn bundled() -> Result<Self> {
        Ok(Self::new(PatternLexicon::bundled()?))
    }

    pub fn sentiment(&self, text: &str) -> Sentiment {
        let assessments = self.assessments(&tokens::tokenize(text));
        if assessments.is_empty() {
            return Sentiment::default();
        }

        let count = assessments.len() as f64;
        let polarity = assessments.iter().map(|a| a.polarity).sum::<f64>() / count;
        let subjectivity = assessments.iter().map(|a| a.subjectivity).sum::<f64>() / count;

        Sentiment {
            polarity: polarity.clamp(-1.0, 1.0),
            subjectivity: subjectivity.clamp(0.0, 1.0),
            assessments,
        }
    }

    pub fn polarity(&self, text: &str) -> f64 {
        self.sentiment(text).polarity
    }

    fn assessments(&self, words: &[String]) -> Vec<Assessment> {
        let mut pending: Vec<Pending> = Vec::new();
        let mut modifier: Option<&str> = None;
        let mut negation: Option<&str> = None;

        for word in words.iter().map(String::as_str) {
            if let Some(score) = self.lexicon.get(word) {
                match (modifier, pending.last_mut()) {
                    // "really good": the modifier's intensity scales this word
                    (Some(_), Some(last)) => {
                        last.words.push(word.to_string());
                        last.polarity = (score.polarity * last.intensity).clamp(-1.0, 1.0);
                        last.subjectivity = (score.subjectivity * last.intensity).clamp(-1.0, 1.0);
                        last.intensity = score.intensity;
                    }
                    _ => pending.push(Pending::new(
                        word,
                        score.polarity,
                        score.subjectivity,
                        score.intensity,
                    )),
                }

                if let (Some(neg), Some(last)) = (negation, pending.last_mut()) {
                    last.words.insert(0, neg.to_string());
                    if last.intensity != 0.0 {
                        last.intensity = 1.0 / last.intensity;
                    }
                    last.negated = true;
                }

                modifier = score.is_modifier.then_some(word);
                negation = NEGATIONS.contains(&word).then_some(word);
                continue;
            }

            if NEGATIONS.contains(&word) {
                negation = Some(word);
            } else if negation.is_some() && word.trim_matches('\'').chars().count() > 1 {
                // Negation survives across one-letter words ("not a good")
                negation = None;
            }

            match (negation, modifier) {
                // "really not good": only adverbs ending in -ly carry the negation
                (Some(neg), Some(m)) if m.ends_with("ly") => {
                    if let Some(last) = pending.last_mut() {
                        last.words.push(neg.to_string());
                        last.negated = true;
                    }
                    negation = None;
                }
                (_, Some(_)) if word.chars().count() > 2 => modifier = None,
                _ => {}
            }

            if word == "!" {
                if let Some(last) = pending.last_mut() {
                    last.words.push("!".to_string());
                    last.polarity = (last.polarity * EXCLAMATION_BOOST).clamp(-1.0, 1.0);
                }
            }

            if word == "(!)" {
                pending.push(Pending::new(word, 0.0, 1.0, 1.0));
            }

            if let Some((_, polarity)) = EMOTICONS.iter().find(|(e, _)| *e == word) {
                pending.push(Pending::new(word, *polarity, 1.0, 1.0));
            }
        }

        pending.into_iter().map(Pending::finish).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> PatternAnalyzer {
        PatternAnalyzer::bundled().unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_single_adjective() {
        let s = analyzer().sentiment("The food was good.");
        assert!(approx(s.polarity, 0.7));
        assert!(approx(s.subjectivity, 0.6));
        assert_eq!(s.assessments.len(), 1);
    }

    #[test]
    fn test_no_known_words() {
        let s = analyzer().sentiment("The table stands in the hall.");
        assert_eq!(s, Sentiment::default());
    }

    #[test]
    fn test_modifier_scales_next_word() {
        let s = analyzer().sentiment("very good");
        assert!(approx(s.polarity, (0.7f64 * 1.3).min(1.0)));
        assert_eq!(s.assessments[0].words, vec!["very", "good"]);
    }

    #[test]
    fn test_negation_halves_and_flips() {
        let s = analyzer().sentiment("not good");
        assert!(approx(s.polarity, -0.35));
        assert_eq!(s.assessments[0].words, vec!["not", "good"]);
    }

    #[test]
    fn test_negation_after_ly_modifier() {
        let s = analyzer().sentiment("really not good");
        assert_eq!(s.assessments.len(), 1);
        assert_eq!(s.assessments[0].words, vec!["really", "not", "good"]);
        assert!(approx(s.polarity, -0.5 * 0.7 * 1.2));
    }

    #[test]
    fn test_negation_after_other_modifier_starts_new_assessment() {
        // "very" does not end in -ly, so "not" negates "good" on its own
        let s = analyzer().sentiment("very not good");
        assert_eq!(s.assessments.len(), 2);
        assert_eq!(s.assessments[1].words, vec!["not", "good"]);
        assert!(approx(s.polarity, (0.2 - 0.35) / 2.0));
    }

    #[test]
    fn test_full_lexicon_words() {
        let xml = r#"<sentiment>
<word form="sorry" pos="JJ" polarity="-0.5" subjectivity="1.0" intensity="1.0" />
<word form="truly" pos="RB" polarity="0.0" subjectivity="0.0" intensity="1.5" />
</sentiment>"#;
        let a = PatternAnalyzer::new(PatternLexicon::parse_xml(xml).unwrap());
        assert!(approx(a.polarity("I am sorry"), -0.5));
        assert!(approx(a.polarity("truly not sorry"), -0.5 * -0.75));
    }

    #[test]
    fn test_negated_contraction() {
        assert!(analyzer().polarity("It isn't bad") > 0.0);
    }

    #[test]
    fn test_negation_survives_short_words() {
        assert!(analyzer().polarity("not a good idea") < 0.0);
    }

    #[test]
    fn test_negation_resets_on_longer_words() {
        assert!(analyzer().polarity("not that it matters, the food was good") > 0.0);
    }

    #[test]
    fn test_exclamation_boost() {
        let a = analyzer();
        let plain = a.polarity("nice");
        let excited = a.polarity("nice!");
        assert!(approx(excited, (plain * 1.25).min(1.0)));
    }

    #[test]
    fn test_emoticon_assessment() {
        assert!(analyzer().polarity("see you tomorrow :)") > 0.0);
        assert!(analyzer().polarity("missed the bus :(") < 0.0);
    }

    #[test]
    fn test_mean_over_assessments() {
        let s = analyzer().sentiment("good food, bad service");
        assert_eq!(s.assessments.len(), 2);
        assert!(approx(s.polarity, 0.0));
    }

    #[test]
    fn test_custom_lexicon() {
        let lexicon = PatternLexicon::parse("meh\t-0.2\t0.4\t1.0\tJJ\n").unwrap();
        let a = PatternAnalyzer::new(lexicon);
        assert!(approx(a.polarity("meh"), -0.2));
    }
}
