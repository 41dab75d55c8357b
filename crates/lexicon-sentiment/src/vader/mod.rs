//! VADER (Valence Aware Dictionary and sEntiment Reasoner) intensity analysis.
//!
//! Scores are built from per-word lexicon valences adjusted by a small set of
//! grammatical and syntactical heuristics: boosters, capitalisation,
//! negation, contrastive "but", and punctuation emphasis.
//!
//! # Example
//! ```
//! use lexicon_sentiment::{SentimentIntensityAnalyzer, VaderLexicon};
//!
//! let lexicon = VaderLexicon::from_entries([("love", 3.2), ("hate", -2.7)]);
//! let analyzer = SentimentIntensityAnalyzer::new(lexicon);
//!
//! assert!(analyzer.polarity_scores("I love this!").compound > 0.0);
//! assert!(analyzer.polarity_scores("I hate this.").compound < 0.0);
//! ```

mod lexicon;
mod rules;
mod text;

pub use lexicon::VaderLexicon;

use serde::{Deserialize, Serialize};

use rules::{
    booster, is_negated, special_idiom, BOOST_DECREMENT, CAPS_INCREMENT, EXCLAMATION_WEIGHT, MAX_EXCLAMATIONS,
    MAX_QUESTION_EMPHASIS, NEGATION_SCALAR, NORMALIZE_ALPHA, QUESTION_WEIGHT,
};
use text::{is_upper, SentiText};

/// Sentiment proportions and the normalised compound score for one text.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PolarityScores {
    pub neg: f64,
    pub neu: f64,
    pub pos: f64,
    /// Normalised sum of valences in [-1, 1].
    pub compound: f64,
}

/// Scores text against a [`VaderLexicon`].
#[derive(Debug, Clone)]
pub struct SentimentIntensityAnalyzer {
    lexicon: VaderLexicon,
}

impl SentimentIntensityAnalyzer {
    pub fn new(lexicon: VaderLexicon) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &VaderLexicon {
        &self.lexicon
    }

    /// Score a text. Texts without any sentiment-bearing words score all zeros.
    pub fn polarity_scores(&self, text: &str) -> PolarityScores {
        let senti = SentiText::new(text);
        let mut sentiments = Vec::with_capacity(senti.len());

        for i in 0..senti.len() {
            let lowered = senti.lowered[i].as_str();

            // Boosters carry no valence of their own
            if booster(lowered).is_some() {
                sentiments.push(0.0);
                continue;
            }

            if lowered == "kind" && senti.lowered.get(i + 1).is_some_and(|w| w == "of") {
                sentiments.push(0.0);
                continue;
            }

            sentiments.push(self.sentiment_valence(&senti, i));
        }

        but_check(&senti.lowered, &mut sentiments);
        score_valence(&sentiments, text)
    }

    fn in_lexicon(&self, word: &str) -> bool {
        self.lexicon.contains(word)
    }

    fn sentiment_valence(&self, senti: &SentiText, i: usize) -> f64 {
        let words = &senti.lowered;
        let Some(mut valence) = self.lexicon.get(&words[i]) else {
            return 0.0;
        };

        if is_upper(&senti.words[i]) && senti.is_cap_diff {
            if valence > 0.0 {
                valence += CAPS_INCREMENT;
            } else {
                valence -= CAPS_INCREMENT;
            }
        }

        for start in 0..3 {
            if i > start && !self.in_lexicon(&words[i - (start + 1)]) {
                let mut scalar = scalar_inc_dec(
                    &senti.words[i - (start + 1)],
                    &words[i - (start + 1)],
                    valence,
                    senti.is_cap_diff,
                );
                if start == 1 {
                    scalar *= 0.95;
                } else if start == 2 {
                    scalar *= 0.9;
                }
                valence += scalar;
                valence = never_check(valence, senti, start, i);
                if start == 2 {
                    valence = idioms_check(valence, &senti.words, i);
                }
            }
        }

        self.least_check(valence, words, i)
    }

    fn least_check(&self, valence: f64, words: &[String], i: usize) -> f64 {
        if i > 1 && !self.in_lexicon(&words[i - 1]) && words[i - 1] == "least" {
            if words[i - 2] != "at" && words[i - 2] != "very" {
                return valence * NEGATION_SCALAR;
            }
        } else if i > 0 && !self.in_lexicon(&words[i - 1]) && words[i - 1] == "least" {
            return valence * NEGATION_SCALAR;
        }
        valence
    }
}

/// Intensity contributed by a preceding word, signed to match `valence`.
fn scalar_inc_dec(word: &str, lowered: &str, valence: f64, is_cap_diff: bool) -> f64 {
    let Some(mut scalar) = booster(lowered) else {
        return 0.0;
    };
    if valence < 0.0 {
        scalar = -scalar;
    }
    if is_upper(word) && is_cap_diff {
        if valence > 0.0 {
            scalar += CAPS_INCREMENT;
        } else {
            scalar -= CAPS_INCREMENT;
        }
    }
    scalar
}

/// Negation and "never so/this" emphasis from the word `start + 1` places back.
///
/// Negation is matched case-insensitively, the "never" phrases only as written.
fn never_check(valence: f64, senti: &SentiText, start: usize, i: usize) -> f64 {
    let raw = |n: usize| senti.words[i - n].as_str();
    let negated = is_negated(&[senti.lowered[i - (start + 1)].as_str()]);

    match start {
        0 if negated => valence * NEGATION_SCALAR,
        1 if raw(2) == "never" && matches!(raw(1), "so" | "this") => valence * 1.5,
        1 if negated => valence * NEGATION_SCALAR,
        // A "so"/"this" right before the word counts even without "never"
        2 if (raw(3) == "never" && matches!(raw(2), "so" | "this"))
            || matches!(raw(1), "so" | "this") =>
        {
            valence * 1.25
        }
        2 if negated => valence * NEGATION_SCALAR,
        _ => valence,
    }
}

/// Only called with `i >= 3`. Phrases are matched as written.
fn idioms_check(mut valence: f64, words: &[String], i: usize) -> f64 {
    let one_zero = format!("{} {}", words[i - 1], words[i]);
    let two_one_zero = format!("{} {} {}", words[i - 2], words[i - 1], words[i]);
    let two_one = format!("{} {}", words[i - 2], words[i - 1]);
    let three_two_one = format!("{} {} {}", words[i - 3], words[i - 2], words[i - 1]);
    let three_two = format!("{} {}", words[i - 3], words[i - 2]);

    for sequence in [&one_zero, &two_one_zero, &two_one, &three_two_one, &three_two] {
        if let Some(idiom) = special_idiom(sequence) {
            valence = idiom;
            break;
        }
    }

    if words.len() - 1 > i {
        let zero_one = format!("{} {}", words[i], words[i + 1]);
        if let Some(idiom) = special_idiom(&zero_one) {
            valence = idiom;
        }
    }

    if words.len() - 1 > i + 1 {
        let zero_one_two = format!("{} {} {}", words[i], words[i + 1], words[i + 2]);
        if let Some(idiom) = special_idiom(&zero_one_two) {
            valence = idiom;
        }
    }

    // Two-word dampeners ("kind of", "sort of")
    if booster(&three_two).is_some() || booster(&two_one).is_some() {
        valence += BOOST_DECREMENT;
    }

    valence
}

/// Words before the first "but" are dampened, words after it are amplified.
fn but_check(words: &[String], sentiments: &mut [f64]) {
    let Some(but_idx) = words.iter().position(|w| w == "but") else {
        return;
    };
    for (idx, sentiment) in sentiments.iter_mut().enumerate() {
        if idx < but_idx {
            *sentiment *= 0.5;
        } else if idx > but_idx {
            *sentiment *= 1.5;
        }
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(MAX_EXCLAMATIONS);
    let questions = text.matches('?').count();

    let question_emphasis = match questions {
        0 | 1 => 0.0,
        2 | 3 => questions as f64 * QUESTION_WEIGHT,
        _ => MAX_QUESTION_EMPHASIS,
    };

    exclamations as f64 * EXCLAMATION_WEIGHT + question_emphasis
}

/// Squash an unbounded score into [-1, 1].
pub fn normalize(score: f64) -> f64 {
    let normalized = score / (score * score + NORMALIZE_ALPHA).sqrt();
    normalized.clamp(-1.0, 1.0)
}

fn score_valence(sentiments: &[f64], text: &str) -> PolarityScores {
    if sentiments.is_empty() {
        return PolarityScores::default();
    }

    let emphasis = punctuation_emphasis(text);
    let mut total: f64 = sentiments.iter().sum();
    if total > 0.0 {
        total += emphasis;
    } else if total < 0.0 {
        total -= emphasis;
    }
    let compound = normalize(total);

    let (mut pos_sum, mut neg_sum, neu_count) = sift_sentiment_scores(sentiments);
    if pos_sum > neg_sum.abs() {
        pos_sum += emphasis;
    } else if pos_sum < neg_sum.abs() {
        neg_sum -= emphasis;
    }

    let denominator = pos_sum + neg_sum.abs() + neu_count;
    PolarityScores {
        neg: round_to((neg_sum / denominator).abs(), 3),
        neu: round_to((neu_count / denominator).abs(), 3),
        pos: round_to((pos_sum / denominator).abs(), 3),
        compound: round_to(compound, 4),
    }
}

/// Offsets each non-zero sentiment by one to keep neutral words from
/// dominating the proportions.
fn sift_sentiment_scores(sentiments: &[f64]) -> (f64, f64, f64) {
    let mut pos_sum = 0.0;
    let mut neg_sum = 0.0;
    let mut neu_count = 0.0;
    for &sentiment in sentiments {
        if sentiment > 0.0 {
            pos_sum += sentiment + 1.0;
        } else if sentiment < 0.0 {
            neg_sum += sentiment - 1.0;
        } else {
            neu_count += 1.0;
        }
    }
    (pos_sum, neg_sum, neu_count)
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
