//! Empirically derived constants and word lists for the VADER heuristics.

/// Valence added by a booster word ("very good").
pub const BOOST_INCREMENT: f64 = 0.293;
/// Valence added by a dampener word ("slightly good").
pub const BOOST_DECREMENT: f64 = -0.293;
/// Valence added by an ALL-CAPS sentiment word in mixed-case text.
pub const CAPS_INCREMENT: f64 = 0.733;
/// Multiplier applied to a negated sentiment word.
pub const NEGATION_SCALAR: f64 = -0.74;
/// Normalisation constant approximating the maximum expected raw score.
pub const NORMALIZE_ALPHA: f64 = 15.0;

pub const EXCLAMATION_WEIGHT: f64 = 0.292;
pub const MAX_EXCLAMATIONS: usize = 4;
pub const QUESTION_WEIGHT: f64 = 0.18;
pub const MAX_QUESTION_EMPHASIS: f64 = 0.96;

const NEGATIONS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "darent", "didnt", "doesnt", "ain't", "aren't",
    "can't", "couldn't", "daren't", "didn't", "doesn't", "dont", "hadnt", "hasnt", "havent",
    "isnt", "mightnt", "mustnt", "neither", "don't", "hadn't", "hasn't", "haven't", "isn't",
    "mightn't", "mustn't", "neednt", "needn't", "never", "none", "nope", "nor", "not", "nothing",
    "nowhere", "oughtnt", "shant", "shouldnt", "uhuh", "wasnt", "werent", "oughtn't", "shan't",
    "shouldn't", "uh-uh", "wasn't", "weren't", "without", "wont", "wouldnt", "won't", "wouldn't",
    "rarely", "seldom", "despite",
];

/// Scalar for intensity-modifying words and phrases, keyed by lowercase text.
pub fn booster(word: &str) -> Option<f64> {
    let scalar = match word {
        "absolutely" | "amazingly" | "awfully" | "completely" | "considerably" | "decidedly"
        | "deeply" | "effing" | "enormously" | "entirely" | "especially" | "exceptionally"
        | "extremely" | "fabulously" | "flipping" | "flippin" | "fricking" | "frickin"
        | "frigging" | "friggin" | "fully" | "fucking" | "greatly" | "hella" | "highly"
        | "hugely" | "incredibly" | "intensely" | "majorly" | "more" | "most" | "particularly"
        | "purely" | "quite" | "really" | "remarkably" | "so" | "substantially" | "thoroughly"
        | "totally" | "tremendously" | "uber" | "unbelievably" | "unusually" | "utterly"
        | "very" => BOOST_INCREMENT,
        "almost" | "barely" | "hardly" | "just enough" | "kind of" | "kinda" | "kindof"
        | "kind-of" | "less" | "little" | "marginally" | "occasionally" | "partly"
        | "scarcely" | "slightly" | "somewhat" | "sort of" | "sorta" | "sortof"
        | "sort-of" => BOOST_DECREMENT,
        _ => return None,
    };
    Some(scalar)
}

/// Idioms whose valence replaces the lexicon value of a word inside them.
pub fn special_idiom(phrase: &str) -> Option<f64> {
    let valence = match phrase {
        "the shit" => 3.0,
        "the bomb" => 3.0,
        "bad ass" => 1.5,
        "yeah right" => -2.0,
        "cut the mustard" => 2.0,
        "kiss of death" => -1.5,
        "hand to mouth" => -2.0,
        _ => return None,
    };
    Some(valence)
}

/// True if any of the lowercase words is a negation.
pub fn is_negated<S: AsRef<str>>(words: &[S]) -> bool {
    words.iter().any(|word| {
        let word = word.as_ref();
        NEGATIONS.contains(&word) || word.contains("n't")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booster_signs() {
        assert_eq!(booster("very"), Some(BOOST_INCREMENT));
        assert_eq!(booster("sort of"), Some(BOOST_DECREMENT));
        assert_eq!(booster("table"), None);
        assert_eq!(booster("slight"), None);
    }

    #[test]
    fn test_negation_includes_contractions() {
        assert!(is_negated(&["not"]));
        assert!(is_negated(&["shouldn't"]));
        assert!(is_negated(&["mightn't've"]));
        assert!(!is_negated(&["good"]));
    }
}
