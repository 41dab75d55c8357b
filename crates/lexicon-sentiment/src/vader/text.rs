use std::collections::HashSet;

/// Punctuation runs that are peeled off a word when they lead or trail it.
const PUNCTUATION: &[&str] = &[
    ".", "!", "?", ",", ";", ":", "-", "'", "\"", "!!", "!!!", "??", "???", "?!?", "!?!", "?!?!",
    "!?!?",
];

/// Text split the way VADER sees it.
///
/// Tokens are whitespace separated and single characters are dropped. A
/// token that is a word with one entry of [`PUNCTUATION`] before or after
/// it is reduced to the word; anything else, emoticons included, is kept
/// verbatim.
pub(crate) struct SentiText {
    pub words: Vec<String>,
    pub lowered: Vec<String>,
    /// Some, but not all, words are ALL CAPS.
    pub is_cap_diff: bool,
}

impl SentiText {
    pub fn new(text: &str) -> Self {
        let bare_words = bare_words(text);
        let words: Vec<String> = text
            .split_whitespace()
            .filter(|token| token.chars().count() > 1)
            .map(|token| strip_punctuation(token, &bare_words))
            .collect();
        let lowered = words.iter().map(|w| w.to_lowercase()).collect();
        let is_cap_diff = allcap_differential(&words);

        Self {
            words,
            lowered,
            is_cap_diff,
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }
}

/// Words of at least two characters once all ASCII punctuation is removed.
fn bare_words(text: &str) -> HashSet<String> {
    let without_punctuation: String = text.chars().filter(|c| !c.is_ascii_punctuation()).collect();
    without_punctuation
        .split_whitespace()
        .filter(|w| w.chars().count() > 1)
        .map(str::to_string)
        .collect()
}

fn strip_punctuation(token: &str, bare_words: &HashSet<String>) -> String {
    // Trailing punctuation wins when both forms match
    let trailing = PUNCTUATION.iter().find_map(|p| {
        token
            .strip_suffix(p)
            .filter(|word| bare_words.contains(*word))
    });
    let leading = || {
        PUNCTUATION.iter().find_map(|p| {
            token
                .strip_prefix(p)
                .filter(|word| bare_words.contains(*word))
        })
    };

    trailing.or_else(leading).unwrap_or(token).to_string()
}

fn allcap_differential(words: &[String]) -> bool {
    let allcaps = words.iter().filter(|w| is_upper(w)).count();
    let differential = words.len() - allcaps;
    differential > 0 && differential < words.len()
}

/// Has at least one cased character and no lowercase ones.
pub(crate) fn is_upper(word: &str) -> bool {
    word.chars().any(char::is_uppercase) && !word.chars().any(char::is_lowercase)
}
