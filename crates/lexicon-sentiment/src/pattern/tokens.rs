use once_cell::sync::Lazy;
use regex::Regex;

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        \(!\)                                   # sarcasm marker
        | <3                                    # heart
        | [:;=][\-o']?[)(\]\[dp/\\|*]          # emoticons
        | [\p{L}\p{N}]+(?:['’][\p{L}]+)*        # words, with contractions
        | [!?.,;:]                              # punctuation
        ",
    )
    .expect("token pattern is valid")
});

/// Lowercase word, emoticon and punctuation tokens. Negated contractions are
/// split so that "isn't" yields "is" and "n't".
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut tokens = Vec::new();

    for m in TOKEN_RE.find_iter(&lowered) {
        let token = m.as_str().replace('’', "'");
        match token.strip_suffix("n't") {
            Some(stem) if !stem.is_empty() => {
                tokens.push(stem.to_string());
                tokens.push("n't".to_string());
            }
            _ => tokens.push(token),
        }
    }

    tokens
}
