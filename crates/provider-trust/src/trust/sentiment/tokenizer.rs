/// Tokens that invert the polarity of the next lexicon hit.
///
/// Apostrophe contractions never reach this list: `expand_contractions` rewrites them to
/// `not` first. The apostrophe-less spellings common in reviews are listed as written.
const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "neither", "nor", "nowhere", "hardly",
    "barely", "scarcely", "cannot", "dont", "doesnt", "didnt", "isnt", "wasnt", "arent",
    "werent", "wouldnt", "shouldnt", "couldnt", "havent", "hasnt",
];

/// Irregular `n't` forms whose stem is not a word on its own.
const IRREGULAR_CONTRACTIONS: &[(&str, &str)] = &[
    ("won't", "will not"),
    ("won’t", "will not"),
    ("can't", "can not"),
    ("can’t", "can not"),
    ("shan't", "shall not"),
    ("shan’t", "shall not"),
];

/// Rewrite `n't` contractions in lower-cased text to a separate `not`, so `doesn't` becomes
/// `does not` and `won't` becomes `will not`.
pub(crate) fn expand_contractions(text: &str) -> String {
    let mut expanded = text.to_string();
    for (contraction, replacement) in IRREGULAR_CONTRACTIONS {
        expanded = expanded.replace(contraction, replacement);
    }
    expanded.replace("n't", " not").replace("n’t", " not")
}

/// Split lower-cased text into word tokens on anything that is not alphanumeric or `_`.
pub(crate) fn tokenize(text: &str) -> Vec<&str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| !token.is_empty())
        .collect()
}

pub(crate) fn is_negation(token: &str) -> bool {
    NEGATIONS.contains(&token)
}
