//! Sparse token features for the perceptron CRF.

use crate::parser::tokenizer::Token;

/// Feature that fires on every token so each tag keeps a learned prior.
pub const BIAS: &str = "bias";

/// Extract the feature strings for every token of a sentence.
pub fn sentence_features(tokens: &[Token]) -> Vec<Vec<String>> {
    let lowered: Vec<String> = tokens.iter().map(Token::lower).collect();
    (0..tokens.len())
        .map(|i| token_features(&tokens[i].text, &lowered, i))
        .collect()
}

fn token_features(raw: &str, lowered: &[String], i: usize) -> Vec<String> {
    let word = &lowered[i];
    let prev = if i > 0 { lowered[i - 1].as_str() } else { "<s>" };
    let next = lowered.get(i + 1).map_or("</s>", String::as_str);

    let mut features = Vec::with_capacity(12);
    features.push(BIAS.to_string());
    features.push(format!("w={word}"));
    features.push(format!("pre3={}", prefix(word, 3)));
    features.push(format!("suf3={}", suffix(word, 3)));
    features.push(format!("suf2={}", suffix(word, 2)));
    features.push(format!("shape={}", shape(raw)));
    features.push(format!("w-1={prev}"));
    features.push(format!("w+1={next}"));
    features.push(format!("w-1|w={prev}|{word}"));
    features.push(format!("w|w+1={word}|{next}"));
    if i == 0 {
        features.push("bos".to_string());
    }
    if i + 1 == lowered.len() {
        features.push("eos".to_string());
    }
    features
}

fn prefix(word: &str, n: usize) -> &str {
    match word.char_indices().nth(n) {
        Some((idx, _)) => &word[..idx],
        None => word,
    }
}

fn suffix(word: &str, n: usize) -> &str {
    let count = word.chars().count();
    if count <= n {
        return word;
    }
    match word.char_indices().nth(count - n) {
        Some((idx, _)) => &word[idx..],
        None => word,
    }
}

/// Collapsed character-class shape: "Panic" -> "Xx", "can't" -> "x'x", "24" -> "d".
fn shape(raw: &str) -> String {
    let mut out = String::new();
    for c in raw.chars() {
        let class = if c.is_uppercase() {
            'X'
        } else if c.is_alphabetic() {
            'x'
        } else if c.is_numeric() {
            'd'
        } else {
            c
        };
        if !out.ends_with(class) {
            out.push(class);
        }
    }
    out
}
