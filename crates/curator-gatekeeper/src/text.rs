//! Lexical similarity primitives
//!
//! The duplicate thresholds were tuned against exactly this tokenization:
//! lowercase, replace everything except ASCII word characters, whitespace
//! and Cyrillic letters with spaces, then drop tokens of two characters or
//! fewer.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{HashMap, HashSet};

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"[^0-9A-Za-z_\sа-яё]").unwrap();
}

/// Prepositions and generic insurance words that say nothing about which
/// document a title names
pub const TITLE_STOP_WORDS: &[&str] = &[
    "для", "при", "без", "над", "под", "или", "про", "как", "что", "это", "все", "его",
    "the", "and", "for", "with",
    "страхование", "страхования", "страховой", "страховая", "страховое", "страховые",
    "страховых", "полис", "полиса", "договор", "договора", "правила", "правил",
    "условия", "условий", "программа", "программы", "документ", "информация",
];

/// Split text into comparison tokens
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    NON_WORD
        .replace_all(&lower, " ")
        .split_whitespace()
        .filter(|t| t.chars().count() > 2)
        .map(str::to_string)
        .collect()
}

/// Levenshtein edit distance counted in chars
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let m = a_chars.len();
    let n = b_chars.len();
    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0; n + 1];
    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = if a_chars[i - 1] == b_chars[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[n]
}

/// Normalized edit-distance similarity of two strings, case-folded
///
/// `1 - distance / max_len`; two empty strings are identical (1.0).
pub fn edit_similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein(&a, &b) as f64 / max_len as f64
}

/// Title similarity used by duplicate detection
pub fn title_similarity(a: &str, b: &str) -> f64 {
    edit_similarity(a.trim(), b.trim())
}

/// The most frequent non-stop-word tokens of a title
///
/// Ties keep first-occurrence order.
pub fn title_keywords(title: &str, limit: usize) -> HashSet<String> {
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for (position, token) in tokenize(title).into_iter().enumerate() {
        if TITLE_STOP_WORDS.contains(&token.as_str()) {
            continue;
        }
        counts.entry(token).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<(String, (usize, usize))> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)));
    ranked.into_iter().take(limit).map(|(token, _)| token).collect()
}

/// Jaccard index of two sets; 0.0 when both are empty
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Term-frequency cosine similarity of two texts
pub fn cosine_similarity(a: &str, b: &str) -> f64 {
    let tokens_a = tokenize(a);
    let tokens_b = tokenize(b);
    let tf_a = term_frequencies(&tokens_a);
    let tf_b = term_frequencies(&tokens_b);
    if tf_a.is_empty() || tf_b.is_empty() {
        return 0.0;
    }

    let dot: f64 = tf_a
        .iter()
        .filter_map(|(term, count)| tf_b.get(term).map(|other| count * other))
        .sum();
    let norm_a = tf_a.values().map(|c| c * c).sum::<f64>().sqrt();
    let norm_b = tf_b.values().map(|c| c * c).sum::<f64>().sqrt();

    dot / (norm_a * norm_b)
}

fn term_frequencies(tokens: &[String]) -> HashMap<&str, f64> {
    let mut tf = HashMap::new();
    for token in tokens {
        *tf.entry(token.as_str()).or_insert(0.0) += 1.0;
    }
    tf
}

/// `1 - |a - b| / avg(a, b)`; two empty texts have ratio 1.0
pub fn size_ratio(len_a: usize, len_b: usize) -> f64 {
    let avg = (len_a + len_b) as f64 / 2.0;
    if avg == 0.0 {
        return 1.0;
    }
    1.0 - (len_a as f64 - len_b as f64).abs() / avg
}

/// Text around a byte range, widened by `radius` chars on each side
///
/// `start` and `end` must lie on char boundaries (regex match offsets do).
pub fn context_window(text: &str, start: usize, end: usize, radius: usize) -> &str {
    let from = if radius == 0 {
        start
    } else {
        text[..start]
            .char_indices()
            .rev()
            .take(radius)
            .last()
            .map(|(i, _)| i)
            .unwrap_or(start)
    };
    let to = text[end..]
        .char_indices()
        .nth(radius)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());
    &text[from..to]
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: title similarity is a symmetric score in [0, 1]
        #[test]
        fn test_title_similarity_bounds(a in "[а-яА-Я0-9 ]{0,40}", b in "[а-яА-Я0-9 ]{0,40}") {
            let ab = title_similarity(&a, &b);
            prop_assert!((0.0..=1.0).contains(&ab));
            prop_assert!((ab - title_similarity(&b, &a)).abs() < 1e-12);
        }

        /// Property: cosine similarity of a text with itself is 1 unless it has no tokens
        #[test]
        fn test_cosine_self_similarity(text in "[а-я ]{0,200}") {
            let sim = cosine_similarity(&text, &text);
            if tokenize(&text).is_empty() {
                prop_assert_eq!(sim, 0.0);
            } else {
                prop_assert!((sim - 1.0).abs() < 1e-9);
            }
        }
    }
}
