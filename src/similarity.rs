//! Approximate string matching for garbled OCR lines.
//!
//! Two scoring strategies, both returning 0-100:
//! - `TokenSort` compares the whitespace tokens of both strings in
//!   sorted order, so word order does not matter.
//! - `Partial` slides the shorter string across the longer one and
//!   keeps the best window, so a name buried inside merged UI text
//!   still scores high.

/// Named similarity strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scorer {
    TokenSort,
    Partial,
}

/// Scores two strings with the given strategy (0-100).
pub fn score(scorer: Scorer, a: &str, b: &str) -> u32 {
    match scorer {
        Scorer::TokenSort => token_sort_ratio(a, b),
        Scorer::Partial => partial_ratio(a, b),
    }
}

/// Levenshtein-based similarity (0-100). Empty vs empty is 100.
pub fn ratio(a: &str, b: &str) -> u32 {
    if a == b {
        return 100;
    }
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let max_len = a_chars.len().max(b_chars.len());
    if max_len == 0 {
        return 100;
    }
    let distance = levenshtein(&a_chars, &b_chars);
    (100.0 * (1.0 - distance as f64 / max_len as f64)).round() as u32
}

/// Similarity of the whitespace tokens in sorted order.
pub fn token_sort_ratio(a: &str, b: &str) -> u32 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// Best similarity of the shorter string against every equal-length
/// window of the longer one. Returns 0 when either string is empty.
pub fn partial_ratio(a: &str, b: &str) -> u32 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let (short, long) = if a_chars.len() <= b_chars.len() {
        (a_chars, b_chars)
    } else {
        (b_chars, a_chars)
    };
    if short.is_empty() {
        return 0;
    }
    let mut best = 0;
    for start in 0..=(long.len() - short.len()) {
        let window = &long[start..start + short.len()];
        let distance = levenshtein(&short, window);
        let similarity = (100.0 * (1.0 - distance as f64 / short.len() as f64)).round() as u32;
        if similarity > best {
            best = similarity;
        }
        if best == 100 {
            break;
        }
    }
    best
}

/// Picks the best-scoring choice. Returns `(index, score)`; the first
/// choice wins ties so the caller's priority order is preserved.
pub fn extract_one(query: &str, choices: &[&str], scorer: Scorer) -> Option<(usize, u32)> {
    let mut best: Option<(usize, u32)> = None;
    for (index, choice) in choices.iter().enumerate() {
        let s = score(scorer, query, choice);
        if best.map_or(true, |(_, bs)| s > bs) {
            best = Some((index, s));
        }
    }
    best
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Edit distance over char slices, two-row rolling table.
fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein(&[], &[]), 0);
        assert_eq!(
            levenshtein(&['a', 'b', 'c'], &[]),
            3
        );
        assert_eq!(
            levenshtein(&['a', 'b', 'c'], &['a', 'b', 'd']),
            1
        );
        assert_eq!(
            levenshtein(&['k', 'i', 't', 't', 'e', 'n'], &['s', 'i', 't', 't', 'i', 'n', 'g']),
            3
        );
    }

    #[test]
    fn test_ratio() {
        assert_eq!(ratio("crit rate", "crit rate"), 100);
        assert_eq!(ratio("", ""), 100);
        assert_eq!(ratio("abcd", "wxyz"), 0);
        // one substitution over four chars
        assert_eq!(ratio("abcd", "abxd"), 75);
    }

    #[test]
    fn test_token_sort_ignores_word_order() {
        assert_eq!(token_sort_ratio("rate critical", "critical rate"), 100);
    }

    #[test]
    fn test_partial_finds_embedded_name() {
        assert_eq!(partial_ratio("hp", "hp 4780"), 100);
        assert_eq!(partial_ratio("piece set", "2piece set."), 100);
        assert_eq!(partial_ratio("", "anything"), 0);
    }

    #[test]
    fn test_extract_one_first_wins_ties() {
        let choices = ["atk", "def", "atk"];
        let (index, score) = extract_one("atk", &choices, Scorer::TokenSort).unwrap();
        assert_eq!(index, 0);
        assert_eq!(score, 100);
    }

    #[test]
    fn test_extract_one_empty_choices() {
        assert_eq!(extract_one("atk", &[], Scorer::Partial), None);
    }
}
