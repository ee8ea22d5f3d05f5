//! Line canonicalization.
//!
//! OCR output is compared case-insensitively, diacritic-free and with a
//! handful of known misreads repaired, so that the fuzzy matcher and
//! the regex cascade see a stable form regardless of locale quirks.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::locale::LocalePack;

/// NFKD fold: decompose, drop combining marks, lowercase. Turns
/// fullwidth forms into ASCII and strips diacritics.
pub fn fold(s: &str) -> String {
    s.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Canonicalizes one raw OCR line: locale substitutions in table
/// order, fold, then the fixed misread repairs (`:` is a misread
/// decimal point, stray `-` is noise, `0/0` is a misread `%` glyph).
/// Pure function of `(line, pack)`.
pub fn normalize_line(line: &str, pack: &LocalePack) -> String {
    let mut line = line.to_string();
    for (from, to) in &pack.replace {
        line = line.replace(from.as_str(), to);
    }
    fold(&line)
        .replace(':', ".")
        .replace('-', "")
        .replace("0/0", "%")
}

/// Space-collapsed form used by the exact pattern tests.
pub fn collapse(s: &str) -> String {
    s.replace(' ', "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::LocalePack;

    #[test]
    fn test_fold_lowercases_and_strips_diacritics() {
        assert_eq!(fold("HP"), "hp");
        assert_eq!(fold("Défense"), "defense");
        // fullwidth forms decompose to ASCII
        assert_eq!(fold("ＨＰ"), "hp");
    }

    #[test]
    fn test_misread_repairs() {
        let pack = LocalePack::en();
        assert_eq!(normalize_line("4:780", &pack), "4.780");
        assert_eq!(normalize_line("energy re-charge", &pack), "energy recharge");
        assert_eq!(normalize_line("31.50/0", &pack), "31.5%");
    }

    #[test]
    fn test_substitutions_run_before_fold() {
        let mut pack = LocalePack::en();
        pack.replace.push(("Q".to_string(), "9".to_string()));
        assert_eq!(normalize_line("Q1", &pack), "91");
    }

    #[test]
    fn test_collapse() {
        assert_eq!(collapse("critical rate 31.5"), "criticalrate31.5");
    }
}
