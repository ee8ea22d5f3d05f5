//! Numeric plausibility repair and weighted scoring.
//!
//! OCR corrupts values in predictable ways: it duplicates digits,
//! appends stray ones, and drops the decimal point or a leading digit.
//! `validate` repairs a value against a per-attribute ceiling until it
//! is plausible; `rate` runs every sub-attribute through the repair and
//! accumulates weight x value.

use std::collections::HashMap;

use crate::stats::{StatEntry, StatKey};

/// Headroom over the ceiling before a value counts as implausible.
const CEILING_SLACK: f64 = 1.05;
/// A sub-attribute accumulates at most six rolls.
const MAX_ROLLS: f64 = 6.0;

/// Maximum plausible single-roll value per scoring bucket.
///
/// Healing, physical and elemental damage only occur as main
/// attributes; their ceilings derive from the max main-stat values so
/// a misclassified line still converges.
pub fn ceiling(key: StatKey) -> f64 {
    match key {
        StatKey::Hp => 299.0,
        StatKey::HpPct => 5.8,
        StatKey::Atk => 19.0,
        StatKey::AtkPct => 5.8,
        StatKey::Def => 23.0,
        StatKey::DefPct => 7.3,
        StatKey::ElementalMastery => 23.0,
        StatKey::EnergyRecharge => 6.5,
        StatKey::CritRate => 3.9,
        StatKey::CritDamage => 7.8,
        StatKey::Healing => 6.0,
        StatKey::PhysicalDmg => 9.7,
        StatKey::ElementalDmg => 7.8,
    }
}

/// Built-in weights for a crit-focused build; everything else scores 0
/// until overridden.
pub fn default_weight(key: StatKey) -> f64 {
    match key {
        StatKey::CritRate => 2.0,
        StatKey::CritDamage => 1.0,
        StatKey::AtkPct => 1.0,
        _ => 0.0,
    }
}

/// Resolves a weight: override if present, built-in default otherwise.
/// The defaults are never mutated; each call merges fresh.
pub fn resolve_weight(key: StatKey, overrides: &HashMap<StatKey, f64>) -> f64 {
    overrides.get(&key).copied().unwrap_or_else(|| default_weight(key))
}

/// Repairs an implausibly large OCR value.
///
/// While the value exceeds `max_stat * 1.05`: delete one of the last
/// pair of adjacent equal digits (OCR doubled a digit); failing that,
/// drop the digit before the decimal point for percents or the last
/// digit for flat values. Each pass shortens the digit string by one
/// character, so the loop terminates. A final value of exactly 1 means
/// OCR dropped a leading digit from 11, so 10 is added back.
pub fn validate(mut value: f64, max_stat: f64, is_percent: bool) -> f64 {
    while value > max_stat * CEILING_SLACK {
        let digits = render(value, is_percent);
        let repaired = match drop_adjacent_duplicate(&digits) {
            Some(shorter) => shorter,
            None if is_percent => drop_before_decimal(&digits),
            None => digits[..digits.len() - 1].to_string(),
        };
        value = repaired.parse().unwrap_or(0.0);
    }
    if value == 1.0 {
        value += 10.0;
    }
    value
}

/// Scores the sub-attributes of a parse result.
///
/// Entry 0 is the main attribute and never contributes. Every other
/// entry is validated against six accumulated rolls of its ceiling,
/// overwritten in place with the corrected value, and accumulated as
/// weight x value. The upgrade level is accepted for interface parity
/// but does not enter the formula.
pub fn rate(
    _level: Option<u8>,
    entries: &mut [StatEntry],
    overrides: &HashMap<StatKey, f64>,
) -> f64 {
    let mut total = 0.0;
    for entry in entries.iter_mut().skip(1) {
        let key = entry.key();
        let corrected = validate(entry.value, ceiling(key) * MAX_ROLLS, key.is_percent());
        entry.value = corrected;
        total += corrected * resolve_weight(key, overrides);
    }
    total
}

/// Digit-string form matching how the value was read: percents keep
/// their decimal point (with a trailing `.0` for whole values), flat
/// values render as integers.
fn render(value: f64, is_percent: bool) -> String {
    if is_percent {
        let mut s = format!("{value}");
        if !s.contains('.') {
            s.push_str(".0");
        }
        s
    } else {
        format!("{}", value as i64)
    }
}

/// Deletes one of the last pair of adjacent equal digits, scanning from
/// the end. Returns None when no pair exists.
fn drop_adjacent_duplicate(digits: &str) -> Option<String> {
    let bytes = digits.as_bytes();
    for i in (1..bytes.len()).rev() {
        if bytes[i] == bytes[i - 1] {
            let mut repaired = String::with_capacity(digits.len() - 1);
            repaired.push_str(&digits[..i - 1]);
            repaired.push_str(&digits[i..]);
            return Some(repaired);
        }
    }
    None
}

/// Deletes the digit immediately before the decimal point; falls back
/// to the last character when there is no point or no digit before it.
fn drop_before_decimal(digits: &str) -> String {
    match digits.find('.') {
        Some(pos) if pos > 0 => format!("{}{}", &digits[..pos - 1], &digits[pos..]),
        _ => digits[..digits.len() - 1].to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::Attribute;

    fn entry(attribute: Attribute, value: f64, percent: bool) -> StatEntry {
        StatEntry {
            attribute,
            value,
            percent,
        }
    }

    #[test]
    fn test_validate_noop_below_ceiling() {
        assert_eq!(validate(19.0, 19.0, false), 19.0);
        assert_eq!(validate(3.5, 23.4, true), 3.5);
        assert_eq!(validate(0.0, 23.4, true), 0.0);
    }

    #[test]
    fn test_validate_lone_one_becomes_eleven() {
        assert_eq!(validate(1.0, 100.0, false), 11.0);
        assert_eq!(validate(1.0, 100.0, true), 11.0);
    }

    #[test]
    fn test_validate_removes_duplicated_digit() {
        // 311 HP misread as 3111
        assert_eq!(validate(3111.0, 1794.0, false), 311.0);
        // 7.8% misread as 77.8
        assert_eq!(validate(77.8, 8.19, true), 7.8);
    }

    #[test]
    fn test_validate_drops_trailing_digit_flat() {
        // no adjacent duplicates, shrinks from the right until plausible
        assert_eq!(validate(1234.0, 100.0, false), 12.0);
    }

    #[test]
    fn test_validate_drops_digit_before_decimal_percent() {
        assert_eq!(validate(64.8, 39.0, true), 6.8);
    }

    #[test]
    fn test_validate_idempotent() {
        for (value, max_stat, is_percent) in [
            (3111.0, 1794.0, false),
            (64.8, 39.0, true),
            (1.0, 100.0, false),
            (19.0, 114.0, false),
        ] {
            let once = validate(value, max_stat, is_percent);
            assert_eq!(validate(once, max_stat, is_percent), once);
        }
    }

    #[test]
    fn test_rate_sums_weighted_substats_skipping_main() {
        let mut entries = vec![
            entry(Attribute::Hp, 4780.0, false),
            entry(Attribute::CritRate, 3.5, true),
            entry(Attribute::CritDamage, 7.8, true),
            entry(Attribute::Atk, 5.8, true),
            entry(Attribute::Atk, 19.0, false),
        ];
        let total = rate(Some(20), &mut entries, &HashMap::new());
        // 3.5*2 + 7.8*1 + 5.8*1 + 19*0, main HP never counted
        assert!((total - 20.6).abs() < 1e-9);
    }

    #[test]
    fn test_rate_weight_override_changes_single_key() {
        let mut entries = vec![
            entry(Attribute::Hp, 4780.0, false),
            entry(Attribute::CritRate, 3.5, true),
            entry(Attribute::CritDamage, 7.8, true),
            entry(Attribute::Atk, 5.8, true),
        ];
        let overrides = HashMap::from([(StatKey::CritDamage, 5.0)]);
        let total = rate(None, &mut entries, &overrides);
        assert!((total - (7.0 + 39.0 + 5.8)).abs() < 1e-9);
    }

    #[test]
    fn test_rate_overwrites_corrected_values() {
        let mut entries = vec![
            entry(Attribute::Hp, 4780.0, false),
            entry(Attribute::Atk, 1234.0, false),
        ];
        rate(None, &mut entries, &HashMap::new());
        // ATK ceiling 19*6: 1234 shrinks from the right to 12
        assert_eq!(entries[1].value, 12.0);
        // main entry untouched
        assert_eq!(entries[0].value, 4780.0);
    }

    #[test]
    fn test_rate_elemental_variants_use_shared_weight() {
        let overrides = HashMap::from([(StatKey::ElementalDmg, 1.0)]);
        for attribute in [Attribute::Pyro, Attribute::Hydro, Attribute::Dendro] {
            let mut entries = vec![
                entry(Attribute::Hp, 4780.0, false),
                entry(attribute, 7.8, true),
            ];
            let total = rate(None, &mut entries, &overrides);
            assert!((total - 7.8).abs() < 1e-9);
        }
    }

    #[test]
    fn test_rate_empty_and_main_only() {
        assert_eq!(rate(None, &mut [], &HashMap::new()), 0.0);
        let mut main_only = vec![entry(Attribute::Hp, 4780.0, false)];
        assert_eq!(rate(Some(16), &mut main_only, &HashMap::new()), 0.0);
    }
}
