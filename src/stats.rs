//! Data model for parsed artifact stats.
//!
//! A parse produces at most five entries: index 0 is the fixed main
//! attribute, indices 1..4 are the randomized sub-attributes that the
//! rater scores.

use serde::{Deserialize, Serialize};

/// Semantic attribute kinds a stat line can resolve to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attribute {
    Hp,
    Atk,
    Def,
    ElementalMastery,
    EnergyRecharge,
    CritRate,
    CritDamage,
    Healing,
    PhysicalDmg,
    Anemo,
    Electro,
    Pyro,
    Hydro,
    Cryo,
    Geo,
    Dendro,
}

impl Attribute {
    /// True for the seven elemental damage bonus variants.
    pub fn is_elemental(self) -> bool {
        matches!(
            self,
            Attribute::Anemo
                | Attribute::Electro
                | Attribute::Pyro
                | Attribute::Hydro
                | Attribute::Cryo
                | Attribute::Geo
                | Attribute::Dendro
        )
    }

    /// Short label for log output.
    pub fn label(self) -> &'static str {
        match self {
            Attribute::Hp => "HP",
            Attribute::Atk => "ATK",
            Attribute::Def => "DEF",
            Attribute::ElementalMastery => "Elemental Mastery",
            Attribute::EnergyRecharge => "Energy Recharge",
            Attribute::CritRate => "CRIT Rate",
            Attribute::CritDamage => "CRIT DMG",
            Attribute::Healing => "Healing Bonus",
            Attribute::PhysicalDmg => "Physical DMG",
            Attribute::Anemo => "Anemo DMG",
            Attribute::Electro => "Electro DMG",
            Attribute::Pyro => "Pyro DMG",
            Attribute::Hydro => "Hydro DMG",
            Attribute::Cryo => "Cryo DMG",
            Attribute::Geo => "Geo DMG",
            Attribute::Dendro => "Dendro DMG",
        }
    }
}

/// Scoring bucket used for ceiling lookup and weighting.
///
/// The seven elemental damage variants collapse into the single
/// `ElementalDmg` bucket; HP/ATK/DEF split into flat and percent forms
/// because they roll as both.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKey {
    Hp,
    HpPct,
    Atk,
    AtkPct,
    Def,
    DefPct,
    ElementalMastery,
    EnergyRecharge,
    CritRate,
    CritDamage,
    Healing,
    PhysicalDmg,
    ElementalDmg,
}

impl StatKey {
    /// Whether values under this key are percentages.
    pub fn is_percent(self) -> bool {
        !matches!(
            self,
            StatKey::Hp | StatKey::Atk | StatKey::Def | StatKey::ElementalMastery
        )
    }
}

/// One parsed (attribute, value) pair. `percent` is true when the OCR
/// value carried a decimal point, i.e. the percent form of the kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatEntry {
    pub attribute: Attribute,
    pub value: f64,
    pub percent: bool,
}

impl StatEntry {
    /// Resolves the scoring bucket for this entry.
    pub fn key(&self) -> StatKey {
        if self.attribute.is_elemental() {
            return StatKey::ElementalDmg;
        }
        match (self.attribute, self.percent) {
            (Attribute::Hp, false) => StatKey::Hp,
            (Attribute::Hp, true) => StatKey::HpPct,
            (Attribute::Atk, false) => StatKey::Atk,
            (Attribute::Atk, true) => StatKey::AtkPct,
            (Attribute::Def, false) => StatKey::Def,
            (Attribute::Def, true) => StatKey::DefPct,
            (Attribute::ElementalMastery, _) => StatKey::ElementalMastery,
            (Attribute::EnergyRecharge, _) => StatKey::EnergyRecharge,
            (Attribute::CritRate, _) => StatKey::CritRate,
            (Attribute::CritDamage, _) => StatKey::CritDamage,
            (Attribute::Healing, _) => StatKey::Healing,
            (Attribute::PhysicalDmg, _) => StatKey::PhysicalDmg,
            // Elemental variants are handled above.
            _ => StatKey::ElementalDmg,
        }
    }
}

/// Result of parsing one OCR text: an optional upgrade level and the
/// ordered stat entries (main attribute first, then sub-attributes).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParseResult {
    pub level: Option<u8>,
    pub entries: Vec<StatEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elemental_variants_share_bucket() {
        for attribute in [
            Attribute::Anemo,
            Attribute::Electro,
            Attribute::Pyro,
            Attribute::Hydro,
            Attribute::Cryo,
            Attribute::Geo,
            Attribute::Dendro,
        ] {
            let entry = StatEntry {
                attribute,
                value: 7.8,
                percent: true,
            };
            assert_eq!(entry.key(), StatKey::ElementalDmg);
        }
    }

    #[test]
    fn test_flat_and_percent_forms_split() {
        let flat = StatEntry {
            attribute: Attribute::Hp,
            value: 299.0,
            percent: false,
        };
        let pct = StatEntry {
            attribute: Attribute::Hp,
            value: 5.8,
            percent: true,
        };
        assert_eq!(flat.key(), StatKey::Hp);
        assert_eq!(pct.key(), StatKey::HpPct);
    }

    #[test]
    fn test_percent_keys() {
        assert!(StatKey::CritRate.is_percent());
        assert!(StatKey::EnergyRecharge.is_percent());
        assert!(StatKey::ElementalDmg.is_percent());
        assert!(!StatKey::Hp.is_percent());
        assert!(!StatKey::ElementalMastery.is_percent());
    }
}
