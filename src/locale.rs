//! Per-locale data consumed by the parser and the OCR fetch.
//!
//! A pack is pure data: attribute display names in match-priority
//! order, OCR misread substitutions, phrases to skip, the set/piece
//! boilerplate that marks the end of stat content, and localized error
//! strings. Custom packs can be loaded from JSON.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::normalize;
use crate::stats::Attribute;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LocalePack {
    /// Language code sent to the OCR service when engine 2 is unavailable.
    pub ocr_code: String,
    /// Whether the OCR service's engine 2 covers this language.
    pub engine2: bool,
    /// Display names in match-priority order (elements before the rest,
    /// mirroring the candidate order the fuzzy matcher relies on).
    pub names: Vec<(Attribute, String)>,
    /// Literal substring substitutions applied before folding, in order.
    pub replace: Vec<(String, String)>,
    /// Space-collapsed normalized phrases skipped outright.
    pub ignore: Vec<String>,
    /// Boilerplate set/piece text; a close match ends parsing.
    pub piece_set: String,
    /// Prefix for OCR service errors.
    pub err_ocr: String,
    /// Message for a response missing its parsed results.
    pub err_unknown_ocr: String,
}

impl LocalePack {
    pub fn en() -> Self {
        Self {
            ocr_code: "eng".to_string(),
            engine2: true,
            names: vec![
                (Attribute::Anemo, "anemo dmg bonus".to_string()),
                (Attribute::Electro, "electro dmg bonus".to_string()),
                (Attribute::Pyro, "pyro dmg bonus".to_string()),
                (Attribute::Hydro, "hydro dmg bonus".to_string()),
                (Attribute::Cryo, "cryo dmg bonus".to_string()),
                (Attribute::Geo, "geo dmg bonus".to_string()),
                (Attribute::Dendro, "dendro dmg bonus".to_string()),
                (Attribute::Hp, "hp".to_string()),
                (Attribute::Healing, "healing bonus".to_string()),
                (Attribute::Def, "def".to_string()),
                (Attribute::EnergyRecharge, "energy recharge".to_string()),
                (Attribute::ElementalMastery, "elemental mastery".to_string()),
                (Attribute::Atk, "atk".to_string()),
                (Attribute::CritDamage, "critical damage".to_string()),
                (Attribute::CritRate, "critical rate".to_string()),
                (Attribute::PhysicalDmg, "physical dmg bonus".to_string()),
            ],
            replace: Vec::new(),
            ignore: vec!["equipped".to_string(), "new".to_string()],
            piece_set: "2-piece set:".to_string(),
            err_ocr: "OCR failed".to_string(),
            err_unknown_ocr: "Unexpected OCR response, please try again".to_string(),
        }
    }

    pub fn ja() -> Self {
        Self {
            ocr_code: "jpn".to_string(),
            engine2: true,
            names: vec![
                (Attribute::Anemo, "風元素ダメージ".to_string()),
                (Attribute::Electro, "雷元素ダメージ".to_string()),
                (Attribute::Pyro, "炎元素ダメージ".to_string()),
                (Attribute::Hydro, "水元素ダメージ".to_string()),
                (Attribute::Cryo, "氷元素ダメージ".to_string()),
                (Attribute::Geo, "岩元素ダメージ".to_string()),
                (Attribute::Dendro, "草元素ダメージ".to_string()),
                (Attribute::Hp, "HP".to_string()),
                (Attribute::Healing, "治療効果".to_string()),
                (Attribute::Def, "防御力".to_string()),
                (Attribute::EnergyRecharge, "元素チャージ効率".to_string()),
                (Attribute::ElementalMastery, "元素熟知".to_string()),
                (Attribute::Atk, "攻撃力".to_string()),
                (Attribute::CritDamage, "会心ダメージ".to_string()),
                (Attribute::CritRate, "会心率".to_string()),
                (Attribute::PhysicalDmg, "物理ダメージ".to_string()),
            ],
            // Katakana カ is a common misread of the kanji 力, and the
            // prolonged sound mark shows up as stray dashes.
            replace: vec![
                ("カ".to_string(), "力".to_string()),
                ("ー元素".to_string(), "-元素".to_string()),
            ],
            ignore: vec!["装備中".to_string()],
            piece_set: "2セット効果".to_string(),
            err_ocr: "OCRエラー".to_string(),
            err_unknown_ocr: "OCRの結果を読み取れませんでした".to_string(),
        }
    }

    /// Loads a custom pack from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("failed to read locale pack {}", path.as_ref().display()))?;
        serde_json::from_str(&contents).context("failed to parse locale pack JSON")
    }

    /// Display names in their folded comparable form, same order as
    /// `names`.
    pub fn folded_names(&self) -> Vec<(Attribute, String)> {
        self.names
            .iter()
            .map(|(attribute, name)| (*attribute, normalize::fold(name)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_packs_cover_all_attributes() {
        for pack in [LocalePack::en(), LocalePack::ja()] {
            assert_eq!(pack.names.len(), 16);
            assert!(!pack.piece_set.is_empty());
            let folded = pack.folded_names();
            assert_eq!(folded.len(), 16);
            for (_, name) in &folded {
                assert_eq!(*name, name.to_lowercase());
            }
        }
    }

    #[test]
    fn test_pack_round_trips_through_json() {
        let pack = LocalePack::en();
        let json = serde_json::to_string(&pack).unwrap();
        let back: LocalePack = serde_json::from_str(&json).unwrap();
        assert_eq!(back.piece_set, pack.piece_set);
        assert_eq!(back.names.len(), pack.names.len());
    }
}
