//! Line-by-line classification of OCR text into stat entries.
//!
//! The text has no grammar to rely on: attribute names and values wrap
//! across lines unpredictably, digits get duplicated or dropped, and
//! locale UI text is interleaved with the stats. Each line runs through
//! a priority cascade of exact patterns followed by fuzzy name
//! matching; the cascade order is load-bearing (a bare two-digit token
//! is a level in one position and junk in another).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::locale::LocalePack;
use crate::normalize::{collapse, normalize_line};
use crate::similarity::{extract_one, partial_ratio, Scorer};
use crate::stats::{Attribute, ParseResult, StatEntry};

/// Numeric token, comma or period as decimal separator.
static NUM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:[.,]\d+)?").unwrap());
/// Trailing `N/1000` junk (a progress readout, never a stat).
static JUNK_RATIO_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+/1000$").unwrap());
/// Thousand-grouped HP misread with a stray decimal mark, e.g. `4.780`.
static HP_GROUP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d[.,]\d{3}").unwrap());
/// Upgrade level marker, e.g. `+16`.
static LEVEL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+\d\d?$").unwrap());
/// Level-like stray (the `+` may have been dropped): junk, not a value.
static BARE_LEVEL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?\d\d?$").unwrap());
/// A run of 4+ digits: too long to be anything we track, treated as junk.
static LONG_DIGITS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}\d*$").unwrap());

const MAX_ENTRIES: usize = 5;
const MAX_LEVEL: u8 = 20;
const MATCH_THRESHOLD: u32 = 80;
/// Piece-set lines shorter than this are too ambiguous to stop on.
const MIN_PIECE_SET_LEN: usize = 4;

/// Cross-line parser state: at most one pending attribute name waiting
/// for its value, and numeric tokens carried over from a line that had
/// a number but no recognized name.
#[derive(Default)]
struct ParserState {
    level: Option<u8>,
    entries: Vec<StatEntry>,
    pending: Option<Attribute>,
    carried: Vec<String>,
    keep_carried: bool,
}

/// Parses raw OCR text into a level and an ordered entry list.
///
/// Total over any input: unrecognized lines are skipped or buffered,
/// never an error. Deterministic for a given `(text, pack)`.
pub fn parse(text: &str, pack: &LocalePack) -> ParseResult {
    let choices = pack.folded_names();
    let names: Vec<&str> = choices.iter().map(|(_, name)| name.as_str()).collect();
    let piece_set = normalize_line(&pack.piece_set, pack);

    let mut state = ParserState::default();

    for raw in text.lines() {
        if raw.is_empty() {
            continue;
        }
        if !state.keep_carried {
            state.carried.clear();
        }
        state.keep_carried = false;

        let line = normalize_line(raw, pack);
        let collapsed = collapse(&line);

        if pack.ignore.iter().any(|phrase| *phrase == collapsed)
            || JUNK_RATIO_RE.is_match(&collapsed)
        {
            continue;
        }
        if partial_ratio(&line, &piece_set) > MATCH_THRESHOLD
            && line.chars().count() > MIN_PIECE_SET_LEN
        {
            // Everything after the set/piece boilerplate is footer text.
            break;
        }

        if classify_level(&collapsed, &mut state) {
            continue;
        }
        if classify_grouped_hp(&collapsed, &mut state) {
            continue;
        }
        match classify_attribute(&line, &collapsed, &names, &choices, &mut state) {
            AttributeOutcome::Consumed => continue,
            AttributeOutcome::Full => break,
            AttributeOutcome::NoMatch => {}
        }
        buffer_leftover_number(&collapsed, &mut state);
    }

    ParseResult {
        level: state.level,
        entries: state.entries,
    }
}

/// `+NN` upgrade level. Assignment is conservative: once sub-stats have
/// started accumulating, a later level-like token must not clobber the
/// recorded level.
fn classify_level(collapsed: &str, state: &mut ParserState) -> bool {
    if !LEVEL_RE.is_match(collapsed) {
        return false;
    }
    if state.level.is_none() || (state.entries.len() == 1 && state.pending.is_none()) {
        if let Ok(value) = collapsed.trim_start_matches('+').parse::<u8>() {
            if value <= MAX_LEVEL {
                state.level = Some(value);
            }
        }
    }
    true
}

/// Large HP values render with a stray decimal mark (`4.780`); strip
/// the separator and record a flat HP entry.
fn classify_grouped_hp(collapsed: &str, state: &mut ParserState) -> bool {
    let Some(m) = HP_GROUP_RE.find(collapsed) else {
        return false;
    };
    let digits: String = m.as_str().chars().filter(char::is_ascii_digit).collect();
    let value = digits.parse::<f64>().unwrap_or(0.0);
    if state.entries.len() < MAX_ENTRIES {
        state.entries.push(StatEntry {
            attribute: Attribute::Hp,
            value,
            percent: false,
        });
    }
    state.pending = None;
    true
}

enum AttributeOutcome {
    /// Line handled (entry appended, name left pending, or discarded).
    Consumed,
    /// Entry appended and the result is full; stop parsing.
    Full,
    /// Not an attribute line; fall through to the leftover buffer.
    NoMatch,
}

fn classify_attribute(
    line: &str,
    collapsed: &str,
    names: &[&str],
    choices: &[(Attribute, String)],
    state: &mut ParserState,
) -> AttributeOutcome {
    // Token scorer first; garbled or merged names fall back to the
    // substring scorer.
    let mut best = extract_one(line, names, Scorer::TokenSort);
    if best.is_none_or(|(_, score)| score <= MATCH_THRESHOLD) {
        best = extract_one(line, names, Scorer::Partial);
    }
    let (best_index, best_score) = match best {
        Some((index, score)) => (index, score),
        None => (0, 0),
    };

    let name_matched = best_score > MATCH_THRESHOLD;
    if !(name_matched && collapsed.chars().count() > 1) && state.pending.is_none() {
        return AttributeOutcome::NoMatch;
    }
    if name_matched {
        state.pending = Some(choices[best_index].0);
    }

    // Commas are misread decimal points in values.
    let haystack = collapsed.replace(',', ".");
    let mut tokens: Vec<(usize, String)> = NUM_RE
        .find_iter(&haystack)
        .map(|m| (m.start(), m.as_str().to_string()))
        .collect();
    let from_carried = tokens.is_empty();
    if from_carried {
        if state.carried.is_empty() {
            // Name without a value; wait for the next line.
            return AttributeOutcome::Consumed;
        }
        tokens = state.carried.iter().map(|t| (0, t.clone())).collect();
    }

    // Longest token wins, first occurrence on ties.
    let mut picked: Option<(usize, String)> = None;
    for (position, token) in tokens {
        if picked.as_ref().is_none_or(|(_, t)| token.len() > t.len()) {
            picked = Some((position, token));
        }
    }
    let Some((position, mut token)) = picked else {
        return AttributeOutcome::Consumed;
    };
    if token.chars().count() < 2 {
        // Single digit carries too little information to trust.
        return AttributeOutcome::Consumed;
    }

    // A % after the value with no decimal point means OCR dropped the
    // point; reinsert it before the last digit.
    let percent_after = if from_carried {
        line.ends_with('%')
    } else {
        haystack[position..].contains('%')
    };
    if percent_after && !token.contains('.') {
        token.insert(token.len() - 1, '.');
    }

    let percent = token.contains('.');
    let value: f64 = token.parse().unwrap_or(0.0);
    let Some(attribute) = state.pending.take() else {
        return AttributeOutcome::Consumed;
    };
    if state.entries.len() < MAX_ENTRIES {
        state.entries.push(StatEntry {
            attribute,
            value,
            percent,
        });
    }
    if state.entries.len() >= MAX_ENTRIES {
        AttributeOutcome::Full
    } else {
        AttributeOutcome::Consumed
    }
}

/// A line with numbers but no recognized name: unless it looks like a
/// stray level or a long digit run (both junk), buffer its numeric
/// tokens for the next line.
fn buffer_leftover_number(collapsed: &str, state: &mut ParserState) {
    let level_like = BARE_LEVEL_RE.is_match(collapsed)
        || LONG_DIGITS_RE.is_match(&collapsed.replace('+', ""));
    if level_like {
        return;
    }
    let cleaned = collapsed.replace(',', "");
    state.carried = NUM_RE
        .find_iter(&cleaned)
        .map(|m| m.as_str().to_string())
        .collect();
    state.keep_carried = true;
}
