//! Turns a transcribed phrase ("triple twenty", "dubbel sexton",
//! "one hundred and forty", "undo") into scoring input.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::dart::{Dart, BULL};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    English,
    Swedish,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phrase {
    Darts(Vec<Dart>),
    Total(u16),
    Undo,
    NextPlayer,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PhraseError {
    #[error("nothing was said")]
    Empty,
    #[error("could not understand '{0}'")]
    Unrecognised(String),
    #[error("more than three darts in one phrase")]
    TooManyDarts,
}

struct Words {
    units: &'static [(&'static str, u16)],
    tens: &'static [(&'static str, u16)],
    hundred: &'static [&'static str],
    single: &'static [&'static str],
    double: &'static [&'static str],
    triple: &'static [&'static str],
    bull: &'static [&'static str],
    outer: &'static [&'static str],
    miss: &'static [&'static str],
    filler: &'static [&'static str],
    undo: &'static [&'static str],
    next: &'static [&'static str],
}

const ENGLISH: Words = Words {
    units: &[
        ("one", 1), ("a", 1), ("two", 2), ("three", 3), ("four", 4), ("five", 5),
        ("six", 6), ("seven", 7), ("eight", 8), ("nine", 9), ("ten", 10),
        ("eleven", 11), ("twelve", 12), ("thirteen", 13), ("fourteen", 14),
        ("fifteen", 15), ("sixteen", 16), ("seventeen", 17), ("eighteen", 18),
        ("nineteen", 19), ("zero", 0), ("nothing", 0),
    ],
    tens: &[
        ("twenty", 20), ("thirty", 30), ("forty", 40), ("fifty", 50),
        ("sixty", 60), ("seventy", 70), ("eighty", 80), ("ninety", 90),
    ],
    hundred: &["hundred"],
    single: &["single"],
    double: &["double"],
    triple: &["triple", "treble"],
    bull: &["bull", "bullseye", "bulls"],
    outer: &["outer"],
    miss: &["miss", "missed", "out"],
    filler: &["and", "then", "eye", "points"],
    undo: &["undo", "back", "oops"],
    next: &["next", "done", "pass"],
};

const SWEDISH: Words = Words {
    units: &[
        ("ett", 1), ("en", 1), ("två", 2), ("tre", 3), ("fyra", 4), ("fem", 5),
        ("sex", 6), ("sju", 7), ("åtta", 8), ("nio", 9), ("tio", 10),
        ("elva", 11), ("tolv", 12), ("tretton", 13), ("fjorton", 14),
        ("femton", 15), ("sexton", 16), ("sjutton", 17), ("arton", 18),
        ("nitton", 19), ("noll", 0), ("nolla", 0),
    ],
    tens: &[
        ("tjugo", 20), ("trettio", 30), ("fyrtio", 40), ("femtio", 50),
        ("sextio", 60), ("sjuttio", 70), ("åttio", 80), ("nittio", 90),
    ],
    hundred: &["hundra"],
    single: &["enkel", "singel"],
    double: &["dubbel", "dubbla"],
    triple: &["trippel", "tripple", "trippla"],
    bull: &["bull", "bullseye", "bulls", "tjuröga"],
    outer: &["yttre"],
    miss: &["miss", "bom", "utanför"],
    filler: &["och", "sen", "poäng"],
    undo: &["ångra", "tillbaka", "backa"],
    next: &["nästa", "klar", "färdig"],
};

fn words(lang: Language) -> &'static Words {
    match lang {
        Language::English => &ENGLISH,
        Language::Swedish => &SWEDISH,
    }
}

fn separators() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\p{L}\p{N}]+").expect("static regex"))
}

fn shorthand() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:[sdt]\d{1,2}|sb|db)$").expect("static regex"))
}

fn digits() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{1,3}$").expect("static regex"))
}

fn lookup(table: &[(&str, u16)], token: &str) -> Option<u16> {
    table.iter().find(|(w, _)| *w == token).map(|(_, v)| *v)
}

/// Splits Swedish compounds such as "etthundrafyrtiofem" into number words,
/// longest match first. Tokens that do not fully decompose are kept whole.
fn decompose(token: &str, w: &Words) -> Vec<String> {
    let mut parts = Vec::new();
    let mut rest = token;
    while !rest.is_empty() {
        let candidate = w
            .units
            .iter()
            .map(|(s, _)| *s)
            .chain(w.tens.iter().map(|(s, _)| *s))
            .chain(w.hundred.iter().copied())
            .filter(|s| s.len() > 1 && rest.starts_with(*s))
            .max_by_key(|s| s.len());
        match candidate {
            Some(word) => {
                parts.push(word.to_string());
                rest = &rest[word.len()..];
            }
            None => return vec![token.to_string()],
        }
    }
    parts
}

fn tokenize(text: &str, lang: Language) -> Vec<String> {
    let w = words(lang);
    let lower = text.to_lowercase();
    separators()
        .split(&lower)
        .filter(|t| !t.is_empty())
        .flat_map(|t| match lang {
            Language::Swedish => decompose(t, w),
            Language::English => vec![t.to_string()],
        })
        .collect()
}

fn is_number_word(token: &str, w: &Words) -> bool {
    lookup(w.units, token).is_some() || lookup(w.tens, token).is_some() || w.hundred.contains(&token)
}

/// Reads a whole token list as one number ("one hundred and forty").
fn number_from_words(tokens: &[String], w: &Words) -> Option<u16> {
    let mut total: u16 = 0;
    let mut seen = false;
    for t in tokens {
        let t = t.as_str();
        if w.filler.contains(&t) {
            continue;
        }
        if let Some(v) = lookup(w.units, t).or_else(|| lookup(w.tens, t)) {
            total = total.checked_add(v)?;
        } else if w.hundred.contains(&t) {
            total = total.max(1).checked_mul(100)?;
        } else if digits().is_match(t) {
            total = total.checked_add(t.parse().ok()?)?;
        } else {
            return None;
        }
        seen = true;
    }
    seen.then_some(total)
}

/// One board number starting at `tokens[i]`; returns it and the tokens used.
fn board_number(tokens: &[String], i: usize, w: &Words) -> Option<(u8, usize)> {
    let t = tokens.get(i)?.as_str();
    if digits().is_match(t) {
        let n: u8 = t.parse().ok()?;
        return ((1..=20).contains(&n) || n == BULL).then_some((n, 1));
    }
    if let Some(tens) = lookup(w.tens, t) {
        // "twenty five" is the outer bull
        if tens == 20 {
            if let Some(5) = tokens.get(i + 1).and_then(|n| lookup(w.units, n)) {
                return Some((BULL, 2));
            }
            return Some((20, 1));
        }
        return None;
    }
    match lookup(w.units, t) {
        Some(n) if (1..=20).contains(&n) => Some((n as u8, 1)),
        _ => None,
    }
}

fn parse_darts(tokens: &[String], w: &Words, original: &str) -> Result<Vec<Dart>, PhraseError> {
    let unrecognised = || PhraseError::Unrecognised(original.to_string());
    let mut darts = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let t = tokens[i].as_str();

        if w.filler.contains(&t) {
            i += 1;
            continue;
        }
        if w.miss.contains(&t) {
            darts.push(Dart::Miss);
            i += 1;
        } else if shorthand().is_match(t) {
            darts.push(t.parse::<Dart>().map_err(|_| unrecognised())?);
            i += 1;
        } else if w.bull.contains(&t) {
            darts.push(Dart::Double(BULL));
            i += 1;
        } else {
            let multiplier = if w.single.contains(&t) || w.outer.contains(&t) {
                Some(1)
            } else if w.double.contains(&t) {
                Some(2)
            } else if w.triple.contains(&t) {
                Some(3)
            } else {
                None
            };
            if multiplier.is_some() {
                i += 1;
            }
            let multiplier = multiplier.unwrap_or(1);

            let next = tokens.get(i).map(String::as_str).unwrap_or_default();
            if w.bull.contains(&next) {
                darts.push(Dart::new(BULL, multiplier).map_err(|_| unrecognised())?);
                i += 1;
            } else {
                let (n, used) = board_number(tokens, i, w).ok_or_else(unrecognised)?;
                darts.push(Dart::new(n, multiplier).map_err(|_| unrecognised())?);
                i += used;
            }
        }

        if darts.len() > 3 {
            return Err(PhraseError::TooManyDarts);
        }
    }

    if darts.is_empty() {
        return Err(unrecognised());
    }
    Ok(darts)
}

pub fn parse_phrase(text: &str, lang: Language) -> Result<Phrase, PhraseError> {
    let w = words(lang);
    let tokens = tokenize(text, lang);
    if tokens.is_empty() {
        return Err(PhraseError::Empty);
    }

    let first = tokens[0].as_str();
    if tokens.len() <= 2 && w.undo.contains(&first) {
        return Ok(Phrase::Undo);
    }
    if tokens.len() <= 2 && w.next.contains(&first) {
        return Ok(Phrase::NextPlayer);
    }

    let dart_words = tokens.iter().any(|t| {
        let t = t.as_str();
        w.single.contains(&t)
            || w.double.contains(&t)
            || w.triple.contains(&t)
            || w.bull.contains(&t)
            || w.miss.contains(&t)
            || shorthand().is_match(t)
    });

    if !dart_words {
        let only_numbers = tokens
            .iter()
            .all(|t| is_number_word(t, w) || w.filler.contains(&t.as_str()) || digits().is_match(t));
        let bare_digits = tokens.iter().filter(|t| digits().is_match(t)).count();
        // "20 20 5" is three darts, "45" or "forty five" is a total
        if only_numbers && bare_digits <= 1 {
            return number_from_words(&tokens, w)
                .map(Phrase::Total)
                .ok_or_else(|| PhraseError::Unrecognised(text.to_string()));
        }
    }

    parse_darts(&tokens, w, text).map(Phrase::Darts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn en(s: &str) -> Result<Phrase, PhraseError> {
        parse_phrase(s, Language::English)
    }

    fn sv(s: &str) -> Result<Phrase, PhraseError> {
        parse_phrase(s, Language::Swedish)
    }

    #[test]
    fn english_darts() {
        assert_eq!(en("triple twenty"), Ok(Phrase::Darts(vec![Dart::Triple(20)])));
        assert_eq!(
            en("Treble 19, single 7 and double 16"),
            Ok(Phrase::Darts(vec![Dart::Triple(19), Dart::Single(7), Dart::Double(16)]))
        );
        assert_eq!(en("bullseye"), Ok(Phrase::Darts(vec![Dart::Double(BULL)])));
        assert_eq!(en("outer bull"), Ok(Phrase::Darts(vec![Dart::Single(BULL)])));
        assert_eq!(en("single twenty five"), Ok(Phrase::Darts(vec![Dart::Single(BULL)])));
        assert_eq!(en("miss"), Ok(Phrase::Darts(vec![Dart::Miss])));
    }

    #[test]
    fn shorthand_notation() {
        assert_eq!(
            en("T20 T20 D16"),
            Ok(Phrase::Darts(vec![Dart::Triple(20), Dart::Triple(20), Dart::Double(16)]))
        );
        assert_eq!(
            en("20 20 5"),
            Ok(Phrase::Darts(vec![Dart::Single(20), Dart::Single(20), Dart::Single(5)]))
        );
    }

    #[test]
    fn totals() {
        assert_eq!(en("45"), Ok(Phrase::Total(45)));
        assert_eq!(en("one hundred and forty"), Ok(Phrase::Total(140)));
        assert_eq!(en("hundred"), Ok(Phrase::Total(100)));
        assert_eq!(en("twenty six"), Ok(Phrase::Total(26)));
        assert_eq!(sv("etthundraåttio"), Ok(Phrase::Total(180)));
        assert_eq!(sv("fyrtiofem"), Ok(Phrase::Total(45)));
        assert_eq!(sv("sextio"), Ok(Phrase::Total(60)));
    }

    #[test]
    fn swedish_darts() {
        assert_eq!(sv("trippel tjugo"), Ok(Phrase::Darts(vec![Dart::Triple(20)])));
        assert_eq!(
            sv("dubbel sexton och enkel fem"),
            Ok(Phrase::Darts(vec![Dart::Double(16), Dart::Single(5)]))
        );
        assert_eq!(sv("bom"), Ok(Phrase::Darts(vec![Dart::Miss])));
        assert_eq!(sv("yttre bull"), Ok(Phrase::Darts(vec![Dart::Single(BULL)])));
    }

    #[test]
    fn commands() {
        assert_eq!(en("undo"), Ok(Phrase::Undo));
        assert_eq!(en("next"), Ok(Phrase::NextPlayer));
        assert_eq!(sv("ångra"), Ok(Phrase::Undo));
        assert_eq!(sv("nästa spelare"), Ok(Phrase::NextPlayer));
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(en("  "), Err(PhraseError::Empty));
        assert!(matches!(en("hello there"), Err(PhraseError::Unrecognised(_))));
        assert!(matches!(en("triple bull"), Err(PhraseError::Unrecognised(_))));
        assert!(matches!(en("T25"), Err(PhraseError::Unrecognised(_))));
        assert_eq!(en("T20 T20 T20 T20"), Err(PhraseError::TooManyDarts));
        assert!(matches!(en("triple twenty five"), Err(PhraseError::Unrecognised(_))));
    }
}
