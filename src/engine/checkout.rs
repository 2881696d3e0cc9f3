//! Checkout arithmetic for X01 and Progressive Finish.

use crate::model::dart::{Dart, BULL};

/// Three-dart totals that no combination of darts can produce.
pub const IMPOSSIBLE_TOTALS: [u16; 9] = [163, 166, 169, 172, 173, 175, 176, 178, 179];

pub const MAX_TURN_SCORE: u16 = 180;

/// Preferred finishing doubles, best first.
const PREFERRED_DOUBLES: [u8; 21] = [
    20, 16, 8, BULL, 18, 12, 10, 4, 2, 1, 14, 6, 19, 17, 15, 13, 11, 9, 7, 5, 3,
];

pub fn is_valid_turn_score(score: u16) -> bool {
    score <= MAX_TURN_SCORE && !IMPOSSIBLE_TOTALS.contains(&score)
}

/// Every distinct non-miss dart on the board, highest scoring first.
fn all_darts() -> Vec<Dart> {
    let mut darts = Vec::with_capacity(62);
    for n in (1..=20).rev() {
        darts.push(Dart::Triple(n));
        darts.push(Dart::Double(n));
        darts.push(Dart::Single(n));
    }
    darts.push(Dart::Double(BULL));
    darts.push(Dart::Single(BULL));
    darts.sort_by(|a, b| b.score().cmp(&a.score()));
    darts
}

fn finishing_darts(double_out: bool) -> Vec<Dart> {
    if double_out {
        PREFERRED_DOUBLES.iter().map(|&n| Dart::Double(n)).collect()
    } else {
        all_darts()
    }
}

/// Fewest-dart finish for `remaining` within `darts` darts.
///
/// Set-up darts are chosen highest first; the finishing dart follows the
/// preferred doubles order when `double_out` is set.
pub fn suggest(remaining: u16, darts: u8, double_out: bool) -> Option<Vec<Dart>> {
    if remaining == 0 || darts == 0 {
        return None;
    }
    let board = all_darts();
    let finishers = finishing_darts(double_out);

    for used in 1..=darts.min(3) {
        if let Some(path) = search(remaining, used, &board, &finishers) {
            return Some(path);
        }
    }
    None
}

fn search(remaining: u16, darts: u8, board: &[Dart], finishers: &[Dart]) -> Option<Vec<Dart>> {
    if darts == 1 {
        return finishers
            .iter()
            .find(|d| d.score() == remaining)
            .map(|d| vec![*d]);
    }
    for setup in board {
        let s = setup.score();
        if s >= remaining {
            continue;
        }
        if let Some(mut rest) = search(remaining - s, darts - 1, board, finishers) {
            rest.insert(0, *setup);
            return Some(rest);
        }
    }
    None
}

/// Whether `score` can take `remaining` to exactly zero in `darts` darts.
pub fn can_finish(score: u16, darts: u8, double_out: bool) -> bool {
    suggest(score, darts, double_out).is_some()
}
