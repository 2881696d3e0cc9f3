use serde::{Deserialize, Serialize};

use crate::engine::checkout::{self, is_valid_turn_score};
use crate::engine::error::{GameError, GameResult};
use crate::engine::mode::{ensure_running, validate_seats, ScoreKeeper};
use crate::engine::undo::History;
use crate::model::dart::{self, Dart};
use crate::model::event_result::Outcome;
use crate::model::player::{three_dart_average, GameContribution};
use crate::model::seat::Seat;

pub const START_PRESETS: [u16; 4] = [301, 401, 501, 701];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct X01Config {
    pub start_score: u16,
    pub double_out: bool,
    pub legs_to_win: u8,
}

impl Default for X01Config {
    fn default() -> Self {
        Self {
            start_score: 501,
            double_out: true,
            legs_to_win: 1,
        }
    }
}

impl X01Config {
    fn validate(&self) -> GameResult<()> {
        if !(101..=1001).contains(&self.start_score) {
            return Err(GameError::InvalidConfig(format!(
                "start score {} outside 101..=1001",
                self.start_score
            )));
        }
        if self.legs_to_win == 0 {
            return Err(GameError::InvalidConfig("legs to win must be at least 1".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct X01Player {
    pub seat: Seat,
    pub remaining: u16,
    pub legs_won: u8,
    pub points: u64,
    pub darts: u64,
    pub highest_turn: u16,
    pub highest_checkout: u16,
    pub is_winner: bool,
}

impl X01Player {
    pub fn average(&self) -> f64 {
        three_dart_average(self.points, self.darts)
    }
}

/// One committed turn. `darts` is empty for keypad totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct X01Turn {
    pub player: usize,
    pub leg: u8,
    pub darts: Vec<Dart>,
    pub darts_used: u8,
    pub scored: u16,
    pub remaining_before: u16,
    pub remaining_after: u16,
    pub bust: bool,
    pub checkout: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct X01State {
    pub config: X01Config,
    pub players: Vec<X01Player>,
    pub current: usize,
    pub leg: u8,
    pub leg_starter: usize,
    /// Darts of the turn in progress (dartboard/voice input).
    pub pending: Vec<Dart>,
    pub turns: Vec<X01Turn>,
    pub finished: bool,
}

enum TurnEnd {
    Normal,
    Bust,
    Checkout,
}

impl X01State {
    fn new(config: X01Config, seats: Vec<Seat>) -> GameResult<Self> {
        config.validate()?;
        validate_seats(&seats)?;

        let players = seats
            .into_iter()
            .map(|seat| X01Player {
                seat,
                remaining: config.start_score,
                legs_won: 0,
                points: 0,
                darts: 0,
                highest_turn: 0,
                highest_checkout: 0,
                is_winner: false,
            })
            .collect();

        Ok(Self {
            config,
            players,
            current: 0,
            leg: 1,
            leg_starter: 0,
            pending: Vec::new(),
            turns: Vec::new(),
            finished: false,
        })
    }

    fn record_score(&mut self, score: u16, darts: u8) -> GameResult<Outcome> {
        ensure_running(self.finished)?;
        if !self.pending.is_empty() {
            return Err(GameError::TurnInProgress);
        }
        if !is_valid_turn_score(score) {
            return Err(GameError::InvalidScore(score));
        }
        if !(1..=3).contains(&darts) {
            return Err(GameError::InvalidDarts(darts));
        }

        let remaining = self.players[self.current].remaining;
        let double_out = self.config.double_out;

        if score > remaining || (double_out && remaining - score == 1) {
            return Ok(self.commit(0, 3, Vec::new(), TurnEnd::Bust));
        }

        if score == remaining {
            if !checkout::can_finish(score, 3, double_out) {
                return Ok(self.commit(0, 3, Vec::new(), TurnEnd::Bust));
            }
            if !checkout::can_finish(score, darts, double_out) {
                return Err(GameError::InvalidDarts(darts));
            }
            return Ok(self.commit(score, darts, Vec::new(), TurnEnd::Checkout));
        }

        if darts < 3 {
            return Err(GameError::InvalidDarts(darts));
        }
        Ok(self.commit(score, 3, Vec::new(), TurnEnd::Normal))
    }

    fn throw_dart(&mut self, dart: Dart) -> GameResult<Outcome> {
        ensure_running(self.finished)?;
        self.pending.push(dart);

        let remaining = self.players[self.current].remaining;
        let turn_total = dart::total(&self.pending);
        let used = self.pending.len() as u8;
        let double_out = self.config.double_out;

        if turn_total > remaining || (double_out && remaining - turn_total == 1) {
            let darts = std::mem::take(&mut self.pending);
            return Ok(self.commit(0, used, darts, TurnEnd::Bust));
        }
        if turn_total == remaining {
            let darts = std::mem::take(&mut self.pending);
            if double_out && !dart.is_double() {
                return Ok(self.commit(0, used, darts, TurnEnd::Bust));
            }
            return Ok(self.commit(turn_total, used, darts, TurnEnd::Checkout));
        }
        if used == 3 {
            let darts = std::mem::take(&mut self.pending);
            return Ok(self.commit(turn_total, 3, darts, TurnEnd::Normal));
        }
        Ok(Outcome::Recorded)
    }

    /// Closes the dart-by-dart turn early; unthrown darts count as misses.
    fn end_turn(&mut self) -> GameResult<Outcome> {
        ensure_running(self.finished)?;
        let darts = std::mem::take(&mut self.pending);
        let scored = dart::total(&darts);
        Ok(self.commit(scored, 3, darts, TurnEnd::Normal))
    }

    fn commit(&mut self, scored: u16, darts_used: u8, darts: Vec<Dart>, end: TurnEnd) -> Outcome {
        let idx = self.current;
        let leg = self.leg;
        let player = &mut self.players[idx];
        let before = player.remaining;

        let (bust, checkout) = match end {
            TurnEnd::Normal => (false, false),
            TurnEnd::Bust => (true, false),
            TurnEnd::Checkout => (false, true),
        };

        player.remaining = before - scored;
        player.points += scored as u64;
        player.darts += darts_used as u64;
        player.highest_turn = player.highest_turn.max(scored);

        self.turns.push(X01Turn {
            player: idx,
            leg,
            darts,
            darts_used,
            scored,
            remaining_before: before,
            remaining_after: player.remaining,
            bust,
            checkout,
        });

        if checkout {
            player.highest_checkout = player.highest_checkout.max(scored);
            player.legs_won += 1;
            let name = player.seat.name.clone();

            if player.legs_won >= self.config.legs_to_win {
                player.is_winner = true;
                self.finished = true;
                log::info!("x01: {name} wins the game");
                return Outcome::GameOver { winners: vec![name] };
            }

            log::info!("x01: {name} wins leg {leg}");
            self.start_next_leg();
            return Outcome::LegWon { player: name };
        }

        self.current = (self.current + 1) % self.players.len();
        if bust {
            Outcome::Bust
        } else {
            Outcome::NextPlayer
        }
    }

    fn start_next_leg(&mut self) {
        self.leg += 1;
        self.leg_starter = (self.leg_starter + 1) % self.players.len();
        self.current = self.leg_starter;
        for p in &mut self.players {
            p.remaining = self.config.start_score;
        }
    }

    /// Current player's remaining, minus darts already thrown this turn.
    pub fn live_remaining(&self) -> u16 {
        let remaining = self.players[self.current].remaining;
        remaining.saturating_sub(dart::total(&self.pending))
    }

    pub fn checkout_hint(&self) -> Option<Vec<Dart>> {
        if self.finished {
            return None;
        }
        let darts_left = 3 - self.pending.len() as u8;
        checkout::suggest(self.live_remaining(), darts_left, self.config.double_out)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct X01Game {
    history: History<X01State>,
}

impl X01Game {
    pub fn start(config: X01Config, seats: Vec<Seat>) -> GameResult<Self> {
        let state = X01State::new(config, seats)?;
        log::info!(
            "x01: starting {} with {} players",
            state.config.start_score,
            state.players.len()
        );
        Ok(Self {
            history: History::new(state),
        })
    }

    pub fn state(&self) -> &X01State {
        self.history.current()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }
}

impl ScoreKeeper for X01Game {
    fn throw_dart(&mut self, dart: Dart) -> GameResult<Outcome> {
        self.history.apply(|s| s.throw_dart(dart))
    }

    fn record_score(&mut self, score: u16, darts: u8) -> GameResult<Outcome> {
        self.history.apply(|s| s.record_score(score, darts))
    }

    fn end_turn(&mut self) -> GameResult<Outcome> {
        self.history.apply(|s| s.end_turn())
    }

    fn undo(&mut self) -> GameResult<()> {
        self.history.undo()
    }

    fn group_undo(&mut self, steps: usize) {
        self.history.squash(steps);
    }

    fn is_finished(&self) -> bool {
        self.state().finished
    }

    fn seats(&self) -> Vec<Seat> {
        self.state().players.iter().map(|p| p.seat.clone()).collect()
    }

    fn current_player(&self) -> usize {
        self.state().current
    }

    fn winners(&self) -> Vec<String> {
        self.state()
            .players
            .iter()
            .filter(|p| p.is_winner)
            .map(|p| p.seat.name.clone())
            .collect()
    }

    fn contributions(&self) -> Vec<GameContribution> {
        self.state()
            .players
            .iter()
            .map(|p| GameContribution {
                player_id: p.seat.player_id,
                won: p.is_winner,
                x01_points: p.points,
                x01_darts: p.darts,
                ..Default::default()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mode::test_support::seats;
    use crate::model::dart::BULL;

    fn game(start: u16, names: &[&str]) -> X01Game {
        X01Game::start(
            X01Config {
                start_score: start,
                ..Default::default()
            },
            seats(names),
        )
        .unwrap()
    }

    #[test]
    fn keypad_score_reduces_remaining() {
        let mut g = game(401, &["Ann"]);
        assert_eq!(g.record_score(45, 3), Ok(Outcome::NextPlayer));
        assert_eq!(g.state().players[0].remaining, 356);
        assert_eq!(g.state().players[0].darts, 3);
    }

    #[test]
    fn turn_passes_to_next_player() {
        let mut g = game(501, &["Ann", "Bob"]);
        g.record_score(60, 3).unwrap();
        assert_eq!(g.current_player(), 1);
        g.record_score(100, 3).unwrap();
        assert_eq!(g.current_player(), 0);
        assert_eq!(g.state().players[1].remaining, 401);
    }

    #[test]
    fn rejects_impossible_and_oversized_scores() {
        let mut g = game(501, &["Ann"]);
        assert_eq!(g.record_score(181, 3), Err(GameError::InvalidScore(181)));
        assert_eq!(g.record_score(179, 3), Err(GameError::InvalidScore(179)));
        assert_eq!(g.record_score(60, 4), Err(GameError::InvalidDarts(4)));
        assert_eq!(g.record_score(60, 2), Err(GameError::InvalidDarts(2)));
        assert_eq!(g.state().players[0].remaining, 501);
        assert!(!g.can_undo());
    }

    #[test]
    fn bust_voids_turn() {
        let mut g = game(101, &["Ann", "Bob"]);
        g.record_score(60, 3).unwrap(); // Ann 41
        g.record_score(0, 3).unwrap();
        assert_eq!(g.record_score(45, 3), Ok(Outcome::Bust));
        assert_eq!(g.state().players[0].remaining, 41);
        assert_eq!(g.current_player(), 1);

        g.record_score(0, 3).unwrap();
        // leaving 1 on double-out is a bust as well
        assert_eq!(g.record_score(40, 3), Ok(Outcome::Bust));
        assert_eq!(g.state().players[0].remaining, 41);
    }

    #[test]
    fn keypad_checkout_wins() {
        let mut g = game(101, &["Ann", "Bob"]);
        g.record_score(61, 3).unwrap();
        g.record_score(26, 3).unwrap();
        let out = g.record_score(40, 1).unwrap();
        assert_eq!(out, Outcome::GameOver { winners: vec!["Ann".into()] });
        let ann = &g.state().players[0];
        assert!(ann.is_winner);
        assert_eq!(ann.darts, 4);
        assert_eq!(ann.highest_checkout, 40);
        assert_eq!(g.record_score(26, 3), Err(GameError::GameOver));
    }

    #[test]
    fn unfinishable_checkout_is_bust() {
        let mut g = game(501, &["Ann"]);
        g.record_score(180, 3).unwrap();
        g.record_score(152, 3).unwrap(); // 169 left, a bogey number
        assert_eq!(g.record_score(169, 3), Err(GameError::InvalidScore(169)));
        g.record_score(9, 3).unwrap(); // 160
        assert_eq!(g.record_score(160, 2), Err(GameError::InvalidDarts(2)));
        assert_eq!(g.record_score(160, 3), Ok(Outcome::GameOver { winners: vec!["Ann".into()] }));
    }

    #[test]
    fn dart_input_commits_after_three() {
        let mut g = game(501, &["Ann", "Bob"]);
        assert_eq!(g.throw_dart(Dart::Triple(20)), Ok(Outcome::Recorded));
        assert_eq!(g.state().live_remaining(), 441);
        assert_eq!(g.record_score(60, 3), Err(GameError::TurnInProgress));
        g.throw_dart(Dart::Triple(20)).unwrap();
        assert_eq!(g.throw_dart(Dart::Single(20)), Ok(Outcome::NextPlayer));
        assert_eq!(g.state().players[0].remaining, 361);
        assert_eq!(g.state().turns[0].darts.len(), 3);
        assert_eq!(g.current_player(), 1);
    }

    #[test]
    fn dart_checkout_needs_a_double() {
        let mut g = game(101, &["Ann", "Bob"]);
        g.record_score(81, 3).unwrap(); // Ann 20
        g.record_score(0, 3).unwrap();
        assert_eq!(g.throw_dart(Dart::Single(20)), Ok(Outcome::Bust));
        assert_eq!(g.state().players[0].remaining, 20);
        g.record_score(0, 3).unwrap();
        g.throw_dart(Dart::Single(10)).unwrap();
        assert_eq!(
            g.throw_dart(Dart::Double(5)),
            Ok(Outcome::GameOver { winners: vec!["Ann".into()] })
        );
        assert_eq!(g.state().players[0].darts, 3 + 1 + 2);
    }

    #[test]
    fn single_out_accepts_any_finish() {
        let mut g = X01Game::start(
            X01Config {
                start_score: 101,
                double_out: false,
                legs_to_win: 1,
            },
            seats(&["Ann"]),
        )
        .unwrap();
        g.record_score(100, 3).unwrap();
        assert!(g.throw_dart(Dart::Single(1)).unwrap().is_game_over());
    }

    #[test]
    fn legs_rotate_starter() {
        let mut g = X01Game::start(
            X01Config {
                start_score: 101,
                double_out: true,
                legs_to_win: 2,
            },
            seats(&["Ann", "Bob"]),
        )
        .unwrap();
        g.record_score(61, 3).unwrap();
        g.record_score(0, 3).unwrap();
        assert_eq!(g.record_score(40, 1), Ok(Outcome::LegWon { player: "Ann".into() }));
        let s = g.state();
        assert_eq!(s.leg, 2);
        assert_eq!(s.current, 1);
        assert!(s.players.iter().all(|p| p.remaining == 101));
        assert_eq!(s.players[0].legs_won, 1);
    }

    #[test]
    fn undo_restores_turn_and_pointer() {
        let mut g = game(501, &["Ann", "Bob"]);
        g.record_score(100, 3).unwrap();
        g.throw_dart(Dart::Double(BULL)).unwrap();
        g.undo().unwrap();
        assert!(g.state().pending.is_empty());
        assert_eq!(g.current_player(), 1);
        g.undo().unwrap();
        assert_eq!(g.state().players[0].remaining, 501);
        assert_eq!(g.current_player(), 0);
        assert!(g.state().turns.is_empty());
    }

    #[test]
    fn undo_after_win_reopens_game() {
        let mut g = game(101, &["Ann"]);
        g.record_score(61, 3).unwrap();
        g.record_score(40, 1).unwrap();
        assert!(g.is_finished());
        g.undo().unwrap();
        assert!(!g.is_finished());
        assert!(!g.state().players[0].is_winner);
        assert_eq!(g.state().players[0].remaining, 40);
    }

    #[test]
    fn checkout_hint_tracks_pending_darts() {
        let mut g = game(101, &["Ann"]);
        g.record_score(1, 3).unwrap();
        assert_eq!(g.state().checkout_hint(), Some(vec![Dart::Triple(20), Dart::Double(20)]));
        g.throw_dart(Dart::Single(20)).unwrap();
        assert_eq!(g.state().checkout_hint(), Some(vec![Dart::Triple(20), Dart::Double(10)]));
    }

    #[test]
    fn rejects_bad_config() {
        let err = X01Game::start(
            X01Config {
                start_score: 50,
                ..Default::default()
            },
            seats(&["Ann"]),
        );
        assert!(matches!(err, Err(GameError::InvalidConfig(_))));
    }
}
