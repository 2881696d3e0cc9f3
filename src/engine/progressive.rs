use serde::{Deserialize, Serialize};

use crate::engine::checkout::{self, is_valid_turn_score};
use crate::engine::error::{GameError, GameResult};
use crate::engine::mode::{ensure_running, validate_seats, ScoreKeeper};
use crate::engine::undo::History;
use crate::model::event_result::Outcome;
use crate::model::player::GameContribution;
use crate::model::seat::Seat;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressiveConfig {
    pub start_target: u16,
    pub increment: u16,
    pub darts_per_level: u8,
    pub max_failures: u8,
    pub double_out: bool,
}

impl Default for ProgressiveConfig {
    fn default() -> Self {
        Self {
            start_target: 40,
            increment: 10,
            darts_per_level: 9,
            max_failures: 3,
            double_out: false,
        }
    }
}

impl ProgressiveConfig {
    fn validate(&self) -> GameResult<()> {
        if self.start_target == 0 || self.increment == 0 {
            return Err(GameError::InvalidConfig("target and increment must be positive".into()));
        }
        if self.darts_per_level == 0 || self.max_failures == 0 {
            return Err(GameError::InvalidConfig(
                "darts per level and failures must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressivePlayer {
    pub seat: Seat,
    pub finishes: u32,
    pub darts: u64,
    pub is_winner: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelResult {
    Continue,
    Cleared,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressiveTurn {
    pub player: usize,
    pub level: u32,
    pub target: u16,
    pub score: u16,
    pub darts: u8,
    pub remaining_after: u16,
    pub result: LevelResult,
}

/// The team works down from `target`; all players share the level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressiveState {
    pub config: ProgressiveConfig,
    pub players: Vec<ProgressivePlayer>,
    pub current: usize,
    pub level: u32,
    pub target: u16,
    pub remaining: u16,
    pub darts_left: u8,
    pub failures: u8,
    pub best_target: u16,
    pub turns: Vec<ProgressiveTurn>,
    pub finished: bool,
}

impl ProgressiveState {
    fn new(config: ProgressiveConfig, seats: Vec<Seat>) -> GameResult<Self> {
        config.validate()?;
        validate_seats(&seats)?;

        let players = seats
            .into_iter()
            .map(|seat| ProgressivePlayer {
                seat,
                finishes: 0,
                darts: 0,
                is_winner: false,
            })
            .collect();

        Ok(Self {
            players,
            current: 0,
            level: 1,
            target: config.start_target,
            remaining: config.start_target,
            darts_left: config.darts_per_level,
            failures: 0,
            best_target: config.start_target,
            turns: Vec::new(),
            finished: false,
            config,
        })
    }

    fn record_score(&mut self, score: u16, darts: u8) -> GameResult<Outcome> {
        ensure_running(self.finished)?;
        if !is_valid_turn_score(score) {
            return Err(GameError::InvalidScore(score));
        }
        if darts == 0 || darts > 3 || darts > self.darts_left {
            return Err(GameError::InvalidDarts(darts));
        }

        self.players[self.current].darts += darts as u64;
        self.darts_left -= darts;

        let double_out = self.config.double_out;
        let busted = score > self.remaining
            || (double_out && self.remaining - score == 1)
            || (score == self.remaining && !checkout::can_finish(score, darts, double_out));
        let result = if busted {
            LevelResult::Failed
        } else {
            self.remaining -= score;
            if self.remaining == 0 {
                LevelResult::Cleared
            } else if self.darts_left == 0 {
                LevelResult::Failed
            } else {
                LevelResult::Continue
            }
        };

        self.turns.push(ProgressiveTurn {
            player: self.current,
            level: self.level,
            target: self.target,
            score,
            darts,
            remaining_after: self.remaining,
            result,
        });

        let outcome = match result {
            LevelResult::Cleared => self.clear_level(),
            LevelResult::Failed => self.fail_level(),
            LevelResult::Continue => Outcome::NextPlayer,
        };

        if !self.finished {
            self.current = (self.current + 1) % self.players.len();
        }
        Ok(outcome)
    }

    fn clear_level(&mut self) -> Outcome {
        self.players[self.current].finishes += 1;
        self.level += 1;
        self.target += self.config.increment;
        self.best_target = self.best_target.max(self.target);
        self.reset_level();
        log::debug!("progressive: level {} cleared, target now {}", self.level - 1, self.target);
        Outcome::LevelCleared {
            level: self.level - 1,
            target: self.target,
        }
    }

    fn fail_level(&mut self) -> Outcome {
        self.failures += 1;
        if self.failures >= self.config.max_failures {
            return self.finish();
        }
        self.target = self
            .target
            .saturating_sub(self.config.increment)
            .max(self.config.start_target);
        self.reset_level();
        Outcome::LevelFailed {
            failures: self.failures,
            target: self.target,
        }
    }

    fn reset_level(&mut self) {
        self.remaining = self.target;
        self.darts_left = self.config.darts_per_level;
    }

    fn finish(&mut self) -> Outcome {
        self.finished = true;
        let most = self.players.iter().map(|p| p.finishes).max().unwrap_or(0);
        let mut winners = Vec::new();
        if most > 0 {
            for p in &mut self.players {
                if p.finishes == most {
                    p.is_winner = true;
                    winners.push(p.seat.name.clone());
                }
            }
        }
        log::info!(
            "progressive: over at level {}, best target {}",
            self.level,
            self.best_target
        );
        Outcome::GameOver { winners }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressiveGame {
    history: History<ProgressiveState>,
}

impl ProgressiveGame {
    pub fn start(config: ProgressiveConfig, seats: Vec<Seat>) -> GameResult<Self> {
        let state = ProgressiveState::new(config, seats)?;
        log::info!("progressive: starting at {}", state.target);
        Ok(Self {
            history: History::new(state),
        })
    }

    pub fn state(&self) -> &ProgressiveState {
        self.history.current()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }
}

impl ScoreKeeper for ProgressiveGame {
    fn record_score(&mut self, score: u16, darts: u8) -> GameResult<Outcome> {
        self.history.apply(|s| s.record_score(score, darts))
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
                ..Default::default()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mode::test_support::seats;

    fn game(names: &[&str]) -> ProgressiveGame {
        ProgressiveGame::start(ProgressiveConfig::default(), seats(names)).unwrap()
    }

    #[test]
    fn exact_finish_levels_up() {
        let mut g = game(&["Ann", "Bob"]);
        assert_eq!(g.record_score(20, 3), Ok(Outcome::NextPlayer));
        assert_eq!(g.state().remaining, 20);
        assert_eq!(
            g.record_score(20, 2),
            Ok(Outcome::LevelCleared { level: 1, target: 50 })
        );
        let s = g.state();
        assert_eq!(s.level, 2);
        assert_eq!(s.target, 50);
        assert_eq!(s.remaining, 50);
        assert_eq!(s.darts_left, 9);
        assert_eq!(s.players[1].finishes, 1);
        assert_eq!(s.current, 0);
    }

    #[test]
    fn overshoot_is_a_failure() {
        let mut g = game(&["Ann"]);
        g.record_score(40, 3).unwrap(); // 50
        assert_eq!(
            g.record_score(60, 3),
            Ok(Outcome::LevelFailed { failures: 1, target: 40 })
        );
        assert_eq!(g.state().remaining, 40);
    }

    #[test]
    fn running_out_of_darts_is_a_failure() {
        let mut g = game(&["Ann"]);
        g.record_score(40, 1).unwrap(); // 50
        g.record_score(50, 1).unwrap(); // 60
        g.record_score(10, 3).unwrap();
        g.record_score(10, 3).unwrap();
        assert_eq!(
            g.record_score(10, 3),
            Ok(Outcome::LevelFailed { failures: 1, target: 50 })
        );
        assert_eq!(g.state().failures, 1);
        assert_eq!(g.state().remaining, 50);
    }

    #[test]
    fn target_never_drops_below_start() {
        let mut g = game(&["Ann"]);
        assert_eq!(
            g.record_score(60, 3),
            Ok(Outcome::LevelFailed { failures: 1, target: 40 })
        );
        assert_eq!(g.state().target, 40);
    }

    #[test]
    fn cannot_spend_more_darts_than_left() {
        let mut g = game(&["Ann"]);
        g.record_score(1, 3).unwrap();
        g.record_score(1, 3).unwrap();
        g.record_score(1, 2).unwrap();
        assert_eq!(g.record_score(1, 2), Err(GameError::InvalidDarts(2)));
    }

    #[test]
    fn game_ends_after_max_failures() {
        let mut g = game(&["Ann", "Bob"]);
        g.record_score(40, 1).unwrap(); // Ann clears
        for _ in 0..2 {
            g.record_score(100, 3).unwrap();
        }
        let out = g.record_score(100, 3).unwrap();
        assert_eq!(out, Outcome::GameOver { winners: vec!["Ann".into()] });
        assert!(g.is_finished());
        assert_eq!(g.state().best_target, 50);
        assert_eq!(g.record_score(10, 3), Err(GameError::GameOver));
    }

    #[test]
    fn double_out_leaving_one_fails() {
        let mut g = ProgressiveGame::start(
            ProgressiveConfig {
                double_out: true,
                ..Default::default()
            },
            seats(&["Ann"]),
        )
        .unwrap();
        assert!(matches!(g.record_score(39, 3), Ok(Outcome::LevelFailed { .. })));
    }

    #[test]
    fn double_out_finish_must_end_on_a_double() {
        let mut g = ProgressiveGame::start(
            ProgressiveConfig {
                double_out: true,
                ..Default::default()
            },
            seats(&["Ann"]),
        )
        .unwrap();
        g.record_score(37, 3).unwrap();
        assert_eq!(g.state().remaining, 3);
        assert_eq!(
            g.record_score(3, 1),
            Ok(Outcome::LevelFailed { failures: 1, target: 40 })
        );
        assert_eq!(g.state().players[0].finishes, 0);

        g.record_score(36, 3).unwrap();
        assert_eq!(
            g.record_score(4, 1),
            Ok(Outcome::LevelCleared { level: 1, target: 50 })
        );
    }

    #[test]
    fn undo_restores_level() {
        let mut g = game(&["Ann"]);
        g.record_score(40, 2).unwrap();
        assert_eq!(g.state().target, 50);
        g.undo().unwrap();
        assert_eq!(g.state().target, 40);
        assert_eq!(g.state().remaining, 40);
        assert_eq!(g.state().level, 1);
        assert_eq!(g.state().players[0].finishes, 0);
    }
}
