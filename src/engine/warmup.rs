use serde::{Deserialize, Serialize};

use crate::engine::error::GameResult;
use crate::engine::mode::{ensure_running, validate_seats, ScoreKeeper};
use crate::engine::undo::History;
use crate::model::dart::{Dart, BULL};
use crate::model::event_result::Outcome;
use crate::model::player::GameContribution;
use crate::model::seat::Seat;

/// 1..=20 then Bull.
pub const SEQUENCE_LEN: usize = 21;

pub fn sequence_target(step: usize) -> u8 {
    if step >= 20 {
        BULL
    } else {
        step as u8 + 1
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarmupConfig {
    /// Doubles advance two steps and triples three.
    pub multiplier_skips: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarmupPlayer {
    pub seat: Seat,
    /// Index into the 1..=20, Bull sequence.
    pub step: usize,
    pub darts: u32,
    pub hits: u32,
    pub is_winner: bool,
}

impl WarmupPlayer {
    pub fn target(&self) -> u8 {
        sequence_target(self.step)
    }

    pub fn hit_rate(&self) -> f64 {
        if self.darts == 0 {
            0.0
        } else {
            self.hits as f64 / self.darts as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarmupState {
    pub config: WarmupConfig,
    pub players: Vec<WarmupPlayer>,
    pub current: usize,
    pub darts_in_turn: u8,
    pub log: Vec<(usize, Dart, bool)>,
    pub finished: bool,
}

impl WarmupState {
    fn new(config: WarmupConfig, seats: Vec<Seat>) -> GameResult<Self> {
        validate_seats(&seats)?;
        let players = seats
            .into_iter()
            .map(|seat| WarmupPlayer {
                seat,
                step: 0,
                darts: 0,
                hits: 0,
                is_winner: false,
            })
            .collect();
        Ok(Self {
            config,
            players,
            current: 0,
            darts_in_turn: 0,
            log: Vec::new(),
            finished: false,
        })
    }

    fn throw_dart(&mut self, dart: Dart) -> GameResult<Outcome> {
        ensure_running(self.finished)?;
        let skips = self.config.multiplier_skips;
        let player = &mut self.players[self.current];
        player.darts += 1;

        let target = player.target();
        let hit = dart != Dart::Miss && dart.number() == target;
        if hit {
            player.hits += 1;
            let advance = if skips { dart.multiplier() as usize } else { 1 };
            if target == BULL {
                player.step = SEQUENCE_LEN;
            } else {
                // never skip past Bull
                player.step = (player.step + advance).min(SEQUENCE_LEN - 1);
            }
        }
        self.log.push((self.current, dart, hit));

        if self.players[self.current].step >= SEQUENCE_LEN {
            let p = &mut self.players[self.current];
            p.is_winner = true;
            self.finished = true;
            log::info!("warmup: {} finished in {} darts", p.seat.name, p.darts);
            return Ok(Outcome::GameOver {
                winners: vec![p.seat.name.clone()],
            });
        }

        self.darts_in_turn += 1;
        if self.darts_in_turn >= 3 {
            self.advance();
            return Ok(Outcome::NextPlayer);
        }
        Ok(Outcome::Recorded)
    }

    fn end_turn(&mut self) -> GameResult<Outcome> {
        ensure_running(self.finished)?;
        self.advance();
        Ok(Outcome::NextPlayer)
    }

    fn advance(&mut self) {
        self.darts_in_turn = 0;
        self.current = (self.current + 1) % self.players.len();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarmupGame {
    history: History<WarmupState>,
}

impl WarmupGame {
    pub fn start(config: WarmupConfig, seats: Vec<Seat>) -> GameResult<Self> {
        let state = WarmupState::new(config, seats)?;
        Ok(Self {
            history: History::new(state),
        })
    }

    pub fn state(&self) -> &WarmupState {
        self.history.current()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }
}

impl ScoreKeeper for WarmupGame {
    fn throw_dart(&mut self, dart: Dart) -> GameResult<Outcome> {
        self.history.apply(|s| s.throw_dart(dart))
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
                ..Default::default()
            })
            .collect()
    }
}
