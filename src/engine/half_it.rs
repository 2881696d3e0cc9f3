use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::error::{GameError, GameResult};
use crate::engine::mode::{ensure_running, validate_seats, ScoreKeeper};
use crate::engine::undo::History;
use crate::model::dart::{Dart, BULL};
use crate::model::event_result::Outcome;
use crate::model::player::GameContribution;
use crate::model::seat::Seat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "number", rename_all = "snake_case")]
pub enum HalfItTarget {
    Number(u8),
    AnyDouble,
    AnyTriple,
    Bull,
}

pub const ROUNDS: [HalfItTarget; 9] = [
    HalfItTarget::Number(15),
    HalfItTarget::Number(16),
    HalfItTarget::AnyDouble,
    HalfItTarget::Number(17),
    HalfItTarget::Number(18),
    HalfItTarget::AnyTriple,
    HalfItTarget::Number(19),
    HalfItTarget::Number(20),
    HalfItTarget::Bull,
];

impl HalfItTarget {
    /// Best three-dart score on this target.
    pub fn max_score(&self) -> u16 {
        match *self {
            HalfItTarget::Number(n) => 9 * n as u16,
            HalfItTarget::AnyDouble | HalfItTarget::Bull => 150,
            HalfItTarget::AnyTriple => 180,
        }
    }

    /// Whether three darts on this target can add up to `score`.
    pub fn reachable(&self, score: u16) -> bool {
        match *self {
            HalfItTarget::Number(n) => score % n as u16 == 0,
            HalfItTarget::Bull => score % 25 == 0,
            HalfItTarget::AnyDouble | HalfItTarget::AnyTriple => true,
        }
    }

    pub fn counts(&self, dart: Dart) -> bool {
        match *self {
            HalfItTarget::Number(n) => dart.number() == n && dart != Dart::Miss,
            HalfItTarget::AnyDouble => dart.is_double(),
            HalfItTarget::AnyTriple => matches!(dart, Dart::Triple(_)),
            HalfItTarget::Bull => dart.is_bull(),
        }
    }
}

impl fmt::Display for HalfItTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HalfItTarget::Number(n) => write!(f, "{n}"),
            HalfItTarget::AnyDouble => write!(f, "Double"),
            HalfItTarget::AnyTriple => write!(f, "Triple"),
            HalfItTarget::Bull => write!(f, "Bull"),
        }
    }
}

/// Score a round's darts against its target; darts off target count 0.
pub fn round_score(target: HalfItTarget, darts: &[Dart]) -> u16 {
    darts
        .iter()
        .filter(|d| target.counts(**d))
        .map(|d| d.score())
        .sum()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HalfItConfig {
    pub start_score: u32,
}

impl Default for HalfItConfig {
    fn default() -> Self {
        Self { start_score: 40 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HalfItPlayer {
    pub seat: Seat,
    pub total: u32,
    pub halvings: u32,
    pub is_winner: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HalfItEntry {
    pub player: usize,
    pub round: usize,
    pub score: u16,
    pub total_before: u32,
    pub total_after: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HalfItState {
    pub config: HalfItConfig,
    pub players: Vec<HalfItPlayer>,
    pub current: usize,
    /// Index into [`ROUNDS`].
    pub round: usize,
    /// Darts of the turn in progress (dartboard/voice input).
    pub pending: Vec<Dart>,
    pub entries: Vec<HalfItEntry>,
    pub finished: bool,
}

impl HalfItState {
    fn new(config: HalfItConfig, seats: Vec<Seat>) -> GameResult<Self> {
        validate_seats(&seats)?;
        let players = seats
            .into_iter()
            .map(|seat| HalfItPlayer {
                seat,
                total: config.start_score,
                halvings: 0,
                is_winner: false,
            })
            .collect();

        Ok(Self {
            config,
            players,
            current: 0,
            round: 0,
            pending: Vec::new(),
            entries: Vec::new(),
            finished: false,
        })
    }

    pub fn target(&self) -> HalfItTarget {
        ROUNDS[self.round.min(ROUNDS.len() - 1)]
    }

    fn record_score(&mut self, score: u16) -> GameResult<Outcome> {
        ensure_running(self.finished)?;
        if !self.pending.is_empty() {
            return Err(GameError::TurnInProgress);
        }
        let max = self.target().max_score();
        if score > max {
            return Err(GameError::ScoreAboveMax { score, max });
        }
        if !self.target().reachable(score) {
            return Err(GameError::InvalidScore(score));
        }
        Ok(self.commit(score))
    }

    fn throw_dart(&mut self, dart: Dart) -> GameResult<Outcome> {
        ensure_running(self.finished)?;
        self.pending.push(dart);
        if self.pending.len() < 3 {
            return Ok(Outcome::Recorded);
        }
        self.end_turn()
    }

    fn end_turn(&mut self) -> GameResult<Outcome> {
        ensure_running(self.finished)?;
        let darts = std::mem::take(&mut self.pending);
        let score = round_score(self.target(), &darts);
        Ok(self.commit(score))
    }

    fn commit(&mut self, score: u16) -> Outcome {
        let player = &mut self.players[self.current];
        let before = player.total;
        if score == 0 {
            player.total /= 2;
            player.halvings += 1;
        } else {
            player.total += score as u32;
        }
        self.entries.push(HalfItEntry {
            player: self.current,
            round: self.round,
            score,
            total_before: before,
            total_after: player.total,
        });

        self.current += 1;
        if self.current < self.players.len() {
            return Outcome::NextPlayer;
        }
        self.current = 0;
        self.round += 1;
        if self.round < ROUNDS.len() {
            return Outcome::NextPlayer;
        }

        self.finish()
    }

    fn finish(&mut self) -> Outcome {
        self.finished = true;
        self.round = ROUNDS.len() - 1;
        let best = self.players.iter().map(|p| p.total).max().unwrap_or(0);
        let mut winners = Vec::new();
        for p in &mut self.players {
            if p.total == best {
                p.is_winner = true;
                winners.push(p.seat.name.clone());
            }
        }
        log::info!("half-it: finished, best total {best}");
        Outcome::GameOver { winners }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HalfItGame {
    history: History<HalfItState>,
}

impl HalfItGame {
    pub fn start(config: HalfItConfig, seats: Vec<Seat>) -> GameResult<Self> {
        let state = HalfItState::new(config, seats)?;
        log::info!("half-it: starting with {} players", state.players.len());
        Ok(Self {
            history: History::new(state),
        })
    }

    pub fn state(&self) -> &HalfItState {
        self.history.current()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }
}

impl ScoreKeeper for HalfItGame {
    fn throw_dart(&mut self, dart: Dart) -> GameResult<Outcome> {
        self.history.apply(|s| s.throw_dart(dart))
    }

    /// The dart count is ignored; a Half-It round is always three darts.
    fn record_score(&mut self, score: u16, _darts: u8) -> GameResult<Outcome> {
        self.history.apply(|s| s.record_score(score))
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
