use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::engine::error::GameResult;
use crate::engine::mode::{ensure_running, validate_seats, ScoreKeeper};
use crate::engine::undo::History;
use crate::model::dart::{Dart, BULL};
use crate::model::event_result::Outcome;
use crate::model::player::GameContribution;
use crate::model::seat::Seat;

pub const STANDARD_TARGETS: [u8; 7] = [15, 16, 17, 18, 19, 20, BULL];
pub const HIDDEN_NUMBER_COUNT: usize = 6;
pub const MARKS_TO_CLOSE: u8 = 3;
pub const DARTS_PER_TURN: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CricketVariant {
    Standard,
    /// Six random numbers plus Bull, each hidden until first hit.
    Hidden,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CricketConfig {
    pub variant: CricketVariant,
}

impl Default for CricketConfig {
    fn default() -> Self {
        Self {
            variant: CricketVariant::Standard,
        }
    }
}

/// One player's progress on one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetState {
    pub number: u8,
    pub hits: u8,
    pub closed: bool,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CricketPlayer {
    pub seat: Seat,
    pub targets: Vec<TargetState>,
    pub marks: u32,
    pub turns: u32,
    pub is_winner: bool,
}

impl CricketPlayer {
    pub fn points(&self) -> u32 {
        self.targets.iter().map(|t| t.points).sum()
    }

    pub fn all_closed(&self) -> bool {
        self.targets.iter().all(|t| t.closed)
    }

    pub fn marks_per_round(&self) -> f64 {
        if self.turns == 0 {
            0.0
        } else {
            self.marks as f64 / self.turns as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CricketThrow {
    pub player: usize,
    pub round: u32,
    pub dart: Dart,
    /// Index into the target list, `None` for a miss.
    pub target: Option<usize>,
    pub marks: u8,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CricketState {
    pub config: CricketConfig,
    pub numbers: Vec<u8>,
    pub revealed: Vec<bool>,
    pub players: Vec<CricketPlayer>,
    pub current: usize,
    pub darts_in_turn: u8,
    pub round: u32,
    pub throws: Vec<CricketThrow>,
    pub finished: bool,
}

fn target_value(number: u8) -> u32 {
    number as u32
}

fn marks_for(dart: Dart) -> u8 {
    dart.multiplier()
}

/// Six distinct numbers from 1..=20, sorted, plus Bull.
pub fn hidden_targets<R: Rng + ?Sized>(rng: &mut R) -> Vec<u8> {
    let mut pool: Vec<u8> = (1..=20).collect();
    pool.shuffle(rng);
    let mut numbers: Vec<u8> = pool.into_iter().take(HIDDEN_NUMBER_COUNT).collect();
    numbers.sort_unstable();
    numbers.push(BULL);
    numbers
}

impl CricketState {
    fn new<R: Rng + ?Sized>(config: CricketConfig, seats: Vec<Seat>, rng: &mut R) -> GameResult<Self> {
        validate_seats(&seats)?;

        let numbers = match config.variant {
            CricketVariant::Standard => STANDARD_TARGETS.to_vec(),
            CricketVariant::Hidden => hidden_targets(rng),
        };
        let revealed = vec![config.variant == CricketVariant::Standard; numbers.len()];

        let players = seats
            .into_iter()
            .map(|seat| CricketPlayer {
                seat,
                targets: numbers
                    .iter()
                    .map(|&number| TargetState {
                        number,
                        hits: 0,
                        closed: false,
                        points: 0,
                    })
                    .collect(),
                marks: 0,
                turns: 0,
                is_winner: false,
            })
            .collect();

        Ok(Self {
            config,
            numbers,
            revealed,
            players,
            current: 0,
            darts_in_turn: 0,
            round: 1,
            throws: Vec::new(),
            finished: false,
        })
    }

    fn target_index(&self, dart: Dart) -> Option<usize> {
        if dart == Dart::Miss {
            return None;
        }
        self.numbers.iter().position(|&n| n == dart.number())
    }

    fn opponent_open(&self, target: usize) -> bool {
        self.players
            .iter()
            .enumerate()
            .any(|(i, p)| i != self.current && !p.targets[target].closed)
    }

    fn throw_dart(&mut self, dart: Dart) -> GameResult<Outcome> {
        ensure_running(self.finished)?;

        let target = self.target_index(dart);
        let mut marks = 0;
        let mut points = 0;

        if let Some(t) = target {
            self.revealed[t] = true;
            let scoring_open = self.opponent_open(t);
            let state = &mut self.players[self.current].targets[t];

            let thrown = marks_for(dart);
            let before = state.hits;
            state.hits = (before + thrown).min(MARKS_TO_CLOSE);
            state.closed = state.hits >= MARKS_TO_CLOSE;

            let excess = thrown - (state.hits - before);
            if excess > 0 && scoring_open {
                points = excess as u32 * target_value(state.number);
                state.points += points;
            }
            marks = thrown;
        }

        self.players[self.current].marks += marks as u32;
        self.throws.push(CricketThrow {
            player: self.current,
            round: self.round,
            dart,
            target,
            marks,
            points,
        });

        if let Some(outcome) = self.check_winner() {
            return Ok(outcome);
        }

        self.darts_in_turn += 1;
        if self.darts_in_turn >= DARTS_PER_TURN {
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
        self.players[self.current].turns += 1;
        self.darts_in_turn = 0;
        self.current = (self.current + 1) % self.players.len();
        if self.current == 0 {
            self.round += 1;
        }
    }

    fn check_winner(&mut self) -> Option<Outcome> {
        let me = &self.players[self.current];
        if !me.all_closed() {
            return None;
        }
        let my_points = me.points();
        let leads = self
            .players
            .iter()
            .enumerate()
            .all(|(i, p)| i == self.current || p.points() <= my_points);
        if !leads {
            return None;
        }

        let current = self.current;
        let player = &mut self.players[current];
        player.is_winner = true;
        player.turns += 1;
        self.finished = true;
        let name = player.seat.name.clone();
        log::info!("cricket: {name} closes out with {my_points} points");
        Some(Outcome::GameOver { winners: vec![name] })
    }

    pub fn is_revealed(&self, target: usize) -> bool {
        self.revealed.get(target).copied().unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CricketGame {
    history: History<CricketState>,
}

impl CricketGame {
    pub fn start(config: CricketConfig, seats: Vec<Seat>) -> GameResult<Self> {
        Self::start_with_rng(config, seats, &mut rand::thread_rng())
    }

    pub fn start_with_rng<R: Rng + ?Sized>(
        config: CricketConfig,
        seats: Vec<Seat>,
        rng: &mut R,
    ) -> GameResult<Self> {
        let state = CricketState::new(config, seats, rng)?;
        log::info!(
            "cricket: starting {:?} with {} players",
            state.config.variant,
            state.players.len()
        );
        Ok(Self {
            history: History::new(state),
        })
    }

    pub fn state(&self) -> &CricketState {
        self.history.current()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }
}

impl ScoreKeeper for CricketGame {
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
                cricket_marks: p.marks as u64,
                cricket_rounds: p.turns as u64,
                ..Default::default()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::engine::error::GameError;
    use crate::engine::mode::test_support::seats;

    fn standard(names: &[&str]) -> CricketGame {
        CricketGame::start(CricketConfig::default(), seats(names)).unwrap()
    }

    fn target(g: &CricketGame, player: usize, number: u8) -> TargetState {
        *g.state().players[player]
            .targets
            .iter()
            .find(|t| t.number == number)
            .unwrap()
    }

    fn assert_target_invariants(g: &CricketGame) {
        for p in &g.state().players {
            for t in &p.targets {
                assert!(t.hits <= MARKS_TO_CLOSE);
                assert_eq!(t.closed, t.hits >= MARKS_TO_CLOSE);
            }
        }
    }

    #[test]
    fn triple_closes_and_extra_marks_score() {
        let mut g = standard(&["Ann", "Bob"]);
        g.throw_dart(Dart::Triple(20)).unwrap();
        let t = target(&g, 0, 20);
        assert!(t.closed);
        assert_eq!(t.points, 0);

        g.throw_dart(Dart::Double(20)).unwrap();
        let t = target(&g, 0, 20);
        assert_eq!(t.hits, 3);
        assert_eq!(t.points, 40);
        assert_target_invariants(&g);
    }

    #[test]
    fn partial_close_scores_only_the_excess() {
        let mut g = standard(&["Ann", "Bob"]);
        g.throw_dart(Dart::Double(19)).unwrap();
        g.throw_dart(Dart::Triple(19)).unwrap();
        let t = target(&g, 0, 19);
        assert_eq!(t.hits, 3);
        assert_eq!(t.points, 38);
        assert_eq!(g.state().players[0].marks, 5);
    }

    #[test]
    fn no_points_once_everyone_closed() {
        let mut g = standard(&["Ann", "Bob"]);
        g.throw_dart(Dart::Triple(18)).unwrap();
        g.end_turn().unwrap();
        g.throw_dart(Dart::Triple(18)).unwrap();
        g.end_turn().unwrap();
        g.throw_dart(Dart::Triple(18)).unwrap();
        assert_eq!(target(&g, 0, 18).points, 0);
    }

    #[test]
    fn bull_counts_single_and_double() {
        let mut g = standard(&["Ann", "Bob"]);
        g.throw_dart(Dart::Single(BULL)).unwrap();
        g.throw_dart(Dart::Double(BULL)).unwrap();
        assert!(target(&g, 0, BULL).closed);
        g.end_turn().unwrap();
        g.end_turn().unwrap();
        g.throw_dart(Dart::Double(BULL)).unwrap();
        assert_eq!(target(&g, 0, BULL).points, 50);
    }

    #[test]
    fn off_target_darts_are_misses() {
        let mut g = standard(&["Ann"]);
        g.throw_dart(Dart::Triple(5)).unwrap();
        let throw = &g.state().throws[0];
        assert_eq!(throw.target, None);
        assert_eq!(throw.marks, 0);
        assert_eq!(g.state().players[0].marks, 0);
    }

    #[test]
    fn third_dart_advances_turn_and_round() {
        let mut g = standard(&["Ann", "Bob"]);
        g.throw_dart(Dart::Miss).unwrap();
        g.throw_dart(Dart::Miss).unwrap();
        assert_eq!(g.throw_dart(Dart::Miss), Ok(Outcome::NextPlayer));
        assert_eq!(g.current_player(), 1);
        assert_eq!(g.state().round, 1);
        g.end_turn().unwrap();
        assert_eq!(g.current_player(), 0);
        assert_eq!(g.state().round, 2);
    }

    #[test]
    fn win_requires_all_closed_and_lead() {
        let mut g = standard(&["Ann", "Bob"]);
        // Bob builds a 60 point lead on 20 while Ann has it open.
        g.end_turn().unwrap();
        g.throw_dart(Dart::Triple(20)).unwrap();
        g.throw_dart(Dart::Triple(20)).unwrap();
        g.end_turn().unwrap();

        for n in [15, 16, 17] {
            g.throw_dart(Dart::Triple(n)).unwrap();
        }
        g.end_turn().unwrap();
        for n in [18, 19, 20] {
            g.throw_dart(Dart::Triple(n)).unwrap();
        }
        g.end_turn().unwrap();
        g.throw_dart(Dart::Single(BULL)).unwrap();
        g.throw_dart(Dart::Double(BULL)).unwrap();

        assert!(g.state().players[0].all_closed());
        assert!(!g.is_finished());
        g.throw_dart(Dart::Miss).unwrap();
        g.end_turn().unwrap();

        g.throw_dart(Dart::Triple(15)).unwrap();
        assert!(!g.is_finished());
        g.throw_dart(Dart::Triple(15)).unwrap();
        assert!(g.is_finished());
        assert_eq!(g.state().players[0].points(), 90);
        assert_eq!(g.winners(), vec!["Ann".to_string()]);
        assert_eq!(g.throw_dart(Dart::Miss), Err(GameError::GameOver));
    }

    #[test]
    fn undo_restores_previous_targets() {
        let mut g = standard(&["Ann", "Bob"]);
        g.throw_dart(Dart::Triple(20)).unwrap();
        g.throw_dart(Dart::Double(20)).unwrap();
        let before = g.state().clone();
        g.throw_dart(Dart::Triple(20)).unwrap();
        assert_eq!(target(&g, 0, 20).points, 100);
        assert_eq!(g.current_player(), 1);

        g.undo().unwrap();
        assert_eq!(g.state(), &before);
        assert_eq!(target(&g, 0, 20).points, 40);
        assert_eq!(g.current_player(), 0);
    }

    #[test]
    fn hidden_targets_are_random_and_revealed_on_hit() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut g = CricketGame::start_with_rng(
            CricketConfig {
                variant: CricketVariant::Hidden,
            },
            seats(&["Ann", "Bob"]),
            &mut rng,
        )
        .unwrap();

        let numbers = g.state().numbers.clone();
        assert_eq!(numbers.len(), HIDDEN_NUMBER_COUNT + 1);
        assert_eq!(numbers.last(), Some(&BULL));
        assert!(numbers.windows(2).all(|w| w[0] < w[1]));
        assert!(g.state().revealed.iter().all(|r| !r));

        let first = numbers[0];
        g.throw_dart(Dart::Single(first)).unwrap();
        assert!(g.state().is_revealed(0));
        assert_eq!(target(&g, 0, first).hits, 1);
        assert!(!g.state().is_revealed(1));
    }

    #[test]
    fn hit_count_never_exceeds_three() {
        let mut g = standard(&["Ann", "Bob", "Cid"]);
        for i in 0..60u8 {
            let n = 15 + i % 6;
            let dart = match i % 3 {
                0 => Dart::Triple(n),
                1 => Dart::Double(BULL),
                _ => Dart::Single(n),
            };
            if g.is_finished() {
                break;
            }
            g.throw_dart(dart).unwrap();
            assert_target_invariants(&g);
        }
    }
}
