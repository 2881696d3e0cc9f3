use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type PlayerId = Uuid;

pub const MAX_NAME_LEN: usize = 20;

/// Roster entry. The roster is the system of record for identity and
/// lifetime stats; games only keep the id and a copy of the name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub stats: PlayerStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub games_played: u32,
    pub games_won: u32,

    /// X01 points and darts, for the lifetime 3-dart average.
    pub x01_points: u64,
    pub x01_darts: u64,

    /// Cricket marks and completed turns, for marks per round.
    pub cricket_marks: u64,
    pub cricket_rounds: u64,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            stats: PlayerStats::default(),
        }
    }
}

impl PlayerStats {
    pub fn average(&self) -> f64 {
        three_dart_average(self.x01_points, self.x01_darts)
    }

    pub fn marks_per_round(&self) -> f64 {
        if self.cricket_rounds == 0 {
            0.0
        } else {
            self.cricket_marks as f64 / self.cricket_rounds as f64
        }
    }

    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            self.games_won as f64 / self.games_played as f64
        }
    }
}

pub fn three_dart_average(points: u64, darts: u64) -> f64 {
    if darts == 0 {
        0.0
    } else {
        points as f64 / darts as f64 * 3.0
    }
}

/// What a finished game contributes to one roster player.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameContribution {
    pub player_id: PlayerId,
    pub won: bool,
    pub x01_points: u64,
    pub x01_darts: u64,
    pub cricket_marks: u64,
    pub cricket_rounds: u64,
}

impl PlayerStats {
    pub fn apply(&mut self, c: &GameContribution) {
        self.games_played += 1;
        if c.won {
            self.games_won += 1;
        }
        self.x01_points += c.x01_points;
        self.x01_darts += c.x01_darts;
        self.cricket_marks += c.cricket_marks;
        self.cricket_rounds += c.cricket_rounds;
    }
}
