use serde::{Deserialize, Serialize};

/// What an accepted scoring action did to the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outcome {
    /// Dart recorded, same player keeps throwing.
    Recorded,
    /// Turn finished, next player is up.
    NextPlayer,
    /// Turn voided.
    Bust,
    LegWon { player: String },
    LevelCleared { level: u32, target: u16 },
    LevelFailed { failures: u8, target: u16 },
    GameOver { winners: Vec<String> },
}

impl Outcome {
    pub fn short_name(&self) -> &'static str {
        match self {
            Outcome::Recorded => "Recorded",
            Outcome::NextPlayer => "NextPlayer",
            Outcome::Bust => "Bust",
            Outcome::LegWon { .. } => "LegWon",
            Outcome::LevelCleared { .. } => "LevelCleared",
            Outcome::LevelFailed { .. } => "LevelFailed",
            Outcome::GameOver { .. } => "GameOver",
        }
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self, Outcome::GameOver { .. })
    }

    /// False only while the same player still has darts to throw.
    pub fn ends_turn(&self) -> bool {
        !matches!(self, Outcome::Recorded)
    }
}
