use crate::engine::game::GameConfig;
use crate::engine::voice::Language;
use crate::model::dart::Dart;
use crate::model::event_result::Outcome;
use crate::model::player::{Player, PlayerId};

#[derive(Debug, Clone, PartialEq)]
pub enum ScoreInput {
    /// Keypad total for a turn.
    Total { score: u16, darts: u8 },
    Dart(Dart),
    EndTurn,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    AddPlayer(String),
    RenamePlayer { id: PlayerId, name: String },
    RemovePlayer(PlayerId),
    ImportPlayers(Vec<Player>),

    StartGame {
        config: GameConfig,
        players: Vec<PlayerId>,
        shuffle: bool,
    },
    Score(ScoreInput),
    /// A transcribed voice phrase.
    Voice(String),
    Undo,
    EndGame,

    SetDebounce(u64),
    SetLanguage(Language),
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineResponse {
    Applied { outcomes: Vec<Outcome> },
    RosterUpdated,
    GameStarted,
    Undone,
    GameEnded,
    SettingsChanged,
    /// Dropped by the duplicate-input guard.
    Debounced,
    Rejected { reason: String },
}
