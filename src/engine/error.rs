use thiserror::Error;

use crate::engine::voice::PhraseError;
use crate::model::player::PlayerId;

/// Rule violations and invalid input. Every variant is recoverable: the
/// action is rejected and the state is left untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("the game is already over")]
    GameOver,

    #[error("no game is running")]
    NoActiveGame,

    #[error("a game needs at least one player")]
    NoPlayers,

    #[error("too many players ({0}), at most {max} are allowed", max = crate::engine::MAX_PLAYERS)]
    TooManyPlayers(usize),

    #[error("player {0} is seated twice")]
    DuplicatePlayer(PlayerId),

    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),

    #[error("invalid player name '{0}'")]
    InvalidPlayerName(String),

    #[error("a player named '{0}' already exists")]
    NameTaken(String),

    #[error("{0} is not a valid score")]
    InvalidScore(u16),

    #[error("{score} is above the maximum of {max} for this round")]
    ScoreAboveMax { score: u16, max: u16 },

    #[error("{0} is not a valid number of darts")]
    InvalidDarts(u8),

    #[error("finish the darts of the current turn first")]
    TurnInProgress,

    #[error("the turn ended before the last dart of the phrase")]
    TurnEndedEarly,

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("{0} input is not supported in this game")]
    UnsupportedInput(&'static str),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Voice(#[from] PhraseError),
}

pub type GameResult<T> = std::result::Result<T, GameError>;
