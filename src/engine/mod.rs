pub mod engine;
pub mod error;
pub mod protocol;
pub mod storage;
pub mod timing;

pub mod board;
pub mod checkout;
pub mod game;
pub mod mode;
pub mod roster;
pub mod undo;
pub mod voice;

pub mod cricket;
pub mod half_it;
pub mod progressive;
pub mod warmup;
pub mod x01;

/// Seats per game.
pub const MAX_PLAYERS: usize = 8;
