use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::cricket::{CricketConfig, CricketGame, CricketVariant};
use crate::engine::error::GameResult;
use crate::engine::half_it::{HalfItConfig, HalfItGame};
use crate::engine::mode::ScoreKeeper;
use crate::engine::progressive::{ProgressiveConfig, ProgressiveGame};
use crate::engine::warmup::{WarmupConfig, WarmupGame};
use crate::engine::x01::{X01Config, X01Game};
use crate::model::seat::Seat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    X01,
    Cricket,
    HiddenCricket,
    HalfIt,
    ProgressiveFinish,
    Warmup,
}

impl GameMode {
    pub const ALL: [GameMode; 6] = [
        GameMode::X01,
        GameMode::Cricket,
        GameMode::HiddenCricket,
        GameMode::HalfIt,
        GameMode::ProgressiveFinish,
        GameMode::Warmup,
    ];

    pub fn default_config(&self) -> GameConfig {
        match self {
            GameMode::X01 => GameConfig::X01(X01Config::default()),
            GameMode::Cricket => GameConfig::Cricket(CricketConfig::default()),
            GameMode::HiddenCricket => GameConfig::Cricket(CricketConfig {
                variant: CricketVariant::Hidden,
            }),
            GameMode::HalfIt => GameConfig::HalfIt(HalfItConfig::default()),
            GameMode::ProgressiveFinish => GameConfig::Progressive(ProgressiveConfig::default()),
            GameMode::Warmup => GameConfig::Warmup(WarmupConfig::default()),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            GameMode::X01 => "Count down to exactly zero.",
            GameMode::Cricket => "Close 15 to 20 and Bull, score on open numbers.",
            GameMode::HiddenCricket => "Cricket on secret random numbers.",
            GameMode::HalfIt => "Miss the round target and your score is halved.",
            GameMode::ProgressiveFinish => "Team checkout ladder, ten more each level.",
            GameMode::Warmup => "Around the clock, 1 to 20 then Bull.",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameMode::X01 => "X01",
            GameMode::Cricket => "Cricket",
            GameMode::HiddenCricket => "Hidden Cricket",
            GameMode::HalfIt => "Half-It",
            GameMode::ProgressiveFinish => "Progressive Finish",
            GameMode::Warmup => "Warmup",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "config", rename_all = "snake_case")]
pub enum GameConfig {
    X01(X01Config),
    Cricket(CricketConfig),
    HalfIt(HalfItConfig),
    Progressive(ProgressiveConfig),
    Warmup(WarmupConfig),
}

/// The active game, one container per mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", content = "game", rename_all = "snake_case")]
pub enum Game {
    X01(X01Game),
    Cricket(CricketGame),
    HalfIt(HalfItGame),
    Progressive(ProgressiveGame),
    Warmup(WarmupGame),
}

impl Game {
    pub fn start(config: GameConfig, seats: Vec<Seat>) -> GameResult<Self> {
        Ok(match config {
            GameConfig::X01(c) => Game::X01(X01Game::start(c, seats)?),
            GameConfig::Cricket(c) => Game::Cricket(CricketGame::start(c, seats)?),
            GameConfig::HalfIt(c) => Game::HalfIt(HalfItGame::start(c, seats)?),
            GameConfig::Progressive(c) => Game::Progressive(ProgressiveGame::start(c, seats)?),
            GameConfig::Warmup(c) => Game::Warmup(WarmupGame::start(c, seats)?),
        })
    }

    pub fn mode(&self) -> GameMode {
        match self {
            Game::X01(_) => GameMode::X01,
            Game::Cricket(g) => match g.state().config.variant {
                CricketVariant::Standard => GameMode::Cricket,
                CricketVariant::Hidden => GameMode::HiddenCricket,
            },
            Game::HalfIt(_) => GameMode::HalfIt,
            Game::Progressive(_) => GameMode::ProgressiveFinish,
            Game::Warmup(_) => GameMode::Warmup,
        }
    }

    pub fn keeper(&self) -> &dyn ScoreKeeper {
        match self {
            Game::X01(g) => g,
            Game::Cricket(g) => g,
            Game::HalfIt(g) => g,
            Game::Progressive(g) => g,
            Game::Warmup(g) => g,
        }
    }

    pub fn keeper_mut(&mut self) -> &mut dyn ScoreKeeper {
        match self {
            Game::X01(g) => g,
            Game::Cricket(g) => g,
            Game::HalfIt(g) => g,
            Game::Progressive(g) => g,
            Game::Warmup(g) => g,
        }
    }

    pub fn can_undo(&self) -> bool {
        match self {
            Game::X01(g) => g.can_undo(),
            Game::Cricket(g) => g.can_undo(),
            Game::HalfIt(g) => g.can_undo(),
            Game::Progressive(g) => g.can_undo(),
            Game::Warmup(g) => g.can_undo(),
        }
    }
}
