use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::engine::error::{GameError, GameResult};
use crate::engine::game::Game;
use crate::engine::protocol::{EngineCommand, EngineResponse, ScoreInput};
use crate::engine::roster::Roster;
use crate::engine::storage::{self, KvStore};
use crate::engine::timing::Debouncer;
use crate::engine::voice::{self, Language, Phrase};
use crate::model::event_result::Outcome;

pub const PLAYERS_KEY: &str = "players.v1";
pub const GAME_KEY: &str = "game.v1";
pub const STORE_VERSION: u32 = 1;

pub const DEFAULT_DEBOUNCE_MS: u64 = 250;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SavedGame {
    game: Game,
    stats_recorded: bool,
}

/// Owns the roster and the active game and applies commands to them one
/// at a time. Every accepted command is persisted before it returns.
pub struct Engine {
    store: Box<dyn KvStore>,
    roster: Roster,
    game: Option<Game>,
    stats_recorded: bool,
    debouncer: Debouncer,
    language: Language,
}

impl Engine {
    /// Restores roster and any unfinished game from `store`.
    pub fn load(store: Box<dyn KvStore>) -> Self {
        let roster: Roster =
            storage::load(store.as_ref(), PLAYERS_KEY, STORE_VERSION).unwrap_or_default();
        let saved: Option<SavedGame> = storage::load(store.as_ref(), GAME_KEY, STORE_VERSION);

        log::info!(
            "engine: loaded {} players, {}",
            roster.players().len(),
            if saved.is_some() { "resuming a game" } else { "no active game" }
        );

        let (game, stats_recorded) = match saved {
            Some(s) => (Some(s.game), s.stats_recorded),
            None => (None, false),
        };

        Self {
            store,
            roster,
            game,
            stats_recorded,
            debouncer: Debouncer::new(Duration::from_millis(DEFAULT_DEBOUNCE_MS)),
            language: Language::default(),
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn handle(&mut self, cmd: EngineCommand, now: Instant) -> EngineResponse {
        let scoring = matches!(cmd, EngineCommand::Score(_) | EngineCommand::Voice(_));
        if scoring && !self.debouncer.accept(now) {
            log::debug!("engine: dropped duplicate {cmd:?}");
            return EngineResponse::Debounced;
        }

        match self.dispatch(cmd) {
            Ok(resp) => resp,
            Err(e) => {
                log::warn!("engine: rejected: {e}");
                EngineResponse::Rejected {
                    reason: e.to_string(),
                }
            }
        }
    }

    fn dispatch(&mut self, cmd: EngineCommand) -> GameResult<EngineResponse> {
        match cmd {
            EngineCommand::AddPlayer(name) => {
                self.roster.add(&name)?;
                self.save_roster();
                Ok(EngineResponse::RosterUpdated)
            }
            EngineCommand::RenamePlayer { id, name } => {
                self.roster.rename(id, &name)?;
                self.save_roster();
                Ok(EngineResponse::RosterUpdated)
            }
            EngineCommand::RemovePlayer(id) => {
                self.roster.remove(id)?;
                self.save_roster();
                Ok(EngineResponse::RosterUpdated)
            }
            EngineCommand::ImportPlayers(players) => {
                let kept = self.roster.replace(players);
                log::info!("engine: imported {kept} players");
                self.save_roster();
                Ok(EngineResponse::RosterUpdated)
            }

            EngineCommand::StartGame {
                config,
                mut players,
                shuffle,
            } => {
                if shuffle {
                    players.shuffle(&mut rand::thread_rng());
                }
                let seats = self.roster.seats(&players)?;
                self.game = Some(Game::start(config, seats)?);
                self.stats_recorded = false;
                self.debouncer.reset();
                self.save_game();
                Ok(EngineResponse::GameStarted)
            }
            EngineCommand::Score(input) => {
                let outcome = self.apply_score(input)?;
                self.after_scoring();
                Ok(EngineResponse::Applied {
                    outcomes: vec![outcome],
                })
            }
            EngineCommand::Voice(text) => self.apply_voice(&text),
            EngineCommand::Undo => {
                let game = self.game.as_mut().ok_or(GameError::NoActiveGame)?;
                game.keeper_mut().undo()?;
                self.save_game();
                Ok(EngineResponse::Undone)
            }
            EngineCommand::EndGame => {
                self.game.take().ok_or(GameError::NoActiveGame)?;
                self.stats_recorded = false;
                if let Err(e) = self.store.remove(GAME_KEY) {
                    log::error!("engine: clearing saved game failed: {e}");
                }
                log::info!("engine: game ended");
                Ok(EngineResponse::GameEnded)
            }

            EngineCommand::SetDebounce(ms) => {
                self.debouncer.set_window(Duration::from_millis(ms));
                Ok(EngineResponse::SettingsChanged)
            }
            EngineCommand::SetLanguage(lang) => {
                self.language = lang;
                Ok(EngineResponse::SettingsChanged)
            }
        }
    }

    fn apply_score(&mut self, input: ScoreInput) -> GameResult<Outcome> {
        let game = self.game.as_mut().ok_or(GameError::NoActiveGame)?;
        let keeper = game.keeper_mut();
        match input {
            ScoreInput::Total { score, darts } => keeper.record_score(score, darts),
            ScoreInput::Dart(dart) => keeper.throw_dart(dart),
            ScoreInput::EndTurn => keeper.end_turn(),
        }
    }

    fn apply_voice(&mut self, text: &str) -> GameResult<EngineResponse> {
        let phrase = voice::parse_phrase(text, self.language)?;
        log::debug!("engine: heard {phrase:?}");

        let inputs = match phrase {
            Phrase::Undo => return self.dispatch(EngineCommand::Undo),
            Phrase::NextPlayer => vec![ScoreInput::EndTurn],
            Phrase::Total(score) => vec![ScoreInput::Total { score, darts: 3 }],
            Phrase::Darts(darts) => darts.into_iter().map(ScoreInput::Dart).collect(),
        };

        // a phrase applies all of its darts or none of them, within one turn
        let backup = self.game.clone();
        let last = inputs.len().saturating_sub(1);
        let mut outcomes = Vec::with_capacity(inputs.len());
        for (i, input) in inputs.into_iter().enumerate() {
            let applied = self.apply_score(input).and_then(|o| {
                if i < last && o.ends_turn() {
                    Err(GameError::TurnEndedEarly)
                } else {
                    Ok(o)
                }
            });
            match applied {
                Ok(o) => outcomes.push(o),
                Err(e) => {
                    self.game = backup;
                    return Err(e);
                }
            }
        }
        if let Some(game) = self.game.as_mut() {
            game.keeper_mut().group_undo(outcomes.len());
        }
        self.after_scoring();
        Ok(EngineResponse::Applied { outcomes })
    }

    fn after_scoring(&mut self) {
        let Some(game) = &self.game else {
            return;
        };
        let keeper = game.keeper();
        if keeper.is_finished() && !self.stats_recorded {
            self.roster.record_game(&keeper.contributions());
            self.stats_recorded = true;
            log::info!("engine: {} over, winners {:?}", game.mode(), keeper.winners());
            self.save_roster();
        }
        self.save_game();
    }

    fn save_roster(&self) {
        storage::persist(self.store.as_ref(), PLAYERS_KEY, STORE_VERSION, &self.roster);
    }

    fn save_game(&self) {
        if let Some(game) = &self.game {
            let saved = SavedGame {
                game: game.clone(),
                stats_recorded: self.stats_recorded,
            };
            storage::persist(self.store.as_ref(), GAME_KEY, STORE_VERSION, &saved);
        }
    }
}
