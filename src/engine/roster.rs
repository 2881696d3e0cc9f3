use serde::{Deserialize, Serialize};

use crate::engine::error::{GameError, GameResult};
use crate::model::player::{GameContribution, Player, PlayerId, MAX_NAME_LEN};
use crate::model::seat::Seat;

/// The player roster; system of record for identity and lifetime stats.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    players: Vec<Player>,
}

fn clean_name(name: &str) -> GameResult<String> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
        return Err(GameError::InvalidPlayerName(name.to_string()));
    }
    Ok(name.to_string())
}

impl Roster {
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    fn ensure_unique(&self, name: &str, except: Option<PlayerId>) -> GameResult<()> {
        let lower = name.to_lowercase();
        let taken = self
            .players
            .iter()
            .any(|p| Some(p.id) != except && p.name.to_lowercase() == lower);
        if taken {
            return Err(GameError::NameTaken(name.to_string()));
        }
        Ok(())
    }

    pub fn add(&mut self, name: &str) -> GameResult<PlayerId> {
        let name = clean_name(name)?;
        self.ensure_unique(&name, None)?;
        let player = Player::new(name);
        let id = player.id;
        log::info!("roster: added {}", player.name);
        self.players.push(player);
        Ok(id)
    }

    pub fn rename(&mut self, id: PlayerId, name: &str) -> GameResult<()> {
        let name = clean_name(name)?;
        self.ensure_unique(&name, Some(id))?;
        let player = self
            .players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(GameError::UnknownPlayer(id))?;
        player.name = name;
        Ok(())
    }

    pub fn remove(&mut self, id: PlayerId) -> GameResult<Player> {
        let idx = self
            .players
            .iter()
            .position(|p| p.id == id)
            .ok_or(GameError::UnknownPlayer(id))?;
        let player = self.players.remove(idx);
        log::info!("roster: removed {}", player.name);
        Ok(player)
    }

    /// Seats for a new game, in the given order.
    pub fn seats(&self, ids: &[PlayerId]) -> GameResult<Vec<Seat>> {
        ids.iter()
            .map(|&id| self.get(id).map(Seat::from).ok_or(GameError::UnknownPlayer(id)))
            .collect()
    }

    /// Folds a finished game into lifetime stats. Players removed since the
    /// game started are skipped.
    pub fn record_game(&mut self, contributions: &[GameContribution]) {
        for c in contributions {
            match self.players.iter_mut().find(|p| p.id == c.player_id) {
                Some(p) => p.stats.apply(c),
                None => log::debug!("roster: {} no longer exists, stats dropped", c.player_id),
            }
        }
    }

    /// Replaces the roster with an imported one, keeping valid entries only.
    pub fn replace(&mut self, players: Vec<Player>) -> usize {
        let mut fresh = Roster::default();
        for p in players {
            let Ok(name) = clean_name(&p.name) else {
                continue;
            };
            if fresh.ensure_unique(&name, None).is_err() || fresh.get(p.id).is_some() {
                continue;
            }
            fresh.players.push(Player { name, ..p });
        }
        let count = fresh.players.len();
        *self = fresh;
        count
    }
}
