use serde::{Deserialize, Serialize};

use crate::model::player::{Player, PlayerId};

/// A roster player's seat in one game. Only the id links back to the
/// roster; the name is copied so a game can be shown after a rename or
/// removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub player_id: PlayerId,
    pub name: String,
}

impl From<&Player> for Seat {
    fn from(p: &Player) -> Self {
        Self {
            player_id: p.id,
            name: p.name.clone(),
        }
    }
}
