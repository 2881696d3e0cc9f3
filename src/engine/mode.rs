use crate::engine::error::{GameError, GameResult};
use crate::engine::MAX_PLAYERS;
use crate::model::dart::Dart;
use crate::model::event_result::Outcome;
use crate::model::player::GameContribution;
use crate::model::seat::Seat;

/// Shared surface of every game-mode container.
///
/// Input a mode does not take is rejected with
/// [`GameError::UnsupportedInput`] by the default methods.
pub trait ScoreKeeper {
    fn throw_dart(&mut self, _dart: Dart) -> GameResult<Outcome> {
        Err(GameError::UnsupportedInput("dart"))
    }

    fn record_score(&mut self, _score: u16, _darts: u8) -> GameResult<Outcome> {
        Err(GameError::UnsupportedInput("score"))
    }

    fn end_turn(&mut self) -> GameResult<Outcome> {
        Err(GameError::UnsupportedInput("end turn"))
    }

    fn undo(&mut self) -> GameResult<()>;

    /// Makes the last `steps` accepted actions undo as one.
    fn group_undo(&mut self, steps: usize);

    fn is_finished(&self) -> bool;

    fn seats(&self) -> Vec<Seat>;

    fn current_player(&self) -> usize;

    fn winners(&self) -> Vec<String>;

    /// Lifetime stat deltas, one per seat. Only meaningful once finished.
    fn contributions(&self) -> Vec<GameContribution>;
}

pub fn validate_seats(seats: &[Seat]) -> GameResult<()> {
    if seats.is_empty() {
        return Err(GameError::NoPlayers);
    }
    if seats.len() > MAX_PLAYERS {
        return Err(GameError::TooManyPlayers(seats.len()));
    }
    for (i, s) in seats.iter().enumerate() {
        if seats[..i].iter().any(|o| o.player_id == s.player_id) {
            return Err(GameError::DuplicatePlayer(s.player_id));
        }
    }
    Ok(())
}

pub fn ensure_running(finished: bool) -> GameResult<()> {
    if finished {
        Err(GameError::GameOver)
    } else {
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use uuid::Uuid;

    use crate::model::seat::Seat;

    pub fn seats(names: &[&str]) -> Vec<Seat> {
        names
            .iter()
            .map(|n| Seat {
                player_id: Uuid::new_v4(),
                name: n.to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::seats;
    use super::*;

    #[test]
    fn seat_validation() {
        assert_eq!(validate_seats(&[]), Err(GameError::NoPlayers));
        let nine = seats(&["a", "b", "c", "d", "e", "f", "g", "h", "i"]);
        assert_eq!(validate_seats(&nine), Err(GameError::TooManyPlayers(9)));

        let mut twice = seats(&["a"]);
        twice.push(twice[0].clone());
        assert_eq!(
            validate_seats(&twice),
            Err(GameError::DuplicatePlayer(twice[0].player_id))
        );
        assert!(validate_seats(&seats(&["a", "b"])).is_ok());
    }
}
