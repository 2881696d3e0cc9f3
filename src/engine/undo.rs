use serde::{Deserialize, Serialize, Serializer};

use crate::engine::error::{GameError, GameResult};

/// Oldest snapshots are dropped past this depth.
pub const MAX_UNDO_DEPTH: usize = 200;

/// Snapshots written to storage; older ones only live in memory.
pub const PERSISTED_UNDO_DEPTH: usize = 20;

/// Game state plus one immutable snapshot per applied action.
///
/// Every mutation goes through [`History::apply`]; a failed action restores
/// the state it started from and leaves no snapshot behind, so `undo` is
/// always an exact restore of the state before the last accepted action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct History<S> {
    current: S,
    #[serde(default = "Vec::new", serialize_with = "recent")]
    past: Vec<S>,
}

fn recent<T, Ser>(past: &[T], serializer: Ser) -> Result<Ser::Ok, Ser::Error>
where
    T: Serialize,
    Ser: Serializer,
{
    past[past.len().saturating_sub(PERSISTED_UNDO_DEPTH)..].serialize(serializer)
}

impl<S: Clone> History<S> {
    pub fn new(initial: S) -> Self {
        Self {
            current: initial,
            past: Vec::new(),
        }
    }

    pub fn current(&self) -> &S {
        &self.current
    }

    pub fn apply<T>(&mut self, action: impl FnOnce(&mut S) -> GameResult<T>) -> GameResult<T> {
        let before = self.current.clone();
        match action(&mut self.current) {
            Ok(out) => {
                if self.past.len() == MAX_UNDO_DEPTH {
                    self.past.remove(0);
                }
                self.past.push(before);
                Ok(out)
            }
            Err(e) => {
                self.current = before;
                Err(e)
            }
        }
    }

    pub fn undo(&mut self) -> GameResult<()> {
        let previous = self.past.pop().ok_or(GameError::NothingToUndo)?;
        self.current = previous;
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Folds the last `steps` snapshots into one, so a single `undo` goes
    /// back to the state before all of them.
    pub fn squash(&mut self, steps: usize) {
        if steps > 1 {
            let keep = self.past.len().saturating_sub(steps - 1);
            self.past.truncate(keep);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_action_leaves_no_trace() {
        let mut h = History::new(vec![1]);
        let r: GameResult<()> = h.apply(|v| {
            v.push(2);
            Err(GameError::GameOver)
        });
        assert!(r.is_err());
        assert_eq!(h.current(), &vec![1]);
        assert!(!h.can_undo());
    }

    #[test]
    fn undo_restores_previous_snapshot() {
        let mut h = History::new(0u32);
        h.apply(|v| {
            *v += 5;
            Ok(())
        })
        .unwrap();
        h.apply(|v| {
            *v *= 3;
            Ok(())
        })
        .unwrap();
        assert_eq!(*h.current(), 15);
        h.undo().unwrap();
        assert_eq!(*h.current(), 5);
        h.undo().unwrap();
        assert_eq!(*h.current(), 0);
        assert_eq!(h.undo(), Err(GameError::NothingToUndo));
    }

    #[test]
    fn squashed_actions_undo_together() {
        let mut h = History::new(0u32);
        for _ in 0..4 {
            h.apply(|v| {
                *v += 1;
                Ok(())
            })
            .unwrap();
        }
        h.squash(3);
        assert_eq!(*h.current(), 4);
        h.undo().unwrap();
        assert_eq!(*h.current(), 1);
        h.undo().unwrap();
        assert_eq!(*h.current(), 0);
        assert!(!h.can_undo());
    }

    #[test]
    fn only_recent_snapshots_are_serialised() {
        let mut h = History::new(0usize);
        for _ in 0..PERSISTED_UNDO_DEPTH + 30 {
            h.apply(|v| {
                *v += 1;
                Ok(())
            })
            .unwrap();
        }
        let json = serde_json::to_string(&h).unwrap();
        let mut back: History<usize> = serde_json::from_str(&json).unwrap();
        assert_eq!(*back.current(), PERSISTED_UNDO_DEPTH + 30);

        let mut undone = 0;
        while back.undo().is_ok() {
            undone += 1;
        }
        assert_eq!(undone, PERSISTED_UNDO_DEPTH);
        assert_eq!(*back.current(), 30);
    }

    #[test]
    fn depth_is_bounded() {
        let mut h = History::new(0usize);
        for _ in 0..MAX_UNDO_DEPTH + 10 {
            h.apply(|v| {
                *v += 1;
                Ok(())
            })
            .unwrap();
        }
        let mut undone = 0;
        while h.undo().is_ok() {
            undone += 1;
        }
        assert_eq!(undone, MAX_UNDO_DEPTH);
        assert_eq!(*h.current(), 10);
    }
}
