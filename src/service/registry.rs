//! In-memory game registry
//!
//! Maps game id to the current [`Game`] snapshot. Reads hand out clones;
//! writes go through [`GameRegistry::transition`], which runs the whole
//! read-modify-write under the entry's lock so that two requests for the
//! same game cannot interleave. Different games never contend.

use crate::game::resources::Game;
use tracing::warn;

/// Process-lifetime store of game snapshots keyed by id
#[derive(Default)]
pub struct GameRegistry {
    games: scc::HashMap<String, Game>,
}

impl GameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a freshly created game
    ///
    /// Returns `false` if a game with the same id already exists, in which
    /// case the existing snapshot is kept.
    pub fn insert(&self, game: Game) -> bool {
        match self.games.insert(game.id.clone(), game) {
            Ok(()) => true,
            Err((id, _)) => {
                warn!("[GAME] Refusing to overwrite existing game {}", id);
                false
            }
        }
    }

    /// Clone of the current snapshot
    pub fn get(&self, id: &str) -> Option<Game> {
        self.games.read(id, |_, game| game.clone())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.games.contains(id)
    }

    /// All games, oldest first
    pub fn list(&self) -> Vec<Game> {
        let mut games = Vec::with_capacity(self.games.len());
        self.games.scan(|_, game| games.push(game.clone()));
        games.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        games
    }

    pub fn remove(&self, id: &str) -> Option<Game> {
        self.games.remove(id).map(|(_, game)| game)
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Atomically derive and store the next snapshot of game `id`
    ///
    /// `f` sees the current snapshot and returns the replacement (or `None`
    /// to keep it) together with a value handed back to the caller. Returns
    /// `None` only when the game does not exist.
    pub fn transition<R>(&self, id: &str, f: impl FnOnce(&Game) -> (Option<Game>, R)) -> Option<R> {
        self.games.update(id, |_, slot| {
            let (next, output) = f(slot);
            if let Some(next) = next {
                *slot = next;
            }
            output
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_get_remove() {
        let registry = GameRegistry::new();
        let game = Game::new(None);
        let id = game.id.clone();

        assert!(registry.insert(game.clone()));
        assert!(!registry.insert(game), "Duplicate id is rejected");
        assert_eq!(registry.len(), 1);
        assert!(registry.get(&id).is_some());

        assert!(registry.remove(&id).is_some());
        assert!(registry.get(&id).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_transition_replaces_or_keeps() {
        let registry = GameRegistry::new();
        let game = Game::new(None);
        let id = game.id.clone();
        registry.insert(game);

        let kept = registry.transition(&id, |_| (None, "kept"));
        assert_eq!(kept, Some("kept"));
        assert!(registry.get(&id).is_some_and(|g| g.move_history.is_empty()));

        let replaced = registry.transition(&id, |g| (Some(g.start_editing(Some("x"))), ()));
        assert_eq!(replaced, Some(()));
        assert_eq!(
            registry.get(&id).and_then(|g| g.creator_id),
            Some("x".to_string())
        );

        assert_eq!(registry.transition("missing", |_| (None, ())), None);
    }
}
