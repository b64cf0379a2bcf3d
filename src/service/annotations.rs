//! Per-game annotation lists
//!
//! Display-only overlay state kept beside the game registry. The store does
//! not know whether a game exists; [`super::GameService`] checks that first.

use crate::game::resources::{Annotation, AnnotationKey};

#[derive(Default)]
pub struct AnnotationStore {
    by_game: scc::HashMap<String, Vec<Annotation>>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Annotations of a game in the order they were added
    pub fn list(&self, game_id: &str) -> Vec<Annotation> {
        self.by_game
            .read(game_id, |_, annotations| annotations.clone())
            .unwrap_or_default()
    }

    pub fn add(&self, game_id: &str, annotation: Annotation) {
        self.by_game
            .entry(game_id.to_string())
            .or_default()
            .get_mut()
            .push(annotation);
    }

    /// Drop every annotation addressed by `key`; returns how many went
    pub fn remove(&self, game_id: &str, key: &AnnotationKey) -> usize {
        self.by_game
            .update(game_id, |_, annotations| {
                let before = annotations.len();
                annotations.retain(|annotation| !annotation.matches(key));
                before - annotations.len()
            })
            .unwrap_or(0)
    }

    pub fn clear(&self, game_id: &str) {
        self.by_game.remove(game_id);
    }

    /// Games with an annotation list, empty or not
    pub fn len(&self) -> usize {
        self.by_game.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_game.is_empty()
    }
}
