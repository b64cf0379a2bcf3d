//! Board annotations (arrows and circles) for analysis
//!
//! Display-only overlay data. Annotations are kept per game id next to the
//! game registry, never inside a [`super::Game`], and have no effect on play.

use crate::game::types::Position;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnnotationKind {
    /// Arrow between two squares
    Arrow,
    /// Circle on a single square
    Circle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnnotationColor {
    Green,
    Red,
    Blue,
    Orange,
}

/// An arrow or circle drawn on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(rename = "type")]
    pub kind: AnnotationKind,
    /// Arrow tail; `None` for circles
    pub from: Option<Position>,
    pub to: Position,
    pub color: AnnotationColor,
}

impl Annotation {
    pub fn arrow(from: Position, to: Position, color: AnnotationColor) -> Self {
        Annotation {
            kind: AnnotationKind::Arrow,
            from: Some(from),
            to,
            color,
        }
    }

    pub fn circle(at: Position, color: AnnotationColor) -> Self {
        Annotation {
            kind: AnnotationKind::Circle,
            from: None,
            to: at,
            color,
        }
    }

    /// Whether this annotation is the one addressed by a removal key
    ///
    /// Circles are addressed by their square, arrows by both endpoints.
    pub fn matches(&self, key: &AnnotationKey) -> bool {
        match (self.kind, key) {
            (AnnotationKind::Circle, AnnotationKey::Circle { position }) => self.to == *position,
            (AnnotationKind::Arrow, AnnotationKey::Arrow { from, to }) => {
                self.from == Some(*from) && self.to == *to
            }
            _ => false,
        }
    }
}

/// Identifies annotations to remove, independent of color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationKey {
    Circle { position: Position },
    Arrow { from: Position, to: Position },
}
