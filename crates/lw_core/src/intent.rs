//! Movement intent and facing, as produced by whatever maps raw input.
//!
//! Intent is level-triggered: it persists until the input side changes it.
//! Facing remembers the last non-`None` intent and only drives sprite
//! mirroring.

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    None,
    Left,
    Right,
}

impl Direction {
    /// -1, 0 or 1 along the x axis.
    pub fn sign(self) -> i32 {
        match self {
            Self::None => 0,
            Self::Left => -1,
            Self::Right => 1,
        }
    }

    pub fn is_moving(self) -> bool {
        self != Self::None
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// `None` has no facing of its own.
    pub fn from_direction(direction: Direction) -> Option<Self> {
        match direction {
            Direction::None => None,
            Direction::Left => Some(Self::Left),
            Direction::Right => Some(Self::Right),
        }
    }

    pub fn is_mirrored(self) -> bool {
        self == Self::Left
    }
}
