use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DesktopError;

/// Edge or corner a resize gesture grabs, as a compass direction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResizeDirection {
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

impl ResizeDirection {
    /// All directions, edges first
    pub const ALL: [ResizeDirection; 8] = [
        ResizeDirection::N,
        ResizeDirection::S,
        ResizeDirection::E,
        ResizeDirection::W,
        ResizeDirection::NE,
        ResizeDirection::NW,
        ResizeDirection::SE,
        ResizeDirection::SW,
    ];

    /// Moves the top edge
    pub fn has_top(self) -> bool {
        matches!(self, Self::N | Self::NE | Self::NW)
    }

    /// Moves the bottom edge
    pub fn has_bottom(self) -> bool {
        matches!(self, Self::S | Self::SE | Self::SW)
    }

    /// Moves the left edge
    pub fn has_left(self) -> bool {
        matches!(self, Self::W | Self::NW | Self::SW)
    }

    /// Moves the right edge
    pub fn has_right(self) -> bool {
        matches!(self, Self::E | Self::NE | Self::SE)
    }

    /// Changes the width
    pub fn is_horizontal(self) -> bool {
        self.has_left() || self.has_right()
    }

    /// Changes the height
    pub fn is_vertical(self) -> bool {
        self.has_top() || self.has_bottom()
    }

    /// Changes both width and height
    pub fn is_corner(self) -> bool {
        self.is_horizontal() && self.is_vertical()
    }

    /// Lowercase compass tag ("n", "se", ...)
    pub fn tag(self) -> &'static str {
        match self {
            Self::N => "n",
            Self::S => "s",
            Self::E => "e",
            Self::W => "w",
            Self::NE => "ne",
            Self::NW => "nw",
            Self::SE => "se",
            Self::SW => "sw",
        }
    }
}

impl FromStr for ResizeDirection {
    type Err = DesktopError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "n" => Ok(Self::N),
            "s" => Ok(Self::S),
            "e" => Ok(Self::E),
            "w" => Ok(Self::W),
            "ne" => Ok(Self::NE),
            "nw" => Ok(Self::NW),
            "se" => Ok(Self::SE),
            "sw" => Ok(Self::SW),
            _ => Err(DesktopError::InvalidDirection(tag.to_string())),
        }
    }
}
