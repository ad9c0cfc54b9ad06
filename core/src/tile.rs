use serde::{Deserialize, Serialize};

/// Player-visible state of a single cell.
///
/// `Covered`, `Flagged` and `Questioned` make up the covered family, which the player cycles
/// through freely. Every other state is opened and only leaves through a full display reset.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Covered,
    Flagged,
    Questioned,
    /// Safe cell showing its adjacent mine count.
    Revealed(u8),
    // these are only used to show result after the game finishes:
    Mine,
    IncorrectFlag,
    /// The mine the player uncovered.
    ExplodedMine,
}

impl Tile {
    pub const fn is_covered(self) -> bool {
        matches!(self, Self::Covered | Self::Flagged | Self::Questioned)
    }

    pub const fn is_opened(self) -> bool {
        !self.is_covered()
    }

    /// Next state when the player cycles their guess, `None` for opened tiles.
    pub const fn next_guess(self) -> Option<Self> {
        match self {
            Self::Covered => Some(Self::Flagged),
            Self::Flagged => Some(Self::Questioned),
            Self::Questioned => Some(Self::Covered),
            _ => None,
        }
    }

    /// Single character used by the text rendering of a board.
    pub const fn glyph(self) -> char {
        match self {
            Self::Covered => '#',
            Self::Flagged => 'F',
            Self::Questioned => '?',
            Self::Revealed(0) => '.',
            Self::Revealed(count) => match char::from_digit(count as u32, 10) {
                Some(digit) if count <= 8 => digit,
                _ => '!',
            },
            Self::Mine => '*',
            Self::IncorrectFlag => 'X',
            Self::ExplodedMine => '@',
        }
    }
}
