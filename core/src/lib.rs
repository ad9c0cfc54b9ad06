#![no_std]

extern crate alloc;

pub use board::*;
pub use config::*;
pub use error::*;
pub use layout::*;
pub use snapshot::*;
pub use tile::*;
pub use types::*;

mod board;
mod config;
mod error;
mod generator;
mod layout;
mod snapshot;
mod tile;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

/// Result of [`BoardState::uncover`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UncoverOutcome {
    /// Nothing opened, the tile was already open or flagged.
    NoChange,
    Revealed,
    Exploded,
}

impl UncoverOutcome {
    pub const fn has_update(self) -> bool {
        use UncoverOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            Exploded => true,
        }
    }

    /// `false` only when a mine was hit.
    pub const fn is_safe(self) -> bool {
        !matches!(self, Self::Exploded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcomes_report_updates() {
        assert!(MarkOutcome::Changed.has_update());
        assert!(!MarkOutcome::NoChange.has_update());

        assert!(!UncoverOutcome::NoChange.has_update());
        assert!(UncoverOutcome::Revealed.has_update());
        assert!(UncoverOutcome::Exploded.has_update());
    }

    #[test]
    fn board_actions_report_updates() {
        let mut layout: MineLayout = "*..\n...".parse().unwrap();
        let mut board = BoardState::new(&mut layout);

        assert!(board.cycle_guess((0, 1)).unwrap().has_update());
        assert!(board.uncover((1, 2)).unwrap().has_update());
        assert!(!board.uncover((1, 2)).unwrap().has_update());
        assert!(!board.cycle_guess((1, 2)).unwrap().has_update());
    }
}
