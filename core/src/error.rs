use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Too many mines")]
    TooManyMines,
    #[error("Board shape is empty or rows differ in length")]
    InvalidBoardShape,
    #[error("Unexpected character {0:?} in mine grid, expected '*' or '.'")]
    InvalidGlyph(char),
    #[error("Revealed tile shows more than eight adjacent mines")]
    InvalidTile,
}

pub type Result<T> = core::result::Result<T, GameError>;
