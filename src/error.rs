//! Error type shared by the level loaders, the progress store and the session.
//!
//! Gameplay itself never fails: rejected moves and misaligned throws are
//! ordinary outcomes, not errors. Everything here is about malformed input.

use crate::engine::Position;

/// Errors produced while building levels, loading files or switching levels.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The grid has a zero dimension.
    #[error("Invalid grid dimensions {width}x{height}: both must be at least 1")]
    InvalidDimensions { width: i32, height: i32 },

    /// A level entity lies outside the grid.
    #[error("{entity} at {position} is outside the {width}x{height} grid")]
    OutOfBounds {
        entity: &'static str,
        position: Position,
        width: i32,
        height: i32,
    },

    /// The player start overlaps terrain or a horseshoe.
    #[error("Player start {position} overlaps a {blocker}")]
    InvalidPlayerStart {
        position: Position,
        blocker: &'static str,
    },

    /// An ASCII level map contains a character with no meaning.
    #[error("Unrecognized character '{ch}' in row {row} col {col}")]
    UnrecognizedChar { ch: char, row: usize, col: usize },

    /// An ASCII level map has rows of differing length.
    #[error("Row {row} has {found} characters (expected {expected})")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// An ASCII level map must contain exactly one player.
    #[error("Expected exactly one player '@' in level map, found {0}")]
    PlayerCount(usize),

    /// No built-in level carries this number.
    #[error("Unknown level {0}")]
    UnknownLevel(u32),

    /// The level exists but has not been unlocked yet.
    #[error("Level {0} is locked")]
    LevelLocked(u32),

    /// Advancing requires a won attempt.
    #[error("The current level has not been won yet")]
    NotWon,

    /// A custom level is not part of the built-in progression.
    #[error("A custom level has no next level")]
    NoNextLevel,

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Shorthand used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
