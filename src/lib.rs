//! # Horseshoe Toss Library
//!
//! This library provides the rules of the horseshoe toss puzzle, the built-in
//! levels, progress keeping, and a Breadth First Search (BFS) solver that finds
//! the shortest way to win a level.
//!
//! It is used by two binaries:
//! - `human_player`: Allows interactive play via the command line.
//! - `solver`: Takes a built-in level number or a level file and prints the
//!   shortest winning sequence of moves and throws.
//!
//! ## Modules
//! - `engine`: Grid positions, the static `Board`, and the `Game` rules engine
//!   (player movement, horseshoe throws, victory and loss detection, reset).
//! - `level`: `LevelConfig`, the built-in levels, JSON and ASCII map loading.
//! - `progress`: Unlocked levels, score, and saving them to disk.
//! - `session`: Plays levels one after another on top of the engine.
//! - `solver`: Provides the `solve_bfs` function.
//! - `error`: The crate's error type.

pub mod engine;
pub mod error;
pub mod level;
pub mod progress;
pub mod session;
pub mod solver;

pub use crate::error::{Error, Result};
