//! Level progression and score keeping.
//!
//! These are plain values owned by whoever drives the game (see `session`),
//! saved to disk as a small JSON document.
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::level::BUILTIN_LEVEL_COUNT;

/// Points awarded for winning a level.
pub const VICTORY_BONUS: u32 = 10;

/// Which built-in level is current and which ones are unlocked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelProgress {
    current_level: u32,
    unlocked_levels: BTreeSet<u32>,
}

impl Default for LevelProgress {
    fn default() -> Self {
        LevelProgress {
            current_level: 1,
            unlocked_levels: BTreeSet::from([1]),
        }
    }
}

impl LevelProgress {
    pub fn current_level(&self) -> u32 {
        self.current_level
    }

    pub fn unlocked_levels(&self) -> &BTreeSet<u32> {
        &self.unlocked_levels
    }

    pub fn is_unlocked(&self, level: u32) -> bool {
        self.unlocked_levels.contains(&level)
    }

    /// Unlocks `level`. Numbers outside the built-in range are ignored.
    pub fn unlock_level(&mut self, level: u32) {
        if is_known_level(level) {
            self.unlocked_levels.insert(level);
        }
    }

    /// Advances to the next level and unlocks it.
    ///
    /// After the last level the progression wraps back to level 1; nothing new
    /// is unlocked in that case.
    ///
    /// # Returns
    /// The new current level.
    ///
    /// # Examples
    /// ```
    /// use horseshoe_toss::progress::LevelProgress;
    /// let mut progress = LevelProgress::default();
    /// assert_eq!(progress.move_to_next_level(), 2);
    /// assert!(progress.is_unlocked(2));
    /// ```
    pub fn move_to_next_level(&mut self) -> u32 {
        let next = self.current_level + 1;
        if is_known_level(next) {
            self.current_level = next;
            self.unlock_level(next);
        } else {
            self.current_level = 1;
        }
        self.current_level
    }

    /// Makes an unlocked level the current one.
    ///
    /// # Errors
    /// `Error::UnknownLevel` for a number with no built-in level,
    /// `Error::LevelLocked` if the level has not been unlocked.
    pub fn select_level(&mut self, level: u32) -> Result<()> {
        if !is_known_level(level) {
            return Err(Error::UnknownLevel(level));
        }
        if !self.is_unlocked(level) {
            return Err(Error::LevelLocked(level));
        }
        self.current_level = level;
        Ok(())
    }

    /// Back to level 1 with only level 1 unlocked.
    pub fn reset(&mut self) {
        *self = LevelProgress::default();
    }

    // Drops unknown level numbers from saved data.
    fn sanitize(&mut self) {
        self.unlocked_levels.retain(|&level| is_known_level(level));
        self.unlocked_levels.insert(1);
        if !self.is_unlocked(self.current_level) {
            warn!(
                "Saved current level {} is not unlocked, falling back to level 1",
                self.current_level
            );
            self.current_level = 1;
        }
    }
}

fn is_known_level(level: u32) -> bool {
    (1..=BUILTIN_LEVEL_COUNT).contains(&level)
}

/// Running total of points earned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBoard {
    score: u32,
}

impl ScoreBoard {
    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }
}

/// Everything that survives between runs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    #[serde(default)]
    pub levels: LevelProgress,
    #[serde(default)]
    pub score: ScoreBoard,
}

impl Progress {
    /// Loads progress from `path`. A missing file yields fresh progress.
    ///
    /// # Errors
    /// `Error::Io` if the file exists but cannot be read, `Error::Json` if it
    /// is not a valid progress document.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No progress file at {}, starting fresh", path.display());
            return Ok(Progress::default());
        }

        let content = fs::read_to_string(path)?;
        let mut progress: Progress = serde_json::from_str(&content)?;
        progress.levels.sanitize();
        Ok(progress)
    }

    /// Writes progress to `path` as JSON, replacing any previous file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
