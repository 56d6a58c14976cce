//! Level configurations: the built-in catalogue, JSON files and ASCII maps.
//!
//! A `LevelConfig` is the immutable input of `Game::new`. Levels coming from
//! outside the crate (files, maps) go through `LevelConfig::validate` before
//! they are handed out, so a loaded level never starts the player on blocked
//! terrain.
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::engine::Position;
use crate::error::{Error, Result};

/// Number of levels shipped with the game.
pub const BUILTIN_LEVEL_COUNT: u32 = 6;

/// Static description of one level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub width: i32,
    pub height: i32,
    pub player_start: Position,
    pub horseshoes: Vec<Position>,
    pub pegs: Vec<Position>,
    #[serde(default)]
    pub obstacles: Vec<Position>,
    #[serde(default)]
    pub empty_tiles: Vec<Position>,
}

impl LevelConfig {
    /// Checks that the level is playable as described.
    ///
    /// # Errors
    /// - `Error::InvalidDimensions` if the width or height is not positive.
    /// - `Error::OutOfBounds` if any entity lies outside the grid.
    /// - `Error::InvalidPlayerStart` if the player starts on an obstacle, a peg,
    ///   a void tile or a horseshoe.
    pub fn validate(&self) -> Result<()> {
        if self.width <= 0 || self.height <= 0 {
            return Err(Error::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }

        let groups: [(&'static str, &[Position]); 5] = [
            ("player", std::slice::from_ref(&self.player_start)),
            ("horseshoe", self.horseshoes.as_slice()),
            ("peg", self.pegs.as_slice()),
            ("obstacle", self.obstacles.as_slice()),
            ("empty tile", self.empty_tiles.as_slice()),
        ];
        for (entity, positions) in groups {
            if let Some(&position) = positions.iter().find(|p| !self.contains(**p)) {
                return Err(Error::OutOfBounds {
                    entity,
                    position,
                    width: self.width,
                    height: self.height,
                });
            }
        }

        let blockers: [(&'static str, &[Position]); 4] = [
            ("obstacle", self.obstacles.as_slice()),
            ("peg", self.pegs.as_slice()),
            ("empty tile", self.empty_tiles.as_slice()),
            ("horseshoe", self.horseshoes.as_slice()),
        ];
        for (blocker, positions) in blockers {
            if positions.contains(&self.player_start) {
                return Err(Error::InvalidPlayerStart {
                    position: self.player_start,
                    blocker,
                });
            }
        }

        Ok(())
    }

    fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// Parses and validates a level from JSON text.
    ///
    /// `obstacles` and `empty_tiles` may be omitted and default to empty lists.
    ///
    /// # Examples
    /// ```
    /// use horseshoe_toss::level::LevelConfig;
    ///
    /// let json = r#"{
    ///     "width": 4, "height": 1,
    ///     "player_start": {"x": 0, "y": 0},
    ///     "horseshoes": [{"x": 1, "y": 0}],
    ///     "pegs": [{"x": 3, "y": 0}]
    /// }"#;
    /// let level = LevelConfig::from_json_str(json).unwrap();
    /// assert_eq!(level.width, 4);
    /// assert!(level.obstacles.is_empty());
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: LevelConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a level JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Serializes the level as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a level from an ASCII map.
    ///
    /// Each string slice is one row of the grid. The first row is the top of
    /// the board (`y = height - 1`), the last row is `y = 0`. All rows must
    /// have the same length, which becomes the grid width.
    ///
    /// Valid characters are:
    /// - '.': floor
    /// - '@': the player start (exactly one)
    /// - 'h': a horseshoe, numbered in reading order
    /// - 'P': a peg
    /// - '#': an obstacle
    /// - '~': a void tile
    ///
    /// # Errors
    /// `Error::InvalidDimensions` for an empty map, `Error::RaggedRow`,
    /// `Error::UnrecognizedChar`, `Error::PlayerCount`, or any error from
    /// `validate`.
    ///
    /// # Examples
    /// ```
    /// use horseshoe_toss::engine::Position;
    /// use horseshoe_toss::level::LevelConfig;
    ///
    /// let level = LevelConfig::from_str_array(&[
    ///     "~.P..",
    ///     "@#h..",
    /// ]).unwrap();
    /// assert_eq!((level.width, level.height), (5, 2));
    /// assert_eq!(level.player_start, Position::new(0, 0));
    /// assert_eq!(level.horseshoes, vec![Position::new(2, 0)]);
    /// assert_eq!(level.pegs, vec![Position::new(2, 1)]);
    /// assert_eq!(level.empty_tiles, vec![Position::new(0, 1)]);
    ///
    /// assert!(LevelConfig::from_str_array(&["@x"]).is_err());
    /// ```
    pub fn from_str_array(rows: &[&str]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.chars().count());
        let (grid_width, grid_height) = grid_dimensions(width, height)?;

        let mut players = Vec::new();
        let mut config = LevelConfig {
            width: grid_width,
            height: grid_height,
            player_start: Position::new(0, 0),
            horseshoes: Vec::new(),
            pegs: Vec::new(),
            obstacles: Vec::new(),
            empty_tiles: Vec::new(),
        };

        for (row, (line, y)) in rows.iter().zip((0..grid_height).rev()).enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(Error::RaggedRow {
                    row,
                    expected: width,
                    found,
                });
            }

            for ((col, ch), x) in line.chars().enumerate().zip(0..grid_width) {
                let pos = Position::new(x, y);
                match ch {
                    '.' => {}
                    '@' => players.push(pos),
                    'h' => config.horseshoes.push(pos),
                    'P' => config.pegs.push(pos),
                    '#' => config.obstacles.push(pos),
                    '~' => config.empty_tiles.push(pos),
                    _ => return Err(Error::UnrecognizedChar { ch, row, col }),
                }
            }
        }

        match players.as_slice() {
            [start] => config.player_start = *start,
            _ => return Err(Error::PlayerCount(players.len())),
        }

        config.validate()?;
        Ok(config)
    }
}

// Grid size of a map with `width` columns and `height` rows.
fn grid_dimensions(width: usize, height: usize) -> Result<(i32, i32)> {
    match (i32::try_from(width), i32::try_from(height)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => Ok((w, h)),
        _ => Err(Error::InvalidDimensions {
            width: i32::try_from(width).unwrap_or(i32::MAX),
            height: i32::try_from(height).unwrap_or(i32::MAX),
        }),
    }
}

fn positions(cells: &[(i32, i32)]) -> Vec<Position> {
    cells.iter().map(|&(x, y)| Position::new(x, y)).collect()
}

/// Returns the built-in level with the given 1-based number.
///
/// # Examples
/// ```
/// use horseshoe_toss::level::{builtin_level, BUILTIN_LEVEL_COUNT};
/// assert!(builtin_level(1).is_some());
/// assert!(builtin_level(BUILTIN_LEVEL_COUNT).is_some());
/// assert!(builtin_level(0).is_none());
/// assert!(builtin_level(BUILTIN_LEVEL_COUNT + 1).is_none());
/// ```
pub fn builtin_level(number: u32) -> Option<LevelConfig> {
    let config = match number {
        1 => LevelConfig {
            width: 6,
            height: 2,
            player_start: Position::new(0, 1),
            horseshoes: positions(&[(2, 1)]),
            pegs: positions(&[(4, 1)]),
            obstacles: positions(&[(1, 1)]),
            empty_tiles: positions(&[(0, 0)]),
        },
        2 => LevelConfig {
            width: 7,
            height: 7,
            player_start: Position::new(3, 3),
            horseshoes: positions(&[(1, 3), (3, 1), (5, 3), (3, 5)]),
            pegs: positions(&[(0, 3), (3, 0), (3, 6), (6, 3)]),
            obstacles: positions(&[
                (2, 2),
                (3, 2),
                (4, 2),
                (4, 3),
                (4, 4),
                (3, 4),
                (2, 4),
                (2, 3),
            ]),
            empty_tiles: positions(&[(0, 0), (6, 0), (0, 6), (6, 6)]),
        },
        3 => LevelConfig {
            width: 7,
            height: 4,
            player_start: Position::new(4, 0),
            horseshoes: positions(&[(1, 3), (4, 3)]),
            pegs: positions(&[(0, 3), (3, 3)]),
            obstacles: positions(&[(0, 1), (1, 1), (2, 1), (3, 1), (4, 1), (5, 1)]),
            empty_tiles: positions(&[(0, 0)]),
        },
        4 => LevelConfig {
            width: 5,
            height: 8,
            player_start: Position::new(1, 2),
            horseshoes: positions(&[(2, 1)]),
            pegs: positions(&[(3, 4)]),
            obstacles: positions(&[(0, 1), (1, 5)]),
            empty_tiles: positions(&[(0, 0), (0, 2), (4, 5), (4, 6), (4, 7), (3, 7)]),
        },
        5 => LevelConfig {
            width: 6,
            height: 9,
            player_start: Position::new(1, 1),
            horseshoes: positions(&[(4, 1)]),
            pegs: positions(&[(5, 5)]),
            obstacles: positions(&[
                (3, 1),
                (2, 3),
                (1, 4),
                (0, 7),
                (3, 8),
                (4, 4),
                (5, 4),
            ]),
            empty_tiles: positions(&[
                (0, 0),
                (0, 1),
                (1, 0),
                (5, 0),
                (0, 8),
                (4, 8),
                (5, 8),
            ]),
        },
        6 => LevelConfig {
            width: 9,
            height: 8,
            player_start: Position::new(1, 0),
            horseshoes: positions(&[(2, 1), (6, 1), (1, 5), (7, 5)]),
            pegs: positions(&[(1, 3), (1, 7), (7, 3), (7, 7)]),
            obstacles: positions(&[
                (0, 1),
                (0, 5),
                (3, 1),
                (4, 0),
                (5, 1),
                (8, 1),
                (3, 4),
                (5, 4),
                (8, 5),
            ]),
            empty_tiles: positions(&[(0, 4), (1, 4), (2, 4), (6, 4), (7, 4), (8, 4)]),
        },
        _ => return None,
    };
    Some(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_level() -> LevelConfig {
        LevelConfig {
            width: 4,
            height: 3,
            player_start: Position::new(0, 0),
            horseshoes: vec![Position::new(1, 1)],
            pegs: vec![Position::new(3, 1)],
            obstacles: vec![Position::new(2, 2)],
            empty_tiles: vec![Position::new(3, 0)],
        }
    }

    #[test]
    fn test_builtin_levels_are_valid() {
        for n in 1..=BUILTIN_LEVEL_COUNT {
            let level = builtin_level(n).unwrap();
            assert!(level.validate().is_ok(), "level {} failed validation", n);
            assert_eq!(
                level.horseshoes.len(),
                level.pegs.len(),
                "level {} should have one horseshoe per peg",
                n
            );
        }
    }

    #[test]
    fn test_builtin_level_one_layout() {
        let level = builtin_level(1).unwrap();
        assert_eq!((level.width, level.height), (6, 2));
        assert_eq!(level.player_start, Position::new(0, 1));
        assert_eq!(level.horseshoes, vec![Position::new(2, 1)]);
        assert_eq!(level.pegs, vec![Position::new(4, 1)]);
    }

    #[test]
    fn test_validate_rejects_zero_dimensions() {
        let mut level = valid_level();
        level.height = 0;
        assert!(matches!(
            level.validate(),
            Err(Error::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_out_of_bounds_entity() {
        let mut level = valid_level();
        level.pegs.push(Position::new(4, 1));
        let err = level.validate().unwrap_err();
        assert!(matches!(err, Error::OutOfBounds { entity: "peg", .. }));
        assert!(err.to_string().contains("(4, 1)"));
    }

    #[test]
    fn test_validate_rejects_blocked_player_start() {
        let mut level = valid_level();
        level.player_start = Position::new(2, 2);
        assert!(matches!(
            level.validate(),
            Err(Error::InvalidPlayerStart {
                blocker: "obstacle",
                ..
            })
        ));

        let mut level = valid_level();
        level.player_start = Position::new(1, 1);
        assert!(matches!(
            level.validate(),
            Err(Error::InvalidPlayerStart {
                blocker: "horseshoe",
                ..
            })
        ));
    }

    #[test]
    fn test_json_round_trip_preserves_level() {
        let level = builtin_level(3).unwrap();
        let json = level.to_json_string().unwrap();
        assert!(json.contains("\"player_start\""));
        assert_eq!(LevelConfig::from_json_str(&json).unwrap(), level);
    }

    #[test]
    fn test_json_rejects_malformed_input() {
        let err = LevelConfig::from_json_str("{\"width\": 3").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_json_runs_validation() {
        let json = r#"{
            "width": 3, "height": 1,
            "player_start": {"x": 1, "y": 0},
            "horseshoes": [],
            "pegs": [{"x": 1, "y": 0}]
        }"#;
        assert!(matches!(
            LevelConfig::from_json_str(json),
            Err(Error::InvalidPlayerStart { blocker: "peg", .. })
        ));
    }

    #[test]
    fn test_json_file_missing() {
        let path = std::env::temp_dir().join("horseshoe_toss_no_such_level.json");
        let err = LevelConfig::from_json_file(&path).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_json_file_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "horseshoe_toss_level_{}.json",
            std::process::id()
        ));
        let level = builtin_level(2).unwrap();
        std::fs::write(&path, level.to_json_string().unwrap()).unwrap();
        let loaded = LevelConfig::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, level);
    }

    #[test]
    fn test_from_str_array_matches_builtin_level_one() {
        let level = LevelConfig::from_str_array(&[
            "@#h.P.", // y = 1
            "~.....", // y = 0
        ])
        .unwrap();
        assert_eq!(level, builtin_level(1).unwrap());
    }

    #[test]
    fn test_from_str_array_orders_horseshoes_in_reading_order() {
        let level = LevelConfig::from_str_array(&["h..", ".@.", "..h"]).unwrap();
        assert_eq!(
            level.horseshoes,
            vec![Position::new(0, 2), Position::new(2, 0)]
        );
        assert_eq!(level.player_start, Position::new(1, 1));
    }

    #[test]
    fn test_from_str_array_invalid_char() {
        let err = LevelConfig::from_str_array(&["@.X"]).unwrap_err();
        assert!(err.to_string().contains("Unrecognized character 'X'"));
    }

    #[test]
    fn test_from_str_array_ragged_rows() {
        let err = LevelConfig::from_str_array(&["@..", ".."]).unwrap_err();
        assert!(matches!(
            err,
            Error::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn test_from_str_array_player_count() {
        assert!(matches!(
            LevelConfig::from_str_array(&["..h"]),
            Err(Error::PlayerCount(0))
        ));
        assert!(matches!(
            LevelConfig::from_str_array(&["@.@"]),
            Err(Error::PlayerCount(2))
        ));
    }

    #[test]
    fn test_grid_dimensions_reject_oversized_maps() {
        assert_eq!(grid_dimensions(5, 2).unwrap(), (5, 2));
        let too_wide = usize::try_from(i32::MAX).unwrap() + 1;
        assert!(matches!(
            grid_dimensions(too_wide, 1),
            Err(Error::InvalidDimensions {
                width: i32::MAX,
                height: 1
            })
        ));
        assert!(matches!(
            grid_dimensions(3, too_wide),
            Err(Error::InvalidDimensions { width: 3, .. })
        ));
        assert!(matches!(
            grid_dimensions(0, 1),
            Err(Error::InvalidDimensions { width: 0, height: 1 })
        ));
    }

    #[test]
    fn test_from_str_array_empty_input() {
        let rows: [&str; 0] = [];
        assert!(matches!(
            LevelConfig::from_str_array(&rows),
            Err(Error::InvalidDimensions { .. })
        ));
    }
}
