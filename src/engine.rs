//! Core rules engine for the horseshoe toss puzzle.
//!
//! This module defines the game's fundamental components:
//! - `Position` and `Direction`: grid coordinates and the four movement directions.
//! - `Board`: the static terrain of a level (grid size, pegs, obstacles, void tiles).
//! - `Game`: the state of one level attempt, including the player, the horseshoes,
//!   which horseshoes already rest on pegs, and whether the attempt is lost.
//!
//! The grid's y-axis grows upward: `Direction::Up` adds one to `y`.
use log::{debug, info};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::level::LevelConfig;

/// Seed used for obstacle decoration when none is given.
pub const DEFAULT_DECOR_SEED: u64 = 1865;

/// A cell coordinate on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a position from its coordinates.
    ///
    /// # Examples
    /// ```
    /// use horseshoe_toss::engine::Position;
    /// let p = Position::new(2, 3);
    /// assert_eq!((p.x, p.y), (2, 3));
    /// ```
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// Returns the position shifted by `(dx, dy)`.
    ///
    /// Coordinates wrap on overflow. `Game::new` does not bounds-check entity
    /// positions, and a wrapped coordinate is simply off the grid.
    ///
    /// ```
    /// use horseshoe_toss::engine::Position;
    /// assert_eq!(Position::new(1, 1).offset(-1, 2), Position::new(0, 3));
    /// assert_eq!(Position::new(i32::MAX, 0).offset(1, 0), Position::new(i32::MIN, 0));
    /// ```
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Position {
            x: self.x.wrapping_add(dx),
            y: self.y.wrapping_add(dy),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Direction of a single player step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All four directions, in a fixed order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit offset `(dx, dy)` of this direction.
    ///
    /// ```
    /// use horseshoe_toss::engine::Direction;
    /// assert_eq!(Direction::Up.delta(), (0, 1));
    /// assert_eq!(Direction::Left.delta(), (-1, 0));
    /// ```
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Decorative look of an obstacle. Has no effect on the rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObstacleKind {
    Cactus,
    Fence,
}

impl ObstacleKind {
    fn glyph(&self) -> &'static str {
        match self {
            ObstacleKind::Cactus => "Y ",
            ObstacleKind::Fence => "# ",
        }
    }
}

/// Static terrain of a level.
///
/// Built once from a `LevelConfig` and never modified afterwards. Lookups go
/// through hash sets; the ordered lists keep the level's declaration order for
/// renderers that need stable indices.
#[derive(Clone, Debug)]
pub struct Board {
    width: i32,
    height: i32,
    pegs: Vec<Position>,
    obstacles: Vec<Position>,
    empty_tiles: Vec<Position>,
    obstacle_kinds: Vec<ObstacleKind>,
    peg_set: HashSet<Position>,
    obstacle_set: HashSet<Position>,
    empty_set: HashSet<Position>,
}

impl Board {
    /// Builds the terrain of `config`, decorating obstacles with a `SmallRng`
    /// seeded from `decor_seed`.
    ///
    /// # Errors
    /// Returns `Error::InvalidDimensions` if the width or height is not positive.
    pub fn new(config: &LevelConfig, decor_seed: u64) -> Result<Self> {
        if config.width <= 0 || config.height <= 0 {
            return Err(Error::InvalidDimensions {
                width: config.width,
                height: config.height,
            });
        }

        let mut rng = SmallRng::seed_from_u64(decor_seed);
        let obstacle_kinds = config
            .obstacles
            .iter()
            .map(|_| {
                if rng.gen_bool(0.5) {
                    ObstacleKind::Cactus
                } else {
                    ObstacleKind::Fence
                }
            })
            .collect();

        Ok(Board {
            width: config.width,
            height: config.height,
            pegs: config.pegs.clone(),
            obstacles: config.obstacles.clone(),
            empty_tiles: config.empty_tiles.clone(),
            obstacle_kinds,
            peg_set: config.pegs.iter().copied().collect(),
            obstacle_set: config.obstacles.iter().copied().collect(),
            empty_set: config.empty_tiles.iter().copied().collect(),
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn pegs(&self) -> &[Position] {
        &self.pegs
    }

    pub fn obstacles(&self) -> &[Position] {
        &self.obstacles
    }

    pub fn empty_tiles(&self) -> &[Position] {
        &self.empty_tiles
    }

    /// Decorative kind of the obstacle at `index` in `obstacles()`.
    pub fn obstacle_kind(&self, index: usize) -> Option<ObstacleKind> {
        self.obstacle_kinds.get(index).copied()
    }

    /// Checks whether `pos` lies inside the grid.
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    pub fn is_peg(&self, pos: Position) -> bool {
        self.peg_set.contains(&pos)
    }

    pub fn is_obstacle(&self, pos: Position) -> bool {
        self.obstacle_set.contains(&pos)
    }

    pub fn is_empty_tile(&self, pos: Position) -> bool {
        self.empty_set.contains(&pos)
    }

    fn obstacle_kind_at(&self, pos: Position) -> Option<ObstacleKind> {
        self.obstacles
            .iter()
            .position(|&o| o == pos)
            .and_then(|i| self.obstacle_kind(i))
    }
}

/// Outcome of a single `Game::perform_throw` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThrowResult {
    /// Position of every horseshoe after the throw, indexed like the level's horseshoe list.
    pub new_positions: Vec<Position>,
    /// True if this throw sent a horseshoe off the board or into a void tile.
    pub is_out: bool,
    /// Indices of all horseshoes resting on pegs after the throw.
    pub placed_horseshoes: BTreeSet<usize>,
}

/// Where a level attempt stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameStatus {
    InProgress,
    Won,
    Lost,
}

// Where a single horseshoe stops after sliding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Landing {
    Peg(Position),
    Rest(Position),
    Out(Position),
}

/// State of one attempt at a level.
///
/// `Game` owns the mutable parts of the level (player and horseshoe positions,
/// the placed set and the lost flag) and shares the static `Board` behind an
/// `Arc`, so cloning a game for search is cheap.
///
/// # Examples
/// ```
/// use horseshoe_toss::engine::{Direction, Game, Position};
/// use horseshoe_toss::level::LevelConfig;
///
/// let config = LevelConfig {
///     width: 5,
///     height: 1,
///     player_start: Position::new(0, 0),
///     horseshoes: vec![Position::new(1, 0)],
///     pegs: vec![Position::new(3, 0)],
///     obstacles: vec![],
///     empty_tiles: vec![],
/// };
/// let mut game = Game::new(config).unwrap();
///
/// let result = game.perform_throw();
/// assert_eq!(result.new_positions, vec![Position::new(3, 0)]);
/// assert!(game.is_victory());
///
/// game.reset_game();
/// assert!(!game.is_victory());
/// assert!(!game.move_player(Direction::Right)); // a horseshoe is in the way
/// ```
#[derive(Clone, Debug)]
pub struct Game {
    board: Arc<Board>,
    config: Arc<LevelConfig>,
    player: Position,
    horseshoes: Vec<Position>,
    placed: BTreeSet<usize>,
    game_lost: bool,
}

impl Game {
    /// Starts an attempt at `config` with the default obstacle decoration.
    ///
    /// Only the grid dimensions are checked here. Overlapping entities are the
    /// level loader's concern (`LevelConfig::validate`).
    ///
    /// # Errors
    /// Returns `Error::InvalidDimensions` for a grid with a zero dimension.
    pub fn new(config: LevelConfig) -> Result<Self> {
        Self::with_decor_seed(config, DEFAULT_DECOR_SEED)
    }

    /// Same as `Game::new`, with an explicit seed for obstacle decoration.
    pub fn with_decor_seed(config: LevelConfig, decor_seed: u64) -> Result<Self> {
        let board = Board::new(&config, decor_seed)?;
        Ok(Game {
            board: Arc::new(board),
            player: config.player_start,
            horseshoes: config.horseshoes.clone(),
            config: Arc::new(config),
            placed: BTreeSet::new(),
            game_lost: false,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The configuration this attempt was built from.
    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn player_position(&self) -> Position {
        self.player
    }

    pub fn horseshoe_positions(&self) -> &[Position] {
        &self.horseshoes
    }

    /// Indices of horseshoes resting on pegs.
    pub fn placed_horseshoes(&self) -> &BTreeSet<usize> {
        &self.placed
    }

    pub fn is_horseshoe_placed(&self, index: usize) -> bool {
        self.placed.contains(&index)
    }

    /// Sticky loss flag: set once a throw sends a horseshoe out, cleared by `reset_game`.
    pub fn is_game_lost(&self) -> bool {
        self.game_lost
    }

    /// Moves the player one cell in `direction` if the target cell is free.
    ///
    /// The target must be inside the grid and must not hold an obstacle, a peg,
    /// a void tile or a horseshoe still in play. A blocked move leaves the game
    /// untouched.
    ///
    /// # Returns
    /// `true` if the player moved, `false` if the move was rejected.
    pub fn move_player(&mut self, direction: Direction) -> bool {
        let (dx, dy) = direction.delta();
        let candidate = self.player.offset(dx, dy);

        if !self.is_walkable(candidate) {
            debug!("Move {:?} from {} rejected", direction, self.player);
            return false;
        }

        self.player = candidate;
        true
    }

    /// Throws every horseshoe in line with the player.
    ///
    /// Each horseshoe that is not yet placed and shares a row or column with the
    /// player slides away from the player, one cell at a time, until:
    /// - it reaches a peg: it is placed there for the rest of the attempt;
    /// - the next cell is an obstacle: it rests where it is;
    /// - it enters a void tile, or the next cell is off the grid: it is out,
    ///   unless it stopped on a peg.
    ///
    /// Horseshoes never block each other. A horseshoe going out marks the whole
    /// attempt as lost.
    pub fn perform_throw(&mut self) -> ThrowResult {
        let mut is_out = false;
        let mut placed = self.placed.clone();

        for index in 0..self.horseshoes.len() {
            if self.placed.contains(&index) {
                continue;
            }

            let start = self.horseshoes[index];
            let Some((dx, dy)) = self.launch_step(start) else {
                debug!("Horseshoe {} at {} is not in line with the player", index, start);
                continue;
            };

            match self.slide(start, dx, dy) {
                Landing::Peg(pos) => {
                    debug!("Horseshoe {} slid from {} onto peg {}", index, start, pos);
                    self.horseshoes[index] = pos;
                    placed.insert(index);
                }
                Landing::Rest(pos) => {
                    debug!("Horseshoe {} slid from {} to {}", index, start, pos);
                    self.horseshoes[index] = pos;
                }
                Landing::Out(pos) => {
                    debug!("Horseshoe {} slid from {} out at {}", index, start, pos);
                    self.horseshoes[index] = pos;
                    is_out = true;
                }
            }
        }

        self.placed = placed;
        if is_out {
            self.game_lost = true;
            info!("Attempt lost: a horseshoe left the board");
        } else if self.is_victory() {
            info!("Attempt won: all {} pegs covered", self.board.pegs().len());
        }

        ThrowResult {
            new_positions: self.horseshoes.clone(),
            is_out,
            placed_horseshoes: self.placed.clone(),
        }
    }

    /// Checks whether every peg holds a placed horseshoe.
    ///
    /// A horseshoe that merely slid across a peg, or sits on one without being
    /// placed, does not count.
    pub fn is_victory(&self) -> bool {
        self.board.pegs().iter().all(|&peg| {
            self.placed
                .iter()
                .any(|&index| self.horseshoes[index] == peg)
        })
    }

    /// Current state of the attempt. A lost attempt stays lost even if all pegs are covered.
    pub fn status(&self) -> GameStatus {
        if self.game_lost {
            GameStatus::Lost
        } else if self.is_victory() {
            GameStatus::Won
        } else {
            GameStatus::InProgress
        }
    }

    /// Restores the player and all horseshoes to their starting cells and
    /// clears the placed set and the loss flag.
    pub fn reset_game(&mut self) {
        self.player = self.config.player_start;
        self.horseshoes.clone_from(&self.config.horseshoes);
        self.placed.clear();
        self.game_lost = false;
    }

    fn is_walkable(&self, pos: Position) -> bool {
        self.board.contains(pos)
            && !self.board.is_obstacle(pos)
            && !self.board.is_peg(pos)
            && !self.board.is_empty_tile(pos)
            && !self
                .horseshoes
                .iter()
                .enumerate()
                .any(|(i, &h)| h == pos && !self.placed.contains(&i))
    }

    // Unit step of a horseshoe at `pos`, pointing away from the player, or None
    // if it shares neither row nor column with the player.
    fn launch_step(&self, pos: Position) -> Option<(i32, i32)> {
        if self.player.x == pos.x {
            Some((0, if self.player.y > pos.y { -1 } else { 1 }))
        } else if self.player.y == pos.y {
            Some((if self.player.x > pos.x { -1 } else { 1 }, 0))
        } else {
            None
        }
    }

    fn slide(&self, start: Position, dx: i32, dy: i32) -> Landing {
        let mut current = start;
        loop {
            let next = current.offset(dx, dy);
            if !self.board.contains(next) {
                // Peg beats edge.
                return if self.board.is_peg(current) {
                    Landing::Peg(current)
                } else {
                    Landing::Out(current)
                };
            }
            if self.board.is_obstacle(next) {
                return Landing::Rest(current);
            }

            current = next;
            if self.board.is_peg(current) {
                return Landing::Peg(current);
            }
            if self.board.is_empty_tile(current) {
                return Landing::Out(current);
            }
        }
    }

    /// Renders the board for a terminal, top row first, using ANSI colors.
    ///
    /// Column numbers run along the top and row numbers down the left side.
    /// Void tiles are left blank, pegs are `|`, obstacles are `Y` (cactus) or `#`
    /// (fence), horseshoes are `U` (green once placed) and the player is `@`.
    pub fn to_ansi_string(&self) -> String {
        let mut output = String::new();

        output.push_str("  ");
        for x in 0..self.board.width() {
            output.push_str(&format!("{:<2}", x));
        }
        output.push('\n');

        for y in (0..self.board.height()).rev() {
            output.push_str(&format!("{:<2}", y));
            for x in 0..self.board.width() {
                let (color_code, content) = self.cell_appearance(Position::new(x, y));
                output.push_str(&format!("\x1b[1;{}m{}\x1b[m", color_code, content));
            }
            if y > 0 {
                output.push('\n');
            }
        }

        output
    }

    fn cell_appearance(&self, pos: Position) -> (&'static str, &'static str) {
        if self.player == pos {
            return ("30;43", "@ ");
        }
        if let Some(index) = self.horseshoes.iter().position(|&h| h == pos) {
            return if self.placed.contains(&index) {
                ("30;42", "U ")
            } else {
                ("30;47", "U ")
            };
        }
        if self.board.is_peg(pos) {
            return ("37;44", "| ");
        }
        if let Some(kind) = self.board.obstacle_kind_at(pos) {
            return ("32;40", kind.glyph());
        }
        if self.board.is_empty_tile(pos) {
            return ("49", "  ");
        }
        ("30;43", ". ")
    }
}

impl fmt::Display for Game {
    /// Formats the board using `to_ansi_string`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_ansi_string())
    }
}
