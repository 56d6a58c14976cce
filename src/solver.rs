use crate::engine::{Direction, Game, Position};
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::fmt;

/// One player input: a single step or a throw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Move(Direction),
    Throw,
}

impl Action {
    /// Every action the solver tries from a state, moves first.
    pub const ALL: [Action; 5] = [
        Action::Move(Direction::Up),
        Action::Move(Direction::Down),
        Action::Move(Direction::Left),
        Action::Move(Direction::Right),
        Action::Throw,
    ];

    /// Applies the action to `game`.
    ///
    /// # Returns
    /// `false` if the action was a move the engine rejected.
    pub fn apply(self, game: &mut Game) -> bool {
        match self {
            Action::Move(direction) => game.move_player(direction),
            Action::Throw => {
                game.perform_throw();
                true
            }
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Move(direction) => write!(f, "move {:?}", direction),
            Action::Throw => write!(f, "throw"),
        }
    }
}

/// Represents a solution found by the solver.
#[derive(Clone, Debug)]
pub struct Solution {
    /// Shortest sequence of actions that wins the level.
    pub actions: Vec<Action>,
    /// The game after playing `actions`.
    pub final_game: Game,
    /// Number of distinct states the search visited.
    pub states_explored: usize,
}

// Everything that distinguishes two positions of the same level.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct StateKey {
    player: Position,
    horseshoes: Vec<Position>,
    placed: BTreeSet<usize>,
}

impl StateKey {
    fn of(game: &Game) -> Self {
        StateKey {
            player: game.player_position(),
            horseshoes: game.horseshoe_positions().to_vec(),
            placed: game.placed_horseshoes().clone(),
        }
    }
}

/// Finds the shortest winning action sequence using breadth-first search.
///
/// Throws that lose the attempt are never followed, and actions that leave the
/// state unchanged (blocked moves, throws with nothing in line) are pruned by
/// the visited set.
///
/// # Arguments
/// * `initial_game`: the state to start from. It is not modified.
/// * `max_depth`: the longest action sequence to consider.
///
/// # Returns
/// `None` if no win exists within `max_depth` actions or the game is already lost.
///
/// # Examples
/// ```
/// use horseshoe_toss::engine::Game;
/// use horseshoe_toss::level::LevelConfig;
/// use horseshoe_toss::solver::{solve_bfs, Action};
///
/// let level = LevelConfig::from_str_array(&["...", "@hP"]).unwrap();
/// let solution = solve_bfs(&Game::new(level).unwrap(), 10).unwrap();
/// assert_eq!(solution.actions, vec![Action::Throw]);
/// ```
pub fn solve_bfs(initial_game: &Game, max_depth: u32) -> Option<Solution> {
    if initial_game.is_game_lost() {
        return None;
    }
    if initial_game.is_victory() {
        return Some(Solution {
            actions: Vec::new(),
            final_game: initial_game.clone(),
            states_explored: 1,
        });
    }

    let mut visited = HashSet::new();
    visited.insert(StateKey::of(initial_game));
    let mut queue = VecDeque::new();
    queue.push_back((initial_game.clone(), Vec::new()));

    while let Some((game, path)) = queue.pop_front() {
        if path.len() as u32 >= max_depth {
            continue;
        }

        for action in Action::ALL {
            let mut next = game.clone();
            if !action.apply(&mut next) || next.is_game_lost() {
                continue;
            }
            if !visited.insert(StateKey::of(&next)) {
                continue;
            }

            let mut next_path: Vec<Action> = path.clone();
            next_path.push(action);

            if next.is_victory() {
                return Some(Solution {
                    actions: next_path,
                    final_game: next,
                    states_explored: visited.len(),
                });
            }
            queue.push_back((next, next_path));
        }
    }

    None
}
