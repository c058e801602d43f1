//! Breadth-first search for the shortest sequence of pushes.
//!
//! The search keeps one map from every state seen so far to the moves that
//! first reached it. States are expanded one depth layer at a time, so the
//! first solved state found is reached by a minimal number of moves.

use std::time::{Duration, Instant};

use fxhash::FxHashMap;
use log::{debug, info, trace};
use thiserror::Error;

use crate::moves::{apply_move, PushRule};
use crate::puzzle::{Color, Puzzle, State};
use crate::rules::{is_solved, is_valid};

/// Default maximum number of moves
pub const DEFAULT_DEPTH: usize = 50;

/// Configuration for the solver
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Longest move sequence to look for
    pub max_depth: usize,
    /// Which tokens a push carries along
    pub push_rule: PushRule,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_DEPTH,
            push_rule: PushRule::default(),
        }
    }
}

/// A shortest solution and some bookkeeping about the search
#[derive(Debug, Clone)]
pub struct Solution {
    /// Color of the token pushed at each step
    pub moves: Vec<Color>,
    /// Number of distinct states discovered
    pub states_explored: usize,
    /// Time elapsed in milliseconds
    pub time_elapsed_ms: u64,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    /// No solution of at most `depth` moves. `exhausted` is set when every
    /// reachable state was visited before hitting the depth limit, meaning
    /// no solution exists at any depth.
    #[error("Could not solve with depth {depth} ({states_explored} states explored)")]
    Unsolved {
        depth: usize,
        states_explored: usize,
        exhausted: bool,
        time_elapsed_ms: u64,
    },
}

/// Every state discovered during one search, mapped to the path that first
/// reached it. Paths are never overwritten.
#[derive(Debug, Clone, Default)]
pub struct SearchTree {
    paths: FxHashMap<State, Vec<Color>>,
}

impl SearchTree {
    pub fn new(initial: State) -> Self {
        let mut tree = Self::default();
        tree.insert(initial, Vec::new());
        tree
    }

    /// Record a path to `state` unless one is already known.
    /// Returns whether the state was new.
    pub fn insert(&mut self, state: State, path: Vec<Color>) -> bool {
        match self.paths.entry(state) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(path);
                true
            }
        }
    }

    pub fn path(&self, state: &State) -> Option<&[Color]> {
        self.paths.get(state).map(Vec::as_slice)
    }

    pub fn contains(&self, state: &State) -> bool {
        self.paths.contains_key(state)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Find a shortest sequence of at most `depth` moves that solves the puzzle.
pub fn solve(puzzle: &Puzzle, depth: usize) -> Result<Vec<Color>, SolveError> {
    let config = SolverConfig {
        max_depth: depth,
        ..Default::default()
    };
    solve_with_config(puzzle, &config).map(|solution| solution.moves)
}

/// Find a shortest solution using the given configuration.
pub fn solve_with_config(puzzle: &Puzzle, config: &SolverConfig) -> Result<Solution, SolveError> {
    let start_time = Instant::now();
    let board = &puzzle.board;

    let mut tree = SearchTree::new(puzzle.initial.clone());
    // States whose path length equals the current depth. The layer is fixed
    // before it is expanded; new states only go to the next layer.
    let mut layer = vec![puzzle.initial.clone()];
    let mut exhausted = false;

    info!(
        "Solving {}: {} tokens, depth {}, {:?}",
        puzzle.display_name(),
        puzzle.initial.len(),
        config.max_depth,
        config.push_rule
    );

    for depth in 0..=config.max_depth {
        debug!(
            "Depth {}: {} new states, {} total, {} ms",
            depth,
            layer.len(),
            tree.len(),
            elapsed_ms(start_time.elapsed())
        );

        let mut next_layer = Vec::new();

        for state in &layer {
            let path = tree.path(state).map(<[Color]>::to_vec).unwrap_or_default();

            if is_solved(board, state) {
                trace!("Solved state {state}");
                let solution = Solution {
                    moves: path,
                    states_explored: tree.len(),
                    time_elapsed_ms: elapsed_ms(start_time.elapsed()),
                };
                info!(
                    "Solved in {} moves after {} states, {} ms",
                    solution.moves.len(),
                    solution.states_explored,
                    solution.time_elapsed_ms
                );
                return Ok(solution);
            }

            if depth == config.max_depth {
                continue;
            }

            for token in state {
                let next = apply_move(board, state, token, config.push_rule);
                if !is_valid(board, &next) || tree.contains(&next) {
                    continue;
                }

                let mut next_path = Vec::with_capacity(path.len() + 1);
                next_path.extend_from_slice(&path);
                next_path.push(token.color);

                tree.insert(next.clone(), next_path);
                next_layer.push(next);
            }
        }

        if next_layer.is_empty() {
            exhausted = depth < config.max_depth;
            break;
        }
        layer = next_layer;
    }

    let time_elapsed_ms = elapsed_ms(start_time.elapsed());
    info!(
        "No solution within {} moves after {} states, {} ms",
        config.max_depth,
        tree.len(),
        time_elapsed_ms
    );

    Err(SolveError::Unsolved {
        depth: config.max_depth,
        states_explored: tree.len(),
        exhausted,
        time_elapsed_ms,
    })
}

fn elapsed_ms(elapsed: Duration) -> u64 {
    elapsed.as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::{Board, Cell, Direction, Token};

    fn create_trivial_puzzle() -> Puzzle {
        // . 1 .  with a red token facing right on the left
        let board = Board::new(vec![vec![Cell::Empty, Cell::Target(1), Cell::Empty]]);
        Puzzle::new(board, &[Token::new(1, 0, 0, Direction::Right)]).unwrap()
    }

    fn create_corridor_puzzle() -> Puzzle {
        // Needs exactly three pushes
        let board = Board::new(vec![vec![
            Cell::Empty,
            Cell::Empty,
            Cell::Empty,
            Cell::Target(1),
        ]]);
        Puzzle::new(board, &[Token::new(1, 0, 0, Direction::Right)]).unwrap()
    }

    #[test]
    fn test_single_move_puzzle() {
        let puzzle = create_trivial_puzzle();
        assert_eq!(solve(&puzzle, DEFAULT_DEPTH), Ok(vec![1]));
    }

    #[test]
    fn test_already_solved() {
        let board = Board::new(vec![vec![Cell::Target(1)]]);
        let puzzle = Puzzle::new(board, &[Token::new(1, 0, 0, Direction::Up)]).unwrap();

        assert_eq!(solve(&puzzle, 0), Ok(vec![]));
    }

    #[test]
    fn test_depth_exhaustion() {
        let puzzle = create_corridor_puzzle();

        match solve(&puzzle, 2) {
            Err(SolveError::Unsolved { depth, .. }) => assert_eq!(depth, 2),
            other => panic!("expected depth exhaustion, got {other:?}"),
        }
        assert_eq!(solve(&puzzle, 3), Ok(vec![1, 1, 1]));
    }

    #[test]
    fn test_unreachable_target_exhausts_search() {
        // The token faces away from its target and can never turn
        let board = Board::new(vec![vec![Cell::Target(1), Cell::Empty]]);
        let puzzle = Puzzle::new(board, &[Token::new(1, 1, 0, Direction::Right)]).unwrap();

        let result = solve_with_config(&puzzle, &SolverConfig::default());
        match result {
            Err(SolveError::Unsolved {
                depth,
                states_explored,
                exhausted,
                ..
            }) => {
                assert_eq!(depth, DEFAULT_DEPTH);
                // x = 1, 2, 3; x = 4 is past the margin
                assert_eq!(states_explored, 3);
                assert!(exhausted);
            }
            other => panic!("expected unsolved, got {other:?}"),
        }
    }

    #[test]
    fn test_search_tree_first_write_wins() {
        let initial = State::new(&[Token::new(1, 0, 0, Direction::Right)]);
        let other = State::new(&[Token::new(1, 1, 0, Direction::Right)]);
        let mut tree = SearchTree::new(initial.clone());

        assert!(!tree.insert(initial.clone(), vec![1, 1]));
        assert_eq!(tree.path(&initial), Some(&[][..]));

        assert!(tree.insert(other.clone(), vec![1]));
        assert!(!tree.insert(other.clone(), vec![2, 2]));
        assert_eq!(tree.path(&other), Some(&[1][..]));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_states_differing_only_in_facing_are_distinct() {
        let mut tree = SearchTree::default();
        assert!(tree.insert(State::new(&[Token::new(1, 0, 0, Direction::Right)]), vec![]));
        assert!(tree.insert(State::new(&[Token::new(1, 0, 0, Direction::Left)]), vec![]));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_solution_reports_statistics() {
        let puzzle = create_corridor_puzzle();
        let solution = solve_with_config(&puzzle, &SolverConfig::default()).unwrap();

        assert_eq!(solution.moves, vec![1, 1, 1]);
        // Initial state plus one new state per push
        assert_eq!(solution.states_explored, 4);
    }
}
