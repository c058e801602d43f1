//! Solver for "game about squares" sliding puzzles.
//!
//! Colored tokens are pushed one at a time along their facing, shoving any
//! tokens in front of them, until every token rests on a target of its own
//! color. Redirect cells turn tokens that land on them. The solver runs a
//! breadth-first search over token states and returns a shortest list of
//! pushes.

pub mod catalog;
pub mod moves;
pub mod puzzle;
pub mod rules;
pub mod solver;

// Re-export main types
pub use moves::{apply_move, replay, PushRule, ReplayError};
pub use puzzle::{
    Board, Cell, Color, Direction, LoadError, Puzzle, PuzzleConfig, PuzzleError, State, Token,
    MAX_TOKENS,
};
pub use rules::{is_inside, is_solved, is_square, is_valid};
pub use solver::{
    solve, solve_with_config, SearchTree, Solution, SolveError, SolverConfig, DEFAULT_DEPTH,
};
