//! Move simulation: pushing one token and everything lined up in front of it.

use clap::ValueEnum;
use smallvec::SmallVec;
use thiserror::Error;

use crate::puzzle::{Board, Cell, Color, Puzzle, State, Token};
use crate::rules::is_square;

/// Which tokens a push carries along
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum PushRule {
    /// Every token whose color shows up in the pushed chain moves, including
    /// same-colored tokens that are not in the chain at all.
    #[default]
    SameColor,
    /// Only the tokens physically in the chain move.
    ChainOnly,
}

/// Push `token` one step along its facing and return the resulting state.
///
/// The pushed token shoves every token directly in front of it, up to the
/// first free position. Afterwards each token standing on a redirect cell
/// takes that cell's direction.
pub fn apply_move(board: &Board, state: &State, token: &Token, rule: PushRule) -> State {
    let (dx, dy) = token.facing.delta();

    let mut chain_colors: SmallVec<[Color; 8]> = SmallVec::new();
    let mut chain_positions: SmallVec<[(i32, i32); 8]> = SmallVec::new();
    chain_colors.push(token.color);
    chain_positions.push(token.position());

    let (mut x, mut y) = token.position();
    loop {
        x += dx;
        y += dy;
        match is_square(state, x, y) {
            Some(color) => {
                chain_colors.push(color);
                chain_positions.push((x, y));
            }
            None => break,
        }
    }

    state
        .iter()
        .map(|other| {
            let moves = match rule {
                PushRule::SameColor => chain_colors.contains(&other.color),
                PushRule::ChainOnly => chain_positions.contains(&other.position()),
            };
            let moved = if moves {
                other.translated(dx, dy)
            } else {
                *other
            };
            redirect(board, moved)
        })
        .collect()
}

/// Turn a token standing on a redirect cell
fn redirect(board: &Board, token: Token) -> Token {
    match board.cell(token.x, token.y) {
        Some(Cell::Redirect(direction)) => token.with_facing(direction),
        _ => token,
    }
}

/// Errors raised while replaying a move sequence
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    #[error("Move {step} pushes color {color}, but no token has that color")]
    UnknownColor { step: usize, color: Color },
}

/// Replay a sequence of colors from the initial state.
///
/// Each move pushes the first token of the given color. Returns every state
/// visited, starting with the initial one.
pub fn replay(
    puzzle: &Puzzle,
    moves: &[Color],
    rule: PushRule,
) -> Result<Vec<State>, ReplayError> {
    let mut states = Vec::with_capacity(moves.len() + 1);
    let mut state = puzzle.initial.clone();

    for (step, &color) in moves.iter().enumerate() {
        let token = state
            .iter()
            .find(|t| t.color == color)
            .copied()
            .ok_or(ReplayError::UnknownColor { step, color })?;
        let next = apply_move(&puzzle.board, &state, &token, rule);
        states.push(std::mem::replace(&mut state, next));
    }
    states.push(state);

    Ok(states)
}
