//! Board predicates used by the move simulator and the search.
//!
//! None of these depend on token order, so a state can be treated as a set
//! of tokens here even though it is stored as a sequence.

use crate::puzzle::{Board, Cell, Color, State, Token};

/// Is a token on the board proper? Only such tokens can finish on a target or
/// be turned by a redirect. Tokens outside still take part in pushes.
pub fn is_inside(board: &Board, token: &Token) -> bool {
    board.cell(token.x, token.y).is_some()
}

/// Color of the token occupying a position, if any
pub fn is_square(state: &State, x: i32, y: i32) -> Option<Color> {
    state
        .iter()
        .find(|token| token.x == x && token.y == y)
        .map(|token| token.color)
}

/// Every token sits on a target of its own color, unless its color has no
/// target at all.
pub fn is_solved(board: &Board, state: &State) -> bool {
    state.iter().all(|token| {
        !board.has_target(token.color)
            || board.cell(token.x, token.y) == Some(Cell::Target(token.color))
    })
}

/// Tokens can be pushed at most `border` cells past the edge of the field,
/// where `border` is the number of tokens.
pub fn within_reach(board: &Board, token: &Token, border: i32) -> bool {
    let width = board.width() as i32;
    let height = board.height() as i32;

    token.x > -border
        && token.y > -border
        && token.x <= width + border
        && token.y <= height + border
}

/// Pruning guard for the search. The bound is loose on purpose: tighter
/// direction-aware bounds lose solutions on some boards.
pub fn is_valid(board: &Board, state: &State) -> bool {
    let border = state.len() as i32;
    state.iter().all(|token| within_reach(board, token, border))
}
