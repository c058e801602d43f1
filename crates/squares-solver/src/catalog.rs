//! Built-in puzzles and the default color palette.

use crate::puzzle::{Board, Cell, Color, Direction, Puzzle, PuzzleError, Token};

/// Names of the built-in puzzles
pub fn names() -> &'static [&'static str] {
    &["31", "32", "33"]
}

/// Default display name for a color
pub fn color_name(color: Color) -> &'static str {
    match color {
        1 => "Red",
        2 => "Blue",
        3 => "Navy",
        _ => "Unknown",
    }
}

/// Look up a built-in puzzle by name
pub fn builtin(name: &str) -> Option<Result<Puzzle, PuzzleError>> {
    let puzzle = match name {
        "31" => level_31(),
        "32" => level_32(),
        "33" => level_33(),
        _ => return None,
    };
    Some(puzzle.map(|p| p.with_name(format!("level {name}"))))
}

const E: Cell = Cell::Empty;
const T1: Cell = Cell::Target(1);
const T2: Cell = Cell::Target(2);
const T3: Cell = Cell::Target(3);
const UP: Cell = Cell::Redirect(Direction::Up);
const DOWN: Cell = Cell::Redirect(Direction::Down);
const LEFT: Cell = Cell::Redirect(Direction::Left);
const RIGHT: Cell = Cell::Redirect(Direction::Right);

fn level_31() -> Result<Puzzle, PuzzleError> {
    let board = Board::new(vec![
        vec![E, E, DOWN, E, E],
        vec![E, RIGHT, E, E, E],
        vec![T2, E, T1, LEFT, T3],
        vec![],
        vec![E, E, UP, E, E],
    ]);
    Puzzle::new(
        board,
        &[
            Token::new(1, 3, 2, Direction::Left),
            Token::new(2, 2, 0, Direction::Down),
            Token::new(3, 1, 1, Direction::Right),
        ],
    )
}

fn level_32() -> Result<Puzzle, PuzzleError> {
    let board = Board::new(vec![
        vec![E, DOWN, T1, E, E],
        vec![T2, E, E, E, E],
        vec![RIGHT, E, E, E, E],
        vec![E, E, E, E, LEFT],
        vec![E, UP, E, E, E],
    ]);
    Puzzle::new(
        board,
        &[
            Token::new(1, 0, 2, Direction::Right),
            Token::new(2, 1, 0, Direction::Down),
            Token::new(3, 4, 1, Direction::Down),
        ],
    )
}

fn level_33() -> Result<Puzzle, PuzzleError> {
    let board = Board::new(vec![
        vec![T2, T1, T3, E, E],
        vec![E, DOWN, E, E, LEFT],
        vec![],
        vec![E, RIGHT, E, UP, E],
    ]);
    Puzzle::new(
        board,
        &[
            Token::new(1, 3, 3, Direction::Up),
            Token::new(2, 1, 1, Direction::Down),
            Token::new(3, 1, 3, Direction::Right),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::State;
    use crate::rules::is_solved;

    #[test]
    fn test_all_builtins_load() {
        let expected_targets: [(&str, &[Color]); 3] =
            [("31", &[1, 2, 3]), ("32", &[1, 2]), ("33", &[1, 2, 3])];

        for (name, targets) in expected_targets {
            let puzzle = builtin(name).expect("listed puzzle exists").unwrap();
            assert_eq!(puzzle.initial.len(), 3);
            assert_eq!(puzzle.board.width(), 5);
            assert_eq!(puzzle.board.target_colors(), targets, "level {name}");
        }
        assert_eq!(names().len(), expected_targets.len());
        assert!(builtin("99").is_none());
    }

    #[test]
    fn test_level_32_navy_has_no_target() {
        let puzzle = builtin("32").unwrap().unwrap();
        assert!(!puzzle.board.has_target(3));

        // Red and blue on their targets, navy parked on a plain cell
        let state = State::new(&[
            Token::new(1, 2, 0, Direction::Down),
            Token::new(2, 0, 1, Direction::Down),
            Token::new(3, 4, 4, Direction::Down),
        ]);
        assert!(is_solved(&puzzle.board, &state));

        let red_off_target = State::new(&[
            Token::new(1, 3, 0, Direction::Down),
            Token::new(2, 0, 1, Direction::Down),
            Token::new(3, 4, 4, Direction::Down),
        ]);
        assert!(!is_solved(&puzzle.board, &red_off_target));
    }

    #[test]
    fn test_color_names() {
        assert_eq!(color_name(1), "Red");
        assert_eq!(color_name(3), "Navy");
        assert_eq!(color_name(9), "Unknown");
    }
}
