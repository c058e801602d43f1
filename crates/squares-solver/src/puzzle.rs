//! Puzzle representation types.
//!
//! Boards, tokens and states are plain immutable values. Puzzle files are JSON
//! documents that deserialize into [`PuzzleConfig`] and are validated on the
//! way into a [`Puzzle`].

use std::collections::BTreeMap;
use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::rules::within_reach;

/// Token color. `0` is reserved for "no color" in puzzle files.
pub type Color = u8;

/// Number of tokens a [`State`] stores without touching the heap
pub const INLINE_TOKENS: usize = 4;

/// Hard upper bound on tokens per puzzle
pub const MAX_TOKENS: usize = 16;

/// Facing of a token. Puzzle files may use either the name or the
/// arrow-ish symbol (`^`, `.`, `<`, `>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[serde(alias = "^")]
    Up,
    #[serde(alias = ".", alias = "v")]
    Down,
    #[serde(alias = "<")]
    Left,
    #[serde(alias = ">")]
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit step for one push in this direction
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Direction::Up => "^",
            Direction::Down => ".",
            Direction::Left => "<",
            Direction::Right => ">",
        }
    }

    pub fn from_name(name: &str) -> Option<Direction> {
        match name {
            "^" | "up" => Some(Direction::Up),
            "." | "v" | "down" => Some(Direction::Down),
            "<" | "left" => Some(Direction::Left),
            ">" | "right" => Some(Direction::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawCell", into = "RawCell")]
pub enum Cell {
    Empty,
    /// Goal cell for tokens of the given color
    Target(Color),
    /// Turns any token that lands here to face the given direction
    Redirect(Direction),
}

/// On-disk cell notation: `0` is empty, a positive number is a target,
/// a direction symbol or name is a redirect.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawCell {
    Color(u8),
    Symbol(String),
}

impl TryFrom<RawCell> for Cell {
    type Error = PuzzleError;

    fn try_from(raw: RawCell) -> Result<Self, Self::Error> {
        match raw {
            RawCell::Color(0) => Ok(Cell::Empty),
            RawCell::Color(color) => Ok(Cell::Target(color)),
            RawCell::Symbol(symbol) => Direction::from_name(&symbol)
                .map(Cell::Redirect)
                .ok_or(PuzzleError::InvalidCell(symbol)),
        }
    }
}

impl From<Cell> for RawCell {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Empty => RawCell::Color(0),
            Cell::Target(color) => RawCell::Color(color),
            Cell::Redirect(direction) => RawCell::Symbol(direction.symbol().to_string()),
        }
    }
}

/// Static playing field. Rows may have different lengths (or be empty); the
/// first row's length is the canonical width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: Vec<Vec<Cell>>,
    target_colors: Vec<Color>,
}

impl Board {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        let mut target_colors: Vec<Color> = rows
            .iter()
            .flatten()
            .filter_map(|cell| match cell {
                Cell::Target(color) => Some(*color),
                _ => None,
            })
            .collect();
        target_colors.sort_unstable();
        target_colors.dedup();

        Self {
            rows,
            target_colors,
        }
    }

    /// Canonical width (length of the first row)
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Get the cell at a position (bounds-checked per row)
    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        if y < 0 || x < 0 {
            return None;
        }
        self.rows
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .copied()
    }

    /// Whether any cell on the board is a target of this color
    pub fn has_target(&self, color: Color) -> bool {
        self.target_colors.binary_search(&color).is_ok()
    }

    /// Colors that have at least one target cell, ascending
    pub fn target_colors(&self) -> &[Color] {
        &self.target_colors
    }
}

/// A movable colored square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub color: Color,
    pub x: i32,
    pub y: i32,
    pub facing: Direction,
}

impl Token {
    pub fn new(color: Color, x: i32, y: i32, facing: Direction) -> Self {
        Self {
            color,
            x,
            y,
            facing,
        }
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn translated(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    pub fn with_facing(self, facing: Direction) -> Self {
        Self { facing, ..self }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@({},{}){}", self.color, self.x, self.y, self.facing)
    }
}

/// Snapshot of every token. Token order is fixed by the puzzle definition and
/// preserved by every move; states are never mutated once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct State(SmallVec<[Token; INLINE_TOKENS]>);

impl State {
    pub fn new(tokens: &[Token]) -> Self {
        Self(SmallVec::from_slice(tokens))
    }

    pub fn tokens(&self) -> &[Token] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.0.iter()
    }
}

impl FromIterator<Token> for State {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a State {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, token) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{token}")?;
        }
        f.write_str("]")
    }
}

/// Errors raised while building a puzzle
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("Board has no rows")]
    EmptyBoard,
    #[error("Puzzle has no tokens")]
    NoTokens,
    #[error("Too many tokens, expected at most {max} but got {0}", max = MAX_TOKENS)]
    TooManyTokens(usize),
    #[error("Token {index} has color 0, colors must be positive")]
    ZeroColor { index: usize },
    #[error("Token {index} at ({x},{y}) is too far outside the board")]
    TokenOutOfReach { index: usize, x: i32, y: i32 },
    #[error("Tokens {first} and {second} both start at ({x},{y})")]
    OverlappingTokens {
        first: usize,
        second: usize,
        x: i32,
        y: i32,
    },
    #[error("Invalid cell {0:?}, expected 0, a color or one of ^ . < >")]
    InvalidCell(String),
}

/// Errors raised while loading a puzzle file
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Malformed puzzle JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Puzzle(#[from] PuzzleError),
}

/// Puzzle file layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleConfig {
    #[serde(default)]
    pub name: String,
    pub board: Vec<Vec<Cell>>,
    pub tokens: Vec<Token>,
    /// Optional display names per color
    #[serde(default)]
    pub colors: BTreeMap<Color, String>,
}

/// A validated puzzle: the board plus the initial state
#[derive(Debug, Clone)]
pub struct Puzzle {
    pub name: String,
    pub board: Board,
    pub initial: State,
    pub color_names: BTreeMap<Color, String>,
}

impl Puzzle {
    pub fn new(board: Board, tokens: &[Token]) -> Result<Self, PuzzleError> {
        if board.height() == 0 {
            return Err(PuzzleError::EmptyBoard);
        }
        if tokens.is_empty() {
            return Err(PuzzleError::NoTokens);
        }
        if tokens.len() > MAX_TOKENS {
            return Err(PuzzleError::TooManyTokens(tokens.len()));
        }

        for (index, token) in tokens.iter().enumerate() {
            if token.color == 0 {
                return Err(PuzzleError::ZeroColor { index });
            }
            if let Some(first) = tokens[..index]
                .iter()
                .position(|other| other.position() == token.position())
            {
                return Err(PuzzleError::OverlappingTokens {
                    first,
                    second: index,
                    x: token.x,
                    y: token.y,
                });
            }
        }

        let border = tokens.len() as i32;
        if let Some((index, token)) = tokens
            .iter()
            .enumerate()
            .find(|(_, token)| !within_reach(&board, token, border))
        {
            return Err(PuzzleError::TokenOutOfReach {
                index,
                x: token.x,
                y: token.y,
            });
        }

        for &color in board.target_colors() {
            if !tokens.iter().any(|t| t.color == color) {
                warn!("Board has targets for color {color} but no token of that color");
            }
        }

        Ok(Self {
            name: String::new(),
            board,
            initial: State::new(tokens),
            color_names: BTreeMap::new(),
        })
    }

    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let config: PuzzleConfig = serde_json::from_str(json)?;
        Ok(Puzzle::try_from(config)?)
    }

    /// Name for logs and output; unnamed puzzles are called "untitled"
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "untitled"
        } else {
            &self.name
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Display name for a color, falling back to the default palette
    pub fn color_name(&self, color: Color) -> &str {
        self.color_names
            .get(&color)
            .map(String::as_str)
            .unwrap_or_else(|| crate::catalog::color_name(color))
    }
}

impl TryFrom<PuzzleConfig> for Puzzle {
    type Error = PuzzleError;

    fn try_from(config: PuzzleConfig) -> Result<Self, Self::Error> {
        let mut puzzle = Puzzle::new(Board::new(config.board), &config.tokens)?;
        puzzle.name = config.name;
        puzzle.color_names = config.colors;
        Ok(puzzle)
    }
}
