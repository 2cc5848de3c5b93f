use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    First,
    Second,
}

impl Cell {
    pub fn opponent(&self) -> Option<Cell> {
        match self {
            Cell::First => Some(Cell::Second),
            Cell::Second => Some(Cell::First),
            Cell::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Cell::Empty
    }
}

/// Once a match leaves `Undecided` it never returns to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    Undecided,
    Won(Cell),
    Drawn,
}

impl MatchOutcome {
    pub fn is_decided(&self) -> bool {
        *self != MatchOutcome::Undecided
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    Line,
    BoardFull,
    Resignation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinningLine {
    pub mark: Cell,
    pub start: Position,
    pub end: Position,
}

impl WinningLine {
    pub fn new(mark: Cell, start: Position, end: Position) -> Self {
        Self { mark, start, end }
    }
}
