use serde::{Deserialize, Serialize};

use super::rejection::Rejection;
use super::types::{Cell, MatchOutcome, Position, WinningLine};
use super::win_detector::{check_win_with_line, has_empty_cell};

/// Grid state of one match plus its outcome.
///
/// Cells only ever go from `Empty` to a mark; the only way back is `reset`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: Vec<Vec<Cell>>,
    width: usize,
    height: usize,
    win_length: usize,
    outcome: MatchOutcome,
}

impl Board {
    /// A board is playable only if a full line fits both across and down.
    pub fn validate(width: usize, height: usize, win_length: usize) -> bool {
        width >= win_length && height >= win_length
    }

    pub fn new(width: usize, height: usize, win_length: usize) -> Self {
        Self {
            cells: vec![vec![Cell::Empty; width]; height],
            width,
            height,
            win_length,
            outcome: MatchOutcome::Undecided,
        }
    }

    pub fn reset(&mut self, width: usize, height: usize) {
        self.cells = vec![vec![Cell::Empty; width]; height];
        self.width = width;
        self.height = height;
        self.outcome = MatchOutcome::Undecided;
    }

    pub fn apply_move(&mut self, position: Position, mark: Cell) -> Result<(), Rejection> {
        if self.outcome.is_decided() {
            return Err(Rejection::MatchAlreadyDecided);
        }

        if position.row >= self.height || position.col >= self.width {
            return Err(Rejection::OutOfBounds);
        }

        if !self.cells[position.row][position.col].is_empty() {
            return Err(Rejection::CellOccupied);
        }

        self.cells[position.row][position.col] = mark;
        self.outcome = self.evaluate_outcome();
        Ok(())
    }

    pub fn evaluate_outcome(&self) -> MatchOutcome {
        if let Some(line) = check_win_with_line(&self.cells, self.win_length) {
            return MatchOutcome::Won(line.mark);
        }

        if has_empty_cell(&self.cells) {
            MatchOutcome::Undecided
        } else {
            MatchOutcome::Drawn
        }
    }

    /// Ends the match in favour of `winner` whatever the grid shows.
    pub fn concede(&mut self, winner: Cell) {
        self.outcome = MatchOutcome::Won(winner);
    }

    pub fn outcome(&self) -> MatchOutcome {
        self.outcome
    }

    pub fn winning_line(&self) -> Option<WinningLine> {
        check_win_with_line(&self.cells, self.win_length)
    }

    pub fn cell(&self, position: Position) -> Option<Cell> {
        self.cells
            .get(position.row)
            .and_then(|row| row.get(position.col))
            .copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.iter().map(|row| row.as_slice())
    }

    pub fn cells(&self) -> &[Vec<Cell>] {
        &self.cells
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn win_length(&self) -> usize {
        self.win_length
    }

    /// Builds a board from rows of `X`, `O` and `.`; the outcome is evaluated from the grid.
    #[cfg(test)]
    pub fn from_rows(rows: &[&str], win_length: usize) -> Self {
        let cells: Vec<Vec<Cell>> = rows
            .iter()
            .map(|row| {
                row.chars()
                    .map(|ch| match ch {
                        'X' => Cell::First,
                        'O' => Cell::Second,
                        _ => Cell::Empty,
                    })
                    .collect()
            })
            .collect();
        let mut board = Self {
            width: cells.first().map_or(0, |row| row.len()),
            height: cells.len(),
            cells,
            win_length,
            outcome: MatchOutcome::Undecided,
        };
        board.outcome = board.evaluate_outcome();
        board
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_line_to_fit() {
        assert!(Board::validate(3, 3, 3));
        assert!(Board::validate(8, 8, 5));
        assert!(Board::validate(5, 3, 3));
        assert!(!Board::validate(5, 2, 3));
        assert!(!Board::validate(2, 5, 3));
    }

    #[test]
    fn test_new_board_is_empty_and_undecided() {
        let board = Board::new(4, 3, 3);
        assert_eq!(board.width(), 4);
        assert_eq!(board.height(), 3);
        assert_eq!(board.rows().count(), 3);
        assert!(board.rows().all(|row| row.len() == 4 && row.iter().all(|c| c.is_empty())));
        assert_eq!(board.outcome(), MatchOutcome::Undecided);
    }

    #[test]
    fn test_main_diagonal_win() {
        let mut board = Board::new(3, 3, 3);
        board.apply_move(Position::new(0, 0), Cell::First).unwrap();
        board.apply_move(Position::new(0, 1), Cell::Second).unwrap();
        board.apply_move(Position::new(1, 1), Cell::First).unwrap();
        assert_eq!(board.outcome(), MatchOutcome::Undecided);

        board.apply_move(Position::new(2, 2), Cell::First).unwrap();
        assert_eq!(board.outcome(), MatchOutcome::Won(Cell::First));

        let line = board.winning_line().unwrap();
        assert_eq!(line.start, Position::new(0, 0));
        assert_eq!(line.end, Position::new(2, 2));
    }

    #[test]
    fn test_full_board_without_line_is_drawn() {
        let board = Board::from_rows(&["XOX", "XOO", "OXX"], 3);
        assert_eq!(board.outcome(), MatchOutcome::Drawn);
        assert!(board.winning_line().is_none());
    }

    #[test]
    fn test_last_cell_can_still_win_instead_of_draw() {
        let mut board = Board::from_rows(&["XOX", "OXO", "OX."], 3);
        assert_eq!(board.outcome(), MatchOutcome::Undecided);
        board.apply_move(Position::new(2, 2), Cell::First).unwrap();
        assert_eq!(board.outcome(), MatchOutcome::Won(Cell::First));
    }

    #[test]
    fn test_occupied_cell_is_rejected_without_mutation() {
        let mut board = Board::new(3, 3, 3);
        board.apply_move(Position::new(1, 1), Cell::First).unwrap();
        let before = board.clone();

        assert_eq!(
            board.apply_move(Position::new(1, 1), Cell::Second),
            Err(Rejection::CellOccupied)
        );
        assert_eq!(board, before);
    }

    #[test]
    fn test_out_of_bounds_is_rejected() {
        let mut board = Board::new(4, 3, 3);
        assert_eq!(
            board.apply_move(Position::new(3, 0), Cell::First),
            Err(Rejection::OutOfBounds)
        );
        assert_eq!(
            board.apply_move(Position::new(0, 4), Cell::First),
            Err(Rejection::OutOfBounds)
        );
        assert!(board.apply_move(Position::new(2, 3), Cell::First).is_ok());
    }

    #[test]
    fn test_decided_board_rejects_moves() {
        let mut board = Board::from_rows(&["XXX", "OO.", "..."], 3);
        let before = board.clone();
        assert_eq!(
            board.apply_move(Position::new(1, 2), Cell::Second),
            Err(Rejection::MatchAlreadyDecided)
        );
        assert_eq!(board, before);
    }

    #[test]
    fn test_win_length_one_first_move_wins() {
        let mut board = Board::new(2, 2, 1);
        board.apply_move(Position::new(1, 0), Cell::Second).unwrap();
        assert_eq!(board.outcome(), MatchOutcome::Won(Cell::Second));
    }

    #[test]
    fn test_win_length_equal_to_width_needs_full_rank() {
        let board = Board::from_rows(&["XXX", "...", "...", "...", "..."], 3);
        assert_eq!(board.outcome(), MatchOutcome::Won(Cell::First));

        let board = Board::from_rows(&["O..", "O..", "O..", "...", "..."], 3);
        assert_eq!(board.outcome(), MatchOutcome::Won(Cell::Second));

        let board = Board::from_rows(&["XX.", "...", "...", "...", "..."], 3);
        assert_eq!(board.outcome(), MatchOutcome::Undecided);
    }

    #[test]
    fn test_anti_diagonal_reported_from_lower_left() {
        let board = Board::from_rows(&["..O", ".O.", "O.."], 3);
        assert_eq!(board.outcome(), MatchOutcome::Won(Cell::Second));
        let line = board.winning_line().unwrap();
        assert_eq!(line.start, Position::new(2, 0));
        assert_eq!(line.end, Position::new(0, 2));
    }

    #[test]
    fn test_row_major_order_picks_first_line() {
        let board = Board::from_rows(&["X...", "X...", "XXXX", "X..."], 4);
        let line = board.winning_line().unwrap();
        assert_eq!(line.start, Position::new(0, 0));
        assert_eq!(line.end, Position::new(3, 0));

        let board = Board::from_rows(&["....", "XXX.", ".X..", ".X.."], 3);
        let line = board.winning_line().unwrap();
        assert_eq!(line.start, Position::new(1, 0));
        assert_eq!(line.end, Position::new(1, 2));
    }

    #[test]
    fn test_line_does_not_wrap_around_edges() {
        let board = Board::from_rows(&["..XX", "X...", "...."], 3);
        assert_eq!(board.outcome(), MatchOutcome::Undecided);
    }

    #[test]
    fn test_concede_overrides_grid() {
        let mut board = Board::new(3, 3, 3);
        board.concede(Cell::Second);
        assert_eq!(board.outcome(), MatchOutcome::Won(Cell::Second));
        assert_eq!(
            board.apply_move(Position::new(0, 0), Cell::First),
            Err(Rejection::MatchAlreadyDecided)
        );
    }

    #[test]
    fn test_reset_clears_cells_and_outcome() {
        let mut board = Board::from_rows(&["XXX", "OO.", "..."], 3);
        board.reset(4, 4);
        assert_eq!(board.width(), 4);
        assert_eq!(board.height(), 4);
        assert_eq!(board.outcome(), MatchOutcome::Undecided);
        assert_eq!(board.cell(Position::new(0, 0)), Some(Cell::Empty));
        assert_eq!(board.cell(Position::new(4, 0)), None);
    }
}
