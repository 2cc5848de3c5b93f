use super::types::{Cell, Position, WinningLine};

// Probe order per cell: horizontal, vertical, down-right diagonal, up-right diagonal.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (-1, 1)];

/// Scans occupied cells in row-major order and reports the first line found.
pub fn check_win_with_line(cells: &[Vec<Cell>], win_length: usize) -> Option<WinningLine> {
    for (row, cells_row) in cells.iter().enumerate() {
        for (col, &mark) in cells_row.iter().enumerate() {
            if mark.is_empty() {
                continue;
            }

            for (d_row, d_col) in DIRECTIONS {
                if let Some(end) = line_end(cells, row, col, d_row, d_col, mark, win_length) {
                    return Some(WinningLine::new(mark, Position::new(row, col), end));
                }
            }
        }
    }

    None
}

fn line_end(
    cells: &[Vec<Cell>],
    row: usize,
    col: usize,
    d_row: isize,
    d_col: isize,
    mark: Cell,
    win_length: usize,
) -> Option<Position> {
    let mut end = Position::new(row, col);
    for k in 1..win_length {
        let r = offset(row, d_row, k)?;
        let c = offset(col, d_col, k)?;
        if cells.get(r).and_then(|line| line.get(c)) != Some(&mark) {
            return None;
        }
        end = Position::new(r, c);
    }
    Some(end)
}

fn offset(origin: usize, delta: isize, steps: usize) -> Option<usize> {
    let steps = isize::try_from(steps).ok()?;
    origin.checked_add_signed(delta.checked_mul(steps)?)
}

pub fn has_empty_cell(cells: &[Vec<Cell>]) -> bool {
    cells.iter().any(|row| row.iter().any(|cell| cell.is_empty()))
}
