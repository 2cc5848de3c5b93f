use std::sync::Arc;

use duel_common::PlayerId;
use duel_common::games::tictactoe::{BoardView, Cell, EndReason, MatchOutcome, Position};
use duel_common::games::{MatchEvent, MatchNotifier};

use crate::server_config::RenderSymbols;

/// Prints every event addressed to a participant on stdout.
#[derive(Debug, Clone)]
pub struct ConsoleNotifier {
    symbols: Arc<RenderSymbols>,
}

impl ConsoleNotifier {
    pub fn new(symbols: RenderSymbols) -> Self {
        Self {
            symbols: Arc::new(symbols),
        }
    }
}

impl MatchNotifier for ConsoleNotifier {
    async fn notify(&self, recipient: PlayerId, event: MatchEvent) {
        println!("[to {}] {}", recipient, describe_event(&event, &self.symbols));
    }
}

pub fn mark_symbol(mark: Cell, symbols: &RenderSymbols) -> &str {
    match mark {
        Cell::First => &symbols.first,
        Cell::Second => &symbols.second,
        Cell::Empty => &symbols.empty,
    }
}

pub fn render_board(view: &BoardView, symbols: &RenderSymbols) -> String {
    let mut result = String::new();
    for (row, cells) in view.rows.iter().enumerate() {
        for (col, &cell) in cells.iter().enumerate() {
            let is_last = view.last_move == Some(Position::new(row, col));
            let symbol = match (cell, is_last) {
                (Cell::First, true) => symbols.first_last.as_str(),
                (Cell::Second, true) => symbols.second_last.as_str(),
                (cell, _) => mark_symbol(cell, symbols),
            };
            result.push_str(symbol);
        }
        result.push('\n');
    }
    result
}

pub fn describe_event(event: &MatchEvent, symbols: &RenderSymbols) -> String {
    match event {
        MatchEvent::OpponentFound { opponent, mark } => format!(
            "Opponent found: {}. You play {}{}",
            opponent,
            mark_symbol(*mark, symbols),
            if *mark == Cell::First { ", your move first." } else { "." }
        ),
        MatchEvent::BoardChanged(view) => {
            let status = match view.outcome {
                MatchOutcome::Undecided => format!("Turn: {}", mark_symbol(view.turn, symbols)),
                _ => "Game over".to_string(),
            };
            format!("\n{}{}", render_board(view, symbols), status)
        }
        MatchEvent::MatchEnded {
            outcome,
            reason,
            mark,
        } => describe_result(*outcome, *reason, *mark).to_string(),
    }
}

fn describe_result(outcome: MatchOutcome, reason: EndReason, mark: Cell) -> &'static str {
    match (outcome, reason) {
        (MatchOutcome::Won(winner), EndReason::Resignation) if winner == mark => {
            "Your opponent resigned. You won!"
        }
        (MatchOutcome::Won(_), EndReason::Resignation) => "You resigned.",
        (MatchOutcome::Won(winner), _) if winner == mark => "You won!",
        (MatchOutcome::Won(_), _) => "You lost!",
        (MatchOutcome::Drawn, _) => "Draw!",
        (MatchOutcome::Undecided, _) => "The game goes on.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duel_common::MatchId;

    fn view(rows: Vec<Vec<Cell>>, last_move: Option<Position>) -> BoardView {
        BoardView {
            match_id: MatchId::new(1),
            width: rows[0].len(),
            height: rows.len(),
            rows,
            win_length: 2,
            turn: Cell::Second,
            outcome: MatchOutcome::Undecided,
            last_move,
            winning_line: None,
        }
    }

    fn plain_symbols() -> RenderSymbols {
        RenderSymbols {
            first: "X".to_string(),
            second: "O".to_string(),
            empty: ".".to_string(),
            first_last: "x".to_string(),
            second_last: "o".to_string(),
        }
    }

    #[test]
    fn test_render_highlights_last_move() {
        let rows = vec![
            vec![Cell::First, Cell::Empty],
            vec![Cell::Second, Cell::First],
        ];
        let rendered = render_board(&view(rows, Some(Position::new(1, 1))), &plain_symbols());
        assert_eq!(rendered, "X.\nOx\n");
    }

    #[test]
    fn test_board_changed_names_whose_turn() {
        let event = MatchEvent::BoardChanged(view(vec![vec![Cell::Empty; 2]; 2], None));
        let text = describe_event(&event, &plain_symbols());
        assert!(text.ends_with("Turn: O"));
    }

    #[test]
    fn test_result_is_worded_per_recipient() {
        let won_by_first = MatchOutcome::Won(Cell::First);
        assert_eq!(describe_result(won_by_first, EndReason::Line, Cell::First), "You won!");
        assert_eq!(describe_result(won_by_first, EndReason::Line, Cell::Second), "You lost!");
        assert_eq!(
            describe_result(won_by_first, EndReason::Resignation, Cell::Second),
            "You resigned."
        );
        assert_eq!(
            describe_result(MatchOutcome::Drawn, EndReason::BoardFull, Cell::Second),
            "Draw!"
        );
    }
}
