use serde::{Deserialize, Serialize};

use crate::{MatchId, PlayerId};
use super::board::Board;
use super::rejection::Rejection;
use super::settings::BoardSettings;
use super::types::{Cell, EndReason, MatchOutcome, Position, WinningLine};

/// The one record both paired sessions point at through its `MatchId`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedMatch {
    id: MatchId,
    board: Board,
    turn: Cell,
    player_first: PlayerId,
    player_second: PlayerId,
    last_move: Option<Position>,
    resigned: bool,
}

impl SharedMatch {
    /// `Cell::First` always opens, so both sides agree on who starts.
    pub fn new(
        id: MatchId,
        settings: &BoardSettings,
        player_first: PlayerId,
        player_second: PlayerId,
    ) -> Self {
        let board = Board::new(settings.width, settings.height, settings.win_length);

        Self {
            id,
            board,
            turn: Cell::First,
            player_first,
            player_second,
            last_move: None,
            resigned: false,
        }
    }

    pub fn id(&self) -> MatchId {
        self.id
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Cell {
        self.turn
    }

    pub fn outcome(&self) -> MatchOutcome {
        self.board.outcome()
    }

    pub fn last_move(&self) -> Option<Position> {
        self.last_move
    }

    pub fn player(&self, mark: Cell) -> Option<&PlayerId> {
        match mark {
            Cell::First => Some(&self.player_first),
            Cell::Second => Some(&self.player_second),
            Cell::Empty => None,
        }
    }

    pub fn players(&self) -> [&PlayerId; 2] {
        [&self.player_first, &self.player_second]
    }

    /// Places `mark` and hands the turn to the other mark. No turn check here.
    pub(crate) fn place(&mut self, position: Position, mark: Cell) -> Result<MatchOutcome, Rejection> {
        self.board.apply_move(position, mark)?;
        self.last_move = Some(position);
        if let Some(next) = mark.opponent() {
            self.turn = next;
        }
        Ok(self.board.outcome())
    }

    pub(crate) fn resign(&mut self, loser: Cell) -> Result<MatchOutcome, Rejection> {
        if self.outcome().is_decided() {
            return Err(Rejection::MatchAlreadyDecided);
        }
        let winner = loser.opponent().ok_or(Rejection::NotInMatch)?;
        self.board.concede(winner);
        self.resigned = true;
        Ok(self.board.outcome())
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        match self.outcome() {
            MatchOutcome::Undecided => None,
            MatchOutcome::Drawn => Some(EndReason::BoardFull),
            MatchOutcome::Won(_) if self.resigned => Some(EndReason::Resignation),
            MatchOutcome::Won(_) => Some(EndReason::Line),
        }
    }

    pub fn view(&self) -> BoardView {
        BoardView {
            match_id: self.id,
            rows: self.board.cells().to_vec(),
            width: self.board.width(),
            height: self.board.height(),
            win_length: self.board.win_length(),
            turn: self.turn,
            outcome: self.outcome(),
            last_move: self.last_move,
            winning_line: if self.resigned {
                None
            } else {
                self.board.winning_line()
            },
        }
    }
}

/// Copy of a match's board taken under its lock, handed to renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    pub match_id: MatchId,
    pub rows: Vec<Vec<Cell>>,
    pub width: usize,
    pub height: usize,
    pub win_length: usize,
    pub turn: Cell,
    pub outcome: MatchOutcome,
    pub last_move: Option<Position>,
    pub winning_line: Option<WinningLine>,
}
