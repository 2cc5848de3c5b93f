use serde::{Deserialize, Serialize};

use crate::{MatchId, PlayerId};
use super::game_state::SharedMatch;
use super::rejection::Rejection;
use super::types::{Cell, MatchOutcome, Position};

/// `Idle -> Searching -> Active -> Finished -> (Searching | Idle)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Idle,
    Searching,
    Active,
    Finished,
}

/// One participant's persistent record across searching and playing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    player_id: PlayerId,
    mark: Cell,
    match_id: Option<MatchId>,
    opponent: Option<PlayerId>,
    phase: SessionPhase,
}

impl GameSession {
    pub fn new(player_id: PlayerId) -> Self {
        Self {
            player_id,
            mark: Cell::First,
            match_id: None,
            opponent: None,
            phase: SessionPhase::Idle,
        }
    }

    pub fn player_id(&self) -> &PlayerId {
        &self.player_id
    }

    pub fn mark(&self) -> Cell {
        self.mark
    }

    pub fn match_id(&self) -> Option<MatchId> {
        self.match_id
    }

    pub fn opponent(&self) -> Option<&PlayerId> {
        self.opponent.as_ref()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// The match this session plays or has just finished. A session searching for
    /// a new opponent keeps its old `match_id` but no longer has a current match.
    pub fn current_match(&self) -> Option<MatchId> {
        match self.phase {
            SessionPhase::Active | SessionPhase::Finished => self.match_id,
            SessionPhase::Idle | SessionPhase::Searching => None,
        }
    }

    fn is_bound_to(&self, game: &SharedMatch) -> bool {
        self.phase == SessionPhase::Active && self.match_id == Some(game.id())
    }

    pub fn can_act(&self, game: &SharedMatch) -> bool {
        self.is_bound_to(game)
            && game.turn() == self.mark
            && game.outcome() == MatchOutcome::Undecided
    }

    /// Applies a move on behalf of this participant. The turn passes to the opponent
    /// only when the move lands.
    pub fn attempt_move(
        &self,
        game: &mut SharedMatch,
        position: Position,
    ) -> Result<MatchOutcome, Rejection> {
        if self.match_id != Some(game.id()) {
            return Err(Rejection::NotInMatch);
        }
        if game.outcome().is_decided() || self.phase == SessionPhase::Finished {
            return Err(Rejection::MatchAlreadyDecided);
        }
        if self.phase != SessionPhase::Active {
            return Err(Rejection::NotInMatch);
        }
        if game.turn() != self.mark {
            return Err(Rejection::NotYourTurn);
        }
        game.place(position, self.mark)
    }

    pub fn begin_search(&mut self) {
        self.phase = SessionPhase::Searching;
    }

    pub fn start_new_match(&mut self, mark: Cell, opponent: PlayerId, match_id: MatchId) {
        self.mark = mark;
        self.opponent = Some(opponent);
        self.match_id = Some(match_id);
        self.phase = SessionPhase::Active;
    }

    pub fn finish(&mut self) {
        self.phase = SessionPhase::Finished;
    }
}
