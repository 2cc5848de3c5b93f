use std::future::Future;

use crate::PlayerId;
use super::tictactoe::{BoardView, Cell, EndReason, MatchOutcome};

/// What the far side of a match needs to learn after a state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchEvent {
    OpponentFound {
        opponent: PlayerId,
        mark: Cell,
    },
    BoardChanged(BoardView),
    MatchEnded {
        outcome: MatchOutcome,
        reason: EndReason,
        /// The recipient's own mark, so the transport can word win/loss.
        mark: Cell,
    },
}

/// Outbound seam towards the transport. Invoked only after every coordinator lock
/// has been released; delivery failures stay on the transport's side.
pub trait MatchNotifier: Send + Sync + Clone + 'static {
    fn notify(&self, recipient: PlayerId, event: MatchEvent) -> impl Future<Output = ()> + Send;
}
