use serde::{Deserialize, Serialize};

use crate::PlayerId;
use crate::games::tictactoe::{GameSession, SharedMatch};

/// Complete coordinator state: enough to resume every in-flight match and pending
/// search exactly as left. The encoding is up to the persistence side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinatorSnapshot {
    pub next_match_id: u64,
    pub sessions: Vec<GameSession>,
    pub waiting: Vec<PlayerId>,
    pub matches: Vec<SharedMatch>,
}

impl CoordinatorSnapshot {
    pub fn empty() -> Self {
        Self {
            next_match_id: 1,
            sessions: Vec::new(),
            waiting: Vec::new(),
            matches: Vec::new(),
        }
    }
}
