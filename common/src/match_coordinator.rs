use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::Validate;
use crate::games::tictactoe::{
    BoardSettings, BoardView, Cell, EndReason, GameSession, MatchOutcome, Position, Rejection,
    SessionPhase, SharedMatch,
};
use crate::games::{MatchEvent, MatchNotifier, SessionRng};
use crate::snapshot::CoordinatorSnapshot;
use crate::{MatchId, PlayerId, log};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchRequest {
    Paired(PlayerId),
    Waiting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveApplied {
    pub match_id: MatchId,
    pub position: Position,
    pub outcome: MatchOutcome,
    pub opponent: PlayerId,
}

type Outbox = Vec<(PlayerId, MatchEvent)>;

struct Pairing {
    match_id: MatchId,
    first: PlayerId,
    second: PlayerId,
    outbox: Outbox,
}

struct MatchEntry {
    game: Arc<Mutex<SharedMatch>>,
    players: [PlayerId; 2],
}

struct CoordinatorStore {
    sessions: HashMap<PlayerId, GameSession>,
    // Ordered so that the opponent picked for a requester is deterministic.
    waiting: BTreeSet<PlayerId>,
    matches: HashMap<MatchId, MatchEntry>,
    next_match_id: u64,
    rng: SessionRng,
}

impl CoordinatorStore {
    fn new(rng: SessionRng) -> Self {
        Self {
            sessions: HashMap::new(),
            waiting: BTreeSet::new(),
            matches: HashMap::new(),
            next_match_id: 1,
            rng,
        }
    }

    fn session_entry(&mut self, player_id: &PlayerId) -> &mut GameSession {
        self.sessions
            .entry(player_id.clone())
            .or_insert_with(|| GameSession::new(player_id.clone()))
    }

    fn match_handle(&self, match_id: MatchId) -> Option<Arc<Mutex<SharedMatch>>> {
        self.matches.get(&match_id).map(|entry| entry.game.clone())
    }

    fn allocate_match_id(&mut self) -> MatchId {
        let match_id = MatchId::new(self.next_match_id);
        self.next_match_id += 1;
        match_id
    }

    /// Drops a match record once neither of its players points at it any more.
    fn release_match_if_unused(&mut self, match_id: MatchId) {
        let unused = match self.matches.get(&match_id) {
            Some(entry) => entry.players.iter().all(|player_id| {
                self.sessions
                    .get(player_id)
                    .and_then(|session| session.match_id())
                    != Some(match_id)
            }),
            None => false,
        };
        if unused {
            self.matches.remove(&match_id);
        }
    }

    fn finish_sessions(&mut self, match_id: MatchId, players: &[PlayerId]) {
        for player_id in players {
            if let Some(session) = self.sessions.get_mut(player_id)
                && session.match_id() == Some(match_id)
                && session.phase() == SessionPhase::Active
            {
                session.finish();
            }
        }
    }
}

/// Owns every session, the waiting set and the match arena.
///
/// Lock order is store then match. Moves only hold the store lock long enough to
/// resolve the match handle, so matches progress independently of each other.
/// Notifications go out after all guards are dropped.
#[derive(Clone)]
pub struct MatchCoordinator<N: MatchNotifier> {
    store: Arc<Mutex<CoordinatorStore>>,
    settings: BoardSettings,
    notifier: N,
}

impl<N: MatchNotifier> std::fmt::Debug for MatchCoordinator<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchCoordinator")
            .field("settings", &self.settings)
            .finish()
    }
}

impl<N: MatchNotifier> MatchCoordinator<N> {
    /// Fails only on an unplayable board configuration.
    pub fn new(settings: BoardSettings, notifier: N) -> Result<Self, String> {
        Self::build(settings, notifier, CoordinatorStore::new(SessionRng::from_random()))
    }

    pub fn with_seed(settings: BoardSettings, notifier: N, seed: u64) -> Result<Self, String> {
        Self::build(settings, notifier, CoordinatorStore::new(SessionRng::new(seed)))
    }

    pub fn restore(
        settings: BoardSettings,
        notifier: N,
        snapshot: CoordinatorSnapshot,
    ) -> Result<Self, String> {
        let mut store = CoordinatorStore::new(SessionRng::from_random());

        let mut max_match_id = 0;
        let mut decided = HashMap::new();
        for game in snapshot.matches {
            let match_id = game.id();
            max_match_id = max_match_id.max(match_id.value());
            decided.insert(match_id, game.outcome().is_decided());
            let [first, second] = game.players();
            let players = [first.clone(), second.clone()];
            store.matches.insert(
                match_id,
                MatchEntry {
                    game: Arc::new(Mutex::new(game)),
                    players,
                },
            );
        }
        store.next_match_id = snapshot.next_match_id.max(max_match_id + 1);

        for mut session in snapshot.sessions {
            match session.match_id() {
                Some(match_id) => {
                    let is_decided = decided.get(&match_id).copied().ok_or_else(|| {
                        format!("Session {} references unknown {}", session.player_id(), match_id)
                    })?;
                    // Taken between a deciding move and the finishing of its sessions.
                    if is_decided && session.phase() == SessionPhase::Active {
                        session.finish();
                    }
                }
                None if session.phase() == SessionPhase::Active => {
                    return Err(format!("Active session {} has no match", session.player_id()));
                }
                None => {}
            }
            store.sessions.insert(session.player_id().clone(), session);
        }

        store.waiting = snapshot.waiting.into_iter().collect();
        for (player_id, session) in &store.sessions {
            let searching = session.phase() == SessionPhase::Searching;
            if searching != store.waiting.contains(player_id) {
                return Err(format!(
                    "Player {} is {:?} but {} the waiting set",
                    player_id,
                    session.phase(),
                    if searching { "missing from" } else { "listed in" }
                ));
            }
        }
        if let Some(stranger) = store.waiting.iter().find(|p| !store.sessions.contains_key(*p)) {
            return Err(format!("Waiting player {} has no session", stranger));
        }

        log!(
            "Restored {} sessions, {} matches, {} waiting",
            store.sessions.len(),
            store.matches.len(),
            store.waiting.len()
        );
        Self::build(settings, notifier, store)
    }

    fn build(settings: BoardSettings, notifier: N, store: CoordinatorStore) -> Result<Self, String> {
        settings
            .validate()
            .map_err(|e| format!("Invalid board configuration: {}", e))?;

        log!(
            "Coordinator ready: {}x{} board, {} in a row, mark seed {}",
            settings.width,
            settings.height,
            settings.win_length,
            store.rng.seed()
        );
        Ok(Self {
            store: Arc::new(Mutex::new(store)),
            settings,
            notifier,
        })
    }

    pub async fn get_or_create_session(&self, player_id: &PlayerId) -> GameSession {
        let mut store = self.store.lock().await;
        store.session_entry(player_id).clone()
    }

    pub async fn request_match(&self, player_id: &PlayerId) -> Result<MatchRequest, Rejection> {
        let pairing = {
            let mut guard = self.store.lock().await;
            let store = &mut *guard;

            if store.waiting.contains(player_id) {
                return Ok(MatchRequest::Waiting);
            }

            let (phase, current_match) = {
                let session = store.session_entry(player_id);
                (session.phase(), session.match_id())
            };
            if phase == SessionPhase::Active
                && let Some(game) = current_match.and_then(|id| store.match_handle(id))
                && !game.lock().await.outcome().is_decided()
            {
                return Err(Rejection::AlreadyInMatch);
            }

            let candidate = store
                .waiting
                .iter()
                .find(|candidate| *candidate != player_id)
                .cloned();
            match candidate {
                Some(opponent) => {
                    store.waiting.remove(&opponent);
                    Some(self.pair(store, player_id, &opponent))
                }
                None => {
                    store.session_entry(player_id).begin_search();
                    store.waiting.insert(player_id.clone());
                    None
                }
            }
        };

        let Some(pairing) = pairing else {
            log!("Player {} is waiting for an opponent", player_id);
            return Ok(MatchRequest::Waiting);
        };
        log!(
            "[match:{}] {} plays First, {} plays Second",
            pairing.match_id,
            pairing.first,
            pairing.second
        );
        let opponent = if pairing.first == *player_id {
            pairing.second
        } else {
            pairing.first
        };

        self.deliver(pairing.outbox).await;
        Ok(MatchRequest::Paired(opponent))
    }

    fn pair(&self, store: &mut CoordinatorStore, requester: &PlayerId, opponent: &PlayerId) -> Pairing {
        let match_id = store.allocate_match_id();
        let (first, second) = store.rng.shuffle_pair(requester.clone(), opponent.clone());

        let previous = [
            store.session_entry(&first).match_id(),
            store.session_entry(&second).match_id(),
        ];
        store
            .session_entry(&first)
            .start_new_match(Cell::First, second.clone(), match_id);
        store
            .session_entry(&second)
            .start_new_match(Cell::Second, first.clone(), match_id);

        let game = SharedMatch::new(match_id, &self.settings, first.clone(), second.clone());
        let view = game.view();
        store.matches.insert(
            match_id,
            MatchEntry {
                game: Arc::new(Mutex::new(game)),
                players: [first.clone(), second.clone()],
            },
        );
        for old_match in previous.into_iter().flatten() {
            store.release_match_if_unused(old_match);
        }

        let outbox = vec![
            (
                first.clone(),
                MatchEvent::OpponentFound {
                    opponent: second.clone(),
                    mark: Cell::First,
                },
            ),
            (first.clone(), MatchEvent::BoardChanged(view.clone())),
            (
                second.clone(),
                MatchEvent::OpponentFound {
                    opponent: first.clone(),
                    mark: Cell::Second,
                },
            ),
            (second.clone(), MatchEvent::BoardChanged(view)),
        ];
        Pairing {
            match_id,
            first,
            second,
            outbox,
        }
    }

    pub async fn submit_move(
        &self,
        player_id: &PlayerId,
        position: Position,
    ) -> Result<MoveApplied, Rejection> {
        let (session, match_id, handle) = {
            let store = self.store.lock().await;
            let session = store
                .sessions
                .get(player_id)
                .cloned()
                .ok_or(Rejection::NotInMatch)?;
            let match_id = session.current_match().ok_or(Rejection::NotInMatch)?;
            let handle = store.match_handle(match_id).ok_or(Rejection::NotInMatch)?;
            (session, match_id, handle)
        };
        let opponent = session.opponent().cloned().ok_or(Rejection::NotInMatch)?;

        let attempt = {
            let mut game = handle.lock().await;
            session
                .attempt_move(&mut game, position)
                .map(|outcome| (outcome, game.view(), ended_events(&game)))
        };
        let (outcome, view, ended) = match attempt {
            Ok(applied) => applied,
            Err(rejection) => {
                log!(
                    "[match:{}] Player {} failed to place mark at {}: {}",
                    match_id,
                    player_id,
                    position,
                    rejection.code()
                );
                return Err(rejection);
            }
        };

        log!("[match:{}] Player {} placed {:?} at {}", match_id, player_id, session.mark(), position);

        let mut outbox: Outbox = vec![
            (player_id.clone(), MatchEvent::BoardChanged(view.clone())),
            (opponent.clone(), MatchEvent::BoardChanged(view)),
        ];

        if outcome.is_decided() {
            let mut store = self.store.lock().await;
            store.finish_sessions(match_id, &[player_id.clone(), opponent.clone()]);
            drop(store);
            log!("[match:{}] Finished with {:?}", match_id, outcome);
            outbox.extend(ended);
        }

        self.deliver(outbox).await;
        Ok(MoveApplied {
            match_id,
            position,
            outcome,
            opponent,
        })
    }

    /// Concedes the current match to the opponent, whatever the board shows.
    pub async fn resign(&self, player_id: &PlayerId) -> Result<MatchOutcome, Rejection> {
        let (outcome, match_id, outbox) = {
            let mut guard = self.store.lock().await;
            let store = &mut *guard;
            let session = store
                .sessions
                .get(player_id)
                .cloned()
                .ok_or(Rejection::NotInMatch)?;
            if session.phase() != SessionPhase::Active {
                return Err(Rejection::NotInMatch);
            }
            let match_id = session.match_id().ok_or(Rejection::NotInMatch)?;
            let handle = store.match_handle(match_id).ok_or(Rejection::NotInMatch)?;

            let mut game = handle.lock().await;
            // A concurrent move may have decided the match in the meantime.
            let outcome = game
                .resign(session.mark())
                .map_err(|_| Rejection::NotInMatch)?;
            let players: Vec<PlayerId> = game.players().into_iter().cloned().collect();
            let mut outbox: Outbox = players
                .iter()
                .map(|p| (p.clone(), MatchEvent::BoardChanged(game.view())))
                .collect();
            outbox.extend(ended_events(&game));
            drop(game);

            store.finish_sessions(match_id, &players);
            (outcome, match_id, outbox)
        };

        log!("[match:{}] Player {} resigned", match_id, player_id);
        self.deliver(outbox).await;
        Ok(outcome)
    }

    pub async fn board_view(&self, player_id: &PlayerId) -> Option<BoardView> {
        let handle = {
            let store = self.store.lock().await;
            let match_id = store.sessions.get(player_id)?.current_match()?;
            store.match_handle(match_id)?
        };
        let game = handle.lock().await;
        Some(game.view())
    }

    pub async fn can_act(&self, player_id: &PlayerId) -> bool {
        let bound = {
            let store = self.store.lock().await;
            let session = store.sessions.get(player_id).cloned();
            let handle = session
                .as_ref()
                .and_then(|session| session.match_id())
                .and_then(|id| store.match_handle(id));
            session.zip(handle)
        };
        let Some((session, handle)) = bound else {
            return false;
        };
        let game = handle.lock().await;
        session.can_act(&game)
    }

    pub async fn waiting_players(&self) -> Vec<PlayerId> {
        let store = self.store.lock().await;
        store.waiting.iter().cloned().collect()
    }

    pub async fn snapshot(&self) -> CoordinatorSnapshot {
        let store = self.store.lock().await;

        let mut sessions: Vec<GameSession> = store.sessions.values().cloned().collect();
        sessions.sort_by(|a, b| a.player_id().cmp(b.player_id()));

        let mut matches = Vec::with_capacity(store.matches.len());
        for entry in store.matches.values() {
            matches.push(entry.game.lock().await.clone());
        }
        matches.sort_by_key(|game| game.id());

        CoordinatorSnapshot {
            next_match_id: store.next_match_id,
            sessions,
            waiting: store.waiting.iter().cloned().collect(),
            matches,
        }
    }

    async fn deliver(&self, outbox: Outbox) {
        for (recipient, event) in outbox {
            self.notifier.notify(recipient, event).await;
        }
    }
}

fn ended_events(game: &SharedMatch) -> Outbox {
    let Some(reason) = game.end_reason() else {
        return Vec::new();
    };
    let outcome = game.outcome();
    [Cell::First, Cell::Second]
        .into_iter()
        .filter_map(|mark| {
            game.player(mark).map(|player_id| {
                (
                    player_id.clone(),
                    MatchEvent::MatchEnded {
                        outcome,
                        reason,
                        mark,
                    },
                )
            })
        })
        .collect()
}
