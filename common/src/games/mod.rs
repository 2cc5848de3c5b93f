mod notifier;
mod session_rng;

pub mod tictactoe;

pub use notifier::{MatchEvent, MatchNotifier};
pub use session_rng::SessionRng;
