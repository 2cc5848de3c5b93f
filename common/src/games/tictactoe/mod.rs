mod board;
mod game_state;
mod rejection;
mod session;
mod settings;
mod types;
mod win_detector;

pub use board::Board;
pub use game_state::{BoardView, SharedMatch};
pub use rejection::Rejection;
pub use session::{GameSession, SessionPhase};
pub use settings::BoardSettings;
pub use types::{Cell, EndReason, MatchOutcome, Position, WinningLine};
