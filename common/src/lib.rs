pub mod config;
pub mod games;
pub mod identifiers;
pub mod logger;
pub mod match_coordinator;
pub mod snapshot;

pub use identifiers::*;
pub use match_coordinator::{MatchCoordinator, MatchRequest, MoveApplied};
pub use snapshot::CoordinatorSnapshot;
