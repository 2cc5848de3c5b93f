/// Why an inbound intent was refused. State is left untouched in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NotYourTurn,
    OutOfBounds,
    CellOccupied,
    MatchAlreadyDecided,
    NotInMatch,
    AlreadyInMatch,
}

impl Rejection {
    /// Stable code the transport keys its user-facing text on.
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::NotYourTurn => "not_your_turn",
            Rejection::OutOfBounds => "out_of_bounds",
            Rejection::CellOccupied => "cell_occupied",
            Rejection::MatchAlreadyDecided => "match_already_decided",
            Rejection::NotInMatch => "not_in_match",
            Rejection::AlreadyInMatch => "already_in_match",
        }
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::NotYourTurn => write!(f, "Not your turn"),
            Rejection::OutOfBounds => write!(f, "Position out of bounds"),
            Rejection::CellOccupied => write!(f, "Cell is already marked"),
            Rejection::MatchAlreadyDecided => write!(f, "Game is already over"),
            Rejection::NotInMatch => write!(f, "Not in a match"),
            Rejection::AlreadyInMatch => write!(f, "Already playing a match"),
        }
    }
}

impl std::error::Error for Rejection {}
