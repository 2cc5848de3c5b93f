use duel_common::games::MatchNotifier;
use duel_common::games::tictactoe::{Position, Rejection, SessionPhase};
use duel_common::{MatchCoordinator, MatchRequest, PlayerId, log};

use crate::console_notifier::render_board;
use crate::server_config::RenderSymbols;

pub const HELP_TEXT: &str = "Commands:
  find <player>             look for an opponent
  move <player> <row> <col> place a mark (rows and columns start at 0)
  resign <player>           give up the current match
  show <player>             print the player's board
  help                      show this text";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Find(PlayerId),
    Move { player_id: PlayerId, position: Position },
    Resign(PlayerId),
    Show(PlayerId),
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReply {
    pub text: String,
    /// Whether coordinator state may have changed and needs persisting.
    pub mutated: bool,
}

impl CommandReply {
    fn read_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mutated: false,
        }
    }

    fn mutating(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mutated: true,
        }
    }
}

pub fn parse_command(line: &str) -> Result<ConsoleCommand, String> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Err("Empty command".to_string());
    };
    let mut next_player = || {
        words
            .next()
            .map(PlayerId::from)
            .ok_or_else(|| format!("'{}' needs a player name", command))
    };

    let parsed = match command.to_lowercase().as_str() {
        "find" => ConsoleCommand::Find(next_player()?),
        "resign" => ConsoleCommand::Resign(next_player()?),
        "show" => ConsoleCommand::Show(next_player()?),
        "help" => ConsoleCommand::Help,
        "move" => {
            let player_id = next_player()?;
            let row = parse_coordinate(words.next(), "row")?;
            let col = parse_coordinate(words.next(), "column")?;
            ConsoleCommand::Move {
                player_id,
                position: Position::new(row, col),
            }
        }
        other => return Err(format!("Unknown command '{}', type 'help'", other)),
    };

    if let Some(extra) = words.next() {
        return Err(format!("Unexpected argument '{}'", extra));
    }
    Ok(parsed)
}

fn parse_coordinate(word: Option<&str>, name: &str) -> Result<usize, String> {
    let word = word.ok_or_else(|| format!("Missing {}", name))?;
    word.parse::<usize>()
        .map_err(|_| format!("Invalid {} '{}'", name, word))
}

pub fn rejection_message(rejection: Rejection) -> &'static str {
    match rejection {
        Rejection::NotYourTurn => "Wait for your opponent to move.",
        Rejection::OutOfBounds => "That cell is outside the board.",
        Rejection::CellOccupied => "That cell is already taken, pick another one.",
        Rejection::MatchAlreadyDecided => "This game is over. Use 'find' to start a new one.",
        Rejection::NotInMatch => "You are not playing right now. Use 'find' to look for an opponent.",
        Rejection::AlreadyInMatch => "Finish or resign your current game first.",
    }
}

pub async fn handle_command<N: MatchNotifier>(
    coordinator: &MatchCoordinator<N>,
    command: ConsoleCommand,
    symbols: &RenderSymbols,
) -> CommandReply {
    match command {
        ConsoleCommand::Help => CommandReply::read_only(HELP_TEXT),
        ConsoleCommand::Find(player_id) => match coordinator.request_match(&player_id).await {
            Ok(MatchRequest::Waiting) => {
                CommandReply::mutating(format!("{} is waiting for an opponent...", player_id))
            }
            Ok(MatchRequest::Paired(opponent)) => {
                CommandReply::mutating(format!("{} is now playing against {}", player_id, opponent))
            }
            Err(rejection) => rejected(&player_id, rejection),
        },
        ConsoleCommand::Move {
            player_id,
            position,
        } => match coordinator.submit_move(&player_id, position).await {
            Ok(applied) if applied.outcome.is_decided() => CommandReply::mutating(format!(
                "{} placed a mark at {}. The game is over.",
                player_id, applied.position
            )),
            Ok(applied) => CommandReply::mutating(format!(
                "{} placed a mark at {}. Waiting for {}.",
                player_id, applied.position, applied.opponent
            )),
            Err(rejection) => rejected(&player_id, rejection),
        },
        ConsoleCommand::Resign(player_id) => match coordinator.resign(&player_id).await {
            Ok(_) => CommandReply::mutating(format!("{} resigned", player_id)),
            Err(rejection) => rejected(&player_id, rejection),
        },
        ConsoleCommand::Show(player_id) => {
            let session = coordinator.get_or_create_session(&player_id).await;
            match coordinator.board_view(&player_id).await {
                Some(view) => CommandReply::read_only(render_board(&view, symbols)),
                None if session.phase() == SessionPhase::Searching => {
                    CommandReply::read_only(format!("{} is still waiting for an opponent", player_id))
                }
                None => CommandReply::read_only(rejection_message(Rejection::NotInMatch)),
            }
        }
    }
}

fn rejected(player_id: &PlayerId, rejection: Rejection) -> CommandReply {
    log!("Rejected command from {}: {}", player_id, rejection.code());
    CommandReply::read_only(format!("{}: {}", player_id, rejection_message(rejection)))
}
