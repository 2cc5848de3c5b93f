mod console_notifier;
mod message_handler;
mod server_config;
mod snapshot_store;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use duel_common::{MatchCoordinator, log, logger};
use console_notifier::ConsoleNotifier;
use message_handler::{HELP_TEXT, handle_command, parse_command};
use server_config::{CONFIG_FILE_NAME, get_config_manager};
use snapshot_store::{FileSnapshotStore, SnapshotStore};

#[derive(Parser)]
#[command(name = "duel_server")]
struct Args {
    #[arg(long, default_value = CONFIG_FILE_NAME)]
    config: String,

    /// Overrides `snapshot_path` from the config file.
    #[arg(long)]
    snapshot: Option<String>,

    #[arg(long)]
    use_log_prefix: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Server".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let config = get_config_manager(&args.config).get_config()?;
    log!(
        "Board {}x{}, {} in a row wins",
        config.board.width,
        config.board.height,
        config.board.win_length
    );

    let store = FileSnapshotStore::new(args.snapshot.unwrap_or(config.snapshot_path.clone()));
    let notifier = ConsoleNotifier::new(config.symbols.clone());
    let coordinator = match store.load()? {
        Some(snapshot) => MatchCoordinator::restore(config.board, notifier, snapshot)?,
        None => MatchCoordinator::new(config.board, notifier)?,
    };

    println!("{}", HELP_TEXT);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                log!("Shutdown signal received");
                break;
            }
        };
        let Some(line) = line else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };
        let reply = handle_command(&coordinator, command, &config.symbols).await;
        println!("{}", reply.text);
        if reply.mutated {
            persist(&coordinator, &store).await;
        }
    }

    persist(&coordinator, &store).await;
    log!("Server shut down gracefully");

    Ok(())
}

async fn persist(coordinator: &MatchCoordinator<ConsoleNotifier>, store: &FileSnapshotStore) {
    let snapshot = coordinator.snapshot().await;
    let store = store.clone();
    match tokio::task::spawn_blocking(move || store.save(&snapshot)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => log!("Failed to save snapshot: {}", e),
        Err(e) => log!("Snapshot task failed: {}", e),
    }
}
