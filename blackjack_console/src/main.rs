use blackjack_lib::{BlackjackGameError, BlackjackTable, JsonFileLedger, StdTerminal, TableConfig};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing::error;

/// Exit code when stdin closes in the middle of a session.
const INPUT_CLOSED_EXIT: i32 = 4;

#[derive(Parser, Debug)]
#[command(name = "blackjack")]
#[command(about = "Play blackjack against the dealer at a single terminal table")]
struct Args {
    /// File the player balances are kept in between sessions
    #[arg(long, default_value = "player_balances.json")]
    ledger: PathBuf,

    /// Number of decks in the shoe
    #[arg(long, default_value_t = 8)]
    decks: usize,

    /// Pause after every line of output, in milliseconds
    #[arg(long, default_value_t = 0)]
    pace_ms: u64,

    /// Level of the diagnostics written to stderr
    #[arg(long, default_value_t = tracing::Level::WARN)]
    log_level: tracing::Level,
}

fn run(args: &Args) -> Result<i32, BlackjackGameError> {
    let config = TableConfig::new()
        .num_decks(args.decks)
        .pace(Duration::from_millis(args.pace_ms))
        .build()?;
    let terminal = StdTerminal::new(io::stdin().lock(), io::stdout(), config.pace);
    let ledger = JsonFileLedger::new(&args.ledger);
    let mut table = BlackjackTable::new(config, terminal, ledger)?;
    let outcome = table.run()?;
    Ok(outcome.exit_code())
}

fn main() {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(io::stderr)
        .init();

    let code = match run(&args) {
        Ok(code) => code,
        Err(BlackjackGameError::InputClosed) => {
            eprintln!("\ninput closed, balances saved");
            INPUT_CLOSED_EXIT
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {e}");
            1
        }
    };
    std::process::exit(code);
}
