use std::error::Error;
use std::fmt::Display;

/// Every failure the table can run into. Bet and funds errors are recoverable and only ever
/// reach the player as a message before the same prompt is asked again, the rest end the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlackjackGameError {
    /// A bet was negative or larger than the player's balance.
    InvalidBet { amount: i64, balance: i64 },
    /// A double down was asked for without enough balance to match the current bet.
    InsufficientFunds { needed: i64, balance: i64 },
    /// A card was drawn from an empty shoe. The reshuffle check runs before every round, so this
    /// only happens when the reshuffle threshold is wrong for the size of the table.
    ShoeEmpty,
    InvalidConfig(String),
    /// The balance file exists but could not be parsed.
    LedgerCorrupt(String),
    /// The balance file could not be read or written.
    LedgerUnavailable(String),
    /// The terminal stopped producing input while the table was waiting on a prompt.
    InputClosed,
    Io(String),
}

impl BlackjackGameError {
    /// Returns true for errors that are handled by asking the player again.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            BlackjackGameError::InvalidBet { .. } | BlackjackGameError::InsufficientFunds { .. }
        )
    }
}

impl Display for BlackjackGameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlackjackGameError::InvalidBet { amount, balance } if *amount < 0 => write!(
                f,
                "bet amount out of range: {} (balance {})",
                amount, balance
            ),
            BlackjackGameError::InvalidBet { amount, balance } => write!(
                f,
                "not enough funds: bet of {} with a balance of {}",
                amount, balance
            ),
            BlackjackGameError::InsufficientFunds { needed, balance } => write!(
                f,
                "not enough funds: {} needed with a balance of {}",
                needed, balance
            ),
            BlackjackGameError::ShoeEmpty => write!(f, "the shoe ran out of cards"),
            BlackjackGameError::InvalidConfig(s) => write!(f, "invalid table configuration: {}", s),
            BlackjackGameError::LedgerCorrupt(s) => write!(f, "balance ledger is corrupt: {}", s),
            BlackjackGameError::LedgerUnavailable(s) => {
                write!(f, "balance ledger is unavailable: {}", s)
            }
            BlackjackGameError::InputClosed => write!(f, "input closed while waiting for a reply"),
            BlackjackGameError::Io(s) => write!(f, "{}", s),
        }
    }
}

impl Error for BlackjackGameError {}

impl From<std::io::Error> for BlackjackGameError {
    fn from(value: std::io::Error) -> Self {
        BlackjackGameError::Io(format!("{}", value))
    }
}

impl From<serde_json::Error> for BlackjackGameError {
    fn from(value: serde_json::Error) -> Self {
        BlackjackGameError::LedgerCorrupt(format!("{}", value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bet_errors_are_recoverable() {
        let negative = BlackjackGameError::InvalidBet {
            amount: -5,
            balance: 100,
        };
        let too_high = BlackjackGameError::InvalidBet {
            amount: 101,
            balance: 100,
        };
        assert!(negative.is_recoverable());
        assert!(too_high.is_recoverable());
        assert_eq!(
            format!("{}", negative),
            "bet amount out of range: -5 (balance 100)"
        );
        assert_eq!(
            format!("{}", too_high),
            "not enough funds: bet of 101 with a balance of 100"
        );
        assert!(!BlackjackGameError::ShoeEmpty.is_recoverable());
        assert!(!BlackjackGameError::InputClosed.is_recoverable());
    }
}
