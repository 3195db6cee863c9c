//! Library for playing blackjack at a single terminal table. Provides the shoe, hand scoring,
//! the participants and the round engine that moves them through each round, along with the
//! terminal and balance ledger the engine talks to.

pub mod card;
pub mod config;
pub mod console;
pub mod error;
pub mod hand;
pub mod ledger;
pub mod participant;
pub mod shoe;
pub mod table;

pub mod prelude {
    pub use crate::card::{standard_deck, Card, Rank, Suit};
    pub use crate::config::{TableConfig, TableConfigBuilder};
    pub use crate::console::{ScriptedTerminal, StdTerminal, Terminal};
    pub use crate::error::BlackjackGameError;
    pub use crate::hand::{is_blackjack, is_bust, score};
    pub use crate::ledger::{BalanceLedger, InMemoryLedger, JsonFileLedger, LedgerEntry};
    pub use crate::participant::{BetOutcome, Participant, Record, Role};
    pub use crate::shoe::Shoe;
    pub use crate::table::{
        settle, BlackjackTable, Phase, RoundOutcome, SessionOutcome, Settlement,
    };
}

pub use prelude::*;
