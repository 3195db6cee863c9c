use crate::error::BlackjackGameError;
use crate::participant::DEFAULT_BALANCE;
use std::time::Duration;

/// Struct for configuring a `BlackjackTable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    pub num_decks: usize,
    pub starting_balance: i64,
    pub house_grant: i64,
    pub dealer_stands_on: u32,
    pub pace: Duration,
}

impl TableConfig {
    /// Associated method for returning a new `TableConfigBuilder` object. Any setting that is not
    /// chosen on the builder falls back to the standard table: eight decks, 10000 to start with,
    /// a 10000 house grant and a dealer who stands on 17.
    pub fn new() -> TableConfigBuilder {
        TableConfigBuilder {
            num_decks: None,
            starting_balance: None,
            house_grant: None,
            dealer_stands_on: None,
            pace: None,
        }
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        TableConfig {
            num_decks: 8,
            starting_balance: DEFAULT_BALANCE,
            house_grant: DEFAULT_BALANCE,
            dealer_stands_on: 17,
            pace: Duration::ZERO,
        }
    }
}

/// Struct to implement builder pattern for `TableConfig`
#[derive(Debug, Clone, Copy)]
pub struct TableConfigBuilder {
    num_decks: Option<usize>,
    starting_balance: Option<i64>,
    house_grant: Option<i64>,
    dealer_stands_on: Option<u32>,
    pace: Option<Duration>,
}

impl TableConfigBuilder {
    /// Method for choosing the number of decks in the shoe
    pub fn num_decks(&mut self, decks: usize) -> &mut Self {
        self.num_decks = Some(decks);
        self
    }

    /// Method for setting the balance of a player seen for the first time
    pub fn starting_balance(&mut self, balance: i64) -> &mut Self {
        self.starting_balance = Some(balance);
        self
    }

    /// Method for setting the balance given to a player who loses everything
    pub fn house_grant(&mut self, grant: i64) -> &mut Self {
        self.house_grant = Some(grant);
        self
    }

    /// Method for setting the total the dealer stops drawing at
    pub fn dealer_stands_on(&mut self, total: u32) -> &mut Self {
        self.dealer_stands_on = Some(total);
        self
    }

    /// Method for setting how long the terminal pauses after each line
    pub fn pace(&mut self, pace: Duration) -> &mut Self {
        self.pace = Some(pace);
        self
    }

    /// Method for building a `TableConfig`, rejecting settings a table can't be played with.
    pub fn build(&mut self) -> Result<TableConfig, BlackjackGameError> {
        let default = TableConfig::default();
        let config = TableConfig {
            num_decks: self.num_decks.unwrap_or(default.num_decks),
            starting_balance: self.starting_balance.unwrap_or(default.starting_balance),
            house_grant: self.house_grant.unwrap_or(default.house_grant),
            dealer_stands_on: self.dealer_stands_on.unwrap_or(default.dealer_stands_on),
            pace: self.pace.unwrap_or(default.pace),
        };
        if config.num_decks == 0 {
            return Err(BlackjackGameError::InvalidConfig(
                "number of decks must be at least 1".to_string(),
            ));
        }
        if config.starting_balance <= 0 || config.house_grant <= 0 {
            return Err(BlackjackGameError::InvalidConfig(
                "balances must be positive".to_string(),
            ));
        }
        if !(2..=21).contains(&config.dealer_stands_on) {
            return Err(BlackjackGameError::InvalidConfig(format!(
                "dealer can't stand on {}",
                config.dealer_stands_on
            )));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let config = TableConfig::new().build().unwrap();
        assert_eq!(config, TableConfig::default());
        assert_eq!(config.num_decks, 8);
        assert_eq!(config.starting_balance, 10_000);
        assert_eq!(config.dealer_stands_on, 17);
    }

    #[test]
    fn builder_overrides_and_validates() {
        let config = TableConfig::new()
            .num_decks(2)
            .starting_balance(500)
            .pace(Duration::from_millis(5))
            .build()
            .unwrap();
        assert_eq!(config.num_decks, 2);
        assert_eq!(config.starting_balance, 500);
        assert_eq!(config.house_grant, 10_000);
        assert_eq!(config.pace, Duration::from_millis(5));

        assert!(TableConfig::new().num_decks(0).build().is_err());
        assert!(TableConfig::new().house_grant(0).build().is_err());
        assert!(TableConfig::new().dealer_stands_on(22).build().is_err());
    }
}
