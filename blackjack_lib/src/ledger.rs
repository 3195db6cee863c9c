//! Player balances kept between sessions, keyed by player name.
use crate::error::BlackjackGameError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub name: String,
    pub balance: i64,
}

impl LedgerEntry {
    pub fn new(name: &str, balance: i64) -> Self {
        LedgerEntry {
            name: name.to_string(),
            balance,
        }
    }
}

/// Storage for balances. A store with nothing in it answers `None` for every name.
pub trait BalanceLedger {
    fn lookup(&self, name: &str) -> Result<Option<i64>, BlackjackGameError>;

    /// Writes `entries` into the store. Existing names are overwritten, new names are appended and
    /// entries that aren't mentioned are kept as they are.
    fn save_all(&mut self, entries: &[LedgerEntry]) -> Result<(), BlackjackGameError>;
}

/// Overwrites or appends every entry of `updates` into `existing`, keeping the existing order.
pub fn merge_entries(existing: &mut Vec<LedgerEntry>, updates: &[LedgerEntry]) {
    for update in updates {
        match existing.iter_mut().find(|e| e.name == update.name) {
            Some(entry) => entry.balance = update.balance,
            None => existing.push(update.clone()),
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemoryLedger {
    entries: Vec<LedgerEntry>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }
}

impl BalanceLedger for InMemoryLedger {
    fn lookup(&self, name: &str) -> Result<Option<i64>, BlackjackGameError> {
        Ok(self
            .entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.balance))
    }

    fn save_all(&mut self, entries: &[LedgerEntry]) -> Result<(), BlackjackGameError> {
        merge_entries(&mut self.entries, entries);
        Ok(())
    }
}

/// On disk format of the balance file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct LedgerFile {
    players: Vec<LedgerEntry>,
}

/// Balances stored as a JSON document. A missing or empty file is an empty ledger, a file that
/// doesn't parse is reported as `LedgerCorrupt`.
#[derive(Debug, Clone)]
pub struct JsonFileLedger {
    path: PathBuf,
}

impl JsonFileLedger {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        JsonFileLedger {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<LedgerEntry>, BlackjackGameError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no balance file yet");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(BlackjackGameError::LedgerUnavailable(format!(
                    "{}: {}",
                    self.path.display(),
                    e
                )))
            }
        };
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        let file: LedgerFile = serde_json::from_str(&contents).map_err(|e| {
            BlackjackGameError::LedgerCorrupt(format!("{}: {}", self.path.display(), e))
        })?;
        Ok(file.players)
    }
}

impl BalanceLedger for JsonFileLedger {
    fn lookup(&self, name: &str) -> Result<Option<i64>, BlackjackGameError> {
        Ok(self
            .load()?
            .into_iter()
            .find(|e| e.name == name)
            .map(|e| e.balance))
    }

    fn save_all(&mut self, entries: &[LedgerEntry]) -> Result<(), BlackjackGameError> {
        let mut players = self.load()?;
        merge_entries(&mut players, entries);
        let json = serde_json::to_string_pretty(&LedgerFile { players })?;
        fs::write(&self.path, json).map_err(|e| {
            BlackjackGameError::LedgerUnavailable(format!("{}: {}", self.path.display(), e))
        })?;
        info!(path = %self.path.display(), saved = entries.len(), "saved balances");
        Ok(())
    }
}
