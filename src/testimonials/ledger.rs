use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("failed to access ledger {path:?}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("corrupt ledger {path:?}: {source}")]
    Corrupt { path: PathBuf, source: serde_json::Error },
}

/// Days left before another testimonial may be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cooldown {
    pub days_remaining: i64,
}

impl std::fmt::Display for Cooldown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let plural = if self.days_remaining == 1 { "" } else { "s" };
        write!(f, "wait {} more day{}", self.days_remaining, plural)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct LedgerEntry {
    last_submitted_at: Option<DateTime<Utc>>,
    token: Option<String>,
}

/// Locally persisted record of this client's last testimonial.
#[derive(Debug)]
pub struct SubmissionLedger {
    path: PathBuf,
    cooldown_days: i64,
    entry: LedgerEntry,
}

impl SubmissionLedger {
    /// Open the ledger at `path`. A missing file is an empty ledger.
    pub fn open(path: impl Into<PathBuf>, cooldown_days: i64) -> Result<Self, LedgerError> {
        let path = path.into();
        let entry = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)
                .map_err(|source| LedgerError::Corrupt { path: path.clone(), source })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => LedgerEntry::default(),
            Err(source) => return Err(LedgerError::Io { path, source }),
        };
        Ok(Self { path, cooldown_days, entry })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn token(&self) -> Option<&str> {
        self.entry.token.as_deref()
    }

    pub fn last_submitted_at(&self) -> Option<DateTime<Utc>> {
        self.entry.last_submitted_at
    }

    pub fn owns(&self, token: &str) -> bool {
        self.entry.token.as_deref() == Some(token)
    }

    pub fn check(&self, now: DateTime<Utc>) -> Result<(), Cooldown> {
        let Some(last) = self.entry.last_submitted_at else {
            return Ok(());
        };
        let days_passed = (now - last).num_milliseconds() as f64 / TimeDelta::days(1).num_milliseconds() as f64;
        let cooldown = self.cooldown_days as f64;
        if days_passed < cooldown {
            Err(Cooldown { days_remaining: (cooldown - days_passed).ceil() as i64 })
        } else {
            Ok(())
        }
    }

    pub fn record(&mut self, now: DateTime<Utc>, token: impl Into<String>) -> Result<(), LedgerError> {
        self.entry = LedgerEntry { last_submitted_at: Some(now), token: Some(token.into()) };
        self.persist()
    }

    pub fn clear(&mut self) -> Result<(), LedgerError> {
        self.entry = LedgerEntry::default();
        self.persist()
    }

    fn persist(&self) -> Result<(), LedgerError> {
        let io = |source: std::io::Error| LedgerError::Io { path: self.path.clone(), source };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io)?;
        }
        let text = serde_json::to_string_pretty(&self.entry)
            .map_err(|source| LedgerError::Corrupt { path: self.path.clone(), source })?;
        fs::write(&self.path, text).map_err(io)?;
        debug!(path = ?self.path, "ledger saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn empty_ledger_allows_submission() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = SubmissionLedger::open(dir.path().join("ledger.json"), 7).unwrap();
        assert_eq!(ledger.check(at(1, 0)), Ok(()));
        assert_eq!(ledger.token(), None);
    }

    #[test]
    fn cooldown_rounds_remaining_days_up() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = SubmissionLedger::open(dir.path().join("ledger.json"), 7).unwrap();
        ledger.record(at(1, 12), "tok-1").unwrap();

        assert_eq!(ledger.check(at(1, 13)), Err(Cooldown { days_remaining: 7 }));
        assert_eq!(ledger.check(at(3, 0)), Err(Cooldown { days_remaining: 6 }));
        assert_eq!(ledger.check(at(8, 11)), Err(Cooldown { days_remaining: 1 }));
        assert_eq!(ledger.check(at(8, 12)), Ok(()));
    }

    #[test]
    fn record_survives_reopen_and_clear_resets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/ledger.json");
        let mut ledger = SubmissionLedger::open(&path, 7).unwrap();
        ledger.record(at(2, 9), "tok-2").unwrap();

        let mut reopened = SubmissionLedger::open(&path, 7).unwrap();
        assert!(reopened.owns("tok-2"));
        assert!(!reopened.owns("someone-else"));
        assert_eq!(reopened.last_submitted_at(), Some(at(2, 9)));

        reopened.clear().unwrap();
        let cleared = SubmissionLedger::open(&path, 7).unwrap();
        assert_eq!(cleared.token(), None);
        assert_eq!(cleared.check(at(2, 10)), Ok(()));
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(SubmissionLedger::open(&path, 7), Err(LedgerError::Corrupt { .. })));
    }
}
