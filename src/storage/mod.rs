//! # Storage Module - Game History Persistence
//!
//! Completed games are kept in a single JSON document that is read in full,
//! extended in memory and written back wholesale:
//!
//! ```text
//! <data_dir>/
//! └── game_stats.json   ← { "games": [ { "attempts": [..], "secretNumber": n, "guesses": [..] }, .. ] }
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use guessing_game::storage::{GameStats, HistoryStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = HistoryStore::new("./data/game_stats.json");
//!     let history = store.append(GameStats::new(vec![10, 90, 42], 42)).await?;
//!     println!("{} games played", history.games.len());
//!     Ok(())
//! }
//! ```
//!
//! The store is single-process and single-user: there is no file locking and
//! an append is a plain load/modify/overwrite cycle.

use crate::game::{SECRET_MAX, SECRET_MIN};
use chrono::Utc;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

/// Errors raised while reading or writing the history document.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading, writing or renaming the backing file failed.
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but is not a valid history document.
    #[error("malformed history file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize history: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl StoreError {
    pub fn is_parse(&self) -> bool {
        matches!(self, StoreError::Parse { .. })
    }
}

/// Statistics for one finished game.
///
/// `attempts` and `guesses` hold the same values in guess order; the on-disk
/// format carries both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    attempts: Vec<i32>,
    secret_number: i32,
    guesses: Vec<i32>,
}

impl GameStats {
    /// Stats for a won game. `secret_number` must lie in
    /// `SECRET_MIN..=SECRET_MAX`; callers obtain it from a
    /// [`SecretSource`](crate::game::SecretSource), and debug builds check it.
    pub fn new(attempts: Vec<i32>, secret_number: i32) -> Self {
        debug_assert!(
            (SECRET_MIN..=SECRET_MAX).contains(&secret_number),
            "secret {} outside {}..={}",
            secret_number,
            SECRET_MIN,
            SECRET_MAX
        );
        let guesses = attempts.clone();
        Self {
            attempts,
            secret_number,
            guesses,
        }
    }

    pub fn attempts(&self) -> &[i32] {
        &self.attempts
    }

    pub fn secret_number(&self) -> i32 {
        self.secret_number
    }

    pub fn guesses(&self) -> &[i32] {
        &self.guesses
    }
}

/// Every completed game in chronological order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameHistory {
    #[serde(default)]
    pub games: Vec<GameStats>,
}

/// File-backed history log.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole history. A missing file is an empty history.
    pub async fn load(&self) -> Result<GameHistory, StoreError> {
        let content = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("no history at {}, starting empty", self.path.display());
                return Ok(GameHistory::default());
            }
            Err(e) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };
        // An interrupted write can leave leading NULs; valid JSON never starts with one.
        // Bytes are parsed directly so invalid UTF-8 is reported as a parse error.
        let start = content.iter().take_while(|&&b| b == 0).count();
        serde_json::from_slice(&content[start..]).map_err(|e| StoreError::Parse {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Load, push `stats`, and overwrite the file with the result.
    pub async fn append(&self, stats: GameStats) -> Result<GameHistory, StoreError> {
        let mut history = self.load().await?;
        history.games.push(stats);
        self.save(&history).await?;
        debug!(
            "history now holds {} games ({})",
            history.games.len(),
            self.path.display()
        );
        Ok(history)
    }

    async fn save(&self, history: &GameHistory) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir).await.map_err(|e| StoreError::Io {
                    path: dir.to_path_buf(),
                    source: e,
                })?;
            }
        }
        let data = serde_json::to_string_pretty(history).map_err(StoreError::Serialize)?;
        fs::write(&self.path, data)
            .await
            .map_err(|e| StoreError::Io {
                path: self.path.clone(),
                source: e,
            })
    }

    /// Move an unreadable history file out of the way as
    /// `<name>.corrupt-<UTC timestamp>`, so earlier backups are never overwritten.
    ///
    /// Returns the new location, or `None` when there was nothing to move.
    pub async fn quarantine(&self) -> Result<Option<PathBuf>, StoreError> {
        let stamp = Utc::now().format("%Y%m%dT%H%M%S%.3fZ").to_string();
        let mut target = self.corrupt_path(&stamp);
        let mut n = 1;
        while fs::try_exists(&target).await.unwrap_or(false) {
            target = self.corrupt_path(&format!("{}-{}", stamp, n));
            n += 1;
        }
        match fs::rename(&self.path, &target).await {
            Ok(()) => {
                warn!(
                    "moved unreadable history {} to {}",
                    self.path.display(),
                    target.display()
                );
                Ok(Some(target))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    fn corrupt_path(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".corrupt-");
        name.push(suffix);
        PathBuf::from(name)
    }
}
