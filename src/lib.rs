//! # guessing-game - Console Number Guessing Game
//!
//! Guess a secret number between 1 and 100. Every finished game is appended
//! to a JSON history that is echoed back after each win. Players who opt in
//! also trigger a single best-effort analytics ping when they win.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use guessing_game::config::StoragePaths;
//! use guessing_game::game::{GameSession, RandomSecret};
//! use guessing_game::storage::HistoryStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let paths = StoragePaths::new("./config", "./data");
//!     let session = GameSession::new(HistoryStore::new(paths.history_file()));
//!
//!     let mut input = tokio::io::BufReader::new(tokio::io::stdin());
//!     let mut output = tokio::io::stdout();
//!     session
//!         .play(&mut RandomSecret::thread(), &mut input, &mut output)
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`game`] - secret generation, round state machine and console session
//! - [`storage`] - JSON game history persistence
//! - [`config`] - settings file, storage paths and analytics consent
//! - [`analytics`] - bounded-timeout analytics ping
//! - [`input`] - UTF-8 tolerant line reading
//! - [`logutil`] - helpers for logging untrusted text

pub mod analytics;
pub mod config;
pub mod game;
pub mod input;
pub mod logutil;
pub mod storage;
