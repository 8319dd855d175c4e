//! Console driver for one game: prompts, reads guesses, and on a win runs
//! the analytics ping, persists the result and echoes the full history.
//!
//! Input and output are generic async streams so the whole flow runs against
//! in-memory buffers in tests and against stdin/stdout in the binary.

use super::arith::{add, gcd, multiply};
use super::round::{parse_guess, Round, Verdict};
use super::secret::SecretSource;
use crate::analytics::{AnalyticsClient, PingOutcome};
use crate::input::read_line_lossy;
use crate::logutil::single_line;
use crate::storage::{GameHistory, GameStats, HistoryStore};
use anyhow::{anyhow, Result};
use log::{debug, info, warn};
use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt};

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Secret found and the game appended to the history.
    Won {
        stats: GameStats,
        ping: Option<PingOutcome>,
    },
    /// Input closed before the secret was found; nothing was persisted.
    Abandoned { attempts: Vec<i32> },
}

pub struct GameSession {
    history: HistoryStore,
    analytics: Option<AnalyticsClient>,
    consent: bool,
}

impl GameSession {
    pub fn new(history: HistoryStore) -> Self {
        Self {
            history,
            analytics: None,
            consent: false,
        }
    }

    /// Attach the analytics client. It is only used when `consent` is true.
    pub fn with_analytics(mut self, client: AnalyticsClient, consent: bool) -> Self {
        self.analytics = Some(client);
        self.consent = consent;
        self
    }

    /// Play one game to completion (or until input runs out).
    pub async fn play<S, R, W>(
        &self,
        secrets: &mut S,
        input: &mut R,
        output: &mut W,
    ) -> Result<SessionOutcome>
    where
        S: SecretSource + ?Sized,
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        say(output, "Guess the number!").await?;
        say(
            output,
            "Remember, you can update your consent by running this application with the --update-consent flag.",
        )
        .await?;

        let mut round = Round::new(secrets.next_secret());
        debug!("new round started");

        let mut line = String::new();
        loop {
            say(output, "Please input your guess.").await?;
            if read_line_lossy(input, &mut line).await? == 0 {
                info!(
                    "input closed after {} guesses; game abandoned",
                    round.attempts().len()
                );
                return Ok(SessionOutcome::Abandoned {
                    attempts: round.attempts().to_vec(),
                });
            }
            let Some(guess) = parse_guess(&line) else {
                debug!("ignoring non-numeric input '{}'", single_line(&line));
                continue;
            };

            let verdict = round.guess(guess)?;
            say(output, &format!("You guessed: {}", guess)).await?;
            say(output, verdict.message()).await?;

            if verdict == Verdict::Win {
                break;
            }
            let secret = round.secret();
            say(
                output,
                &format!(
                    "The sum of your guess and the secret number is: {}",
                    add(guess, secret)
                ),
            )
            .await?;
            say(
                output,
                &format!(
                    "The product of your guess and the secret number is: {}",
                    multiply(guess, secret)
                ),
            )
            .await?;
            say(
                output,
                &format!(
                    "The greatest common divisor of your guess and the secret number is: {}",
                    gcd(guess, secret)
                ),
            )
            .await?;
        }

        let ping = self.maybe_ping(output).await?;

        let stats = round
            .into_stats()
            .ok_or_else(|| anyhow!("round ended without a winning guess"))?;
        info!("game won after {} guesses", stats.attempts().len());
        say(output, "Game Statistics:").await?;
        say(output, &format!("Attempts: {:?}", stats.attempts())).await?;
        say(output, &format!("Secret Number: {}", stats.secret_number())).await?;
        say(output, &format!("Guesses: {:?}", stats.guesses())).await?;

        let history = self.record(stats.clone(), output).await?;
        say(output, "All Games History:").await?;
        for entry in render_history(&history) {
            say(output, &entry).await?;
        }

        say(output, "Press Enter to exit...").await?;
        read_line_lossy(input, &mut line).await?;

        Ok(SessionOutcome::Won { stats, ping })
    }

    async fn maybe_ping<W: AsyncWrite + Unpin>(
        &self,
        output: &mut W,
    ) -> Result<Option<PingOutcome>> {
        if !self.consent {
            return Ok(None);
        }
        let Some(client) = &self.analytics else {
            return Ok(None);
        };
        let outcome = client.ping().await;
        say(output, &outcome.describe()).await?;
        Ok(Some(outcome))
    }

    /// Append to the history; an unreadable history file is set aside under
    /// a timestamped `.corrupt-*` name and a new one started.
    async fn record<W: AsyncWrite + Unpin>(
        &self,
        stats: GameStats,
        output: &mut W,
    ) -> Result<GameHistory> {
        match self.history.append(stats.clone()).await {
            Ok(history) => Ok(history),
            Err(e) if e.is_parse() => {
                warn!("{}", e);
                let moved = self.history.quarantine().await?;
                let note = match moved {
                    Some(path) => format!(
                        "Game history was unreadable and has been moved to {}; starting a new history.",
                        path.display()
                    ),
                    None => "Game history was unreadable; starting a new history.".to_string(),
                };
                say(output, &note).await?;
                Ok(self.history.append(stats).await?)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// One display line per stored game, numbered from 1.
pub fn render_history(history: &GameHistory) -> Vec<String> {
    history
        .games
        .iter()
        .enumerate()
        .map(|(i, game)| {
            format!(
                "Game {}: Attempts: {:?}, Secret Number: {}, Guesses: {:?}",
                i + 1,
                game.attempts(),
                game.secret_number(),
                game.guesses()
            )
        })
        .collect()
}

async fn say<W: AsyncWrite + Unpin>(output: &mut W, line: &str) -> std::io::Result<()> {
    output.write_all(line.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await
}
