//! Best-effort analytics ping sent when a consenting player wins.
//!
//! One unauthenticated GET against a fixed URL, bounded by a timeout. Every
//! result, including failures, comes back as a [`PingOutcome`] value; nothing
//! here can abort a game or block history persistence. No retries.

use crate::config::AnalyticsSettings;
use crate::logutil::single_line;
use log::{debug, warn};
use std::time::Duration;
use tokio::time::timeout;

/// Result of a single ping attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PingOutcome {
    /// 2xx response; body kept verbatim.
    Delivered { body: String },
    /// The server answered with a non-success status.
    Rejected { status: u16 },
    /// No complete response within the configured timeout.
    TimedOut { after: Duration },
    /// DNS, connect, TLS or body read failure.
    Transport(String),
}

impl PingOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, PingOutcome::Delivered { .. })
    }

    /// Line shown to the player.
    pub fn describe(&self) -> String {
        match self {
            PingOutcome::Delivered { body } => format!("Response from server: {}", body),
            PingOutcome::Rejected { status } => {
                format!("Failed to fetch response: Unexpected code {}", status)
            }
            PingOutcome::TimedOut { after } => format!(
                "Failed to fetch response: timed out after {:.1}s",
                after.as_secs_f64()
            ),
            PingOutcome::Transport(reason) => format!("Failed to fetch response: {}", reason),
        }
    }
}

/// HTTP client for the analytics endpoint.
pub struct AnalyticsClient {
    url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl AnalyticsClient {
    pub fn new(settings: &AnalyticsSettings) -> Self {
        Self::with_timeout(
            settings.url.clone(),
            Duration::from_secs(settings.timeout_seconds),
        )
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send the ping once and report what happened.
    pub async fn ping(&self) -> PingOutcome {
        debug!("analytics ping -> {}", self.url);
        let outcome = match timeout(self.timeout, self.fetch()).await {
            Ok(outcome) => outcome,
            Err(_) => PingOutcome::TimedOut {
                after: self.timeout,
            },
        };
        match &outcome {
            PingOutcome::Delivered { body } => {
                debug!("analytics ping delivered: {}", single_line(body))
            }
            other => warn!("analytics ping failed: {}", other.describe()),
        }
        outcome
    }

    async fn fetch(&self) -> PingOutcome {
        let response = match self.client.get(&self.url).send().await {
            Ok(r) => r,
            Err(e) => return PingOutcome::Transport(e.to_string()),
        };
        let status = response.status();
        if !status.is_success() {
            return PingOutcome::Rejected {
                status: status.as_u16(),
            };
        }
        match response.text().await {
            Ok(body) => PingOutcome::Delivered { body },
            Err(e) => PingOutcome::Transport(format!("failed to read body: {}", e)),
        }
    }
}
