//! Per-user analytics consent, stored as `{ "analyticsConsent": <bool> }`.

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt};

use crate::input::read_line_lossy;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentConfig {
    pub analytics_consent: bool,
}

/// JSON file holding the [`ConsentConfig`].
#[derive(Debug, Clone)]
pub struct ConsentStore {
    path: PathBuf,
}

impl ConsentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file means no consent was ever given.
    pub async fn load(&self) -> Result<ConsentConfig> {
        let content = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("no consent file at {}", self.path.display());
                return Ok(ConsentConfig::default());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read consent file {}", self.path.display()))
            }
        };
        let start = content.iter().take_while(|&&b| b == 0).count();
        serde_json::from_slice(&content[start..])
            .with_context(|| format!("Failed to parse consent file {}", self.path.display()))
    }

    /// Overwrite the consent file, creating its directory first.
    pub async fn save(&self, config: &ConsentConfig) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)
                    .await
                    .with_context(|| format!("Failed to create {}", dir.display()))?;
            }
        }
        let data = serde_json::to_string(config)?;
        fs::write(&self.path, data)
            .await
            .with_context(|| format!("Failed to write consent file {}", self.path.display()))
    }
}

/// `yes` or `y` in any case means consent; everything else declines.
pub fn parse_consent_answer(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    answer == "yes" || answer == "y"
}

/// Ask the player for consent, persist the answer and return it.
/// A closed input counts as "no".
pub async fn update_consent<R, W>(
    store: &ConsentStore,
    input: &mut R,
    output: &mut W,
) -> Result<ConsentConfig>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    output
        .write_all(b"Do you consent to analytics? (yes/no)\n")
        .await?;
    output.flush().await?;

    let mut line = String::new();
    read_line_lossy(input, &mut line).await?;

    let config = ConsentConfig {
        analytics_consent: parse_consent_answer(&line),
    };
    store.save(&config).await?;
    info!(
        "analytics consent set to {} ({})",
        config.analytics_consent,
        store.path().display()
    );

    output.write_all(b"Consent updated successfully.\n").await?;
    output.flush().await?;
    Ok(config)
}
