//! Binary entrypoint for the guessing game.
//!
//! Usage:
//! - `guessing-game` - play one game
//! - `guessing-game --update-consent` - answer the analytics consent prompt and exit
//! - `guessing-game history` - print every stored game and exit
//! - `guessing-game init-settings [--force]` - write a default `settings.toml`
use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{info, warn};
use std::path::PathBuf;
use std::str::FromStr;

use guessing_game::analytics::AnalyticsClient;
use guessing_game::config::consent::{update_consent, ConsentConfig, ConsentStore};
use guessing_game::config::{
    default_config_dir, LoggingSettings, Settings, StoragePaths, SETTINGS_FILE,
};
use guessing_game::game::{render_history, GameSession, RandomSecret, SessionOutcome};
use guessing_game::storage::HistoryStore;

#[derive(Parser)]
#[command(name = "guessing-game")]
#[command(about = "Guess the secret number between 1 and 100")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Ask for analytics consent, save the answer and exit without playing
    #[arg(long)]
    update_consent: bool,

    /// Directory holding config.json and settings.toml
    #[arg(long, env = "GUESSING_GAME_CONFIG_DIR", global = true)]
    config_dir: Option<PathBuf>,

    /// Directory holding game_stats.json
    #[arg(long, env = "GUESSING_GAME_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Settings file path (defaults to <config-dir>/settings.toml)
    #[arg(short, long, global = true)]
    settings: Option<PathBuf>,

    /// Verbose logging (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the stored game history
    History,
    /// Write a settings file populated with defaults
    InitSettings {
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings_path = cli.settings.clone().unwrap_or_else(|| {
        cli.config_dir
            .clone()
            .unwrap_or_else(default_config_dir)
            .join(SETTINGS_FILE)
    });

    // Settings feed the logger, so load them before logging is up and report problems after.
    let (settings, settings_error) = if settings_path.exists() {
        match Settings::load(&settings_path).await {
            Ok(s) => (s, None),
            Err(e) => (Settings::default(), Some(e)),
        }
    } else {
        (Settings::default(), None)
    };
    init_logging(&settings.logging, cli.verbose);
    if let Some(e) = settings_error {
        warn!("{:#}; continuing with default settings", e);
    }

    let paths = StoragePaths::resolve(
        cli.config_dir.clone(),
        cli.data_dir.clone(),
        &settings.paths,
    );
    info!(
        "config dir {}, data dir {}",
        paths.config_dir.display(),
        paths.data_dir.display()
    );

    match cli.command {
        Some(Commands::InitSettings { force }) => {
            if settings_path.exists() && !force {
                println!(
                    "Settings file {} already exists (use --force to overwrite).",
                    settings_path.display()
                );
                return Ok(());
            }
            Settings::create_default(&settings_path).await?;
            println!("Settings file created at {}", settings_path.display());
            return Ok(());
        }
        Some(Commands::History) => {
            let history = HistoryStore::new(paths.history_file()).load().await?;
            if history.games.is_empty() {
                println!("No games played yet.");
            } else {
                println!("All Games History:");
                for entry in render_history(&history) {
                    println!("{}", entry);
                }
            }
            return Ok(());
        }
        None => {}
    }

    let consent_store = ConsentStore::new(paths.consent_file());
    let mut stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();

    if cli.update_consent {
        update_consent(&consent_store, &mut stdin, &mut stdout).await?;
        return Ok(());
    }

    let consent = match consent_store.load().await {
        Ok(c) => c,
        Err(e) => {
            warn!("{:#}; treating analytics consent as not given", e);
            ConsentConfig::default()
        }
    };

    let session = GameSession::new(HistoryStore::new(paths.history_file())).with_analytics(
        AnalyticsClient::new(&settings.analytics),
        consent.analytics_consent,
    );
    match session
        .play(&mut RandomSecret::thread(), &mut stdin, &mut stdout)
        .await?
    {
        SessionOutcome::Won { stats, .. } => {
            info!("recorded game with {} attempts", stats.attempts().len())
        }
        SessionOutcome::Abandoned { attempts } => {
            info!("game abandoned after {} attempts", attempts.len())
        }
    }

    Ok(())
}

fn init_logging(settings: &LoggingSettings, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let level = match verbosity {
        0 => log::LevelFilter::from_str(&settings.level).unwrap_or(log::LevelFilter::Warn),
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(level);

    let log_file = settings.file.as_ref().and_then(|path| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()
    });
    match log_file {
        Some(f) => {
            let file = std::sync::Mutex::new(f);
            // Foreground runs also see records on the console; redirected runs only get the file.
            let is_tty = atty::is(atty::Stream::Stdout);
            builder.format(move |fmt, record| {
                let line = format!(
                    "{} [{}] {}",
                    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
                    record.level(),
                    record.args()
                );
                if let Ok(mut guard) = file.lock() {
                    let _ = writeln!(guard, "{}", line);
                }
                if is_tty {
                    writeln!(fmt, "{}", line)
                } else {
                    Ok(())
                }
            });
        }
        None => {
            builder.format(|fmt, record| {
                writeln!(
                    fmt,
                    "{} [{}] {}",
                    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
                    record.level(),
                    record.args()
                )
            });
        }
    }
    let _ = builder.try_init();
}
