//! End-to-end tests for a console game session
use guessing_game::analytics::{AnalyticsClient, PingOutcome};
use guessing_game::game::{FixedSecret, GameSession, RandomSecret, SessionOutcome};
use guessing_game::storage::{GameStats, HistoryStore};
use std::sync::atomic::Ordering;
use std::time::Duration;
mod common;

async fn play_scripted(
    session: &GameSession,
    secret: i32,
    script: &str,
) -> (SessionOutcome, Vec<String>) {
    let mut input = script.as_bytes();
    let mut output: Vec<u8> = Vec::new();
    let outcome = session
        .play(&mut FixedSecret(secret), &mut input, &mut output)
        .await
        .expect("session");
    (outcome, common::lines(&output))
}

fn position(lines: &[String], needle: &str) -> usize {
    lines
        .iter()
        .position(|l| l == needle)
        .unwrap_or_else(|| panic!("missing line {needle:?} in {lines:#?}"))
}

#[tokio::test]
async fn too_small_too_big_then_win() {
    let (_tmp, paths) = common::temp_paths();
    let session = GameSession::new(HistoryStore::new(paths.history_file()));

    let (outcome, out) = play_scripted(&session, 42, "10\n90\n42\n\n").await;

    let SessionOutcome::Won { stats, ping } = outcome else {
        panic!("expected a win");
    };
    assert_eq!(stats.attempts(), &[10, 90, 42]);
    assert_eq!(stats.guesses(), &[10, 90, 42]);
    assert_eq!(stats.secret_number(), 42);
    assert!(ping.is_none());

    let small = position(&out, "Too small!");
    let big = position(&out, "Too big!");
    let win = position(&out, "You win!");
    assert!(small < big && big < win);
    assert_eq!(out[small - 1], "You guessed: 10");
    assert_eq!(out[big - 1], "You guessed: 90");
    assert_eq!(out[win - 1], "You guessed: 42");
    assert_eq!(out.last().map(String::as_str), Some("Press Enter to exit..."));
}

#[tokio::test]
async fn missed_guesses_print_arithmetic_hints() {
    let (_tmp, paths) = common::temp_paths();
    let session = GameSession::new(HistoryStore::new(paths.history_file()));

    let (_, out) = play_scripted(&session, 6, "9\n6\n").await;

    let big = position(&out, "Too big!");
    assert_eq!(
        &out[big + 1..big + 4],
        &[
            "The sum of your guess and the secret number is: 15".to_string(),
            "The product of your guess and the secret number is: 54".to_string(),
            "The greatest common divisor of your guess and the secret number is: 3".to_string(),
        ]
    );
    // No hints after the winning guess.
    let win = position(&out, "You win!");
    assert_eq!(out[win + 1], "Game Statistics:");
}

#[tokio::test]
async fn non_numeric_input_is_ignored() {
    let (_tmp, paths) = common::temp_paths();
    let session = GameSession::new(HistoryStore::new(paths.history_file()));

    let (outcome, out) = play_scripted(&session, 3, "abc\n\n 2 \nthree\n3\n").await;

    let SessionOutcome::Won { stats, .. } = outcome else {
        panic!("expected a win");
    };
    assert_eq!(stats.attempts(), &[2, 3]);
    let prompts = out
        .iter()
        .filter(|l| l.as_str() == "Please input your guess.")
        .count();
    assert_eq!(prompts, 5, "every line re-prompts");
}

#[tokio::test]
async fn win_is_persisted_and_history_echoed() {
    let (_tmp, paths) = common::temp_paths();
    let store = HistoryStore::new(paths.history_file());
    store
        .append(GameStats::new(vec![50, 25], 25))
        .await
        .expect("seed");
    let session = GameSession::new(store.clone());

    let (_, out) = play_scripted(&session, 42, "10\n90\n42\n").await;

    let header = position(&out, "All Games History:");
    assert_eq!(
        &out[header + 1..header + 3],
        &[
            "Game 1: Attempts: [50, 25], Secret Number: 25, Guesses: [50, 25]".to_string(),
            "Game 2: Attempts: [10, 90, 42], Secret Number: 42, Guesses: [10, 90, 42]".to_string(),
        ]
    );
    let stats_at = position(&out, "Game Statistics:");
    assert_eq!(out[stats_at + 1], "Attempts: [10, 90, 42]");
    assert_eq!(out[stats_at + 2], "Secret Number: 42");
    assert_eq!(out[stats_at + 3], "Guesses: [10, 90, 42]");

    let history = store.load().await.expect("load");
    assert_eq!(history.games.len(), 2);
    assert_eq!(history.games[1], GameStats::new(vec![10, 90, 42], 42));
}

#[tokio::test]
async fn closed_input_abandons_without_persisting() {
    let (_tmp, paths) = common::temp_paths();
    let session = GameSession::new(HistoryStore::new(paths.history_file()));

    let (outcome, _) = play_scripted(&session, 77, "5\nx\n80\n").await;

    assert_eq!(
        outcome,
        SessionOutcome::Abandoned {
            attempts: vec![5, 80]
        }
    );
    assert!(!paths.history_file().exists());
}

#[tokio::test]
async fn win_without_final_enter_still_completes() {
    let (_tmp, paths) = common::temp_paths();
    let session = GameSession::new(HistoryStore::new(paths.history_file()));

    let (outcome, _) = play_scripted(&session, 1, "1").await;
    assert!(matches!(outcome, SessionOutcome::Won { .. }));
}

#[tokio::test]
async fn scripted_reads_from_mock_stream() {
    let (_tmp, paths) = common::temp_paths();
    let session = GameSession::new(HistoryStore::new(paths.history_file()));
    let mut input = tokio::io::BufReader::new(
        tokio_test::io::Builder::new()
            .read(b"50\n")
            .read(b"oops\n")
            .read(b"25\n")
            .read(b"\n")
            .build(),
    );
    let mut output: Vec<u8> = Vec::new();

    let outcome = session
        .play(&mut FixedSecret(25), &mut input, &mut output)
        .await
        .expect("session");
    let SessionOutcome::Won { stats, .. } = outcome else {
        panic!("expected a win");
    };
    assert_eq!(stats, GameStats::new(vec![50, 25], 25));
}

#[tokio::test]
async fn random_secret_game_can_be_won() {
    let (_tmp, paths) = common::temp_paths();
    let session = GameSession::new(HistoryStore::new(paths.history_file()));
    // Every value in range, so whatever secret is drawn gets hit.
    let script: String = (1..=100).map(|n| format!("{n}\n")).collect();
    let mut input = script.as_bytes();
    let mut output: Vec<u8> = Vec::new();

    let outcome = session
        .play(&mut RandomSecret::seeded(9), &mut input, &mut output)
        .await
        .expect("session");
    let SessionOutcome::Won { stats, .. } = outcome else {
        panic!("expected a win");
    };
    assert!((1..=100).contains(&stats.secret_number()));
    assert_eq!(*stats.attempts().last().unwrap(), stats.secret_number());
}

#[tokio::test]
async fn corrupt_history_is_set_aside_and_game_still_saved() {
    let (_tmp, paths) = common::temp_paths();
    std::fs::create_dir_all(&paths.data_dir).unwrap();
    std::fs::write(paths.history_file(), "not json at all").unwrap();
    let store = HistoryStore::new(paths.history_file());
    let session = GameSession::new(store.clone());

    let (outcome, out) = play_scripted(&session, 8, "8\n").await;

    assert!(matches!(outcome, SessionOutcome::Won { .. }));
    assert!(out.iter().any(|l| l.starts_with("Game history was unreadable")));
    let history = store.load().await.expect("fresh history");
    assert_eq!(history.games, vec![GameStats::new(vec![8], 8)]);
    let copies = common::corrupt_copies(&paths.history_file());
    assert_eq!(copies.len(), 1);
    assert_eq!(std::fs::read_to_string(&copies[0]).unwrap(), "not json at all");
}

#[tokio::test]
async fn non_utf8_history_is_set_aside_and_game_still_saved() {
    let (_tmp, paths) = common::temp_paths();
    std::fs::create_dir_all(&paths.data_dir).unwrap();
    std::fs::write(paths.history_file(), b"\xff\xfe garbage").unwrap();
    let store = HistoryStore::new(paths.history_file());
    let session = GameSession::new(store.clone());

    let (outcome, _) = play_scripted(&session, 8, "8\n").await;

    assert!(matches!(outcome, SessionOutcome::Won { .. }));
    assert_eq!(
        store.load().await.expect("fresh history").games,
        vec![GameStats::new(vec![8], 8)]
    );
    let copies = common::corrupt_copies(&paths.history_file());
    assert_eq!(copies.len(), 1);
    assert_eq!(std::fs::read(&copies[0]).unwrap(), b"\xff\xfe garbage");
}

#[tokio::test]
async fn invalid_utf8_input_is_ignored() {
    let (_tmp, paths) = common::temp_paths();
    let session = GameSession::new(HistoryStore::new(paths.history_file()));
    let mut input: &[u8] = b"\xff\xfe\n42\n\xc3\n";
    let mut output: Vec<u8> = Vec::new();

    let outcome = session
        .play(&mut FixedSecret(42), &mut input, &mut output)
        .await
        .expect("bad bytes must not end the session");

    let SessionOutcome::Won { stats, .. } = outcome else {
        panic!("expected a win");
    };
    assert_eq!(stats.attempts(), &[42]);
}

#[tokio::test]
async fn consenting_win_pings_analytics() {
    let (_tmp, paths) = common::temp_paths();
    let (url, hits) = common::http_stub("200 OK", "Hello World!").await;
    let session = GameSession::new(HistoryStore::new(paths.history_file()))
        .with_analytics(AnalyticsClient::with_timeout(url, Duration::from_secs(5)), true);

    let (outcome, out) = play_scripted(&session, 30, "20\n30\n\n").await;

    let SessionOutcome::Won { ping, .. } = outcome else {
        panic!("expected a win");
    };
    assert_eq!(
        ping,
        Some(PingOutcome::Delivered {
            body: "Hello World!".to_string()
        })
    );
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    let win = position(&out, "You win!");
    assert_eq!(out[win + 1], "Response from server: Hello World!");
}

#[tokio::test]
async fn declined_consent_never_pings() {
    let (_tmp, paths) = common::temp_paths();
    let (url, hits) = common::http_stub("200 OK", "Hello World!").await;
    let session = GameSession::new(HistoryStore::new(paths.history_file()))
        .with_analytics(AnalyticsClient::with_timeout(url, Duration::from_secs(5)), false);

    let (outcome, out) = play_scripted(&session, 30, "30\n").await;

    assert!(matches!(outcome, SessionOutcome::Won { ping: None, .. }));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert!(!out
        .iter()
        .any(|l| l.starts_with("Response from server") || l.starts_with("Failed to fetch")));
}

#[tokio::test]
async fn failed_ping_does_not_block_persistence() {
    let (_tmp, paths) = common::temp_paths();
    let url = common::closed_port_url().await;
    let store = HistoryStore::new(paths.history_file());
    let session = GameSession::new(store.clone())
        .with_analytics(AnalyticsClient::with_timeout(url, Duration::from_secs(5)), true);

    let (outcome, out) = play_scripted(&session, 12, "12\n").await;

    let SessionOutcome::Won { ping, .. } = outcome else {
        panic!("expected a win");
    };
    assert!(matches!(ping, Some(PingOutcome::Transport(_))));
    assert!(out.iter().any(|l| l.starts_with("Failed to fetch response:")));
    assert_eq!(store.load().await.unwrap().games.len(), 1);
}
