//! Test utilities: temp storage layouts and a throwaway HTTP endpoint.
#![allow(dead_code)] // each test crate uses a different subset

use guessing_game::config::StoragePaths;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Fresh config/data directories under one temp dir. Keep the `TempDir`
/// alive for as long as the paths are used.
pub fn temp_paths() -> (tempfile::TempDir, StoragePaths) {
    let tmp = tempfile::tempdir().expect("tempdir");
    let paths = StoragePaths::new(tmp.path().join("config"), tmp.path().join("data"));
    (tmp, paths)
}

/// Serve every request with the given status line and body. Returns the
/// URL and a counter of requests answered.
pub async fn http_stub(status: &'static str, body: &'static str) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            read_request_head(&mut socket).await;
            counter.fetch_add(1, Ordering::SeqCst);
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });
    (format!("http://{}/Analytics/HelloWorld", addr), hits)
}

/// Accept connections but never answer them.
pub async fn silent_stub() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{}/slow", addr)
}

/// URL of a local port with nothing listening on it.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    tokio::time::sleep(Duration::from_millis(10)).await;
    format!("http://{}/", addr)
}

async fn read_request_head(socket: &mut tokio::net::TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
        }
    }
}

/// Turn captured output bytes into lines.
pub fn lines(output: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(output)
        .lines()
        .map(str::to_string)
        .collect()
}

/// Quarantined copies of `file` (`<name>.corrupt-*`) in its directory, sorted.
pub fn corrupt_copies(file: &std::path::Path) -> Vec<std::path::PathBuf> {
    let dir = file.parent().expect("parent dir");
    let prefix = format!(
        "{}.corrupt-",
        file.file_name().expect("file name").to_string_lossy()
    );
    let mut found: Vec<_> = std::fs::read_dir(dir)
        .expect("read dir")
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| {
            p.file_name()
                .map(|n| n.to_string_lossy().starts_with(&prefix))
                .unwrap_or(false)
        })
        .collect();
    found.sort();
    found
}
