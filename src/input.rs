//! Line input from the player's terminal.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Read one line into `line`, replacing invalid UTF-8 with U+FFFD instead of
/// failing. Returns the number of raw bytes consumed; `0` means end of input.
pub async fn read_line_lossy<R>(input: &mut R, line: &mut String) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut raw = Vec::new();
    let n = input.read_until(b'\n', &mut raw).await?;
    line.clear();
    line.push_str(&String::from_utf8_lossy(&raw));
    Ok(n)
}
