//! Helpers for logging untrusted text (player input, server bodies) on one line.

use std::fmt::Write;

const MAX_PREVIEW_CHARS: usize = 120;

/// Escape control characters and cap the length so the value cannot break
/// or flood a log line. Longer input is cut and marked with `…`.
pub fn single_line(s: &str) -> String {
    let mut out = String::with_capacity(s.len().min(MAX_PREVIEW_CHARS) + 4);
    for (i, ch) in s.chars().enumerate() {
        if i == MAX_PREVIEW_CHARS {
            out.push('…');
            break;
        }
        match ch {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{{{:x}}}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}
