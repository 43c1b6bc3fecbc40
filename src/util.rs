//! Utility functions with platform-specific implementations.

use std::borrow::Cow;
use std::time::Duration;

/// Wall-clock timer for log summaries.
///
/// On WASM there is no monotonic clock in `std`, so the timer never reports.
pub struct Stopwatch {
    #[cfg(not(target_arch = "wasm32"))]
    started: std::time::Instant,
}

impl Stopwatch {
    #[cfg(not(target_arch = "wasm32"))]
    pub fn start() -> Self {
        Self {
            started: std::time::Instant::now(),
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn start() -> Self {
        Self {}
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn elapsed(&self) -> Option<Duration> {
        Some(self.started.elapsed())
    }

    #[cfg(target_arch = "wasm32")]
    pub fn elapsed(&self) -> Option<Duration> {
        None
    }
}

/// Decode an article body to a string.
///
/// 1. UTF-8 (a BOM is handled by encoding_rs)
/// 2. The `hint_encoding` label, or a charset declared in the markup itself
/// 3. Windows-1252, which accepts any byte sequence
///
/// Borrows when the input is already valid UTF-8.
pub fn decode_text<'a>(bytes: &'a [u8], hint_encoding: Option<&str>) -> Cow<'a, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);
    if !malformed {
        return result;
    }

    let label = hint_encoding.or_else(|| declared_charset(bytes));
    if let Some(name) = label
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Charset named by `<meta charset=...>` or an XML declaration's
/// `encoding=...` near the start of the document.
pub fn declared_charset(bytes: &[u8]) -> Option<&str> {
    let prefix = &bytes[..bytes.len().min(1024)];

    for key in [&b"charset="[..], &b"encoding="[..]] {
        let Some(pos) = prefix
            .windows(key.len())
            .position(|w| w.eq_ignore_ascii_case(key))
        else {
            continue;
        };
        let after = &prefix[pos + key.len()..];

        let (start, end) = match after.first() {
            Some(&quote @ (b'"' | b'\'')) => {
                let len = after[1..].iter().position(|&b| b == quote)?;
                (1, 1 + len)
            }
            Some(_) => {
                let len = after
                    .iter()
                    .position(|&b| {
                        b.is_ascii_whitespace() || matches!(b, b'>' | b'/' | b';' | b'"' | b'\'')
                    })
                    .unwrap_or(after.len());
                (0, len)
            }
            None => continue,
        };

        if end > start {
            return std::str::from_utf8(&after[start..end]).ok();
        }
    }
    None
}
