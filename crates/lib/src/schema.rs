//! # Schema Dump
//!
//! Reads the raw SQLite store back as text so it can be handed to the model as
//! the schema description. Bytes are decoded one-to-one as Latin-1, so binary
//! pages never cause a decoding failure.

use std::path::Path;
use tracing::{debug, error};

/// Reads the file at `path` and returns its contents as a Latin-1 string.
///
/// Line endings are normalized to `\n`. Any read failure is logged and reported
/// as `None`.
pub async fn read_schema_dump(path: impl AsRef<Path>) -> Option<String> {
    let path = path.as_ref();
    match tokio::fs::read(path).await {
        Ok(bytes) => {
            debug!(path = %path.display(), bytes = bytes.len(), "Read schema dump");
            Some(decode_latin1(&bytes))
        }
        Err(e) => {
            error!("error while reading file: {e}");
            None
        }
    }
}

/// Decodes bytes as Latin-1, turning `\r\n` and lone `\r` into `\n`.
pub fn decode_latin1(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    let mut iter = bytes.iter().copied().peekable();
    while let Some(b) = iter.next() {
        if b == b'\r' {
            if iter.peek() == Some(&b'\n') {
                iter.next();
            }
            out.push('\n');
        } else {
            out.push(char::from(b));
        }
    }
    out
}
