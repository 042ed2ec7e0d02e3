//! Response body to text conversion.
//!
//! Lines end at `\n`, `\r` or `\r\n`, are decoded lossily, joined with a
//! single `\n`, and the result is trimmed. The reader is taken by value so it
//! is released on every return path, including a failed read.

use std::io::{self, BufRead, BufReader, Read};

use crate::config::ReadMode;
use crate::error::ApiError;

/// Read `reader` to the end and return its trimmed text.
///
/// In [`ReadMode::BestEffort`] a read error is logged and the complete lines
/// read before it are returned. A line cut short by the error is discarded.
pub fn read_body<R: Read>(reader: R, mode: ReadMode) -> Result<String, ApiError> {
    let mut reader = BufReader::new(reader);
    let mut text = String::new();
    let mut line = Vec::new();
    // Set when the previous byte was `\r`, so a following `\n` is skipped.
    let mut after_cr = false;

    let outcome = loop {
        let buf = match reader.fill_buf() {
            Ok(buf) => buf,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => break Err(e),
        };
        if buf.is_empty() {
            if !line.is_empty() {
                push_line(&mut text, &line);
            }
            break Ok(());
        }
        for &byte in buf {
            match byte {
                b'\n' if after_cr => {}
                b'\n' | b'\r' => {
                    push_line(&mut text, &line);
                    line.clear();
                }
                _ => line.push(byte),
            }
            after_cr = byte == b'\r';
        }
        let consumed = buf.len();
        reader.consume(consumed);
    };
    drop(reader);

    match (outcome, mode) {
        (Ok(()), _) => Ok(text.trim().to_string()),
        (Err(e), ReadMode::BestEffort) => {
            tracing::warn!(
                error = %e,
                bytes_kept = text.len(),
                "response body read failed, returning partial content"
            );
            Ok(text.trim().to_string())
        }
        (Err(e), ReadMode::Strict) => Err(ApiError::Read(e.to_string())),
    }
}

fn push_line(text: &mut String, line: &[u8]) {
    text.push_str(&String::from_utf8_lossy(line));
    text.push('\n');
}
