//! Crate for talking to JoyCore game controllers over their USB serial
//! command interface.
//!
//! The controller speaks a line protocol: the host writes a keyword with an
//! optional argument followed by `\n`, and the controller answers with zero
//! or more text lines. Some responses end with a known marker line; the rest
//! are collected until a timeout passes.

pub use joycore_config as config;

use std::{future::Future, io, time::Duration};

use log::{debug, trace};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt},
    time::{timeout_at, Instant},
};

pub mod commands;
pub mod probe;
pub mod report;
#[cfg(feature = "serial")]
pub mod serial;

use crate::commands::Command;

/// How long to wait for a response to finish when it has no end marker.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(2);

/// Whether `line` ends a response.
pub fn is_end_marker(line: &str) -> bool {
    line == "END_FILES" || line.starts_with("ERROR:") || line.starts_with("FILE_DATA:")
}

/// Collects response lines from `reader`.
///
/// Lines are decoded as lossy UTF-8 and trimmed, and blank lines are skipped.
/// Reading stops after an end marker (see [`is_end_marker`]), at EOF, or once
/// `timeout` has passed since the call. Running out of time is not an error;
/// whatever arrived before then is returned.
pub async fn read_response<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    timeout: Duration,
) -> io::Result<Vec<String>> {
    let deadline = Instant::now() + timeout;
    let mut lines = Vec::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();

        let Ok(read) = timeout_at(deadline, reader.read_until(b'\n', &mut buf)).await else {
            debug!("Response timed out after {} lines", lines.len());
            break;
        };
        if read? == 0 {
            break;
        }

        let line = String::from_utf8_lossy(&buf).trim().to_string();
        if line.is_empty() {
            continue;
        }

        trace!("received line: {line:?}");

        let done = is_end_marker(&line);
        lines.push(line);

        if done {
            break;
        }
    }

    Ok(lines)
}

/// Writes `command` followed by a newline and flushes.
pub async fn write_command<W: AsyncWrite + Unpin>(writer: &mut W, command: &str) -> io::Result<()> {
    trace!("sent command: {command:?}");

    writer.write_all(command.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}

/// Represents an open command channel to a JoyCore controller.
#[allow(async_fn_in_trait)]
pub trait Connection {
    type Error: std::error::Error + From<io::Error>;

    /// Sends a raw command line and collects its response lines.
    ///
    /// Commands are sent one at a time. Nothing is retried.
    fn send_command(&mut self, command: &str) -> impl Future<Output = Result<Vec<String>, Self::Error>>;

    /// Executes a [`Command`].
    fn execute_command<C: Command>(
        &mut self,
        command: C,
    ) -> impl Future<Output = Result<C::Output, Self::Error>> {
        command.execute(self)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::io::AsyncWriteExt;

    use super::{is_end_marker, read_response, write_command};

    const TIMEOUT: Duration = Duration::from_millis(200);

    #[test]
    fn end_markers() {
        assert!(is_end_marker("END_FILES"));
        assert!(is_end_marker("ERROR: File not found"));
        assert!(is_end_marker("FILE_DATA:/config.bin:4:4A4F5943"));
        assert!(!is_end_marker("FILES:"));
        assert!(!is_end_marker("END_FILES_EXTRA"));
    }

    #[tokio::test]
    async fn stops_at_end_marker() {
        let mut data = b"FILES:\r\n/config.bin\r\n\r\nEND_FILES\r\nSTRAY\n".as_slice();
        let lines = read_response(&mut data, TIMEOUT).await.unwrap();

        assert_eq!(lines, ["FILES:", "/config.bin", "END_FILES"]);
        assert_eq!(data, b"STRAY\n");
    }

    #[tokio::test]
    async fn stops_at_error_line() {
        let mut data = b"ERROR: no such file\nFILE_DATA:x:0:\n".as_slice();
        let lines = read_response(&mut data, TIMEOUT).await.unwrap();

        assert_eq!(lines, ["ERROR: no such file"]);
    }

    #[tokio::test]
    async fn lossy_lines_until_eof() {
        let mut data = b"  STATUS:OK \n\xFFbad\n".as_slice();
        let lines = read_response(&mut data, TIMEOUT).await.unwrap();

        assert_eq!(lines, ["STATUS:OK", "\u{FFFD}bad"]);
    }

    #[tokio::test]
    async fn timeout_returns_collected_lines() {
        let (mut device, host) = tokio::io::duplex(64);
        device.write_all(b"STORAGE_INITIALIZED:YES\n").await.unwrap();

        let mut host = tokio::io::BufReader::new(host);
        let lines = read_response(&mut host, Duration::from_millis(50)).await.unwrap();

        assert_eq!(lines, ["STORAGE_INITIALIZED:YES"]);
        drop(device);
    }

    #[tokio::test]
    async fn writes_newline() {
        let mut out = Vec::new();
        write_command(&mut out, "READ_FILE /config.bin").await.unwrap();

        assert_eq!(out, b"READ_FILE /config.bin\n");
    }
}
