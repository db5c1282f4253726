//! Line-oriented input sources

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Stdin};
use tracing::warn;

/// Supplies operator input one line at a time
#[async_trait]
pub trait LineSource: Send {
    /// Wait for the next line, without its terminator; `None` at end of input
    async fn next_line(&mut self) -> std::io::Result<Option<String>>;

    /// Release the source once the session terminates
    async fn close(&mut self) {}
}

/// Reads `\n` or `\r\n` terminated lines from any async reader
///
/// Bytes that are not valid UTF-8 are replaced with U+FFFD rather than
/// failing the read.
pub struct ReaderLines<R> {
    reader: Option<BufReader<R>>,
    buf: Vec<u8>,
}

/// Reads lines from the process's standard input
pub type StdinLines = ReaderLines<Stdin>;

impl<R: AsyncRead + Unpin + Send> ReaderLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(BufReader::new(reader)),
            buf: Vec::new(),
        }
    }
}

impl StdinLines {
    pub fn stdin() -> Self {
        Self::new(tokio::io::stdin())
    }
}

#[async_trait]
impl<R: AsyncRead + Unpin + Send> LineSource for ReaderLines<R> {
    async fn next_line(&mut self) -> std::io::Result<Option<String>> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(None);
        };

        self.buf.clear();
        if reader.read_until(b'\n', &mut self.buf).await? == 0 {
            return Ok(None);
        }

        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }

        let line = match String::from_utf8(std::mem::take(&mut self.buf)) {
            Ok(line) => line,
            Err(e) => {
                warn!("Input line was not valid UTF-8; replacing invalid bytes");
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };
        Ok(Some(line))
    }

    async fn close(&mut self) {
        self.reader = None;
    }
}
