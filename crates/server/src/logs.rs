use std::convert::Infallible;
use std::io::SeekFrom;
use std::path::Path;
use std::time::Duration;

use async_stream::stream;
use axum::response::sse::Event;
use futures::Stream;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader};
use tracing::warn;

/// Follows a log file from its current end, like `tail -f`
pub struct LogTail {
    reader: BufReader<File>,
    pending: String,
    poll_interval: Duration,
}

impl LogTail {
    pub async fn open(path: &Path, poll_interval: Duration) -> std::io::Result<Self> {
        let mut file = File::open(path).await?;
        file.seek(SeekFrom::End(0)).await?;
        Ok(Self {
            reader: BufReader::new(file),
            pending: String::new(),
            poll_interval,
        })
    }

    /// Wait for the next complete line, without its newline
    pub async fn next_line(&mut self) -> std::io::Result<String> {
        loop {
            let read = self.reader.read_line(&mut self.pending).await?;
            if self.pending.ends_with('\n') {
                let line = self.pending.trim_end_matches(['\r', '\n']).to_string();
                self.pending.clear();
                return Ok(line);
            }
            if read == 0 {
                // EOF, possibly mid-line: keep what we have and poll again
                tokio::time::sleep(self.poll_interval).await;
            }
        }
    }

    /// One SSE `data:` event per appended line
    pub fn into_events(mut self) -> impl Stream<Item = Result<Event, Infallible>> {
        stream! {
            loop {
                match self.next_line().await {
                    Ok(line) => yield Ok(Event::default().data(line)),
                    Err(e) => {
                        warn!("log stream closed: {}", e);
                        break;
                    }
                }
            }
        }
    }
}
