use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use log::trace;
use rep_counter_core::RepetitionEvent;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{ResultSink, SinkError};

/// Writes each event as one compact JSON object followed by a newline.
///
/// Every line is flushed as soon as it is written so a reader tailing the
/// file sees repetitions live.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
    written: u64,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Number of events written so far.
    #[inline]
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl JsonLinesSink<BufWriter<File>> {
    /// Open `path` for appending, creating it if needed.
    pub fn append(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> ResultSink for JsonLinesSink<W> {
    fn name(&self) -> &str {
        "jsonl"
    }

    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip_all, fields(frame = event.frame)))]
    fn deliver(&mut self, event: &RepetitionEvent) -> Result<(), SinkError> {
        let mut line = serde_json::to_vec(event)?;
        line.push(b'\n');
        self.writer.write_all(&line)?;
        self.writer.flush()?;
        self.written += 1;
        trace!("jsonl: wrote event #{} (frame {})", self.written, event.frame);
        Ok(())
    }
}
