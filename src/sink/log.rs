//! Logging sinks.

use super::EventSink;
use crate::error::SinkError;
use crate::event::Message;
use std::io::Write;

/// Logs every message at `info` level. Never fails.
#[derive(Debug, Default)]
pub struct LogSink;

impl LogSink {
    pub fn new() -> Self {
        LogSink
    }
}

impl EventSink for LogSink {
    fn send(&mut self, address: &str, args: &[i32]) -> Result<(), SinkError> {
        tracing::info!(target: "padsync::event", address, ?args, "event");
        Ok(())
    }
}

/// Writes each message as a single JSON line (`{"address":"/state","args":[0,6,1]}`).
pub struct JsonSink<W> {
    out: W,
}

impl<W: Write + Send> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl JsonSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> EventSink for JsonSink<W> {
    fn send(&mut self, address: &str, args: &[i32]) -> Result<(), SinkError> {
        let msg = Message::new(address, args.to_vec());
        serde_json::to_writer(&mut self.out, &msg).map_err(|e| SinkError::Encode(e.to_string()))?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}
