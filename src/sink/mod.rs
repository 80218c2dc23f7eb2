//! Event sinks.
//!
//! An [`EventSink`] accepts outbound messages for delivery. The sync core only
//! ever calls [`EventSink::send`]; how (or whether) the message leaves the
//! process is the sink's business.
//!
//! Provided sinks:
//! - [`OscUdpSink`]: fires each message as an OSC packet over UDP (broadcast by default)
//! - [`LogSink`]: logs each message through `tracing`
//! - [`JsonSink`]: writes one JSON object per line to any `Write`
//! - [`RecordingSink`]: keeps messages in memory, for tests and embedding hosts
//!
//! Sends are expected to be non-blocking, best-effort enqueues.

mod log;
mod osc;

pub use self::log::{JsonSink, LogSink};
pub use self::osc::{encode_message, OscUdpSink};

use crate::error::SinkError;
use crate::event::Message;

/// Capability that delivers messages somewhere outside the sync core.
pub trait EventSink: Send {
    /// Deliver one message. Must not block.
    fn send(&mut self, address: &str, args: &[i32]) -> Result<(), SinkError>;
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn send(&mut self, address: &str, args: &[i32]) -> Result<(), SinkError> {
        (**self).send(address, args)
    }
}

/// In-memory sink that records every delivered message.
///
/// Can be told to reject the next `n` sends to exercise failure paths.
#[derive(Debug, Default)]
pub struct RecordingSink {
    messages: Vec<Message>,
    fail_next: usize,
    rejected: usize,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages delivered so far, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Drain recorded messages.
    pub fn take(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.messages)
    }

    /// Reject the next `n` sends with [`SinkError::Rejected`].
    pub fn fail_next(&mut self, n: usize) {
        self.fail_next = n;
    }

    /// Number of sends rejected so far.
    pub fn rejected(&self) -> usize {
        self.rejected
    }
}

impl EventSink for RecordingSink {
    fn send(&mut self, address: &str, args: &[i32]) -> Result<(), SinkError> {
        if self.fail_next > 0 {
            self.fail_next -= 1;
            self.rejected += 1;
            return Err(SinkError::Rejected(format!("{address} {args:?}")));
        }
        self.messages.push(Message::new(address, args.to_vec()));
        Ok(())
    }
}
