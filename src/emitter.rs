//! Event emitter.
//!
//! Turns each [`Transition`] into a [`Message`] and hands it to the injected
//! [`EventSink`]. A failed send is returned to the caller and counted, never
//! retried: the next transition for the same button carries the newer state.

use crate::error::SinkError;
use crate::event::{Message, Transition, STATE_ADDRESS};
use crate::sink::EventSink;

/// Delivery counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitStats {
    pub sent: u64,
    pub failed: u64,
}

/// Owns the sink and the message address.
pub struct Emitter<S> {
    sink: S,
    address: String,
    stats: EmitStats,
}

impl<S: EventSink> Emitter<S> {
    /// Emitter publishing at [`STATE_ADDRESS`].
    pub fn new(sink: S) -> Self {
        Self::with_address(sink, STATE_ADDRESS)
    }

    pub fn with_address(sink: S, address: impl Into<String>) -> Self {
        Self {
            sink,
            address: address.into(),
            stats: EmitStats::default(),
        }
    }

    /// Build the message for `transition` and send it.
    pub fn emit(&mut self, transition: &Transition) -> Result<(), SinkError> {
        let sent = Message::from_transition(&self.address, transition)
            .and_then(|msg| self.sink.send(&msg.address, &msg.args));
        match sent {
            Ok(()) => {
                self.stats.sent += 1;
                Ok(())
            }
            Err(e) => {
                self.stats.failed += 1;
                Err(e)
            }
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn stats(&self) -> EmitStats {
        self.stats
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
