//! Scripted in-memory report source.
//!
//! [`VirtualDevice`] replays whatever is queued through its [`VirtualFeed`]:
//! one queued read outcome per `read()` call, `Ok(0)` once the queue is empty.
//! The feed is a cloneable handle, so a test or host can keep pushing reports
//! after the device itself has been moved into a slot table.

use crate::device::ReportSource;
use crate::error::ReadError;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone)]
enum Scripted {
    Report(Vec<u8>),
    Empty,
    Error(String),
}

/// Producer handle for a [`VirtualDevice`].
#[derive(Debug, Clone, Default)]
pub struct VirtualFeed {
    queue: Arc<Mutex<VecDeque<Scripted>>>,
}

impl VirtualFeed {
    fn push(&self, item: Scripted) {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(item);
    }

    /// Queue a raw report for a future read.
    pub fn feed(&self, report: impl Into<Vec<u8>>) {
        self.push(Scripted::Report(report.into()));
    }

    /// Queue an explicit "no data" read.
    pub fn feed_empty(&self) {
        self.push(Scripted::Empty);
    }

    /// Queue a failing read.
    pub fn feed_error(&self, reason: impl Into<String>) {
        self.push(Scripted::Error(reason.into()));
    }

    /// Number of queued read outcomes.
    pub fn pending(&self) -> usize {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

pub struct VirtualDevice {
    id: String,
    name: String,
    feed: VirtualFeed,
}

impl VirtualDevice {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            feed: VirtualFeed::default(),
        }
    }

    /// Handle for queueing reads.
    pub fn feed_handle(&self) -> VirtualFeed {
        self.feed.clone()
    }

    /// Queue a raw report (shorthand for `feed_handle().feed(..)`).
    pub fn feed(&self, report: impl Into<Vec<u8>>) {
        self.feed.feed(report);
    }
}

impl ReportSource for VirtualDevice {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, ReadError> {
        let next = self
            .feed
            .queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        match next {
            None | Some(Scripted::Empty) => Ok(0),
            Some(Scripted::Report(bytes)) => {
                // Like a real HID read, anything past the buffer is lost.
                let n = bytes.len().min(buf.len());
                buf[..n].copy_from_slice(&bytes[..n]);
                Ok(n)
            }
            Some(Scripted::Error(reason)) => Err(ReadError {
                device: self.id.clone(),
                reason,
            }),
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replays_in_order_then_idles() {
        let mut dev = VirtualDevice::new("virtual:0", "Virtual Pad");
        let feed = dev.feed_handle();
        feed.feed(vec![1, 2, 3]);
        feed.feed_empty();
        feed.feed_error("unplugged");

        let mut buf = [0u8; 8];
        assert_eq!(dev.read(&mut buf), Ok(3));
        assert_eq!(&buf[..3], &[1, 2, 3]);
        assert_eq!(dev.read(&mut buf), Ok(0));
        assert_eq!(
            dev.read(&mut buf).unwrap_err().reason,
            "unplugged".to_string()
        );
        assert_eq!(dev.read(&mut buf), Ok(0));
        assert_eq!(feed.pending(), 0);
    }

    #[test]
    fn truncates_to_buffer() {
        let mut dev = VirtualDevice::new("v", "v");
        dev.feed(vec![9u8; 16]);
        let mut buf = [0u8; 4];
        assert_eq!(dev.read(&mut buf), Ok(4));
    }
}
