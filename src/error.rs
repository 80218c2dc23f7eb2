//! Error types.
//!
//! Every failure in the sync core is recoverable: the polling loop logs it and
//! moves on to the next slot (or the next tick). The enums are split by concern
//! so callers can match on exactly the condition they care about.

use std::path::PathBuf;
use thiserror::Error;

/// Device slot table failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    /// Every slot is occupied; the device was not registered.
    #[error("device slot table is full ({capacity} slots)")]
    CapacityExceeded { capacity: usize },

    /// No slot with this index has been registered.
    #[error("no device registered at slot {0}")]
    NotFound(usize),

    /// The slot exists but its device has disconnected.
    #[error("device at slot {0} is disconnected")]
    Inactive(usize),
}

/// Report decoding failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The report length does not match the profile's fixed report size.
    #[error("malformed report: expected {expected} bytes, got {actual}")]
    MalformedReport { expected: usize, actual: usize },
}

/// State store failures. These indicate a wiring bug between the slot table,
/// decoder and store rather than bad device input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("device index {index} out of range (capacity {capacity})")]
    DeviceOutOfRange { index: usize, capacity: usize },

    #[error("fragment has {actual} buttons, store tracks {expected}")]
    FragmentWidth { expected: usize, actual: usize },

    #[error("button {button} out of range ({count} buttons)")]
    ButtonOutOfRange { button: u16, count: usize },
}

/// A non-blocking read failed. Treated as transient.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("read from {device} failed: {reason}")]
pub struct ReadError {
    pub device: String,
    pub reason: String,
}

/// A discovered device could not be opened.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to open {path}: {reason}")]
pub struct OpenError {
    pub path: String,
    pub reason: String,
}

/// Event delivery failures reported by an [`EventSink`](crate::sink::EventSink).
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode message: {0}")]
    Encode(String),

    #[error("sink rejected message: {0}")]
    Rejected(String),
}

/// Device profile loading and validation failures.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to read profile {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse profile: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("profile defines no buttons")]
    NoButtons,

    #[error("profile defines {0} buttons, at most 65536 are addressable")]
    TooManyButtons(usize),

    #[error("report length must be non-zero")]
    ZeroReportLen,

    #[error("button {0:?} is listed more than once")]
    DuplicateButton(String),

    #[error("field refers to unknown button {0:?}")]
    UnknownButton(String),

    #[error("button {0:?} is driven by more than one field")]
    ButtonMappedTwice(String),

    #[error("field reads byte {byte}, but reports are only {report_len} bytes")]
    ByteOutOfRange { byte: usize, report_len: usize },

    #[error("bit {0} is out of range (0..=7)")]
    BitOutOfRange(u8),

    #[error("axis field on byte {byte} uses the same sentinel 0x{value:02x} for both directions")]
    AxisSentinelsEqual { byte: usize, value: u8 },
}

/// Configuration file failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error(transparent)]
    Profile(#[from] ProfileError),
}
