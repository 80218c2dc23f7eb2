//! padsync: HID gamepad state synchronization.
//!
//! Polls raw HID input reports, decodes them into semantic button states with a
//! data-driven decode table, diffs them against the last known state and sends
//! exactly one message per press/release to an event sink.
//!
//! ```
//! use padsync::{DeviceProfile, Manager, RecordingSink, VirtualDevice};
//!
//! let mut mgr = Manager::new(&DeviceProfile::nes(), RecordingSink::new()).unwrap();
//! let pad = VirtualDevice::new("virtual:0", "Virtual NES pad");
//! pad.feed([0xF0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]); // UP held
//! mgr.add_device(pad).unwrap();
//!
//! mgr.tick();
//! assert_eq!(mgr.sink().messages()[0].args, vec![0, 0, 1]);
//! ```

pub mod backends;
pub mod button;
pub mod config;
pub mod decoder;
pub mod device;
pub mod emitter;
pub mod error;
pub mod event;
pub mod manager;
pub mod profile;
pub mod sink;
pub mod slots;
pub mod snapshot;
pub mod state;

pub use backends::{VirtualDevice, VirtualFeed};
pub use button::{ButtonStates, NesButton};
pub use config::{Config, SinkConfig, SinkKind};
pub use decoder::{ReportParser, TableDecoder};
pub use device::ReportSource;
pub use emitter::Emitter;
pub use error::*;
pub use event::{Message, Transition, STATE_ADDRESS};
pub use manager::{Manager, TickStats};
pub use profile::{DecodeTable, DeviceProfile, FieldRule};
pub use sink::{EventSink, JsonSink, LogSink, OscUdpSink, RecordingSink};
pub use slots::{DeviceSlots, MAX_DEVICES, MAX_DEVICES_LIMIT};
pub use snapshot::Snapshot;
pub use state::StateStore;
