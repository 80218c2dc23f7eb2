//! Report source backends.
//!
//! Implementations of [`ReportSource`](crate::device::ReportSource).
//!
//! # Feature flags
//! - **`hid`**: enables the `hidapi` backend and VID/PID discovery.
//!
//! [`virtual_input`] is always available; it backs the test suite and lets a
//! host feed reports from somewhere other than a HID device.

#[cfg(feature = "hid")]
#[cfg_attr(docsrs, doc(cfg(feature = "hid")))]
pub mod hid;

pub mod virtual_input;

#[cfg(feature = "hid")]
pub use hid::{probe_devices, HidReportSource, ProbeSummary};
pub use virtual_input::{VirtualDevice, VirtualFeed};
