//! Report sources.
//!
//! A [`ReportSource`] is an open device handle the polling loop can read raw
//! input reports from. Implementations must be non-blocking: a read with no
//! pending report returns `Ok(0)` immediately.

use crate::error::ReadError;

pub trait ReportSource: Send {
    /// Read at most one report into `buf`, returning the number of bytes written.
    ///
    /// `Ok(0)` means no report is pending. Errors are treated as transient.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, ReadError>;

    /// Stable identifier for logs (e.g. the OS device path).
    fn id(&self) -> &str;

    /// Human-readable name.
    fn name(&self) -> &str;
}

impl<D: ReportSource + ?Sized> ReportSource for Box<D> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, ReadError> {
        (**self).read(buf)
    }

    fn id(&self) -> &str {
        (**self).id()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
