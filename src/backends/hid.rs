//! `hidapi` backend.
//!
//! Discovery filters the system device list by the profile's VID/PID, opens
//! every match in non-blocking mode and registers it into the slot table until
//! the table is full.

use crate::device::ReportSource;
use crate::error::{OpenError, ReadError, SlotError};
use crate::profile::DeviceProfile;
use crate::slots::DeviceSlots;
use hidapi::{DeviceInfo, HidApi, HidDevice};
use tracing::{debug, info, warn};

/// An open HID device.
pub struct HidReportSource {
    id: String,
    name: String,
    raw: HidDevice,
}

impl HidReportSource {
    /// Open `info` and switch it to non-blocking reads.
    pub fn open(info: &DeviceInfo, api: &HidApi) -> Result<Self, OpenError> {
        let path = info.path().to_string_lossy().into_owned();
        let raw = info.open_device(api).map_err(|e| OpenError {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        // The loop polls once per tick; a blocking read would stall every other device.
        raw.set_blocking_mode(false).map_err(|e| OpenError {
            path: path.clone(),
            reason: format!("cannot enable non-blocking mode: {e}"),
        })?;

        Ok(Self {
            name: info.product_string().unwrap_or("Unknown").to_string(),
            id: path,
            raw,
        })
    }
}

impl ReportSource for HidReportSource {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, ReadError> {
        self.raw.read(buf).map_err(|e| ReadError {
            device: self.id.clone(),
            reason: e.to_string(),
        })
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Outcome of one discovery pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeSummary {
    /// Devices matching the profile's VID/PID.
    pub matched: usize,
    /// Slot indices assigned in this pass.
    pub registered: Vec<usize>,
    /// Devices that failed to open.
    pub open_failed: usize,
    /// Matching devices ignored because the slot table was full.
    pub ignored: usize,
}

/// Open and register every device matching `profile`.
///
/// Open failures are logged and skipped. Once the table is full the remaining
/// matches are counted as ignored and left closed.
pub fn probe_devices(
    api: &HidApi,
    profile: &DeviceProfile,
    slots: &mut DeviceSlots<Box<dyn ReportSource>>,
) -> ProbeSummary {
    let mut summary = ProbeSummary::default();

    let matching = api
        .device_list()
        .filter(|d| d.vendor_id() == profile.vendor_id && d.product_id() == profile.product_id);

    for info in matching {
        summary.matched += 1;

        if slots.is_full() {
            summary.ignored += 1;
            continue;
        }

        let source = match HidReportSource::open(info, api) {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "skipping device");
                summary.open_failed += 1;
                continue;
            }
        };

        let (id, name) = (source.id().to_string(), source.name().to_string());
        match slots.register(Box::new(source)) {
            Ok(index) => {
                info!(slot = index, %name, path = %id, "device registered");
                summary.registered.push(index);
            }
            Err(e @ SlotError::CapacityExceeded { .. }) => {
                warn!(error = %e, path = %id, "device ignored");
                summary.ignored += 1;
            }
            Err(e) => debug!(error = %e, "unexpected slot error"),
        }
    }

    if summary.ignored > 0 {
        warn!(
            ignored = summary.ignored,
            capacity = slots.capacity(),
            "more {} devices than slots",
            profile.name
        );
    }
    info!(
        profile = %profile.name,
        vid = format_args!("0x{:04x}", profile.vendor_id),
        pid = format_args!("0x{:04x}", profile.product_id),
        found = summary.matched,
        opened = summary.registered.len(),
        "discovery finished"
    );

    summary
}
