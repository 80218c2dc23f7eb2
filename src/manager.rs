//! The polling loop.
//!
//! [`Manager`] owns everything the sync core needs (slot table, decoder, state
//! store and emitter) and advances it one [`tick`](Manager::tick) at a time.
//! The host decides the cadence; a tick never blocks and never spins.
//!
//! Per tick, for every active slot:
//! 1. one non-blocking read
//! 2. `Ok(0)`: nothing to do
//! 3. read error: logged, slot stays active
//! 4. report of the wrong length: logged and discarded, state untouched
//! 5. otherwise: decode, diff against the state store, emit one message per transition
//!
//! Nothing in a tick is fatal, and one device's failure never affects another.

use crate::decoder::{ReportParser, TableDecoder};
use crate::device::ReportSource;
use crate::emitter::{EmitStats, Emitter};
use crate::error::{ProfileError, SlotError};
use crate::profile::DeviceProfile;
use crate::sink::EventSink;
use crate::slots::{DeviceSlots, MAX_DEVICES, MAX_DEVICES_LIMIT};
use crate::snapshot::{DeviceState, Snapshot};
use crate::state::StateStore;
use tracing::{debug, error, info, warn};

/// Minimum scratch buffer for reads. Larger than any report we decode so an
/// oversized report shows up as a length mismatch instead of being truncated.
const READ_BUF_LEN: usize = 256;

/// What happened during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Slots read.
    pub polled: usize,
    /// Reads that returned a report of the expected length.
    pub reports: usize,
    /// Reads that returned no data.
    pub idle: usize,
    pub read_errors: usize,
    /// Reports discarded for having the wrong length.
    pub malformed: usize,
    /// State changes detected.
    pub transitions: usize,
    /// Transitions the sink failed to accept.
    pub send_failures: usize,
}

pub struct Manager<S> {
    slots: DeviceSlots<Box<dyn ReportSource>>,
    parser: Box<dyn ReportParser>,
    store: StateStore,
    emitter: Emitter<S>,
    buf: Vec<u8>,
}

impl<S: EventSink> Manager<S> {
    /// Manager for `profile` with [`MAX_DEVICES`] slots.
    pub fn new(profile: &DeviceProfile, sink: S) -> Result<Self, ProfileError> {
        Self::with_capacity(profile, sink, MAX_DEVICES)
    }

    pub fn with_capacity(
        profile: &DeviceProfile,
        sink: S,
        capacity: usize,
    ) -> Result<Self, ProfileError> {
        let parser = TableDecoder::from_profile(profile)?;
        Ok(Self::from_parts(Box::new(parser), Emitter::new(sink), capacity))
    }

    /// Assemble a manager from a custom parser and a preconfigured emitter.
    ///
    /// `capacity` is clamped to [`MAX_DEVICES_LIMIT`].
    pub fn from_parts(parser: Box<dyn ReportParser>, emitter: Emitter<S>, capacity: usize) -> Self {
        if capacity > MAX_DEVICES_LIMIT {
            warn!(capacity, limit = MAX_DEVICES_LIMIT, "slot capacity clamped");
        }
        let slots = DeviceSlots::with_capacity(capacity);
        let store = StateStore::new(slots.capacity(), parser.button_count());
        let buf = vec![0u8; READ_BUF_LEN.max(parser.report_len() + 1)];
        Self {
            slots,
            parser,
            store,
            emitter,
            buf,
        }
    }

    /// Register an opened device. Its slot starts with every button released.
    pub fn add_device(&mut self, source: impl ReportSource + 'static) -> Result<usize, SlotError> {
        let id = source.id().to_string();
        let index = self.slots.register(Box::new(source))?;
        info!(slot = index, device = %id, "device added");
        Ok(index)
    }

    /// Handle a disconnect notification: the device handle is dropped and the
    /// slot stops being polled, but keeps its index. Returns whether the slot
    /// was active.
    pub fn disconnect(&mut self, index: usize) -> Result<bool, SlotError> {
        let was_active = self.slots.deactivate(index)?;
        if was_active {
            info!(slot = index, "device disconnected");
        }
        Ok(was_active)
    }

    /// Run one polling pass over every active slot.
    pub fn tick(&mut self) -> TickStats {
        let mut stats = TickStats::default();

        for (index, source) in self.slots.iter_active_mut() {
            stats.polled += 1;

            let n = match source.read(&mut self.buf) {
                Ok(0) => {
                    stats.idle += 1;
                    continue;
                }
                Ok(n) => n,
                Err(e) => {
                    warn!(slot = index, error = %e, "read failed");
                    stats.read_errors += 1;
                    continue;
                }
            };

            let fragment = match self.parser.decode(&self.buf[..n]) {
                Ok(f) => f,
                Err(e) => {
                    warn!(slot = index, error = %e, "report discarded");
                    stats.malformed += 1;
                    continue;
                }
            };
            stats.reports += 1;

            let transitions = match self.store.apply(index, &fragment) {
                Ok(t) => t,
                Err(e) => {
                    error!(slot = index, error = %e, "state store rejected report");
                    continue;
                }
            };

            for t in &transitions {
                stats.transitions += 1;
                debug!(
                    slot = index,
                    button = self.parser.button_name(t.button).unwrap_or("?"),
                    pressed = t.pressed,
                    "transition"
                );
                if let Err(e) = self.emitter.emit(t) {
                    warn!(slot = index, button = t.button, error = %e, "event not delivered");
                    stats.send_failures += 1;
                }
            }
        }

        stats
    }

    /// Current button states of every registered device, by button name.
    pub fn snapshot(&self) -> Snapshot {
        let mut out = Snapshot::default();
        for slot in self.slots.iter() {
            let Ok(states) = self.store.device_state(slot.index()) else {
                continue;
            };
            let buttons = states
                .iter()
                .map(|(id, pressed)| {
                    let name = self
                        .parser
                        .button_name(id)
                        .map_or_else(|| id.to_string(), str::to_string);
                    (name, pressed)
                })
                .collect();
            out.0.insert(
                slot.index(),
                DeviceState {
                    active: slot.is_active(),
                    buttons,
                },
            );
        }
        out
    }

    pub fn slots(&self) -> &DeviceSlots<Box<dyn ReportSource>> {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut DeviceSlots<Box<dyn ReportSource>> {
        &mut self.slots
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn parser(&self) -> &dyn ReportParser {
        self.parser.as_ref()
    }

    pub fn emit_stats(&self) -> EmitStats {
        self.emitter.stats()
    }

    pub fn sink(&self) -> &S {
        self.emitter.sink()
    }

    pub fn sink_mut(&mut self) -> &mut S {
        self.emitter.sink_mut()
    }
}
