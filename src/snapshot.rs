//! Per-tick snapshot of button states.
//!
//! [`Snapshot`] is an **owned**, read-only view of every registered device's
//! button states at a point in time. It is produced by
//! [`Manager::snapshot`](crate::manager::Manager::snapshot) and is cheap to
//! clone for fan-out (for example to drive visual feedback).
//!
//! # Semantics
//! - Keys are slot indices; values map button names to pressed flags.
//! - A snapshot does **not** poll devices; it reflects the state store after the
//!   last tick.
//!
//! # Example
//! ```
//! use padsync::{Manager, RecordingSink, DeviceProfile};
//!
//! let mgr = Manager::new(&DeviceProfile::nes(), RecordingSink::new()).unwrap();
//! let snap = mgr.snapshot();
//! assert!(snap.is_empty());
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Button states of one device.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceState {
    pub active: bool,
    pub buttons: BTreeMap<String, bool>,
}

impl DeviceState {
    /// State of a named button (`false` if unknown).
    pub fn get_button(&self, name: &str) -> bool {
        self.buttons.get(name).copied().unwrap_or(false)
    }

    /// Names of pressed buttons, alphabetically.
    pub fn pressed(&self) -> impl Iterator<Item = &str> {
        self.buttons
            .iter()
            .filter(|&(_, &p)| p)
            .map(|(n, _)| n.as_str())
    }
}

/// Owned snapshot (`slot index → DeviceState`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot(pub BTreeMap<usize, DeviceState>);

impl Snapshot {
    #[inline]
    pub fn get(&self, index: usize) -> Option<&DeviceState> {
        self.0.get(&index)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&usize, &DeviceState)> {
        self.0.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn into_inner(self) -> BTreeMap<usize, DeviceState> {
        self.0
    }
}
