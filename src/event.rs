//! Transitions and outbound messages.
//!
//! A [`Transition`] is produced once per detected button state change and
//! consumed once by the [`Emitter`](crate::emitter::Emitter); nothing queues or
//! replays them.
//!
//! ## Wire convention
//! Each transition becomes one [`Message`] at address `/state` (configurable)
//! with three integer arguments:
//! - device index (slot)
//! - button id (position in the profile's button list)
//! - `1` for pressed, `0` for released

use crate::error::SinkError;
use serde::{Deserialize, Serialize};

/// Default message address.
pub const STATE_ADDRESS: &str = "/state";

/// One button changed state on one device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transition {
    /// Slot index of the device.
    pub device_index: usize,
    /// Button id within the device profile.
    pub button: u16,
    /// New state.
    pub pressed: bool,
}

impl Transition {
    /// Wire arguments: `[device_index, button, pressed as 0/1]`.
    ///
    /// Fails if the device index does not fit an int32 argument.
    pub fn args(&self) -> Result<[i32; 3], SinkError> {
        let device = i32::try_from(self.device_index).map_err(|_| {
            SinkError::Encode(format!(
                "device index {} does not fit an int32 argument",
                self.device_index
            ))
        })?;
        Ok([device, i32::from(self.button), i32::from(self.pressed)])
    }
}

/// Protocol-level message handed to an [`EventSink`](crate::sink::EventSink).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub address: String,
    pub args: Vec<i32>,
}

impl Message {
    pub fn new(address: impl Into<String>, args: impl Into<Vec<i32>>) -> Self {
        Self {
            address: address.into(),
            args: args.into(),
        }
    }

    pub fn from_transition(address: &str, t: &Transition) -> Result<Self, SinkError> {
        Ok(Self::new(address, t.args()?))
    }
}
