//! Per-device button state and transition detection.
//!
//! [`StateStore`] is a flat arena of booleans, one row of `button_count` per
//! device, addressed by `(device index, button id)`. Every row within
//! `capacity` reads as all released until [`StateStore::apply`] first writes
//! it. Rows are allocated on first write, up to the highest device written.

use crate::button::ButtonStates;
use crate::error::StateError;
use crate::event::Transition;

/// Last-known pressed state of every button on every device slot.
#[derive(Debug, Clone)]
pub struct StateStore {
    capacity: usize,
    button_count: usize,
    pressed: Vec<bool>,
}

impl StateStore {
    pub fn new(capacity: usize, button_count: usize) -> Self {
        Self {
            capacity,
            button_count,
            pressed: Vec::new(),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn button_count(&self) -> usize {
        self.button_count
    }

    fn row(&self, device: usize) -> Result<std::ops::Range<usize>, StateError> {
        let out_of_range = || StateError::DeviceOutOfRange {
            index: device,
            capacity: self.capacity,
        };
        if device >= self.capacity {
            return Err(out_of_range());
        }
        let start = device
            .checked_mul(self.button_count)
            .ok_or_else(out_of_range)?;
        let end = start
            .checked_add(self.button_count)
            .ok_or_else(out_of_range)?;
        Ok(start..end)
    }

    /// Stored row of `device`, `None` if it was never written.
    fn stored(&self, device: usize) -> Result<Option<&[bool]>, StateError> {
        let row = self.row(device)?;
        Ok(self.pressed.get(row))
    }

    /// Diff `fragment` against the stored state of `device`.
    ///
    /// Returns one [`Transition`] per button whose state differs, in button id
    /// order, and stores the new state. Unchanged buttons produce nothing, so
    /// applying the same fragment twice yields no transitions the second time.
    pub fn apply(
        &mut self,
        device: usize,
        fragment: &ButtonStates,
    ) -> Result<Vec<Transition>, StateError> {
        if fragment.len() != self.button_count {
            return Err(StateError::FragmentWidth {
                expected: self.button_count,
                actual: fragment.len(),
            });
        }
        let row = self.row(device)?;
        if self.pressed.len() < row.end {
            self.pressed.resize(row.end, false);
        }

        let mut transitions = Vec::new();
        for ((button, pressed), stored) in fragment.iter().zip(&mut self.pressed[row]) {
            if *stored != pressed {
                *stored = pressed;
                transitions.push(Transition {
                    device_index: device,
                    button,
                    pressed,
                });
            }
        }
        Ok(transitions)
    }

    /// Stored state of one button.
    pub fn get(&self, device: usize, button: u16) -> Result<bool, StateError> {
        let stored = self.stored(device)?;
        if usize::from(button) >= self.button_count {
            return Err(StateError::ButtonOutOfRange {
                button,
                count: self.button_count,
            });
        }
        Ok(stored.is_some_and(|row| row[usize::from(button)]))
    }

    /// Copy of the stored state of `device`.
    pub fn device_state(&self, device: usize) -> Result<ButtonStates, StateError> {
        Ok(match self.stored(device)? {
            Some(row) => ButtonStates::from_vec(row.to_vec()),
            None => ButtonStates::released(self.button_count),
        })
    }
}
