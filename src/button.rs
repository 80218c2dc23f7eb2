//! Semantic buttons and decoded button-state fragments.
//!
//! A device profile names its buttons; a button's id is its position in the
//! profile's button list. That id is what goes out on the wire, so it must stay
//! stable for a given profile.
//!
//! [`NesButton`] is the button set of the built-in NES pad profile.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Buttons of an NES-style pad, in wire-id order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NesButton {
    Up,
    Down,
    Left,
    Right,
    Select,
    Start,
    A,
    B,
}

impl NesButton {
    /// All buttons in wire-id order.
    pub const ALL: [NesButton; 8] = [
        NesButton::Up,
        NesButton::Down,
        NesButton::Left,
        NesButton::Right,
        NesButton::Select,
        NesButton::Start,
        NesButton::A,
        NesButton::B,
    ];

    /// Wire id (index into the profile button list).
    #[inline]
    pub const fn id(self) -> u16 {
        self as u16
    }

    /// Profile name of the button.
    pub const fn name(self) -> &'static str {
        match self {
            NesButton::Up => "UP",
            NesButton::Down => "DOWN",
            NesButton::Left => "LEFT",
            NesButton::Right => "RIGHT",
            NesButton::Select => "SELECT",
            NesButton::Start => "START",
            NesButton::A => "A",
            NesButton::B => "B",
        }
    }

    pub fn from_id(id: u16) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }
}

impl fmt::Display for NesButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One decoded report: a pressed flag for every button of the profile.
///
/// Always fully populated. Produced by a [`ReportParser`](crate::decoder::ReportParser),
/// consumed by [`StateStore::apply`](crate::state::StateStore::apply).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ButtonStates(Vec<bool>);

impl ButtonStates {
    /// A fragment with every button released.
    pub fn released(button_count: usize) -> Self {
        Self(vec![false; button_count])
    }

    pub fn from_vec(states: Vec<bool>) -> Self {
        Self(states)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Pressed flag for button `id` (`false` when out of range).
    #[inline]
    pub fn is_pressed(&self, id: u16) -> bool {
        self.0.get(id as usize).copied().unwrap_or(false)
    }

    pub(crate) fn set(&mut self, id: usize, pressed: bool) {
        if let Some(slot) = self.0.get_mut(id) {
            *slot = pressed;
        }
    }

    /// `(button id, pressed)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, bool)> + '_ {
        self.0.iter().enumerate().map(|(i, &p)| (i as u16, p))
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }
}
