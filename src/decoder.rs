//! Report decoding.
//!
//! [`ReportParser`] turns one raw input report into a full [`ButtonStates`]
//! fragment. Parsers are pure: they take `&self`, keep no per-call state and
//! never touch the state store, so decoding the same bytes always yields the
//! same fragment.
//!
//! [`TableDecoder`] is the stock implementation, driven entirely by a compiled
//! [`DecodeTable`].

use crate::button::ButtonStates;
use crate::error::{DecodeError, ProfileError};
use crate::profile::{DecodeRule, DecodeTable, DeviceProfile};

/// Maps raw report bytes to semantic button states.
pub trait ReportParser: Send {
    /// Exact input report length this parser accepts.
    fn report_len(&self) -> usize;

    /// Number of buttons in every fragment this parser produces.
    fn button_count(&self) -> usize;

    /// Name of button `id`, if the parser knows one.
    fn button_name(&self, id: u16) -> Option<&str>;

    /// Decode one report.
    ///
    /// Fails with [`DecodeError::MalformedReport`] when `report.len()` differs
    /// from [`report_len`](Self::report_len).
    fn decode(&self, report: &[u8]) -> Result<ButtonStates, DecodeError>;
}

/// Decode-table driven parser.
#[derive(Debug, Clone)]
pub struct TableDecoder {
    table: DecodeTable,
}

impl TableDecoder {
    pub fn new(table: DecodeTable) -> Self {
        Self { table }
    }

    /// Compile `profile` and wrap the resulting table.
    pub fn from_profile(profile: &DeviceProfile) -> Result<Self, ProfileError> {
        Ok(Self::new(profile.compile()?))
    }

    pub fn table(&self) -> &DecodeTable {
        &self.table
    }
}

impl ReportParser for TableDecoder {
    fn report_len(&self) -> usize {
        self.table.report_len()
    }

    fn button_count(&self) -> usize {
        self.table.button_count()
    }

    fn button_name(&self, id: u16) -> Option<&str> {
        self.table.button_name(id)
    }

    fn decode(&self, report: &[u8]) -> Result<ButtonStates, DecodeError> {
        if report.len() != self.table.report_len() {
            return Err(DecodeError::MalformedReport {
                expected: self.table.report_len(),
                actual: report.len(),
            });
        }

        // Buttons no rule drives stay released.
        let mut out = ButtonStates::released(self.table.button_count());

        for rule in self.table.rules() {
            match *rule {
                DecodeRule::Axis {
                    byte,
                    low,
                    high,
                    low_button,
                    high_button,
                } => {
                    let v = report[byte];
                    out.set(low_button, v == low);
                    out.set(high_button, v == high);
                }
                DecodeRule::Bits {
                    byte,
                    mask,
                    ref bits,
                } => {
                    let v = report[byte];
                    let valid = v & !mask == 0;
                    for &(bit, button) in bits {
                        out.set(button, valid && v & (1 << bit) != 0);
                    }
                }
            }
        }

        Ok(out)
    }
}
