//! Device profiles and decode tables.
//!
//! A [`DeviceProfile`] is plain, serializable configuration: which device to
//! look for (VID/PID), how long its input reports are, what its buttons are
//! called, and a list of [`FieldRule`]s mapping report bytes to buttons.
//! Supporting a new pad means writing a profile, not code.
//!
//! Profiles are compiled into a [`DecodeTable`] once (names resolved to
//! button ids, bounds checked) and the table is what the decoder runs.
//!
//! ## Rule kinds
//! - **`axis`**: one byte drives two mutually exclusive buttons. The byte equal
//!   to `low` presses `low_button`, equal to `high` presses `high_button`, and
//!   every other value releases both.
//! - **`bits`**: one byte carries independent button bits that may be set
//!   together. If the byte has any bit set outside the declared bits, every
//!   button of the field reads released.
//!
//! # Example
//! ```
//! use padsync::profile::DeviceProfile;
//!
//! let profile = DeviceProfile::from_toml_str(r#"
//!     name = "Two-button box"
//!     vendor_id = 0x1234
//!     product_id = 0x0001
//!     report_len = 2
//!     buttons = ["FIRE", "JUMP"]
//!
//!     [[fields]]
//!     kind = "bits"
//!     byte = 1
//!     bits = [{ bit = 0, button = "FIRE" }, { bit = 1, button = "JUMP" }]
//! "#).unwrap();
//! let table = profile.compile().unwrap();
//! assert_eq!(table.button_count(), 2);
//! ```

use crate::button::NesButton;
use crate::error::ProfileError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Vendor id of the Tomee NES USB controller.
pub const NES_VENDOR_ID: u16 = 0x12bd;
/// Product id of the Tomee NES USB controller.
pub const NES_PRODUCT_ID: u16 = 0xd015;
/// Input report length of the Tomee NES USB controller.
pub const NES_REPORT_LEN: usize = 8;

/// Serializable description of one device class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceProfile {
    /// Human-readable profile name (used in logs).
    pub name: String,
    pub vendor_id: u16,
    pub product_id: u16,
    /// Exact input report length in bytes.
    pub report_len: usize,
    /// Button names; a button's wire id is its position in this list.
    pub buttons: Vec<String>,
    /// Field-to-button mapping.
    #[serde(default)]
    pub fields: Vec<FieldRule>,
}

/// One entry of a profile's decode table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldRule {
    /// Two-direction axis byte with one sentinel value per direction.
    Axis {
        byte: usize,
        low: u8,
        high: u8,
        low_button: String,
        high_button: String,
    },
    /// Independent button bits within one byte.
    Bits { byte: usize, bits: Vec<BitButton> },
}

/// One bit of a [`FieldRule::Bits`] field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitButton {
    pub bit: u8,
    pub button: String,
}

impl DeviceProfile {
    /// Built-in profile for the Tomee NES USB controller.
    ///
    /// Byte 1 is the vertical axis, byte 0 the horizontal axis (`0x00` = up/left,
    /// `0xFF` = down/right, centred otherwise), byte 4 carries SELECT/START in
    /// bits 0/1 and byte 3 carries A/B in bits 0/1.
    pub fn nes() -> Self {
        let axis = |byte, low: NesButton, high: NesButton| FieldRule::Axis {
            byte,
            low: 0x00,
            high: 0xFF,
            low_button: low.name().to_string(),
            high_button: high.name().to_string(),
        };
        let bits = |byte, b0: NesButton, b1: NesButton| FieldRule::Bits {
            byte,
            bits: vec![
                BitButton {
                    bit: 0,
                    button: b0.name().to_string(),
                },
                BitButton {
                    bit: 1,
                    button: b1.name().to_string(),
                },
            ],
        };

        Self {
            name: "Tomee NES USB Controller".to_string(),
            vendor_id: NES_VENDOR_ID,
            product_id: NES_PRODUCT_ID,
            report_len: NES_REPORT_LEN,
            buttons: NesButton::ALL.iter().map(|b| b.name().to_string()).collect(),
            fields: vec![
                axis(1, NesButton::Up, NesButton::Down),
                axis(0, NesButton::Left, NesButton::Right),
                bits(4, NesButton::Select, NesButton::Start),
                bits(3, NesButton::A, NesButton::B),
            ],
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ProfileError> {
        Ok(toml::from_str(s)?)
    }

    /// Read a profile from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ProfileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Validate the profile and resolve it into a [`DecodeTable`].
    pub fn compile(&self) -> Result<DecodeTable, ProfileError> {
        if self.report_len == 0 {
            return Err(ProfileError::ZeroReportLen);
        }
        if self.buttons.is_empty() {
            return Err(ProfileError::NoButtons);
        }
        if self.buttons.len() > usize::from(u16::MAX) + 1 {
            return Err(ProfileError::TooManyButtons(self.buttons.len()));
        }

        let mut ids: HashMap<&str, usize> = HashMap::with_capacity(self.buttons.len());
        for (i, name) in self.buttons.iter().enumerate() {
            if ids.insert(name.as_str(), i).is_some() {
                return Err(ProfileError::DuplicateButton(name.clone()));
            }
        }

        let mut driven = vec![false; self.buttons.len()];
        let mut claim = |name: &str| -> Result<usize, ProfileError> {
            let id = *ids
                .get(name)
                .ok_or_else(|| ProfileError::UnknownButton(name.to_string()))?;
            if std::mem::replace(&mut driven[id], true) {
                return Err(ProfileError::ButtonMappedTwice(name.to_string()));
            }
            Ok(id)
        };
        let check_byte = |byte: usize| {
            if byte >= self.report_len {
                Err(ProfileError::ByteOutOfRange {
                    byte,
                    report_len: self.report_len,
                })
            } else {
                Ok(byte)
            }
        };

        let mut rules = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let rule = match field {
                FieldRule::Axis {
                    byte,
                    low,
                    high,
                    low_button,
                    high_button,
                } => {
                    let byte = check_byte(*byte)?;
                    if low == high {
                        return Err(ProfileError::AxisSentinelsEqual { byte, value: *low });
                    }
                    DecodeRule::Axis {
                        byte,
                        low: *low,
                        high: *high,
                        low_button: claim(low_button.as_str())?,
                        high_button: claim(high_button.as_str())?,
                    }
                }
                FieldRule::Bits { byte, bits } => {
                    let byte = check_byte(*byte)?;
                    let mut mask = 0u8;
                    let mut mapped = Vec::with_capacity(bits.len());
                    for b in bits {
                        if b.bit > 7 {
                            return Err(ProfileError::BitOutOfRange(b.bit));
                        }
                        mask |= 1 << b.bit;
                        mapped.push((b.bit, claim(b.button.as_str())?));
                    }
                    DecodeRule::Bits {
                        byte,
                        mask,
                        bits: mapped,
                    }
                }
            };
            rules.push(rule);
        }

        Ok(DecodeTable {
            report_len: self.report_len,
            button_names: self.buttons.clone(),
            rules,
        })
    }
}

/// A validated decode table with button names resolved to ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeTable {
    report_len: usize,
    button_names: Vec<String>,
    rules: Vec<DecodeRule>,
}

/// Compiled form of a [`FieldRule`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeRule {
    Axis {
        byte: usize,
        low: u8,
        high: u8,
        low_button: usize,
        high_button: usize,
    },
    Bits {
        byte: usize,
        mask: u8,
        bits: Vec<(u8, usize)>,
    },
}

impl DecodeTable {
    #[inline]
    pub fn report_len(&self) -> usize {
        self.report_len
    }

    #[inline]
    pub fn button_count(&self) -> usize {
        self.button_names.len()
    }

    pub fn button_names(&self) -> &[String] {
        &self.button_names
    }

    pub fn button_name(&self, id: u16) -> Option<&str> {
        self.button_names.get(id as usize).map(String::as_str)
    }

    pub fn rules(&self) -> &[DecodeRule] {
        &self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nes_profile_compiles() {
        let table = DeviceProfile::nes().compile().unwrap();
        assert_eq!(table.report_len(), NES_REPORT_LEN);
        assert_eq!(table.button_count(), 8);
        assert_eq!(table.button_name(NesButton::Start.id()), Some("START"));
        assert_eq!(table.rules().len(), 4);
    }

    #[test]
    fn nes_profile_survives_toml() {
        let text = toml::to_string(&DeviceProfile::nes()).unwrap();
        let back = DeviceProfile::from_toml_str(&text).unwrap();
        assert_eq!(back, DeviceProfile::nes());
    }

    #[test]
    fn parses_hex_ids_and_tagged_fields() {
        let p = DeviceProfile::from_toml_str(
            r#"
            name = "pad"
            vendor_id = 0x12bd
            product_id = 0xd015
            report_len = 3
            buttons = ["L", "R", "X"]

            [[fields]]
            kind = "axis"
            byte = 0
            low = 0
            high = 255
            low_button = "L"
            high_button = "R"

            [[fields]]
            kind = "bits"
            byte = 2
            bits = [{ bit = 7, button = "X" }]
            "#,
        )
        .unwrap();
        assert_eq!(p.vendor_id, 0x12bd);
        let table = p.compile().unwrap();
        assert_eq!(
            table.rules()[1],
            DecodeRule::Bits {
                byte: 2,
                mask: 0x80,
                bits: vec![(7, 2)]
            }
        );
    }

    fn base() -> DeviceProfile {
        DeviceProfile {
            name: "t".into(),
            vendor_id: 1,
            product_id: 2,
            report_len: 2,
            buttons: vec!["A".into(), "B".into()],
            fields: vec![],
        }
    }

    #[test]
    fn rejects_unknown_button() {
        let mut p = base();
        p.fields.push(FieldRule::Bits {
            byte: 0,
            bits: vec![BitButton {
                bit: 0,
                button: "C".into(),
            }],
        });
        assert!(matches!(p.compile(), Err(ProfileError::UnknownButton(n)) if n == "C"));
    }

    #[test]
    fn rejects_byte_outside_report() {
        let mut p = base();
        p.fields.push(FieldRule::Bits {
            byte: 2,
            bits: vec![],
        });
        assert!(matches!(
            p.compile(),
            Err(ProfileError::ByteOutOfRange {
                byte: 2,
                report_len: 2
            })
        ));
    }

    #[test]
    fn rejects_button_driven_twice() {
        let mut p = base();
        p.fields.push(FieldRule::Bits {
            byte: 0,
            bits: vec![
                BitButton {
                    bit: 0,
                    button: "A".into(),
                },
                BitButton {
                    bit: 1,
                    button: "A".into(),
                },
            ],
        });
        assert!(matches!(p.compile(), Err(ProfileError::ButtonMappedTwice(_))));
    }

    #[test]
    fn rejects_degenerate_profiles() {
        let mut p = base();
        p.report_len = 0;
        assert!(matches!(p.compile(), Err(ProfileError::ZeroReportLen)));

        let mut p = base();
        p.buttons.clear();
        assert!(matches!(p.compile(), Err(ProfileError::NoButtons)));

        let mut p = base();
        p.buttons.push("A".into());
        assert!(matches!(p.compile(), Err(ProfileError::DuplicateButton(_))));

        let mut p = base();
        p.fields.push(FieldRule::Axis {
            byte: 0,
            low: 7,
            high: 7,
            low_button: "A".into(),
            high_button: "B".into(),
        });
        assert!(matches!(p.compile(), Err(ProfileError::AxisSentinelsEqual { .. })));

        let mut p = base();
        p.fields.push(FieldRule::Bits {
            byte: 0,
            bits: vec![BitButton {
                bit: 8,
                button: "A".into(),
            }],
        });
        assert!(matches!(p.compile(), Err(ProfileError::BitOutOfRange(8))));
    }
}
