//! Runtime configuration.
//!
//! Loaded from TOML. Every field has a default, so an empty file (or no file at
//! all) yields a working setup: the built-in NES profile, two slots, a ~60 Hz
//! tick, and OSC broadcast to port 10000.
//!
//! ```toml
//! tick_interval_ms = 16
//! max_devices = 2
//! profile = "profiles/nes.toml"   # optional, defaults to the built-in NES pad
//!
//! [sink]
//! kind = "osc"                    # "osc" | "log" | "json"
//! host = "255.255.255.255"
//! port = 10000
//! address = "/state"
//! ```

use crate::error::ConfigError;
use crate::event::STATE_ADDRESS;
use crate::profile::DeviceProfile;
use crate::slots::{MAX_DEVICES, MAX_DEVICES_LIMIT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Delay between polling passes.
    pub tick_interval_ms: u64,
    /// Number of device slots.
    pub max_devices: usize,
    /// Device profile file; `None` selects [`DeviceProfile::nes`].
    pub profile: Option<PathBuf>,
    pub sink: SinkConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_interval_ms: 16,
            max_devices: MAX_DEVICES,
            profile: None,
            sink: SinkConfig::default(),
        }
    }
}

/// Which sink to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum SinkKind {
    /// OSC over UDP.
    #[default]
    Osc,
    /// `tracing` log lines.
    Log,
    /// JSON lines on stdout.
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SinkConfig {
    pub kind: SinkKind,
    pub host: String,
    pub port: u16,
    /// Message address for transitions.
    pub address: String,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            kind: SinkKind::Osc,
            host: "255.255.255.255".to_string(),
            port: 10000,
            address: STATE_ADDRESS.to_string(),
        }
    }
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read a config file. Relative profile paths are resolved against the
    /// config file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut cfg = Self::from_toml_str(&text)?;
        if let (Some(profile), Some(dir)) = (cfg.profile.as_mut(), path.parent()) {
            if profile.is_relative() {
                *profile = dir.join(&*profile);
            }
        }
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_devices == 0 {
            return Err(ConfigError::Invalid("max_devices must be at least 1".into()));
        }
        if self.max_devices > MAX_DEVICES_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "max_devices must be at most {MAX_DEVICES_LIMIT}"
            )));
        }
        if !self.sink.address.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "sink address {:?} must start with '/'",
                self.sink.address
            )));
        }
        Ok(())
    }

    /// The configured profile, or the built-in NES profile.
    pub fn load_profile(&self) -> Result<DeviceProfile, ConfigError> {
        match &self.profile {
            Some(path) => Ok(DeviceProfile::load(path)?),
            None => Ok(DeviceProfile::nes()),
        }
    }
}
