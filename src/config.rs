use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::MachineError;

/// Main board Z80 runs at 4 MHz.
pub const MAIN_CLOCK_HZ: u32 = 4_000_000;
/// Sound board Z80 runs at 3 MHz.
pub const SOUND_CLOCK_HZ: u32 = 3_000_000;
/// Each AY-3-8910 is clocked at 1.5 MHz.
pub const PSG_CLOCK_HZ: u32 = 1_500_000;
pub const REFRESH_HZ: u32 = 60;

/// DSW1 bit 6: upright cabinet.
pub const DSW1_UPRIGHT: u8 = 1 << 6;
/// DSW1 bit 7: demo sound on.
pub const DSW1_DEMO_SOUND: u8 = 1 << 7;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MachineConfig {
    pub main_clock_hz: u32,
    pub sound_clock_hz: u32,
    pub psg_clock_hz: u32,
    pub refresh_hz: u32,
    pub dsw1: u8,
    pub dsw2: u8,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            main_clock_hz: MAIN_CLOCK_HZ,
            sound_clock_hz: SOUND_CLOCK_HZ,
            psg_clock_hz: PSG_CLOCK_HZ,
            refresh_hz: REFRESH_HZ,
            dsw1: DSW1_UPRIGHT | DSW1_DEMO_SOUND,
            dsw2: 0,
        }
    }
}

impl MachineConfig {
    pub fn from_json(json: &str) -> Result<Self, MachineError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, MachineError> {
        let path = path.as_ref();
        let config = Self::from_json(&fs::read_to_string(path)?)?;
        tracing::debug!("Loaded machine config from {}", path.display());
        Ok(config)
    }

    /// Main board cycles between two vertical refresh interrupts.
    pub fn vsync_period(&self) -> u32 {
        self.main_clock_hz / self.refresh_hz.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_vsync_period() {
        let config = MachineConfig::default();
        assert_eq!(config.vsync_period(), 66_666);
        assert_eq!(config.dsw1, 0xC0);
        assert_eq!(config.dsw2, 0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = MachineConfig::from_json(r#"{ "dsw2": 3, "refresh_hz": 50 }"#).unwrap();
        assert_eq!(config.dsw2, 3);
        assert_eq!(config.refresh_hz, 50);
        assert_eq!(config.main_clock_hz, MAIN_CLOCK_HZ);
        assert_eq!(config.vsync_period(), 80_000);
    }

    #[test]
    fn test_malformed_json() {
        let err = MachineConfig::from_json("{ dsw1: ").unwrap_err();
        assert!(matches!(err, MachineError::Config(_)));
    }

    #[test]
    fn test_missing_config_file() {
        let err = MachineConfig::load("/nonexistent/bombjack.json").unwrap_err();
        assert!(matches!(err, MachineError::Io(e) if e.kind() == std::io::ErrorKind::NotFound));
    }
}
