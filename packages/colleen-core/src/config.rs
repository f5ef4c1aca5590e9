//! Declarative machine configuration.
//!
//! The front end deserializes one of these from wherever it keeps its
//! settings and hands it to the machine before cold start; `validate`
//! enforces the ranges the hardware timing tolerates.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::devices::cpu::structs::CpuFlavor;

#[derive(Debug, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub enum VideoSystem {
    Pal,
    Ntsc,
}

impl Default for VideoSystem {
    fn default() -> Self {
        VideoSystem::Pal
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("WSYNC release position {0} out of range 80..=114")]
    WsyncPosition(usize),
    #[error("DLI lead-in of {0} cycles out of range 0..=16")]
    BeforeDliCycles(usize),
    #[error("display lead-in of {0} clocks out of range 0..=32")]
    BeforeDisplayClocks(usize),
    #[error("VCOUNT increment slot {0} out of range 104..=114")]
    YposIncSlot(usize),
    #[error("custom refresh rate of {0} ms out of range 1..=100")]
    RefreshRate(u64),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    pub video: VideoSystem,
    pub cpu_flavor: CpuFlavor,
    /// Slot at which a WSYNC halt releases. Must be at least 103 for
    /// Encounter; 105 matches measurements.
    pub wsync_position: usize,
    /// CPU cycles run on each line before a DLI may fire.
    pub before_dli_cycles: usize,
    /// CPU clocks run before display generation starts.
    pub before_display_clocks: usize,
    /// Horizontal slot at which VCOUNT ticks over.
    pub ypos_inc_slot: usize,
    /// Overrides the PAL/NTSC frame period, in milliseconds.
    pub refresh_rate_ms: Option<u64>,
    /// Dropped frames tolerated before the frame timer is re-based.
    pub max_miss: u32,
}

impl Default for MachineConfig {
    fn default() -> Self {
        MachineConfig {
            video: VideoSystem::Pal,
            cpu_flavor: CpuFlavor::Nmos6502,
            wsync_position: 105,
            before_dli_cycles: 12,
            before_display_clocks: 16,
            ypos_inc_slot: 108,
            refresh_rate_ms: None,
            max_miss: 1,
        }
    }
}

impl MachineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(80..=114).contains(&self.wsync_position) {
            return Err(ConfigError::WsyncPosition(self.wsync_position));
        }
        if self.before_dli_cycles > 16 {
            return Err(ConfigError::BeforeDliCycles(self.before_dli_cycles));
        }
        if self.before_display_clocks > 32 {
            return Err(ConfigError::BeforeDisplayClocks(self.before_display_clocks));
        }
        if !(104..=114).contains(&self.ypos_inc_slot) {
            return Err(ConfigError::YposIncSlot(self.ypos_inc_slot));
        }
        if let Some(ms) = self.refresh_rate_ms {
            if !(1..=100).contains(&ms) {
                return Err(ConfigError::RefreshRate(ms));
            }
        }
        Ok(())
    }

    /// The frame period: the custom override, or the nominal PAL/NTSC
    /// refresh.
    pub fn refresh_delay(&self) -> Duration {
        match self.refresh_rate_ms {
            Some(ms) => Duration::from_millis(ms),
            None => match self.video {
                VideoSystem::Pal => Duration::from_micros(20_000),
                VideoSystem::Ntsc => Duration::from_micros(16_666),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(MachineConfig::default().validate().is_ok());
    }

    #[test]
    fn wsync_range_is_enforced() {
        let mut config = MachineConfig::default();
        config.wsync_position = 79;
        assert!(config.validate().is_err());
        config.wsync_position = 114;
        assert!(config.validate().is_ok());
    }
}
