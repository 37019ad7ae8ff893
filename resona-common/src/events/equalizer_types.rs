//! Equalizer state types shared between the agent and its clients

use serde::{Deserialize, Serialize};

/// Number of equalizer bands
pub const BAND_COUNT: usize = 10;

/// Fixed center frequencies of the 10 equalizer bands, in Hz, ascending
pub const BAND_FREQUENCIES: [u32; BAND_COUNT] =
    [31, 62, 125, 250, 500, 1000, 2000, 4000, 8000, 16000];

/// Lowest gain a band may be set to, in dB
pub const GAIN_MIN_DB: f32 = -15.0;

/// Highest gain a band may be set to, in dB
pub const GAIN_MAX_DB: f32 = 15.0;

/// Clamp a requested gain into the supported range
pub fn clamp_gain(db: f32) -> f32 {
    db.clamp(GAIN_MIN_DB, GAIN_MAX_DB)
}

/// Point-in-time view of the equalizer, as exposed to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EqualizerSnapshot {
    /// Whether the external equalizer program was detected
    pub available: bool,
    /// Whether processing is currently enabled
    pub enabled: bool,
    /// Gain per band in dB, index-aligned with [`BAND_FREQUENCIES`]
    pub gains: [f32; BAND_COUNT],
}

impl EqualizerSnapshot {
    /// Snapshot for a host with no detected equalizer install
    pub fn unavailable() -> Self {
        Self {
            available: false,
            enabled: false,
            gains: [0.0; BAND_COUNT],
        }
    }
}
