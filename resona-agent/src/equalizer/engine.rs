//! Equalizer state and operations
//!
//! Holds the live gain vector and enabled flag, validates and applies
//! mutations, and rewrites the external program's config file on every
//! accepted change. All operations fail soft: the external state authority
//! may be absent at any time, and callers treat that as a steady-state UI
//! condition, not an exception.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use resona_common::events::{clamp_gain, AgentEvent, EqualizerSnapshot, EventBus, BAND_COUNT};

use super::backend::EqualizerBackend;
use super::{presets, profile};

/// Reasons an equalizer operation is rejected
///
/// These never propagate as panics; the API layer folds them into
/// `{ok:false, error}` responses.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EqualizerError {
    /// The external program is not installed (or not yet detected)
    #[error("Equalizer program not available")]
    Unavailable,

    /// Band index outside [0, 10)
    #[error("Band index {0} out of range")]
    BandIndexOutOfRange(usize),

    /// Gain vector of the wrong length
    #[error("Expected {expected} gains, got {actual}")]
    WrongGainCount { expected: usize, actual: usize },

    /// Preset name not in the table
    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    /// The config file could not be written
    #[error("Failed to write equalizer config: {0}")]
    WriteFailed(String),
}

/// In-memory equalizer state
struct EqState {
    available: bool,
    config_path: Option<PathBuf>,
    enabled: bool,
    gains: [f32; BAND_COUNT],
}

impl EqState {
    fn snapshot(&self) -> EqualizerSnapshot {
        EqualizerSnapshot {
            available: self.available,
            enabled: self.enabled,
            gains: self.gains,
        }
    }
}

/// The equalizer pipeline: state, validation, config rewrites, events
pub struct EqualizerEngine {
    backend: Box<dyn EqualizerBackend>,
    bus: Arc<EventBus>,
    state: RwLock<EqState>,
    /// Serializes render-and-write cycles. Tokio's Mutex wakes waiters in
    /// FIFO order and the text is rendered inside the critical section, so
    /// the last accepted mutation also produces the last write.
    write_lock: Mutex<()>,
}

impl EqualizerEngine {
    /// Create an engine with everything at defaults; call [`detect`] to
    /// probe for the external program.
    ///
    /// [`detect`]: EqualizerEngine::detect
    pub fn new(backend: Box<dyn EqualizerBackend>, bus: Arc<EventBus>) -> Self {
        Self {
            backend,
            bus,
            state: RwLock::new(EqState {
                available: false,
                config_path: None,
                enabled: false,
                gains: [0.0; BAND_COUNT],
            }),
            write_lock: Mutex::new(()),
        }
    }

    /// Probe for the external program; when present, adopt whatever state
    /// its existing config file describes.
    ///
    /// Never fails: an absent install leaves the engine unavailable with
    /// defaults intact.
    pub async fn detect(&self) -> EqualizerSnapshot {
        let detection = self.backend.detect();

        let (snapshot, config_path) = {
            let mut state = self.state.write().await;
            match detection {
                Some(detection) => {
                    state.available = true;
                    state.config_path = Some(detection.config_path.clone());
                    match self.backend.read_config() {
                        Ok(text) => {
                            let parsed = profile::parse(&text);
                            state.enabled = parsed.enabled;
                            state.gains = parsed.gains;
                        }
                        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                            // Fresh install with no config yet; keep defaults
                        }
                        Err(e) => {
                            warn!("Could not read existing equalizer config: {}", e);
                        }
                    }
                    (state.snapshot(), Some(detection.config_path))
                }
                None => {
                    state.available = false;
                    state.config_path = None;
                    (state.snapshot(), None)
                }
            }
        };

        self.bus.emit_lossy(AgentEvent::EqualizerDetected {
            available: snapshot.available,
            config_path,
            timestamp: chrono::Utc::now(),
        });
        snapshot
    }

    /// Current state as exposed to clients
    pub async fn snapshot(&self) -> EqualizerSnapshot {
        self.state.read().await.snapshot()
    }

    /// Set one band's gain in dB; the value is clamped into range.
    pub async fn set_band_gain(&self, index: usize, gain_db: f32) -> Result<(), EqualizerError> {
        if index >= BAND_COUNT {
            return Err(EqualizerError::BandIndexOutOfRange(index));
        }
        {
            let mut state = self.state.write().await;
            if !state.available {
                return Err(EqualizerError::Unavailable);
            }
            state.gains[index] = clamp_gain(gain_db);
        }
        self.commit().await
    }

    /// Replace the full gain vector atomically.
    pub async fn set_gains(&self, gains: &[f32]) -> Result<(), EqualizerError> {
        if gains.len() != BAND_COUNT {
            return Err(EqualizerError::WrongGainCount {
                expected: BAND_COUNT,
                actual: gains.len(),
            });
        }
        {
            let mut state = self.state.write().await;
            if !state.available {
                return Err(EqualizerError::Unavailable);
            }
            for (slot, gain) in state.gains.iter_mut().zip(gains.iter()) {
                *slot = clamp_gain(*gain);
            }
        }
        self.commit().await
    }

    /// Copy a named preset's gains into the live vector.
    pub async fn apply_preset(&self, name: &str) -> Result<(), EqualizerError> {
        let preset =
            presets::find(name).ok_or_else(|| EqualizerError::UnknownPreset(name.to_string()))?;
        {
            let mut state = self.state.write().await;
            if !state.available {
                return Err(EqualizerError::Unavailable);
            }
            state.gains = preset.gains;
        }
        debug!("Applied equalizer preset '{}'", preset.name);
        self.commit().await
    }

    /// Toggle whether the external program processes audio at all.
    ///
    /// Disabling keeps the stored gains; only the generated config drops
    /// its filter lines.
    pub async fn set_enabled(&self, enabled: bool) -> Result<(), EqualizerError> {
        {
            let mut state = self.state.write().await;
            if !state.available {
                return Err(EqualizerError::Unavailable);
            }
            state.enabled = enabled;
        }
        self.commit().await
    }

    /// Preset names available to [`apply_preset`]
    ///
    /// [`apply_preset`]: EqualizerEngine::apply_preset
    pub fn preset_names(&self) -> Vec<&'static str> {
        presets::names()
    }

    /// Rewrite the whole config file from current state and announce the
    /// change. No retry on failure: the next accepted mutation writes
    /// again.
    async fn commit(&self) -> Result<(), EqualizerError> {
        let _guard = self.write_lock.lock().await;

        // Render inside the critical section so each write carries the
        // state current at write time
        let (enabled, gains) = {
            let state = self.state.read().await;
            (state.enabled, state.gains)
        };
        let text = profile::render(enabled, &gains);

        if let Err(e) = self.backend.write_config(&text) {
            warn!("Equalizer config write failed: {}", e);
            return Err(EqualizerError::WriteFailed(e.to_string()));
        }

        self.bus.emit_lossy(AgentEvent::EqualizerChanged {
            enabled,
            gains,
            timestamp: chrono::Utc::now(),
        });
        Ok(())
    }
}
