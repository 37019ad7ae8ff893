//! System equalizer integration
//!
//! Maintains a 10-band gain vector plus an enabled flag and materializes
//! them into the text config format the external Equalizer APO program
//! consumes. The DSP itself happens inside that program; the agent only
//! generates its configuration.

pub mod backend;
pub mod engine;
pub mod presets;
pub mod profile;

pub use backend::{ApoBackend, Detection, EqualizerBackend, NullBackend};
pub use engine::{EqualizerEngine, EqualizerError};
