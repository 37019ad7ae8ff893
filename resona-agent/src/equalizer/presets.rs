//! Named equalizer presets
//!
//! A fixed lookup table mapping preset names to 10-band gain vectors. All
//! values are well inside the supported gain range, so applying a preset
//! never needs clamping.

use resona_common::events::BAND_COUNT;

/// One named gain vector
#[derive(Debug, Clone, Copy)]
pub struct Preset {
    pub name: &'static str,
    pub gains: [f32; BAND_COUNT],
}

/// The shipped preset table, lookup by name via [`find`]
pub const PRESETS: [Preset; 9] = [
    Preset {
        name: "flat",
        gains: [0.0; BAND_COUNT],
    },
    Preset {
        name: "rock",
        gains: [5.0, 4.0, 3.0, 1.0, -0.5, -1.0, 0.5, 2.5, 3.5, 4.5],
    },
    Preset {
        name: "pop",
        gains: [-1.5, -1.0, 0.0, 2.0, 4.0, 4.0, 2.0, 0.0, -1.0, -1.5],
    },
    Preset {
        name: "jazz",
        gains: [3.0, 2.0, 1.0, 2.0, -1.5, -1.5, 0.0, 1.0, 2.0, 3.0],
    },
    Preset {
        name: "classical",
        gains: [3.5, 2.5, 1.0, 0.0, 0.0, 0.0, -1.0, -2.0, -2.5, -3.0],
    },
    Preset {
        name: "electronic",
        gains: [4.0, 3.5, 1.0, 0.0, -2.0, 2.0, 1.0, 1.5, 3.0, 4.0],
    },
    Preset {
        name: "bass_boost",
        gains: [6.0, 5.0, 4.0, 2.5, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    },
    Preset {
        name: "treble_boost",
        gains: [0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 2.5, 4.0, 5.0, 6.0],
    },
    Preset {
        name: "vocal_boost",
        gains: [-2.0, -1.0, 0.0, 1.5, 3.0, 3.0, 2.0, 0.5, -0.5, -1.5],
    },
];

/// Look a preset up by name, case-insensitively
pub fn find(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

/// All preset names, in table order
pub fn names() -> Vec<&'static str> {
    PRESETS.iter().map(|p| p.name).collect()
}
