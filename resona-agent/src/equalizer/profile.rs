//! Config text generation and parsing for the external equalizer
//!
//! The external program reads a line-oriented text file. The agent always
//! writes the whole file: two comment header lines, then either a single
//! disabled marker, or one peaking-filter directive per band with an
//! audible gain, ascending by frequency. Zero-gain bands are omitted so the
//! external engine skips them entirely.

use resona_common::events::{clamp_gain, BAND_COUNT, BAND_FREQUENCIES};

/// Leading comment lines of every generated config
pub const HEADER: [&str; 2] = [
    "# Resona system equalizer profile",
    "# Managed by resona-agent; manual edits are overwritten",
];

/// Marker line written instead of filters when processing is off.
/// An empty filter set is how the external program represents "no
/// processing".
pub const DISABLED_MARKER: &str = "# Equalizer disabled";

/// Gains that round to 0.0 at one decimal count as flat and are omitted
fn is_audible(gain: f32) -> bool {
    gain.abs() >= 0.05
}

/// Render the complete config file contents
pub fn render(enabled: bool, gains: &[f32; BAND_COUNT]) -> String {
    let mut out = String::new();
    for line in HEADER {
        out.push_str(line);
        out.push('\n');
    }

    if !enabled {
        out.push_str(DISABLED_MARKER);
        out.push('\n');
        return out;
    }

    for (freq, gain) in BAND_FREQUENCIES.iter().zip(gains.iter()) {
        if is_audible(*gain) {
            out.push_str(&format!(
                "Filter: ON PK Fc {} Hz Gain {:.1} dB Q 1.0\n",
                freq, gain
            ));
        }
    }
    out
}

/// Equalizer state recovered from an existing config file
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedProfile {
    pub enabled: bool,
    pub gains: [f32; BAND_COUNT],
}

impl Default for ParsedProfile {
    fn default() -> Self {
        Self {
            enabled: true,
            gains: [0.0; BAND_COUNT],
        }
    }
}

/// Parse a config file back into equalizer state.
///
/// Tolerant by design: unknown lines, unrecognized frequencies, and a
/// leading `+` on gains (written by some third-party editors) are all
/// accepted; gains are clamped into the supported range. A file with no
/// filter lines and no disabled marker reads as "enabled, all flat",
/// identical to what the agent writes for that state.
pub fn parse(text: &str) -> ParsedProfile {
    let mut profile = ParsedProfile::default();

    for line in text.lines() {
        let line = line.trim();
        if line == DISABLED_MARKER {
            profile.enabled = false;
            continue;
        }
        if let Some((freq, gain)) = parse_filter_line(line) {
            if let Some(index) = BAND_FREQUENCIES.iter().position(|f| *f == freq) {
                profile.gains[index] = clamp_gain(gain);
            }
        }
    }
    profile
}

/// Extract `(frequency, gain)` from one `Filter:` directive, if well-formed
fn parse_filter_line(line: &str) -> Option<(u32, f32)> {
    if !line.starts_with("Filter:") {
        return None;
    }
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let fc = tokens.iter().position(|t| *t == "Fc")?;
    let gain_kw = tokens.iter().position(|t| *t == "Gain")?;
    let freq = tokens.get(fc + 1)?.parse::<u32>().ok()?;
    let gain = tokens
        .get(gain_kw + 1)?
        .trim_start_matches('+')
        .parse::<f32>()
        .ok()?;
    Some((freq, gain))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_config_is_header_plus_marker_only() {
        let mut gains = [0.0; BAND_COUNT];
        gains[2] = 9.0; // stored gains must not leak into a disabled config
        let text = render(false, &gains);
        assert_eq!(
            text,
            "# Resona system equalizer profile\n\
             # Managed by resona-agent; manual edits are overwritten\n\
             # Equalizer disabled\n"
        );
        assert!(!text.contains("Filter:"));
    }

    #[test]
    fn test_single_band_renders_single_filter_line() {
        let mut gains = [0.0; BAND_COUNT];
        gains[5] = 6.0;
        let text = render(true, &gains);

        let filters: Vec<&str> = text.lines().filter(|l| l.starts_with("Filter:")).collect();
        assert_eq!(filters, vec!["Filter: ON PK Fc 1000 Hz Gain 6.0 dB Q 1.0"]);
    }

    #[test]
    fn test_negative_gains_render_with_sign() {
        let mut gains = [0.0; BAND_COUNT];
        gains[0] = -3.5;
        let text = render(true, &gains);
        assert!(text.contains("Filter: ON PK Fc 31 Hz Gain -3.5 dB Q 1.0\n"));
    }

    #[test]
    fn test_all_flat_renders_no_filter_lines() {
        let text = render(true, &[0.0; BAND_COUNT]);
        assert_eq!(text.lines().count(), 2);
        assert!(!text.contains("Filter:"));
    }

    #[test]
    fn test_filters_render_in_ascending_frequency_order() {
        let gains = [1.0; BAND_COUNT];
        let text = render(true, &gains);
        let freqs: Vec<u32> = text
            .lines()
            .filter_map(parse_filter_line)
            .map(|(f, _)| f)
            .collect();
        assert_eq!(freqs, BAND_FREQUENCIES.to_vec());
    }

    #[test]
    fn test_sub_decimal_gains_are_treated_as_flat() {
        let mut gains = [0.0; BAND_COUNT];
        gains[3] = 0.04;
        gains[4] = -0.04;
        let text = render(true, &gains);
        assert!(!text.contains("Filter:"));
    }

    #[test]
    fn test_render_parse_round_trip() {
        let mut gains = [0.0; BAND_COUNT];
        gains[0] = -3.5;
        gains[5] = 6.0;
        gains[9] = 12.0;

        let parsed = parse(&render(true, &gains));
        assert!(parsed.enabled);
        assert_eq!(parsed.gains, gains);

        let parsed = parse(&render(false, &gains));
        assert!(!parsed.enabled);
        assert_eq!(parsed.gains, [0.0; BAND_COUNT]);
    }

    #[test]
    fn test_parse_tolerates_explicit_plus_sign() {
        let profile = parse("Filter: ON PK Fc 1000 Hz Gain +6.0 dB Q 1.0\n");
        assert_eq!(profile.gains[5], 6.0);
    }

    #[test]
    fn test_parse_clamps_out_of_range_gains() {
        let profile = parse("Filter: ON PK Fc 31 Hz Gain 40.0 dB Q 1.0\n");
        assert_eq!(profile.gains[0], 15.0);
    }

    #[test]
    fn test_parse_ignores_unknown_content() {
        let text = "\
            # some other tool wrote this\n\
            Preamp: -2.0 dB\n\
            Filter: ON PK Fc 999 Hz Gain 3.0 dB Q 1.0\n\
            Filter: ON PK Fc 62 Hz Gain 2.0 dB Q 1.0\n\
            Filter: garbage\n";
        let profile = parse(text);
        assert!(profile.enabled);
        // 999 Hz is not a band; 62 Hz is
        assert_eq!(profile.gains[1], 2.0);
        assert_eq!(profile.gains.iter().filter(|g| **g != 0.0).count(), 1);
    }

    #[test]
    fn test_parse_empty_text_is_enabled_flat() {
        let profile = parse("");
        assert!(profile.enabled);
        assert_eq!(profile.gains, [0.0; BAND_COUNT]);
    }
}
