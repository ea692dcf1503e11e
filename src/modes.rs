//! Demodulation modes and their passband shapes.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Am,
    Sam,
    Lsb,
    Usb,
    Cwu,
    Cwl,
    Fm,
    Iq,
}

/// Panel button order (two rows of four).
pub const ALL_MODES: [Mode; 8] = [
    Mode::Am,
    Mode::Sam,
    Mode::Lsb,
    Mode::Usb,
    Mode::Cwu,
    Mode::Cwl,
    Mode::Fm,
    Mode::Iq,
];

impl Mode {
    /// Wire/DOM name, as the host's mode selector spells it.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Am => "am",
            Mode::Sam => "sam",
            Mode::Lsb => "lsb",
            Mode::Usb => "usb",
            Mode::Cwu => "cwu",
            Mode::Cwl => "cwl",
            Mode::Fm => "fm",
            Mode::Iq => "iq",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Am => "AM",
            Mode::Sam => "SAM",
            Mode::Lsb => "LSB",
            Mode::Usb => "USB",
            Mode::Cwu => "CWU",
            Mode::Cwl => "CWL",
            Mode::Fm => "FM",
            Mode::Iq => "IQ",
        }
    }

    pub fn parse(s: &str) -> Option<Mode> {
        ALL_MODES
            .iter()
            .copied()
            .find(|m| m.as_str() == s.to_ascii_lowercase())
    }

    /// Passband edges `(lo, hi)` as kHz offsets from the tuned frequency.
    pub fn passband_khz(self) -> (f64, f64) {
        match self {
            Mode::Usb => (0.0, 2.8),
            Mode::Lsb => (-2.8, 0.0),
            Mode::Am | Mode::Sam => (-4.0, 4.0),
            Mode::Cwu => (0.0, 0.5),
            Mode::Cwl => (-0.5, 0.0),
            Mode::Fm => (-6.0, 6.0),
            Mode::Iq => (-5.0, 5.0),
        }
    }
}

/// Passband for a possibly-unknown mode string. Unknown modes fall back to
/// a USB-shaped default.
pub fn passband_for(mode: Option<Mode>) -> (f64, f64) {
    mode.map(Mode::passband_khz).unwrap_or((0.0, 2.8))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usb_passband() {
        assert_eq!(Mode::Usb.passband_khz(), (0.0, 2.8));
    }

    #[test]
    fn test_unknown_mode_defaults_to_usb_shape() {
        assert_eq!(passband_for(Mode::parse("drm")), (0.0, 2.8));
        assert_eq!(passband_for(None), (0.0, 2.8));
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Mode::parse("USB"), Some(Mode::Usb));
        assert_eq!(Mode::parse("cwl"), Some(Mode::Cwl));
    }
}
