//! Pitch-type colors.

/// Color used for any pitch name missing from the table.
pub const UNKNOWN: &str = "Unknown";

const PITCH_COLORS: &[(&str, &str)] = &[
    // Fastballs
    ("4-Seam Fastball", "#FF007D"),
    ("Fastball", "#FF007D"),
    ("Sinker", "#98165D"),
    ("Cutter", "#BE5FA0"),
    // Offspeed
    ("Changeup", "#F79E70"),
    ("Splitter", "#FE6100"),
    ("Screwball", "#F08223"),
    ("Forkball", "#FFB000"),
    ("Split-Finger", "#FE6100"),
    // Sliders
    ("Slider", "#67E18D"),
    ("Sweeper", "#1BB999"),
    ("Slurve", "#376748"),
    // Curveballs
    ("Knuckle Curve", "#311D8B"),
    ("Curveball", "#3025CE"),
    ("Slow Curve", "#274BFC"),
    ("Eephus", "#648FFF"),
    // Others
    ("Knuckleball", "#867A08"),
    ("Pitch Out", "#472C30"),
    (UNKNOWN, "#9C8975"),
];

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parse `#RRGGBB`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        Some(Self(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// Fixed mapping from pitch name to display color.
#[derive(Debug, Clone, Copy, Default)]
pub struct PitchPalette;

impl PitchPalette {
    /// Hex color for `pitch_name`, or the Unknown color.
    pub fn hex(&self, pitch_name: &str) -> &'static str {
        lookup(pitch_name)
            .or_else(|| lookup(UNKNOWN))
            .unwrap_or("#9C8975")
    }

    pub fn color(&self, pitch_name: &str) -> Rgb {
        Rgb::from_hex(self.hex(pitch_name)).unwrap_or(Rgb(0x9C, 0x89, 0x75))
    }

    pub fn is_known(&self, pitch_name: &str) -> bool {
        lookup(pitch_name).is_some()
    }
}

fn lookup(pitch_name: &str) -> Option<&'static str> {
    PITCH_COLORS
        .iter()
        .find(|(name, _)| *name == pitch_name)
        .map(|(_, hex)| *hex)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_pitch_colors() {
        let palette = PitchPalette;
        assert_eq!(palette.hex("Sweeper"), "#1BB999");
        assert_eq!(palette.color("4-Seam Fastball"), Rgb(0xFF, 0x00, 0x7D));
        assert!(palette.is_known("Slurve"));
    }

    #[test]
    fn unmapped_pitch_falls_back_to_unknown() {
        let palette = PitchPalette;
        assert_eq!(palette.hex("Gyroball"), "#9C8975");
        assert_eq!(palette.color(""), Rgb(0x9C, 0x89, 0x75));
        assert!(!palette.is_known("Gyroball"));
    }

    #[test]
    fn every_table_entry_parses() {
        for (name, hex) in PITCH_COLORS {
            assert!(Rgb::from_hex(hex).is_some(), "{name}: {hex}");
        }
        assert_eq!(Rgb::from_hex("FF007D"), None);
        assert_eq!(Rgb::from_hex("#FF00"), None);
    }
}
