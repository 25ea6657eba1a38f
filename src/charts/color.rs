//! Color Module
//! Palettes and the continuous color scale used by the state map.

use serde::Serialize;

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parse `#rrggbb`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        Some(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }
}

/// Blue to red visual map palette for the state map.
pub const MAP_PALETTE: [&str; 11] = [
    "#313695", "#4575b4", "#74add1", "#abd9e9", "#e0f3f8", "#ffffbf", "#fee090", "#fdae61",
    "#f46d43", "#d73027", "#a50026",
];

/// D3 categorical colors (Male, Female, ...).
pub const D3_PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Color of the "all victims" reference curve.
pub const OVERALL_COLOR: &str = "#D3D3D3";

/// Bar fill used by the bar charts.
pub const BAR_COLOR: &str = "#5470c6";

/// Color for a gender in the pie and distribution plots.
pub fn gender_color(gender: &str) -> &'static str {
    if gender == "Male" {
        D3_PALETTE[0]
    } else {
        D3_PALETTE[1]
    }
}

/// Linear color scale between `min` and `max` across a palette.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    pub min: f64,
    pub max: f64,
    stops: Vec<Rgb>,
}

impl ColorScale {
    /// Build a scale from hex stops; unparsable stops are skipped.
    pub fn new(min: f64, max: f64, palette: &[&str]) -> Self {
        Self {
            min,
            max,
            stops: palette.iter().filter_map(|h| Rgb::from_hex(h)).collect(),
        }
    }

    /// The state map scale: 0 to `max`.
    pub fn map_scale(max: f64) -> Self {
        Self::new(0.0, max, &MAP_PALETTE)
    }

    /// Color for a value; values outside the range are clamped.
    pub fn color_for(&self, value: f64) -> Rgb {
        let Some(first) = self.stops.first().copied() else {
            return Rgb(128, 128, 128);
        };
        if self.stops.len() == 1 {
            return first;
        }

        let span = self.max - self.min;
        let t = if span > 0.0 {
            ((value - self.min) / span).clamp(0.0, 1.0)
        } else if value > self.min {
            1.0
        } else {
            0.0
        };

        let segments = (self.stops.len() - 1) as f64;
        let pos = t * segments;
        let lower = (pos.floor() as usize).min(self.stops.len() - 2);
        let frac = pos - lower as f64;
        self.stops[lower].lerp(self.stops[lower + 1], frac)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        assert_eq!(Rgb::from_hex("#313695"), Some(Rgb(0x31, 0x36, 0x95)));
        assert_eq!(Rgb(0xa5, 0x00, 0x26).to_hex(), "#a50026");
        assert_eq!(Rgb::from_hex("313695"), None);
        assert_eq!(Rgb::from_hex("#31369"), None);
    }

    #[test]
    fn scale_endpoints_and_clamping() {
        let scale = ColorScale::map_scale(100.0);
        assert_eq!(scale.color_for(0.0).to_hex(), "#313695");
        assert_eq!(scale.color_for(100.0).to_hex(), "#a50026");
        assert_eq!(scale.color_for(-5.0), scale.color_for(0.0));
        assert_eq!(scale.color_for(1e9), scale.color_for(100.0));
    }

    #[test]
    fn scale_midpoint_hits_middle_stop() {
        let scale = ColorScale::map_scale(10.0);
        assert_eq!(scale.color_for(5.0).to_hex(), "#ffffbf");
    }

    #[test]
    fn zero_width_scale_is_binary() {
        let scale = ColorScale::map_scale(0.0);
        assert_eq!(scale.color_for(0.0).to_hex(), "#313695");
        assert_eq!(scale.color_for(3.0).to_hex(), "#a50026");
    }

    #[test]
    fn gender_colors() {
        assert_eq!(gender_color("Male"), "#1f77b4");
        assert_eq!(gender_color("Female"), "#ff7f0e");
    }
}
