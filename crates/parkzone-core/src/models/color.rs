use serde::{Deserialize, Serialize};
use std::fmt;

/// HSL display colour for a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneColor {
    /// Hue in degrees, 0..360
    pub hue: u16,
    /// Saturation percentage
    pub saturation: u8,
    /// Lightness percentage
    pub lightness: u8,
}

impl ZoneColor {
    pub fn new(hue: u16, saturation: u8, lightness: u8) -> Self {
        Self { hue: hue % 360, saturation, lightness }
    }

    /// Angular distance between two hues on the colour wheel, 0..=180
    pub fn hue_distance(&self, other: &ZoneColor) -> f64 {
        let diff = (f64::from(self.hue) - f64::from(other.hue)).abs() % 360.0;
        diff.min(360.0 - diff)
    }
}

/// CSS `hsl()` notation, accepted by the map widget as a fill or stroke colour
impl fmt::Display for ZoneColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsl({}, {}%, {}%)", self.hue, self.saturation, self.lightness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hue_distance_wraps_around() {
        let red = ZoneColor::new(350, 80, 60);
        let orange = ZoneColor::new(10, 80, 60);
        assert_eq!(red.hue_distance(&orange), 20.0);
        assert_eq!(orange.hue_distance(&red), 20.0);
    }

    #[test]
    fn test_hue_distance_maximum() {
        let a = ZoneColor::new(0, 80, 60);
        let b = ZoneColor::new(180, 80, 60);
        assert_eq!(a.hue_distance(&b), 180.0);
    }

    #[test]
    fn test_css_notation() {
        assert_eq!(ZoneColor::new(200, 75, 55).to_string(), "hsl(200, 75%, 55%)");
        assert_eq!(ZoneColor::new(370, 75, 55).hue, 10);
    }
}
