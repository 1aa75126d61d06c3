//! Colours and the host-selected background theme.

/// 24-bit colour, converted to the panel's native format by the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
}

impl Rgb {
    /// Black.
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    /// White.
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    /// E-stop alert red.
    pub const ALERT: Rgb = Rgb::new(220, 0, 0);

    /// Creates a colour.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Colour wheel: 0..=255 walks red → green → blue → red.
    pub const fn wheel(position: u8) -> Self {
        let pos = 255 - position;
        if pos < 85 {
            Rgb::new(255 - pos * 3, 0, pos * 3)
        } else if pos < 170 {
            let pos = pos - 85;
            Rgb::new(0, pos * 3, 255 - pos * 3)
        } else {
            let pos = pos - 170;
            Rgb::new(pos * 3, 255 - pos * 3, 0)
        }
    }
}

/// Background colour set by `LCD:SOLID` / `LCD:WHEEL`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Theme {
    /// Screen background.
    pub background: Rgb,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Rgb::BLACK,
        }
    }
}

impl Theme {
    /// Applies `LCD:SOLID` components; `None` keeps the current component.
    pub fn apply_solid(&mut self, rgb: [Option<u8>; 3]) -> bool {
        let before = self.background;
        let [r, g, b] = rgb;
        self.background = Rgb::new(
            r.unwrap_or(before.r),
            g.unwrap_or(before.g),
            b.unwrap_or(before.b),
        );
        self.background != before
    }

    /// Applies `LCD:WHEEL`.
    pub fn apply_wheel(&mut self, hue: u8) -> bool {
        let before = self.background;
        self.background = Rgb::wheel(hue);
        self.background != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheel_primary_points() {
        assert_eq!(Rgb::wheel(0), Rgb::new(255, 0, 0));
        assert_eq!(Rgb::wheel(85), Rgb::new(0, 255, 0));
        assert_eq!(Rgb::wheel(170), Rgb::new(0, 0, 255));
    }

    #[test]
    fn wheel_never_overflows() {
        for hue in 0..=255u8 {
            let _ = Rgb::wheel(hue);
        }
    }

    #[test]
    fn solid_partial_update_keeps_components() {
        let mut theme = Theme::default();
        assert!(theme.apply_solid([Some(10), Some(20), Some(30)]));
        assert!(theme.apply_solid([None, Some(99), None]));
        assert_eq!(theme.background, Rgb::new(10, 99, 30));
        assert!(!theme.apply_solid([None, None, None]));
    }

    #[test]
    fn wheel_reports_change() {
        let mut theme = Theme::default();
        assert!(theme.apply_wheel(0));
        assert!(!theme.apply_wheel(0));
    }
}
