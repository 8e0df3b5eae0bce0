#![forbid(unsafe_code)]

//! Colors and stroke widths for the overlay.

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with alpha derived from an opacity in `[0, 1]`.
    #[must_use]
    pub fn with_opacity(self, opacity: f64) -> Self {
        let opacity = if opacity.is_finite() {
            opacity.clamp(0.0, 1.0)
        } else {
            1.0
        };
        Self {
            a: (opacity * 255.0).round() as u8,
            ..self
        }
    }

    pub fn opacity(self) -> f64 {
        f64::from(self.a) / 255.0
    }

    pub fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// `#rrggbb`, alpha dropped.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Palette for one overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayTheme {
    /// Scrim color; its alpha is replaced by the configured scrim opacity.
    pub scrim: Rgba,
    pub ring: Rgba,
    pub ring_width: f64,
    pub connector: Rgba,
    pub connector_width: f64,
    pub card_background: Rgba,
    pub card_border: Rgba,
    pub text: Rgba,
    pub muted_text: Rgba,
    pub accent: Rgba,
    pub nudge: Rgba,
}

impl Default for OverlayTheme {
    fn default() -> Self {
        Self {
            scrim: Rgba::rgb(9, 12, 20),
            ring: Rgba::rgb(255, 196, 0),
            ring_width: 2.0,
            connector: Rgba::rgb(255, 196, 0),
            connector_width: 2.0,
            card_background: Rgba::WHITE,
            card_border: Rgba::rgb(214, 219, 228),
            text: Rgba::rgb(24, 28, 38),
            muted_text: Rgba::rgb(98, 106, 122),
            accent: Rgba::rgb(52, 103, 235),
            nudge: Rgba::rgb(201, 72, 26),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opacity_round_trips_through_alpha() {
        let c = Rgba::BLACK.with_opacity(0.55);
        assert_eq!(c.a, 140);
        assert!((c.opacity() - 0.549).abs() < 0.01);
        assert_eq!(Rgba::WHITE.with_opacity(f64::NAN).a, 255);
        assert_eq!(Rgba::WHITE.with_opacity(-3.0).a, 0);
    }

    #[test]
    fn hex_formatting() {
        assert_eq!(Rgba::rgb(255, 196, 0).to_hex(), "#ffc400");
        assert_eq!(Rgba::TRANSPARENT.to_hex(), "#000000");
        assert!(Rgba::TRANSPARENT.is_transparent());
    }
}
