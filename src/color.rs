use crate::error::{Error, Result};
use image::Rgba;
use std::str::FromStr;

/// An sRGB colour with alpha, parsed from CSS-style hex notation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl HexColor {
    pub const BLACK: HexColor = HexColor::opaque(0, 0, 0);
    pub const WHITE: HexColor = HexColor::opaque(255, 255, 255);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, self.a])
    }

    /// Channels scaled to 0.0..=1.0 for the PDF colour operators.
    pub fn to_unit_rgb(self) -> (f32, f32, f32) {
        (
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        )
    }
}

impl FromStr for HexColor {
    type Err = Error;

    /// Accepts `#rgb`, `#rgba`, `#rrggbb` and `#rrggbbaa`; the `#` is optional.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidConfiguration(format!("{s:?} is not a hex colour"));

        let hex = s.trim().trim_start_matches('#');
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let expanded: String = match hex.len() {
            3 | 4 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 | 8 => hex.to_string(),
            _ => return Err(invalid()),
        };

        let channel = |i: usize| u8::from_str_radix(&expanded[i * 2..i * 2 + 2], 16);
        let r = channel(0).map_err(|_| invalid())?;
        let g = channel(1).map_err(|_| invalid())?;
        let b = channel(2).map_err(|_| invalid())?;
        let a = if expanded.len() == 8 {
            channel(3).map_err(|_| invalid())?
        } else {
            255
        };

        Ok(Self { r, g, b, a })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_forms() {
        assert_eq!("#000000".parse::<HexColor>().unwrap(), HexColor::BLACK);
        assert_eq!("#fff".parse::<HexColor>().unwrap(), HexColor::WHITE);
        assert_eq!(
            "1a2B3c".parse::<HexColor>().unwrap(),
            HexColor::opaque(0x1a, 0x2b, 0x3c)
        );
        assert_eq!(
            "#ff000080".parse::<HexColor>().unwrap(),
            HexColor {
                r: 255,
                g: 0,
                b: 0,
                a: 0x80
            }
        );
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "#", "#12", "#12345", "#gggggg", "black", "#ffffff0"] {
            assert!(
                matches!(bad.parse::<HexColor>(), Err(Error::InvalidConfiguration(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn unit_channels() {
        let (r, g, b) = HexColor::opaque(255, 0, 51).to_unit_rgb();
        assert_eq!(r, 1.0);
        assert_eq!(g, 0.0);
        assert!((b - 0.2).abs() < 1e-6);
    }
}
